//! 统一错误类型模块
//!
//! # 设计思路
//!
//! 定义 crate 级统一的 `AppError` 枚举。尺寸调整在运行期不会出错（所有输入都被钳制吸收），
//! 唯一的致命错误是调用方传入了不合法的 `ResizePolicy`；媒体动作的运行期失败
//! 由 `MediaError` 承载，并在流水线边界转为回调。
//!
//! # 实现思路
//!
//! - 使用 `thiserror` 派生可读错误消息。
//! - 为 `MediaError` 与 `std::io::Error` 提供 `From` 转换，无需手动 map。
//! - 实现 `Serialize` 将错误序列化为字符串，宿主 UI 收到一致的错误格式。

use serde::Serialize;

use crate::media::MediaError;

/// 应用级统一错误类型
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// 尺寸策略不合法（调用方误用）
    #[error("尺寸策略无效: {0}")]
    InvalidPolicy(String),

    /// 配置文件读取或解析失败
    #[error("配置错误: {0}")]
    Settings(String),

    /// 媒体动作错误（获取 / 剪贴板 / 导出）
    #[error("{0}")]
    Media(#[from] MediaError),

    /// 文件系统 I/O 错误
    #[error("文件系统错误: {0}")]
    Io(#[from] std::io::Error),
}

/// 将错误序列化为人类可读的字符串。
impl Serialize for AppError {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}
