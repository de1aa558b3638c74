//! # 错误模型模块
//!
//! ## 设计思路
//!
//! 用单一错误枚举承载媒体动作链路中所有“运行期可恢复”的失败：获取、剪贴板、文件导出。
//! 这些错误在流水线边界统一转为 `on_action_error` 回调，不会向调用方抛出。
//! 校验拒绝不在此列，它们以数据形式出现在 `ValidationOutcome` 中。

/// 媒体动作统一错误类型。
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MediaError {
    #[error("获取失败：HTTP {status}")]
    FetchFailed { status: u16 },

    #[error("Data URI 格式错误：{0}")]
    MalformedDataUri(String),

    #[error("网络错误：{0}")]
    Network(String),

    #[error("超时错误：{0}")]
    Timeout(String),

    #[error("资源限制：{0}")]
    ResourceLimit(String),

    #[error("不支持的来源：{0}")]
    UnsupportedSource(String),

    #[error("解码错误：{0}")]
    Decode(String),

    #[error("剪贴板错误：{0}")]
    Clipboard(String),

    #[error("文件错误：{0}")]
    FileSystem(String),
}

impl MediaError {
    /// 稳定的错误标识，供宿主 UI 做分支或埋点。
    pub fn code(&self) -> &'static str {
        match self {
            Self::FetchFailed { .. } => "fetch-failed",
            Self::MalformedDataUri(_) => "malformed-data-uri",
            Self::Network(_) => "network",
            Self::Timeout(_) => "timeout",
            Self::ResourceLimit(_) => "resource-limit",
            Self::UnsupportedSource(_) => "unsupported-source",
            Self::Decode(_) => "decode",
            Self::Clipboard(_) => "clipboard",
            Self::FileSystem(_) => "file-system",
        }
    }
}

impl From<MediaError> for String {
    fn from(error: MediaError) -> Self {
        error.to_string()
    }
}
