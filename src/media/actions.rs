//! # 媒体动作策略
//!
//! ## 设计思路
//!
//! 三种动作共享一个入口，但行为彼此独立：用封闭枚举 `ActionKind` 做分派，
//! 每个动作是一个实现 `MediaAction` 的策略对象，宿主可以逐个替换。
//!
//! ## 实现思路
//!
//! - `download`：获取 → 以 `<alt 或 image>.<扩展名>` 导出
//! - `copyImage`：获取 → 按获取到的类型写入剪贴板图片
//! - `copyLink`：直接把原始来源字符串写入剪贴板文本，不经过获取
//!
//! 策略只负责把动作做完并返回 `Result`，错误到回调的转换由流水线完成。

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::clipboard::ClipboardSink;
use super::exporter::FileExporter;
use super::fetcher::AssetFetcher;
use super::source::MediaAsset;
use super::MediaError;

/// 动作类型。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ActionKind {
    Download,
    CopyImage,
    CopyLink,
}

impl ActionKind {
    pub const ALL: [ActionKind; 3] = [Self::Download, Self::CopyImage, Self::CopyLink];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Download => "download",
            Self::CopyImage => "copyImage",
            Self::CopyLink => "copyLink",
        }
    }
}

impl std::str::FromStr for ActionKind {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "download" => Ok(Self::Download),
            "copyImage" | "copy-image" => Ok(Self::CopyImage),
            "copyLink" | "copy-link" => Ok(Self::CopyLink),
            other => Err(format!("未知动作：{}", other)),
        }
    }
}

/// 单个动作策略。
#[async_trait]
pub trait MediaAction: Send + Sync {
    async fn execute(&self, asset: &MediaAsset) -> Result<(), MediaError>;
}

/// 下载到导出目录。
pub struct DownloadAction {
    fetcher: Arc<AssetFetcher>,
    exporter: Arc<dyn FileExporter>,
}

impl DownloadAction {
    pub fn new(fetcher: Arc<AssetFetcher>, exporter: Arc<dyn FileExporter>) -> Self {
        Self { fetcher, exporter }
    }
}

#[async_trait]
impl MediaAction for DownloadAction {
    async fn execute(&self, asset: &MediaAsset) -> Result<(), MediaError> {
        let payload = self.fetcher.fetch(&asset.source.reference()).await?;
        let file_name = format!("{}.{}", asset.download_stem(), payload.extension);
        self.exporter.export(&file_name, &payload.bytes).await?;
        Ok(())
    }
}

/// 复制图片到剪贴板。
pub struct CopyImageAction {
    fetcher: Arc<AssetFetcher>,
    clipboard: Arc<dyn ClipboardSink>,
}

impl CopyImageAction {
    pub fn new(fetcher: Arc<AssetFetcher>, clipboard: Arc<dyn ClipboardSink>) -> Self {
        Self { fetcher, clipboard }
    }
}

#[async_trait]
impl MediaAction for CopyImageAction {
    async fn execute(&self, asset: &MediaAsset) -> Result<(), MediaError> {
        let payload = self.fetcher.fetch(&asset.source.reference()).await?;
        self.clipboard.write_image(&payload).await
    }
}

/// 复制来源链接到剪贴板。
pub struct CopyLinkAction {
    clipboard: Arc<dyn ClipboardSink>,
}

impl CopyLinkAction {
    pub fn new(clipboard: Arc<dyn ClipboardSink>) -> Self {
        Self { clipboard }
    }
}

#[async_trait]
impl MediaAction for CopyLinkAction {
    async fn execute(&self, asset: &MediaAsset) -> Result<(), MediaError> {
        self.clipboard.write_text(&asset.source.reference()).await
    }
}
