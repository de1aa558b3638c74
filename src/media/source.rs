//! # 数据源与中间模型
//!
//! ## 设计思路
//!
//! 将“外部输入”和“流水线中间结果”解耦：
//! - `MediaAsset` / `MediaSource` 表示文档里的媒体引用（内存文件句柄或 URL 字符串）
//! - `FetchedPayload` 表示已获取的二进制内容与类型提示
//! - `InsertableMedia` 表示校验通过、可交给文档层插入的节点属性

use std::path::{Path, PathBuf};

use bytes::Bytes;
use serde::{Deserialize, Serialize};

use super::MediaError;

/// 本地文件句柄。
///
/// `size` 与 `mime_type` 是声明值，校验阶段只看声明，不读磁盘。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileHandle {
    pub path: PathBuf,
    pub name: String,
    pub size: u64,
    pub mime_type: String,
}

impl FileHandle {
    /// 从磁盘路径构建句柄：体积取 metadata，类型按文件头嗅探。
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, MediaError> {
        let path = path.as_ref();
        let metadata = std::fs::metadata(path)
            .map_err(|e| MediaError::FileSystem(format!("无法读取文件信息：{}", e)))?;
        let mime_type = infer::get_from_path(path)
            .map_err(|e| MediaError::FileSystem(format!("无法读取文件：{}", e)))?
            .map(|kind| kind.mime_type().to_string())
            .unwrap_or_else(|| "application/octet-stream".to_string());
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();

        Ok(Self {
            path: path.to_path_buf(),
            name,
            size: metadata.len(),
            mime_type,
        })
    }

    /// 转为 `file://` 引用，相对路径先补全为绝对路径。
    pub fn to_file_url(&self) -> String {
        let absolute = std::path::absolute(&self.path).unwrap_or_else(|_| self.path.clone());
        reqwest::Url::from_file_path(&absolute)
            .map(|url| url.to_string())
            .unwrap_or_else(|_| format!("file://{}", absolute.display()))
    }
}

/// 媒体来源：内存文件句柄，或 URL / Data URI 字符串。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "camelCase")]
pub enum MediaSource {
    File(FileHandle),
    Url(String),
}

impl MediaSource {
    /// 可被获取/复制的字符串引用。
    pub fn reference(&self) -> String {
        match self {
            Self::File(handle) => handle.to_file_url(),
            Self::Url(url) => url.clone(),
        }
    }
}

impl From<&str> for MediaSource {
    fn from(value: &str) -> Self {
        Self::Url(value.to_string())
    }
}

impl From<String> for MediaSource {
    fn from(value: String) -> Self {
        Self::Url(value)
    }
}

impl From<FileHandle> for MediaSource {
    fn from(value: FileHandle) -> Self {
        Self::File(value)
    }
}

/// 文档中的媒体资源。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaAsset {
    pub source: MediaSource,
    pub alt: Option<String>,
    pub title: Option<String>,
}

impl MediaAsset {
    pub fn new(source: impl Into<MediaSource>) -> Self {
        Self {
            source: source.into(),
            alt: None,
            title: None,
        }
    }

    pub fn with_alt(mut self, alt: impl Into<String>) -> Self {
        self.alt = Some(alt.into());
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// 下载时使用的文件名主体：alt 文本，缺省为 `image`。
    pub fn download_stem(&self) -> &str {
        match self.alt.as_deref().map(str::trim) {
            Some(alt) if !alt.is_empty() => alt,
            _ => "image",
        }
    }
}

/// 获取阶段输出。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedPayload {
    pub bytes: Bytes,
    pub mime_type: String,
    /// 扩展名提示（不含点）。
    pub extension: String,
}

/// 校验通过后交给文档层插入的节点属性。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InsertableMedia {
    pub src: String,
    pub alt: Option<String>,
    pub title: Option<String>,
}

impl From<MediaAsset> for InsertableMedia {
    fn from(asset: MediaAsset) -> Self {
        Self {
            src: asset.source.reference(),
            alt: asset.alt,
            title: asset.title,
        }
    }
}
