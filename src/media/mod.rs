//! # 媒体动作模块
//!
//! ## 设计思路
//!
//! 编辑器中的媒体块支持三种动作：下载、复制图片、复制链接。
//! 模块按“校验 → 获取 → 副作用”拆分职责，每一段都可以单独测试或替换：
//!
//! | 子模块 | 职责 |
//! |--------|------|
//! | `validator` | 插入前按 `AssetPolicy` 划分接受/拒绝 |
//! | `fetcher` | Data URI / http(s) / file 来源 → 字节 + 类型 |
//! | `clipboard` | 剪贴板写入端口与系统实现（arboard） |
//! | `exporter` | 下载文件的导出端口与磁盘实现 |
//! | `actions` | 三种动作策略 |
//! | `pipeline` | 分派 + 错误到回调的转换 |
//!
//! ## 使用示例
//! ```rust,no_run
//! use std::sync::Arc;
//! use editor_media_kit::media::{
//!     ActionKind, AssetFetcher, AssetPolicy, DiskExporter, FetchConfig, MediaActionPipeline,
//!     MediaAsset, MediaCallbacks, SystemClipboard,
//! };
//!
//! # async fn demo() -> Result<(), editor_media_kit::media::MediaError> {
//! let pipeline = MediaActionPipeline::new(
//!     AssetPolicy::default(),
//!     Arc::new(AssetFetcher::new(FetchConfig::default())?),
//!     Arc::new(SystemClipboard::default()),
//!     Arc::new(DiskExporter::new("downloads")),
//! );
//! let callbacks = MediaCallbacks::new()
//!     .on_action_success(|report| println!("done: {}", report.action.as_str()))
//!     .on_action_error(|err, _| eprintln!("failed: {}", err));
//!
//! pipeline
//!     .run_action(ActionKind::CopyLink, MediaAsset::new("https://x/y.png"), &callbacks)
//!     .await;
//! # Ok(())
//! # }
//! ```

mod actions;
mod clipboard;
mod config;
mod data_uri;
mod error;
mod exporter;
mod fetcher;
mod pipeline;
mod source;
mod validator;

pub use actions::{ActionKind, CopyImageAction, CopyLinkAction, DownloadAction, MediaAction};
pub use clipboard::{ClipboardSink, SystemClipboard};
pub use config::{AssetPolicy, ClipboardConfig, FetchConfig};
pub use data_uri::{extension_from_mime, is_data_uri};
pub use error::MediaError;
pub use exporter::{sanitize_file_name, DiskExporter, FileExporter};
pub use fetcher::AssetFetcher;
pub use pipeline::{ActionReport, MediaActionPipeline, MediaCallbacks};
pub use source::{FetchedPayload, FileHandle, InsertableMedia, MediaAsset, MediaSource};
pub use validator::{check, validate, Rejection, RejectionReason, ValidationOutcome};
