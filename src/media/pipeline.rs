//! # 媒体动作流水线（MediaActionPipeline）
//!
//! ## 设计思路
//!
//! 流水线本身不关心“怎么下载/怎么复制”，它的职责是：
//! 1. 按 `ActionKind` 分派到对应策略（默认策略或宿主注入的策略）
//! 2. 把策略的 `Result` 翻译为回调：成功与失败恰好触发其一
//! 3. 插入前批量校验，拒绝项以数据形式一次性上报
//!
//! 错误永远不会越过流水线边界向调用方抛出。
//!
//! ## 实现思路
//!
//! - 回调集合 `MediaCallbacks` 的每个字段都是可选的，缺省即不做任何事。
//! - `run_action` 是可等待版本，`spawn_action` 交给 tokio 运行时执行，调用方无需等待。
//! - 动作没有取消原语，调用方可以忽略迟到的回调。

use std::sync::Arc;
use std::time::Instant;

use serde::Serialize;

use super::actions::{ActionKind, CopyImageAction, CopyLinkAction, DownloadAction, MediaAction};
use super::clipboard::ClipboardSink;
use super::config::AssetPolicy;
use super::exporter::FileExporter;
use super::fetcher::AssetFetcher;
use super::source::{InsertableMedia, MediaAsset};
use super::validator::{self, Rejection, ValidationOutcome};
use super::MediaError;

/// 回调中携带的动作上下文。
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActionReport {
    #[serde(flatten)]
    pub asset: MediaAsset,
    pub action: ActionKind,
}

type SuccessCallback = Arc<dyn Fn(&ActionReport) + Send + Sync>;
type ErrorCallback = Arc<dyn Fn(&MediaError, &ActionReport) + Send + Sync>;
type ValidationCallback = Arc<dyn Fn(&[Rejection]) + Send + Sync>;

/// 调用方提供的回调集合，字段全部可选。
#[derive(Clone, Default)]
pub struct MediaCallbacks {
    pub on_action_success: Option<SuccessCallback>,
    pub on_action_error: Option<ErrorCallback>,
    pub on_validation_error: Option<ValidationCallback>,
}

impl MediaCallbacks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_action_success(mut self, callback: impl Fn(&ActionReport) + Send + Sync + 'static) -> Self {
        self.on_action_success = Some(Arc::new(callback));
        self
    }

    pub fn on_action_error(
        mut self,
        callback: impl Fn(&MediaError, &ActionReport) + Send + Sync + 'static,
    ) -> Self {
        self.on_action_error = Some(Arc::new(callback));
        self
    }

    pub fn on_validation_error(mut self, callback: impl Fn(&[Rejection]) + Send + Sync + 'static) -> Self {
        self.on_validation_error = Some(Arc::new(callback));
        self
    }

    fn action_succeeded(&self, report: &ActionReport) {
        if let Some(callback) = &self.on_action_success {
            callback(report);
        }
    }

    fn action_failed(&self, error: &MediaError, report: &ActionReport) {
        if let Some(callback) = &self.on_action_error {
            callback(error, report);
        }
    }

    fn validation_failed(&self, rejections: &[Rejection]) {
        if let Some(callback) = &self.on_validation_error {
            callback(rejections);
        }
    }
}

impl std::fmt::Debug for MediaCallbacks {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MediaCallbacks")
            .field("on_action_success", &self.on_action_success.is_some())
            .field("on_action_error", &self.on_action_error.is_some())
            .field("on_validation_error", &self.on_validation_error.is_some())
            .finish()
    }
}

/// 媒体动作流水线。
pub struct MediaActionPipeline {
    policy: AssetPolicy,
    download: Arc<dyn MediaAction>,
    copy_image: Arc<dyn MediaAction>,
    copy_link: Arc<dyn MediaAction>,
}

impl MediaActionPipeline {
    /// 使用默认策略构建流水线。
    pub fn new(
        policy: AssetPolicy,
        fetcher: Arc<AssetFetcher>,
        clipboard: Arc<dyn ClipboardSink>,
        exporter: Arc<dyn FileExporter>,
    ) -> Self {
        Self {
            policy,
            download: Arc::new(DownloadAction::new(fetcher.clone(), exporter)),
            copy_image: Arc::new(CopyImageAction::new(fetcher, clipboard.clone())),
            copy_link: Arc::new(CopyLinkAction::new(clipboard)),
        }
    }

    /// 替换某个动作的实现。
    pub fn override_action(mut self, kind: ActionKind, action: Arc<dyn MediaAction>) -> Self {
        log::debug!("↔️ 替换动作实现 - {}", kind.as_str());
        match kind {
            ActionKind::Download => self.download = action,
            ActionKind::CopyImage => self.copy_image = action,
            ActionKind::CopyLink => self.copy_link = action,
        }
        self
    }

    pub fn policy(&self) -> &AssetPolicy {
        &self.policy
    }

    fn strategy(&self, kind: ActionKind) -> &Arc<dyn MediaAction> {
        match kind {
            ActionKind::Download => &self.download,
            ActionKind::CopyImage => &self.copy_image,
            ActionKind::CopyLink => &self.copy_link,
        }
    }

    /// 执行一个动作，成功/失败回调恰好触发其一。
    pub async fn run_action(&self, kind: ActionKind, asset: MediaAsset, callbacks: &MediaCallbacks) {
        let start = Instant::now();
        let result = self.strategy(kind).execute(&asset).await;
        let report = ActionReport { asset, action: kind };

        match result {
            Ok(()) => {
                log::info!(
                    "✅ 动作完成 - {} 耗时: {}ms",
                    kind.as_str(),
                    start.elapsed().as_millis()
                );
                callbacks.action_succeeded(&report);
            }
            Err(err) => {
                log::warn!(
                    "❌ 动作失败 - {} [{}] {} 耗时: {}ms",
                    kind.as_str(),
                    err.code(),
                    err,
                    start.elapsed().as_millis()
                );
                callbacks.action_failed(&err, &report);
            }
        }
    }

    /// `run_action` 的后台版本，不需要等待。
    pub fn spawn_action(
        self: &Arc<Self>,
        kind: ActionKind,
        asset: MediaAsset,
        callbacks: MediaCallbacks,
    ) -> tokio::task::JoinHandle<()> {
        let pipeline = Arc::clone(self);
        tokio::spawn(async move {
            pipeline.run_action(kind, asset, &callbacks).await;
        })
    }

    /// 批量校验，有拒绝项时触发一次 `on_validation_error`。
    pub fn validate(&self, assets: Vec<MediaAsset>, callbacks: &MediaCallbacks) -> ValidationOutcome {
        let outcome = validator::validate(assets, &self.policy);
        if outcome.has_rejections() {
            log::warn!(
                "⚠️ 校验完成 - 接受 {} 个，拒绝 {} 个",
                outcome.accepted.len(),
                outcome.rejected.len()
            );
            callbacks.validation_failed(&outcome.rejected);
        }
        outcome
    }

    /// 校验后返回可插入文档的节点属性，文件句柄转为 `file://` 引用。
    pub fn insert_media(&self, assets: Vec<MediaAsset>, callbacks: &MediaCallbacks) -> Vec<InsertableMedia> {
        let outcome = self.validate(assets, callbacks);
        outcome.accepted.into_iter().map(InsertableMedia::from).collect()
    }
}
