//! # 资源校验模块（FileValidator）
//!
//! ## 设计思路
//!
//! 校验是纯函数：把候选列表划分为“接受”与“拒绝”两部分，每个候选恰好落入其一。
//! 拒绝是预期内的业务数据而不是错误，调用方可以继续插入被接受的部分。
//!
//! ## 实现思路
//!
//! 按顺序应用规则，第一个失败的规则决定拒绝原因：
//! 1. Base64 Data URI 且策略不允许 → `Base64Disallowed`
//! 2. 文件句柄声明体积超限 → `TooLarge`
//! 3. 可解析出的 MIME 不在白名单 → `MimeTypeDisallowed`
//!
//! 远程 URL 的类型在校验时未知，推迟到获取阶段（且获取阶段不再按白名单拦截）。

use serde::{Deserialize, Serialize};

use super::config::AssetPolicy;
use super::data_uri;
use super::source::{MediaAsset, MediaSource};

/// 拒绝原因。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RejectionReason {
    Base64Disallowed,
    TooLarge,
    MimeTypeDisallowed,
}

impl RejectionReason {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Base64Disallowed => "base64-disallowed",
            Self::TooLarge => "too-large",
            Self::MimeTypeDisallowed => "mime-type-disallowed",
        }
    }
}

/// 一条拒绝记录。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rejection {
    pub asset: MediaAsset,
    pub reason: RejectionReason,
}

/// 校验结果。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationOutcome {
    pub accepted: Vec<MediaAsset>,
    pub rejected: Vec<Rejection>,
}

impl ValidationOutcome {
    pub fn has_rejections(&self) -> bool {
        !self.rejected.is_empty()
    }
}

/// 校验时可解析出的 MIME 类型；远程 URL 返回 `None`。
fn resolved_mime_type(source: &MediaSource) -> Option<String> {
    match source {
        MediaSource::File(handle) => Some(handle.mime_type.clone()),
        MediaSource::Url(url) if data_uri::is_data_uri(url) => data_uri::declared_mime_type(url),
        MediaSource::Url(_) => None,
    }
}

/// 检查单个资源，返回第一个命中的拒绝原因。
pub fn check(asset: &MediaAsset, policy: &AssetPolicy) -> Option<RejectionReason> {
    if let MediaSource::Url(url) = &asset.source {
        if data_uri::is_data_uri(url) && !policy.allow_base64_data_uris {
            return Some(RejectionReason::Base64Disallowed);
        }
    }

    if let MediaSource::File(handle) = &asset.source {
        if policy.exceeds_size_limit(handle.size) {
            return Some(RejectionReason::TooLarge);
        }
    }

    if let Some(mime_type) = resolved_mime_type(&asset.source) {
        if !policy.allows_mime_type(&mime_type) {
            return Some(RejectionReason::MimeTypeDisallowed);
        }
    }

    None
}

/// 批量校验。
///
/// # 示例
/// ```rust
/// use editor_media_kit::media::{validate, AssetPolicy, MediaAsset, RejectionReason};
///
/// let policy = AssetPolicy { allow_base64_data_uris: false, ..AssetPolicy::default() };
/// let outcome = validate(
///     vec![
///         MediaAsset::new("data:image/png;base64,AAAA"),
///         MediaAsset::new("https://example.com/a.png"),
///     ],
///     &policy,
/// );
///
/// assert_eq!(outcome.accepted.len(), 1);
/// assert_eq!(outcome.rejected[0].reason, RejectionReason::Base64Disallowed);
/// ```
pub fn validate(assets: Vec<MediaAsset>, policy: &AssetPolicy) -> ValidationOutcome {
    let mut outcome = ValidationOutcome::default();

    for asset in assets {
        match check(&asset, policy) {
            Some(reason) => {
                log::warn!("🚫 资源被拒绝 - 原因: {}", reason.as_str());
                outcome.rejected.push(Rejection { asset, reason });
            }
            None => outcome.accepted.push(asset),
        }
    }

    outcome
}
