//! # 配置模块
//!
//! ## 设计思路
//!
//! 将所有“可调策略”集中管理：
//! - `AssetPolicy`：插入前的客户端校验策略（MIME 白名单、体积上限、是否允许 Base64）
//! - `FetchConfig`：获取阶段的网络与资源限制
//! - `ClipboardConfig`：剪贴板写入重试
//!
//! 三者都实现 `Default` 并支持 serde 反序列化，字段缺省即取默认值。

use serde::{Deserialize, Serialize};

/// 资源校验策略。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AssetPolicy {
    /// 允许的 MIME 类型，空表示全部允许。
    pub allowed_mime_types: Vec<String>,
    /// 文件体积上限（字节），0 表示不限制。
    pub max_file_size_bytes: u64,
    /// 是否允许 Base64 Data URI。
    pub allow_base64_data_uris: bool,
}

impl Default for AssetPolicy {
    fn default() -> Self {
        Self {
            allowed_mime_types: Vec::new(),
            max_file_size_bytes: 0,
            allow_base64_data_uris: true,
        }
    }
}

impl AssetPolicy {
    /// MIME 是否在白名单内（大小写不敏感，忽略参数部分）。
    pub fn allows_mime_type(&self, mime_type: &str) -> bool {
        if self.allowed_mime_types.is_empty() {
            return true;
        }
        let essence = mime_essence(mime_type);
        self.allowed_mime_types
            .iter()
            .any(|allowed| mime_essence(allowed) == essence)
    }

    /// 体积是否超过上限。
    pub fn exceeds_size_limit(&self, size: u64) -> bool {
        self.max_file_size_bytes > 0 && size > self.max_file_size_bytes
    }
}

/// 取 MIME 的主体部分：`Image/PNG; charset=x` → `image/png`。
pub(crate) fn mime_essence(mime_type: &str) -> String {
    mime_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase()
}

/// 获取阶段配置。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FetchConfig {
    /// 单个资源允许的最大体积（字节）。
    pub max_file_size: u64,
    /// 整体下载超时（秒）。
    pub download_timeout: u64,
    /// 建立连接超时（秒）。
    pub connect_timeout: u64,
    /// 最大重定向次数。
    pub max_redirects: usize,
    /// 下载缓存存活时间（秒），0 表示关闭缓存。
    pub cache_ttl_secs: u64,
    /// 下载缓存条目上限。
    pub cache_max_entries: usize,
    /// 是否使用系统代理（`HTTP_PROXY` 等环境变量）。
    pub use_system_proxy: bool,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            max_file_size: 50 * 1024 * 1024,
            download_timeout: 30,
            connect_timeout: 8,
            max_redirects: 5,
            cache_ttl_secs: 25,
            cache_max_entries: 24,
            use_system_proxy: true,
        }
    }
}

/// 剪贴板写入配置。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ClipboardConfig {
    /// 写入失败时最大尝试次数。
    pub retries: u32,
    /// 首次重试间隔（毫秒），之后指数退避。
    pub retry_delay_ms: u64,
    /// 单次退避上限（毫秒）。
    pub retry_max_delay_ms: u64,
}

impl Default for ClipboardConfig {
    fn default() -> Self {
        Self {
            retries: 3,
            retry_delay_ms: 100,
            retry_max_delay_ms: 900,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_allow_list_allows_everything() {
        let policy = AssetPolicy::default();
        assert!(policy.allows_mime_type("application/pdf"));
    }

    #[test]
    fn allow_list_matches_case_insensitively() {
        let policy = AssetPolicy {
            allowed_mime_types: vec!["image/png".into(), "image/jpeg".into()],
            ..AssetPolicy::default()
        };

        assert!(policy.allows_mime_type("IMAGE/PNG"));
        assert!(policy.allows_mime_type("image/jpeg; q=0.9"));
        assert!(!policy.allows_mime_type("image/gif"));
    }

    #[test]
    fn zero_size_limit_means_unlimited() {
        let policy = AssetPolicy::default();
        assert!(!policy.exceeds_size_limit(u64::MAX));

        let limited = AssetPolicy {
            max_file_size_bytes: 10,
            ..AssetPolicy::default()
        };
        assert!(!limited.exceeds_size_limit(10));
        assert!(limited.exceeds_size_limit(11));
    }

    #[test]
    fn policy_deserializes_with_defaults() {
        let policy: AssetPolicy =
            serde_json::from_str(r#"{"maxFileSizeBytes": 1024}"#).expect("parse failed");

        assert_eq!(policy.max_file_size_bytes, 1024);
        assert!(policy.allow_base64_data_uris);
        assert!(policy.allowed_mime_types.is_empty());
    }
}
