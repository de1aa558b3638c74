//! # Data URI 解析
//!
//! ## 设计思路
//!
//! Data URI 的内容直接内嵌在字符串里，解析完全在内存中完成，不会挂起。
//! 唯一的失败来源是头部或载荷格式错误，统一映射为 `MediaError::MalformedDataUri`。
//! 内容已经在内存里，获取阶段的体积上限不作用于 Data URI。
//!
//! ## 实现思路
//!
//! - 头部形如 `data:<mime>[;参数...];base64`，用预编译正则匹配。
//! - 解码容忍空白与缺省填充。

use base64::Engine as _;
use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use bytes::Bytes;
use once_cell::sync::Lazy;
use regex::Regex;

use super::config::mime_essence;
use super::source::FetchedPayload;
use super::MediaError;

const DATA_SCHEME: &str = "data:";
const FALLBACK_EXTENSION: &str = "bin";

static DATA_URI_HEADER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^data:([a-z0-9!#$&^_.+-]+/[a-z0-9!#$&^_.+-]+)((?:;[^;,]*)*);base64$")
        .expect("data uri header pattern is valid")
});

const LENIENT_BASE64: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// 是否为 Data URI（大小写不敏感）。
pub fn is_data_uri(source: &str) -> bool {
    source
        .trim_start()
        .get(..DATA_SCHEME.len())
        .is_some_and(|prefix| prefix.eq_ignore_ascii_case(DATA_SCHEME))
}

/// 由 MIME 推导扩展名：按 `/` 或 `+` 切分取子类型。
///
/// ```rust
/// use editor_media_kit::media::extension_from_mime;
///
/// assert_eq!(extension_from_mime("image/png"), "png");
/// assert_eq!(extension_from_mime("image/svg+xml"), "svg");
/// ```
pub fn extension_from_mime(mime_type: &str) -> String {
    mime_essence(mime_type)
        .split(['/', '+'])
        .nth(1)
        .map(str::trim)
        .filter(|ext| !ext.is_empty())
        .unwrap_or(FALLBACK_EXTENSION)
        .to_string()
}

/// 读取头部声明的 MIME，头部不合法时返回 `None`。
pub fn declared_mime_type(source: &str) -> Option<String> {
    let (header, _) = source.trim().split_once(',')?;
    let captures = DATA_URI_HEADER.captures(header)?;
    captures.get(1).map(|m| m.as_str().to_ascii_lowercase())
}

/// 解码 Data URI。
pub fn decode(source: &str) -> Result<FetchedPayload, MediaError> {
    let normalized = source.trim();
    let (header, payload) = normalized
        .split_once(',')
        .ok_or_else(|| MediaError::MalformedDataUri("缺少 ',' 分隔符".to_string()))?;

    let captures = DATA_URI_HEADER.captures(header).ok_or_else(|| {
        MediaError::MalformedDataUri(format!("无法解析头部：{}", truncate_for_log(header)))
    })?;
    let mime_type = captures
        .get(1)
        .map(|m| m.as_str().to_ascii_lowercase())
        .ok_or_else(|| MediaError::MalformedDataUri("缺少 MIME 类型".to_string()))?;

    let compact: String = payload.chars().filter(|c| !c.is_ascii_whitespace()).collect();

    let bytes = LENIENT_BASE64
        .decode(compact.as_bytes())
        .map_err(|e| MediaError::MalformedDataUri(format!("Base64 解码失败：{}", e)))?;

    Ok(FetchedPayload {
        bytes: Bytes::from(bytes),
        extension: extension_from_mime(&mime_type),
        mime_type,
    })
}

fn truncate_for_log(text: &str) -> String {
    const LIMIT: usize = 64;
    if text.chars().count() <= LIMIT {
        return text.to_string();
    }
    let head: String = text.chars().take(LIMIT).collect();
    format!("{}…", head)
}
