//! # 剪贴板写入模块
//!
//! ## 设计思路
//!
//! 动作层只依赖 `ClipboardSink` 抽象，系统剪贴板实现与平台细节隔离在 `SystemClipboard` 中，
//! 测试或宿主可注入自己的实现。
//!
//! ## 实现思路
//!
//! - `arboard` 调用是阻塞的，放到 `spawn_blocking` 执行，不阻塞异步运行时。
//! - 图片先解码为 RGBA（`image` crate）再交给 `arboard`，解码在打开剪贴板之前完成。
//! - 写入失败按指数退避有限重试（其他应用占用剪贴板时常见瞬时失败）。

use std::borrow::Cow;
use std::time::Duration;

use async_trait::async_trait;

use super::config::ClipboardConfig;
use super::source::FetchedPayload;
use super::MediaError;

/// 剪贴板写入端口。
#[async_trait]
pub trait ClipboardSink: Send + Sync {
    /// 写入纯文本。
    async fn write_text(&self, text: &str) -> Result<(), MediaError>;

    /// 以载荷声明的类型写入图片。
    async fn write_image(&self, payload: &FetchedPayload) -> Result<(), MediaError>;
}

/// 已解码、可直接写入剪贴板的 RGBA 图片。
struct PreparedClipboardImage {
    width: usize,
    height: usize,
    bytes: Vec<u8>,
}

/// 基于 `arboard` 的系统剪贴板。
#[derive(Debug, Clone, Default)]
pub struct SystemClipboard {
    config: ClipboardConfig,
}

impl SystemClipboard {
    pub fn new(config: ClipboardConfig) -> Self {
        Self { config }
    }

    fn prepare_image(payload: &FetchedPayload) -> Result<PreparedClipboardImage, MediaError> {
        let decoded = image::load_from_memory(&payload.bytes).map_err(|e| {
            MediaError::Decode(format!("图片解码失败（{}）：{}", payload.mime_type, e))
        })?;
        let rgba = decoded.to_rgba8();
        let (width, height) = rgba.dimensions();

        Ok(PreparedClipboardImage {
            width: width as usize,
            height: height as usize,
            bytes: rgba.into_raw(),
        })
    }

    /// 在阻塞线程中执行写入 + 重试。
    fn write_with_retry<F>(config: &ClipboardConfig, label: &str, mut write: F) -> Result<(), MediaError>
    where
        F: FnMut(&mut arboard::Clipboard) -> Result<(), arboard::Error>,
    {
        let attempts = config.retries.max(1);
        let mut last_error = String::from("未知错误");

        for attempt in 1..=attempts {
            if attempt > 1 {
                let wait_ms = backoff_delay_ms(config.retry_delay_ms, attempt - 1, config.retry_max_delay_ms);
                log::debug!("🔄 剪贴板重试 {}/{}，等待 {}ms", attempt, attempts, wait_ms);
                std::thread::sleep(Duration::from_millis(wait_ms));
            }

            let result = arboard::Clipboard::new().and_then(|mut clipboard| write(&mut clipboard));
            match result {
                Ok(()) => {
                    log::info!("✅ 已写入剪贴板 - {}（尝试 {}）", label, attempt);
                    return Ok(());
                }
                Err(err @ arboard::Error::ClipboardNotSupported) => {
                    return Err(MediaError::Clipboard(format!("当前平台不支持剪贴板：{}", err)));
                }
                Err(err) => {
                    log::warn!("❌ 剪贴板写入失败（尝试 {}）：{}", attempt, err);
                    last_error = err.to_string();
                }
            }
        }

        Err(MediaError::Clipboard(last_error))
    }
}

/// 指数退避：`base × 2^(attempt-1)`，不超过上限。
fn backoff_delay_ms(base_delay_ms: u64, attempt: u32, max_delay_ms: u64) -> u64 {
    let exp = base_delay_ms.saturating_mul(1_u64 << attempt.saturating_sub(1).min(8));
    exp.min(max_delay_ms.max(base_delay_ms))
}

#[async_trait]
impl ClipboardSink for SystemClipboard {
    async fn write_text(&self, text: &str) -> Result<(), MediaError> {
        let config = self.config.clone();
        let text = text.to_string();

        tokio::task::spawn_blocking(move || {
            Self::write_with_retry(&config, "文本", |clipboard| clipboard.set_text(text.as_str()))
        })
        .await
        .map_err(|e| MediaError::Clipboard(format!("线程执行失败：{}", e)))?
    }

    async fn write_image(&self, payload: &FetchedPayload) -> Result<(), MediaError> {
        let config = self.config.clone();
        let payload = payload.clone();

        tokio::task::spawn_blocking(move || {
            let prepared = Self::prepare_image(&payload)?;
            log::debug!(
                "📋 准备复制图片 - {}x{} 类型: {}",
                prepared.width,
                prepared.height,
                payload.mime_type
            );
            Self::write_with_retry(&config, "图片", |clipboard| {
                clipboard.set_image(arboard::ImageData {
                    width: prepared.width,
                    height: prepared.height,
                    bytes: Cow::Borrowed(prepared.bytes.as_slice()),
                })
            })
        })
        .await
        .map_err(|e| MediaError::Clipboard(format!("线程执行失败：{}", e)))?
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;
    use image::{DynamicImage, ImageBuffer, ImageFormat, Rgba};
    use std::io::Cursor;

    fn png_payload(width: u32, height: u32) -> FetchedPayload {
        let img = ImageBuffer::from_fn(width, height, |x, y| {
            Rgba([(x % 255) as u8, (y % 255) as u8, 0, 255])
        });
        let mut cursor = Cursor::new(Vec::new());
        DynamicImage::ImageRgba8(img)
            .write_to(&mut cursor, ImageFormat::Png)
            .expect("failed to encode test image");

        FetchedPayload {
            bytes: Bytes::from(cursor.into_inner()),
            mime_type: "image/png".into(),
            extension: "png".into(),
        }
    }

    #[test]
    fn prepare_image_decodes_to_rgba() {
        let prepared = SystemClipboard::prepare_image(&png_payload(7, 3)).expect("prepare failed");

        assert_eq!(prepared.width, 7);
        assert_eq!(prepared.height, 3);
        assert_eq!(prepared.bytes.len(), 7 * 3 * 4);
    }

    #[test]
    fn prepare_image_rejects_non_image_bytes() {
        let payload = FetchedPayload {
            bytes: Bytes::from_static(b"<html></html>"),
            mime_type: "text/html".into(),
            extension: "html".into(),
        };

        assert!(matches!(
            SystemClipboard::prepare_image(&payload),
            Err(MediaError::Decode(_))
        ));
    }

    #[test]
    fn backoff_grows_and_caps() {
        assert_eq!(backoff_delay_ms(100, 1, 900), 100);
        assert_eq!(backoff_delay_ms(100, 2, 900), 200);
        assert_eq!(backoff_delay_ms(100, 3, 900), 400);
        assert_eq!(backoff_delay_ms(100, 5, 900), 900);
    }

    #[tokio::test]
    #[ignore = "requires system clipboard access"]
    async fn system_clipboard_round_trips_text() {
        let clipboard = SystemClipboard::default();
        clipboard
            .write_text("https://example.com/a.png")
            .await
            .expect("clipboard write should succeed");

        let read = arboard::Clipboard::new()
            .and_then(|mut c| c.get_text())
            .expect("clipboard read should succeed");
        assert_eq!(read, "https://example.com/a.png");
    }
}
