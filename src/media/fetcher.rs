//! # 资源获取模块（AssetFetcher）
//!
//! ## 设计思路
//!
//! 把“来源字符串 → 二进制载荷 + 类型提示”统一到一个入口，按来源分流：
//! - Data URI：内存解码，不挂起，不受体积上限约束
//! - `http(s)://`：网络读取，非 2xx 即失败并携带状态码
//! - `file://`：本地文件（文档中插入的本地文件以该形式引用）
//!
//! ## 实现思路
//!
//! - HTTP 客户端在构造时创建并复用，超时/重定向上限来自 `FetchConfig`。
//! - 先看 Content-Length 做体积预检，再流式读取并持续校验累计体积。
//! - 扩展名优先取声明的 Content-Type，缺失时按文件头嗅探（`infer`）。
//! - 获取阶段不按白名单拦截类型，白名单只在插入前校验时生效。
//! - 远程下载结果进入短时 LRU 缓存，连续“下载 + 复制图片”时避免重复请求。

use std::num::NonZeroUsize;
use std::path::Path;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use bytes::{Bytes, BytesMut};
use lru::LruCache;

use super::config::{FetchConfig, mime_essence};
use super::data_uri;
use super::source::FetchedPayload;
use super::MediaError;

const OCTET_STREAM: &str = "application/octet-stream";
const BUFFER_INITIAL_CAPACITY: usize = 16 * 1024;

struct CachedDownload {
    created_at: Instant,
    payload: FetchedPayload,
}

/// 资源获取器。
pub struct AssetFetcher {
    config: FetchConfig,
    client: reqwest::Client,
    cache: Mutex<LruCache<String, CachedDownload>>,
}

impl AssetFetcher {
    /// 根据配置创建获取器，同时构建复用型 HTTP 客户端。
    pub fn new(config: FetchConfig) -> Result<Self, MediaError> {
        let mut builder = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.download_timeout))
            .connect_timeout(Duration::from_secs(config.connect_timeout))
            .redirect(reqwest::redirect::Policy::limited(config.max_redirects));
        if !config.use_system_proxy {
            builder = builder.no_proxy();
        }
        let client = builder
            .build()
            .map_err(|e| MediaError::Network(format!("HTTP 客户端初始化失败：{}", e)))?;

        let capacity = NonZeroUsize::new(config.cache_max_entries.max(1)).unwrap_or(NonZeroUsize::MIN);

        Ok(Self {
            config,
            client,
            cache: Mutex::new(LruCache::new(capacity)),
        })
    }

    pub fn config(&self) -> &FetchConfig {
        &self.config
    }

    /// 获取来源内容。
    ///
    /// # 示例
    /// ```rust
    /// use editor_media_kit::media::{AssetFetcher, FetchConfig};
    ///
    /// # async fn demo() -> Result<(), editor_media_kit::media::MediaError> {
    /// let fetcher = AssetFetcher::new(FetchConfig::default())?;
    /// let payload = fetcher.fetch("data:image/png;base64,AAAA").await?;
    /// assert_eq!(payload.extension, "png");
    /// # Ok(())
    /// # }
    /// ```
    pub async fn fetch(&self, source: &str) -> Result<FetchedPayload, MediaError> {
        let start = Instant::now();
        let source = source.trim();

        let (payload, source_hint) = if data_uri::is_data_uri(source) {
            (data_uri::decode(source)?, "data-uri")
        } else {
            let url = reqwest::Url::parse(source).map_err(|e| {
                MediaError::UnsupportedSource(format!("无法解析来源：{}", e))
            })?;
            match url.scheme() {
                "http" | "https" => (self.fetch_remote(&url).await?, "url"),
                "file" => (self.fetch_local(&url).await?, "file"),
                other => {
                    return Err(MediaError::UnsupportedSource(format!("不支持的协议：{}", other)));
                }
            }
        };

        log::info!(
            "✅ 资源获取完成 - 来源: {} 类型: {} 大小: {}KB 耗时: {}ms",
            source_hint,
            payload.mime_type,
            payload.bytes.len() / 1024,
            start.elapsed().as_millis()
        );

        Ok(payload)
    }

    async fn fetch_remote(&self, url: &reqwest::Url) -> Result<FetchedPayload, MediaError> {
        let cache_key = url.to_string();
        if let Some(cached) = self.get_cached(&cache_key) {
            log::debug!("♻️ 命中下载缓存 - URL: {}", redact_url_for_log(url));
            return Ok(cached);
        }

        log::info!("🌐 开始下载 - URL: {}", redact_url_for_log(url));

        let mut response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| self.map_reqwest_error(e, url))?;

        let status = response.status();
        if !status.is_success() {
            log::warn!("❌ 下载失败 - HTTP {}", status.as_u16());
            return Err(MediaError::FetchFailed {
                status: status.as_u16(),
            });
        }

        let declared_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|ct| ct.to_str().ok())
            .map(mime_essence)
            .filter(|ct| !ct.is_empty());

        let declared_len = response
            .headers()
            .get(reqwest::header::CONTENT_LENGTH)
            .and_then(|cl| cl.to_str().ok())
            .and_then(|cl| cl.parse::<u64>().ok());

        if let Some(len) = declared_len {
            self.ensure_within_limit(len)?;
        }

        let initial_capacity = declared_len
            .map(|len| len.min(self.config.max_file_size).min(usize::MAX as u64) as usize)
            .filter(|len| *len > 0)
            .unwrap_or(BUFFER_INITIAL_CAPACITY);
        let mut buffer = BytesMut::with_capacity(initial_capacity);

        while let Some(chunk) = response
            .chunk()
            .await
            .map_err(|e| self.map_reqwest_error(e, url))?
        {
            self.ensure_within_limit((buffer.len() + chunk.len()) as u64)?;
            buffer.extend_from_slice(&chunk);
        }

        let bytes = buffer.freeze();
        let payload = match declared_type {
            Some(mime_type) => FetchedPayload {
                extension: data_uri::extension_from_mime(&mime_type),
                mime_type,
                bytes,
            },
            None => sniff_payload(bytes, None),
        };

        self.store_cached(cache_key, &payload);
        Ok(payload)
    }

    async fn fetch_local(&self, url: &reqwest::Url) -> Result<FetchedPayload, MediaError> {
        let path = url
            .to_file_path()
            .map_err(|_| MediaError::UnsupportedSource(format!("无效的文件地址：{}", url)))?;
        let max_file_size = self.config.max_file_size;

        log::info!("📁 开始读取本地文件 - 路径: {}", path.display());

        tokio::task::spawn_blocking(move || {
            let metadata = std::fs::metadata(&path)
                .map_err(|e| MediaError::FileSystem(format!("无法读取文件信息：{}", e)))?;
            if max_file_size > 0 && metadata.len() > max_file_size {
                return Err(MediaError::ResourceLimit(format!(
                    "文件过大：{:.2} MB（限制：{:.2} MB）",
                    metadata.len() as f64 / 1024.0 / 1024.0,
                    max_file_size as f64 / 1024.0 / 1024.0
                )));
            }

            let bytes = std::fs::read(&path)
                .map_err(|e| MediaError::FileSystem(format!("无法读取文件：{}", e)))?;
            Ok(sniff_payload(Bytes::from(bytes), Some(&path)))
        })
        .await
        .map_err(|e| MediaError::FileSystem(format!("线程执行失败：{}", e)))?
    }

    fn ensure_within_limit(&self, size: u64) -> Result<(), MediaError> {
        let limit = self.config.max_file_size;
        if limit > 0 && size > limit {
            return Err(MediaError::ResourceLimit(format!(
                "文件过大：{:.2} MB（限制：{:.2} MB）",
                size as f64 / 1024.0 / 1024.0,
                limit as f64 / 1024.0 / 1024.0
            )));
        }
        Ok(())
    }

    fn cache_enabled(&self) -> bool {
        self.config.cache_ttl_secs > 0 && self.config.cache_max_entries > 0
    }

    fn get_cached(&self, key: &str) -> Option<FetchedPayload> {
        if !self.cache_enabled() {
            return None;
        }
        let ttl = Duration::from_secs(self.config.cache_ttl_secs);
        let Ok(mut cache) = self.cache.lock() else {
            log::warn!("⚠️ 下载缓存锁已中毒，跳过缓存");
            return None;
        };

        let expired = match cache.get(key) {
            Some(entry) if entry.created_at.elapsed() <= ttl => return Some(entry.payload.clone()),
            Some(_) => true,
            None => false,
        };
        if expired {
            cache.pop(key);
        }
        None
    }

    fn store_cached(&self, key: String, payload: &FetchedPayload) {
        if !self.cache_enabled() {
            return;
        }
        if let Ok(mut cache) = self.cache.lock() {
            cache.put(
                key,
                CachedDownload {
                    created_at: Instant::now(),
                    payload: payload.clone(),
                },
            );
        }
    }

    /// 统一映射 reqwest 错误。
    fn map_reqwest_error(&self, error: reqwest::Error, url: &reqwest::Url) -> MediaError {
        let message = error.to_string().replace(url.as_str(), &redact_url_for_log(url));
        if error.is_timeout() {
            MediaError::Timeout(format!("下载超时（{}秒）", self.config.download_timeout))
        } else if error.is_connect() {
            MediaError::Network(format!("无法连接：{}", message))
        } else {
            MediaError::Network(format!("请求失败：{}", message))
        }
    }
}

/// 按文件头嗅探类型；嗅探失败时参考路径扩展名。
fn sniff_payload(bytes: Bytes, path: Option<&Path>) -> FetchedPayload {
    if let Some(kind) = infer::get(&bytes) {
        return FetchedPayload {
            mime_type: kind.mime_type().to_string(),
            extension: kind.extension().to_string(),
            bytes,
        };
    }

    let path_extension = path
        .and_then(|p| p.extension())
        .map(|ext| ext.to_string_lossy().to_ascii_lowercase());

    let (mime_type, extension) = match path_extension.as_deref() {
        Some("svg") => ("image/svg+xml".to_string(), "svg".to_string()),
        Some(ext) if !ext.is_empty() => (OCTET_STREAM.to_string(), ext.to_string()),
        _ => (OCTET_STREAM.to_string(), "bin".to_string()),
    };

    FetchedPayload {
        bytes,
        mime_type,
        extension,
    }
}

/// 日志中去掉查询串与片段，避免泄漏签名参数。
fn redact_url_for_log(url: &reqwest::Url) -> String {
    let mut redacted = url.clone();
    redacted.set_query(None);
    redacted.set_fragment(None);
    redacted.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Read, Write};
    use std::net::TcpListener;
    use std::thread;

    const PNG_SIGNATURE: [u8; 12] = [137, 80, 78, 71, 13, 10, 26, 10, 0, 0, 0, 13];

    fn test_config() -> FetchConfig {
        FetchConfig {
            use_system_proxy: false,
            ..FetchConfig::default()
        }
    }

    /// 启动只响应 `requests` 次的本地 HTTP 服务。
    fn serve(requests: usize, head: String, body: Vec<u8>) -> (String, thread::JoinHandle<()>) {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind test server failed");
        let addr = listener.local_addr().expect("read local addr failed");

        let server = thread::spawn(move || {
            for _ in 0..requests {
                let (mut stream, _) = listener.accept().expect("accept failed");
                let mut req_buf = [0u8; 1024];
                let _ = stream.read(&mut req_buf);
                // 客户端可能在读完响应头后提前断开，这里忽略写入错误
                let _ = stream.write_all(head.as_bytes());
                let _ = stream.write_all(&body);
                let _ = stream.flush();
            }
        });

        (format!("http://127.0.0.1:{}", addr.port()), server)
    }

    fn ok_head(content_type: Option<&str>, len: usize) -> String {
        let ct = content_type
            .map(|ct| format!("Content-Type: {}\r\n", ct))
            .unwrap_or_default();
        format!(
            "HTTP/1.1 200 OK\r\n{}Content-Length: {}\r\nConnection: close\r\n\r\n",
            ct, len
        )
    }

    #[tokio::test]
    async fn data_uri_is_decoded_in_memory() {
        let fetcher = AssetFetcher::new(test_config()).expect("fetcher init failed");

        let payload = fetcher.fetch("data:image/png;base64,AAAA").await.expect("fetch failed");

        assert_eq!(payload.mime_type, "image/png");
        assert_eq!(payload.extension, "png");
        assert_eq!(payload.bytes.len(), 3);
    }

    #[tokio::test]
    async fn remote_extension_comes_from_content_type() {
        let body = b"<svg xmlns=\"http://www.w3.org/2000/svg\"/>".to_vec();
        let (base, server) = serve(1, ok_head(Some("image/svg+xml; charset=utf-8"), body.len()), body.clone());
        let fetcher = AssetFetcher::new(test_config()).expect("fetcher init failed");

        let payload = fetcher
            .fetch(&format!("{}/logo", base))
            .await
            .expect("fetch failed");
        server.join().expect("server thread failed");

        assert_eq!(payload.mime_type, "image/svg+xml");
        assert_eq!(payload.extension, "svg");
        assert_eq!(payload.bytes.as_ref(), body.as_slice());
    }

    #[tokio::test]
    async fn remote_type_is_sniffed_when_header_missing() {
        let body = PNG_SIGNATURE.to_vec();
        let (base, server) = serve(1, ok_head(None, body.len()), body);
        let fetcher = AssetFetcher::new(test_config()).expect("fetcher init failed");

        let payload = fetcher.fetch(&format!("{}/a", base)).await.expect("fetch failed");
        server.join().expect("server thread failed");

        assert_eq!(payload.mime_type, "image/png");
        assert_eq!(payload.extension, "png");
    }

    #[tokio::test]
    async fn non_success_status_is_fetch_failed() {
        let head = "HTTP/1.1 404 Not Found\r\nContent-Length: 0\r\nConnection: close\r\n\r\n".to_string();
        let (base, server) = serve(1, head, Vec::new());
        let fetcher = AssetFetcher::new(test_config()).expect("fetcher init failed");

        let result = fetcher.fetch(&format!("{}/missing.png", base)).await;
        server.join().expect("server thread failed");

        assert_eq!(result, Err(MediaError::FetchFailed { status: 404 }));
    }

    #[tokio::test]
    async fn declared_length_over_limit_is_rejected() {
        let body = vec![0u8; 64];
        let (base, server) = serve(1, ok_head(Some("image/png"), body.len()), body);
        let config = FetchConfig {
            max_file_size: 16,
            ..test_config()
        };
        let fetcher = AssetFetcher::new(config).expect("fetcher init failed");

        let result = fetcher.fetch(&format!("{}/big.png", base)).await;
        server.join().expect("server thread failed");

        assert!(matches!(result, Err(MediaError::ResourceLimit(_))));
    }

    #[tokio::test]
    async fn data_uri_ignores_fetch_size_limit() {
        let config = FetchConfig {
            max_file_size: 2,
            ..test_config()
        };
        let fetcher = AssetFetcher::new(config).expect("fetcher init failed");

        let exact = fetcher.fetch("data:image/png;base64,AAA=").await.expect("fetch failed");
        assert_eq!(exact.bytes.len(), 2);

        let larger = fetcher
            .fetch("data:image/png;base64,AAAAAAAAAAAA")
            .await
            .expect("fetch failed");
        assert_eq!(larger.bytes.len(), 9);
    }

    #[tokio::test]
    async fn repeated_remote_fetch_hits_cache() {
        let body = PNG_SIGNATURE.to_vec();
        let (base, server) = serve(1, ok_head(Some("image/png"), body.len()), body);
        let fetcher = AssetFetcher::new(test_config()).expect("fetcher init failed");
        let url = format!("{}/cached.png", base);

        let first = fetcher.fetch(&url).await.expect("first fetch failed");
        server.join().expect("server thread failed");
        let second = fetcher.fetch(&url).await.expect("cached fetch failed");

        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn local_file_url_is_read_and_sniffed() {
        let dir = tempfile::tempdir().expect("tempdir failed");
        let path = dir.path().join("photo.png");
        std::fs::write(&path, PNG_SIGNATURE).expect("write failed");
        let url = reqwest::Url::from_file_path(&path).expect("file url failed");
        let fetcher = AssetFetcher::new(test_config()).expect("fetcher init failed");

        let payload = fetcher.fetch(url.as_str()).await.expect("fetch failed");

        assert_eq!(payload.mime_type, "image/png");
        assert_eq!(payload.extension, "png");
        assert_eq!(payload.bytes.len(), PNG_SIGNATURE.len());
    }

    #[tokio::test]
    async fn missing_local_file_is_file_system_error() {
        let dir = tempfile::tempdir().expect("tempdir failed");
        let url = reqwest::Url::from_file_path(dir.path().join("nope.png")).expect("file url failed");
        let fetcher = AssetFetcher::new(test_config()).expect("fetcher init failed");

        let result = fetcher.fetch(url.as_str()).await;

        assert!(matches!(result, Err(MediaError::FileSystem(_))));
    }

    #[tokio::test]
    async fn unknown_scheme_is_unsupported() {
        let fetcher = AssetFetcher::new(test_config()).expect("fetcher init failed");

        assert!(matches!(
            fetcher.fetch("ftp://example.com/a.png").await,
            Err(MediaError::UnsupportedSource(_))
        ));
        assert!(matches!(
            fetcher.fetch("not a url").await,
            Err(MediaError::UnsupportedSource(_))
        ));
    }

    #[test]
    fn redact_url_removes_query_and_fragment() {
        let url = reqwest::Url::parse("https://example.com:8443/path/img.png?token=abc#hash")
            .expect("parse failed");

        assert_eq!(redact_url_for_log(&url), "https://example.com:8443/path/img.png");
    }

    #[test]
    fn sniff_falls_back_to_path_extension() {
        let svg = sniff_payload(Bytes::from_static(b"<svg/>"), Some(Path::new("/a/logo.SVG")));
        assert_eq!(svg.mime_type, "image/svg+xml");
        assert_eq!(svg.extension, "svg");

        let unknown = sniff_payload(Bytes::from_static(b"??"), None);
        assert_eq!(unknown.mime_type, OCTET_STREAM);
        assert_eq!(unknown.extension, "bin");
    }
}
