//! # 文件导出模块
//!
//! ## 设计思路
//!
//! “下载”动作最终把字节交给宿主保存。宿主可能是浏览器下载、桌面保存对话框或普通目录，
//! 因此抽象为 `FileExporter`，默认实现 `DiskExporter` 写入指定目录。
//!
//! ## 实现思路
//!
//! - 文件名先做清洗，去掉路径分隔符与控制字符。
//! - 目标已存在时追加时间戳后缀，不覆盖已有文件。
//! - 磁盘写入放到 `spawn_blocking`。

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::Local;

use super::MediaError;

/// 导出端口：保存字节并返回最终路径。
#[async_trait]
pub trait FileExporter: Send + Sync {
    async fn export(&self, file_name: &str, bytes: &[u8]) -> Result<PathBuf, MediaError>;
}

/// 写入本地目录的导出器。
#[derive(Debug, Clone)]
pub struct DiskExporter {
    dir: PathBuf,
}

impl DiskExporter {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

/// 清洗文件名：替换路径分隔符、保留字符与控制字符，空名回退为 `image`。
pub fn sanitize_file_name(name: &str) -> String {
    let cleaned: String = name
        .trim()
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();
    let cleaned = cleaned.trim_matches('.').trim();

    if cleaned.is_empty() {
        "image".to_string()
    } else {
        cleaned.to_string()
    }
}

/// 目标已存在时生成 `名称_时间戳.扩展名`。
fn unique_target(dir: &Path, file_name: &str) -> PathBuf {
    let candidate = dir.join(file_name);
    if !candidate.exists() {
        return candidate;
    }

    let path = Path::new(file_name);
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| "image".to_string());
    let timestamp = Local::now().format("%Y%m%d%H%M%S%f");
    let renamed = match path.extension() {
        Some(ext) => format!("{}_{}.{}", stem, timestamp, ext.to_string_lossy()),
        None => format!("{}_{}", stem, timestamp),
    };

    dir.join(renamed)
}

#[async_trait]
impl FileExporter for DiskExporter {
    async fn export(&self, file_name: &str, bytes: &[u8]) -> Result<PathBuf, MediaError> {
        let dir = self.dir.clone();
        let file_name = sanitize_file_name(file_name);
        let bytes = bytes.to_vec();

        tokio::task::spawn_blocking(move || {
            std::fs::create_dir_all(&dir)
                .map_err(|e| MediaError::FileSystem(format!("创建目录失败：{}", e)))?;
            let target = unique_target(&dir, &file_name);
            std::fs::write(&target, &bytes)
                .map_err(|e| MediaError::FileSystem(format!("写入文件失败：{}", e)))?;
            log::info!("📁 已保存文件 - {}（{}KB）", target.display(), bytes.len() / 1024);
            Ok(target)
        })
        .await
        .map_err(|e| MediaError::FileSystem(format!("线程执行失败：{}", e)))?
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitize_strips_separators() {
        assert_eq!(sanitize_file_name("../etc/passwd.png"), "_etc_passwd.png");
        assert_eq!(sanitize_file_name("a:b?.jpg"), "a_b_.jpg");
        assert_eq!(sanitize_file_name("   "), "image");
        assert_eq!(sanitize_file_name("cat.png"), "cat.png");
    }

    #[tokio::test]
    async fn export_writes_bytes() {
        let dir = tempfile::tempdir().expect("tempdir failed");
        let exporter = DiskExporter::new(dir.path().join("nested"));

        let path = exporter.export("cat.png", b"png-bytes").await.expect("export failed");

        assert_eq!(path, dir.path().join("nested").join("cat.png"));
        assert_eq!(std::fs::read(&path).expect("read failed"), b"png-bytes");
    }

    #[tokio::test]
    async fn export_does_not_overwrite_existing_file() {
        let dir = tempfile::tempdir().expect("tempdir failed");
        std::fs::write(dir.path().join("cat.png"), b"old").expect("seed failed");
        let exporter = DiskExporter::new(dir.path());

        let path = exporter.export("cat.png", b"new").await.expect("export failed");

        assert_ne!(path, dir.path().join("cat.png"));
        assert_eq!(path.extension().and_then(|e| e.to_str()), Some("png"));
        assert_eq!(std::fs::read(dir.path().join("cat.png")).expect("read failed"), b"old");
        assert_eq!(std::fs::read(&path).expect("read failed"), b"new");
    }
}
