//! # 配置加载
//!
//! 配置以 camelCase JSON 保存，所有字段都有默认值，文件不存在时直接使用默认配置。
//! 边界宽度 `maxWidth` 属于运行期信息，由宿主在构建 `ResizePolicy` 时传入。

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::media::{
    AssetFetcher, AssetPolicy, ClipboardConfig, DiskExporter, FetchConfig, MediaActionPipeline,
    SystemClipboard,
};
use crate::resize::{ResizePolicy, DEFAULT_GRID_INTERVAL, DEFAULT_MIN_HEIGHT, DEFAULT_MIN_WIDTH};

/// 配置文件路径环境变量。
pub const SETTINGS_ENV: &str = "MEDIA_KIT_SETTINGS";
/// 默认配置文件名（相对当前目录）。
pub const DEFAULT_SETTINGS_FILE: &str = "media-kit.json";

/// 尺寸调整的静态配置。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ResizeSettings {
    pub min_width: f64,
    pub min_height: f64,
    pub grid_interval: f64,
}

impl Default for ResizeSettings {
    fn default() -> Self {
        Self {
            min_width: DEFAULT_MIN_WIDTH,
            min_height: DEFAULT_MIN_HEIGHT,
            grid_interval: DEFAULT_GRID_INTERVAL,
        }
    }
}

impl ResizeSettings {
    /// 结合运行期边界宽度生成缩放策略。
    pub fn policy(&self, max_width: f64) -> ResizePolicy {
        ResizePolicy::new(max_width)
            .with_min_size(self.min_width, self.min_height)
            .with_grid_interval(self.grid_interval)
    }
}

/// crate 全部可配置项。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MediaKitSettings {
    pub resize: ResizeSettings,
    pub assets: AssetPolicy,
    pub fetch: FetchConfig,
    pub clipboard: ClipboardConfig,
    pub download_dir: PathBuf,
}

impl Default for MediaKitSettings {
    fn default() -> Self {
        Self {
            resize: ResizeSettings::default(),
            assets: AssetPolicy::default(),
            fetch: FetchConfig::default(),
            clipboard: ClipboardConfig::default(),
            download_dir: PathBuf::from("."),
        }
    }
}

impl MediaKitSettings {
    /// 按配置构建带系统剪贴板与磁盘导出的流水线。
    pub fn build_pipeline(&self) -> Result<MediaActionPipeline, AppError> {
        let fetcher = AssetFetcher::new(self.fetch.clone())?;
        Ok(MediaActionPipeline::new(
            self.assets.clone(),
            Arc::new(fetcher),
            Arc::new(SystemClipboard::new(self.clipboard.clone())),
            Arc::new(DiskExporter::new(self.download_dir.clone())),
        ))
    }
}

/// 读取配置，文件不存在时返回默认值。
pub fn load_settings(path: impl AsRef<Path>) -> Result<MediaKitSettings, AppError> {
    let path = path.as_ref();
    if !path.exists() {
        log::debug!("📁 配置文件不存在，使用默认配置 - {}", path.display());
        return Ok(MediaKitSettings::default());
    }

    let content = fs::read_to_string(path)?;
    let settings = serde_json::from_str::<MediaKitSettings>(&content)
        .map_err(|e| AppError::Settings(format!("解析设置文件失败: {}", e)))?;

    log::info!("✅ 已加载配置 - {}", path.display());
    Ok(settings)
}

/// 写入配置（格式化 JSON），父目录不存在时自动创建。
pub fn save_settings(path: impl AsRef<Path>, settings: &MediaKitSettings) -> Result<(), AppError> {
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let content = serde_json::to_string_pretty(settings)
        .map_err(|e| AppError::Settings(format!("序列化设置失败: {}", e)))?;

    fs::write(path, content)?;
    Ok(())
}
