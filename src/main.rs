//! # 媒体工具命令行入口
//!
//! 用于在终端里直接执行媒体动作或校验一批来源。
//! 配置文件路径取 `--settings`，缺省读 `MEDIA_KIT_SETTINGS` 环境变量，再缺省为 `media-kit.json`。

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use clap::{Args, Parser, Subcommand};
use editor_media_kit::media::{
    ActionKind, FileHandle, MediaActionPipeline, MediaAsset, MediaCallbacks, MediaSource,
};
use editor_media_kit::settings::{DEFAULT_SETTINGS_FILE, SETTINGS_ENV, load_settings};
use editor_media_kit::AppError;

#[derive(Parser, Debug)]
#[command(name = "media-kit", version, about = "编辑器媒体动作与校验工具")]
struct Cli {
    /// 配置文件路径
    #[arg(long, global = true, env = SETTINGS_ENV, default_value = DEFAULT_SETTINGS_FILE)]
    settings: PathBuf,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// 下载到配置的导出目录
    Download(ActionArgs),
    /// 复制图片到剪贴板
    CopyImage(ActionArgs),
    /// 复制来源链接到剪贴板
    CopyLink(ActionArgs),
    /// 按资源策略校验一批来源
    Validate {
        #[arg(required = true)]
        sources: Vec<String>,
    },
}

#[derive(Args, Debug)]
struct ActionArgs {
    /// URL、Data URI 或本地文件路径
    source: String,
    /// 替代文本，下载时作为文件名
    alt: Option<String>,
}

/// 本地路径转为文件句柄，其余按 URL 字符串处理。
fn parse_source(raw: &str) -> Result<MediaSource, AppError> {
    let path = Path::new(raw);
    if !raw.contains("://") && !raw.starts_with("data:") && path.exists() {
        return Ok(MediaSource::File(FileHandle::from_path(path)?));
    }
    Ok(MediaSource::Url(raw.to_string()))
}

fn validate_sources(pipeline: &MediaActionPipeline, sources: &[String]) -> Result<bool, AppError> {
    let assets = sources
        .iter()
        .map(|raw| parse_source(raw).map(MediaAsset::new))
        .collect::<Result<Vec<_>, _>>()?;
    let callbacks = MediaCallbacks::new().on_validation_error(|rejections| {
        for rejection in rejections {
            println!("✗ {} ({})", rejection.asset.source.reference(), rejection.reason.as_str());
        }
    });

    let outcome = pipeline.validate(assets, &callbacks);
    for asset in &outcome.accepted {
        println!("✓ {}", asset.source.reference());
    }
    Ok(!outcome.has_rejections())
}

async fn run_action(
    pipeline: &MediaActionPipeline,
    kind: ActionKind,
    args: &ActionArgs,
) -> Result<bool, AppError> {
    let mut asset = MediaAsset::new(parse_source(&args.source)?);
    if let Some(alt) = &args.alt {
        asset = asset.with_alt(alt.clone());
    }

    let succeeded = Arc::new(AtomicBool::new(false));
    let flag = succeeded.clone();
    let callbacks = MediaCallbacks::new()
        .on_action_success(move |report| {
            flag.store(true, Ordering::SeqCst);
            println!("{} 完成: {}", report.action.as_str(), report.asset.source.reference());
        })
        .on_action_error(|err, report| {
            eprintln!("{} 失败 [{}]: {}", report.action.as_str(), err.code(), err);
        });

    pipeline.run_action(kind, asset, &callbacks).await;
    Ok(succeeded.load(Ordering::SeqCst))
}

async fn run(cli: Cli) -> Result<bool, AppError> {
    let settings = load_settings(&cli.settings)?;
    let pipeline = settings.build_pipeline()?;

    match &cli.command {
        Commands::Download(args) => run_action(&pipeline, ActionKind::Download, args).await,
        Commands::CopyImage(args) => run_action(&pipeline, ActionKind::CopyImage, args).await,
        Commands::CopyLink(args) => run_action(&pipeline, ActionKind::CopyLink, args).await,
        Commands::Validate { sources } => validate_sources(&pipeline, sources),
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    match run(cli).await {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(err) => {
            log::error!("❌ {}", err);
            ExitCode::FAILURE
        }
    }
}
