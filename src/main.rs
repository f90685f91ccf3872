mod cli;

use std::sync::atomic::Ordering;

use anyhow::Result;
use clap::Parser;

use cli::{Cli, CommonArgs, Commands, ConfigAction, FilterArgs, NamingArgs, OutputFormat};
use file_rename_cli::config::Config;
use file_rename_cli::models::{RenameTarget, RunSummary};
use file_rename_cli::operations::{
    run_from_list, run_rename, CaseFold, NameTransform, PartsTemplate, RenameOptions, RunSettings, Substitution,
};
use file_rename_cli::scanner::{new_abort_flag, AbortFlag, PatternList, ScanFilters};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let dry_run = match &cli.command {
        Commands::Rename { common, .. } | Commands::Apply { common, .. } => common.dry_run,
        Commands::Config { .. } => false,
    };

    // 初始化日志，演练和详细模式下显示每一步操作
    let level = if cli.verbose || dry_run {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();

    // 加载配置
    let config = if let Some(config_path) = &cli.config {
        Config::load_from_file(config_path)?
    } else {
        Config::load_or_create_default()?
    };

    match cli.command {
        Commands::Rename {
            paths,
            filters,
            naming,
            common,
        } => {
            let settings = build_rename_settings(&config, &filters, &naming, &common)?;
            announce(&settings);

            let abort = spawn_abort_listener();
            let summary = tokio::task::spawn_blocking(move || run_rename(&settings, &paths, abort)).await??;
            report(&summary, common.format)?;
        }
        Commands::Apply { list, common } => {
            let settings = build_common_settings(&config, &common);
            announce(&settings);

            let abort = spawn_abort_listener();
            let summary = tokio::task::spawn_blocking(move || run_from_list(&settings, &list, abort)).await??;
            report(&summary, common.format)?;
        }
        Commands::Config { action } => {
            let config_path = match &cli.config {
                Some(path) => path.clone(),
                None => Config::default_config_path()?,
            };
            match action {
                ConfigAction::Show => print!("{}", toml::to_string_pretty(&config)?),
                ConfigAction::Path => println!("{}", config_path.display()),
                ConfigAction::Reset => {
                    Config::default().save_to_file(&config_path)?;
                    println!("已重置配置: {}", config_path.display());
                }
            }
        }
    }

    Ok(())
}

/// 监听 Ctrl-C，收到后设置中止标志
fn spawn_abort_listener() -> AbortFlag {
    let abort = new_abort_flag();
    let flag = abort.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("收到中断信号，正在停止...");
            flag.store(true, Ordering::SeqCst);
        }
    });
    abort
}

fn announce(settings: &RunSettings) {
    if settings.rename.dry_run {
        tracing::info!("演练模式，不会改动任何文件");
    }
    if settings.target == RenameTarget::Directories {
        tracing::info!("重命名目录");
    }
}

fn report(summary: &RunSummary, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Text => {
            eprintln!("{}", summary.summary_line());
            tracing::debug!("{}", summary.detail_line());
        }
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(summary)?),
    }
    Ok(())
}

/// 合并配置文件和命令行的过滤规则
fn merged(from_config: &[String], from_cli: &[String]) -> Vec<String> {
    from_config.iter().chain(from_cli).cloned().collect()
}

fn build_common_settings(config: &Config, common: &CommonArgs) -> RunSettings {
    RunSettings {
        rename: RenameOptions {
            dry_run: common.dry_run,
            force_overwrite: common.force,
            case_insensitive_collisions: config.rename.case_insensitive_collisions,
            change_directory: config.rename.change_directory,
        },
        invert: common.invert,
        to_list: common.to_list.clone(),
        smart_quote: common.smart_quote || config.rename.smart_quote,
        full_path: common.full || config.rename.full_path,
        show_progress: common.progress,
        start_number: config.rename.start_number,
        ..RunSettings::default()
    }
}

fn build_rename_settings(
    config: &Config,
    filters: &FilterArgs,
    naming: &NamingArgs,
    common: &CommonArgs,
) -> Result<RunSettings> {
    let scan_filters = ScanFilters {
        include_files: PatternList::from_globs(&merged(&config.filters.include_files, &filters.include_files))?,
        exclude_files: PatternList::from_globs(&merged(&config.filters.exclude_files, &filters.exclude_files))?,
        include_dirs: PatternList::from_globs(&merged(&config.filters.include_dirs, &filters.include_dirs))?,
        exclude_dirs: PatternList::from_globs(&merged(&config.filters.exclude_dirs, &filters.exclude_dirs))?,
    };

    let case_fold = if naming.lower {
        CaseFold::Lower
    } else if naming.upper {
        CaseFold::Upper
    } else {
        CaseFold::None
    };

    let transform = NameTransform {
        case_fold,
        substitution: naming.sub.as_deref().map(Substitution::parse).transpose()?,
        parts: naming.parts.as_deref().map(PartsTemplate::parse).transpose()?,
    };
    if transform.is_noop() {
        tracing::warn!("没有指定任何名称转换（-c/-C/--sub/--parts），不会重命名任何条目");
    }

    let mut settings = build_common_settings(config, common);
    settings.filters = scan_filters;
    settings.max_depth = filters.depth.unwrap_or(config.scan.max_depth);
    settings.recurse = filters.recurse || config.scan.recurse;
    settings.target = if filters.directories {
        RenameTarget::Directories
    } else {
        RenameTarget::Files
    };
    settings.transform = transform;
    settings.start_number = naming.start.unwrap_or(config.rename.start_number);
    settings.show_files = naming.show_files;
    Ok(settings)
}
