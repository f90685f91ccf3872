use std::env;
use std::path::{Path, PathBuf};
use std::sync::atomic::Ordering;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use indicatif::{ProgressBar, ProgressStyle};

use crate::models::{RenamePlan, RenameTarget, RunSummary};
use crate::operations::executor::{RenameExecutor, RenameOptions};
use crate::operations::pair_list::{self, PairListWriter};
use crate::operations::planner::RenamePlanner;
use crate::operations::transform::NameTransform;
use crate::scanner::{AbortFlag, ScanFilters, TreeScanner};
use crate::utils::path_ops;

/// 一次运行的全部设置
#[derive(Debug, Clone)]
pub struct RunSettings {
    pub filters: ScanFilters,

    /// 最大递归深度，0 表示不限制
    pub max_depth: usize,

    pub recurse: bool,

    /// 重命名文件还是目录
    pub target: RenameTarget,

    pub transform: NameTransform,

    /// 序号起始值
    pub start_number: u64,

    pub rename: RenameOptions,

    /// 反向执行：新名称 -> 旧名称
    pub invert: bool,

    pub show_files: bool,

    /// 名称对列表输出路径
    pub to_list: Option<PathBuf>,

    pub smart_quote: bool,

    /// 列表和日志使用完整路径
    pub full_path: bool,

    pub show_progress: bool,
}

impl Default for RunSettings {
    fn default() -> Self {
        Self {
            filters: ScanFilters::default(),
            max_depth: 0,
            recurse: false,
            target: RenameTarget::Files,
            transform: NameTransform::default(),
            start_number: 1,
            rename: RenameOptions::default(),
            invert: false,
            show_files: false,
            to_list: None,
            smart_quote: false,
            full_path: false,
            show_progress: false,
        }
    }
}

/// 扫描路径并重命名匹配的文件或目录
pub fn run_rename(settings: &RunSettings, paths: &[String], abort: AbortFlag) -> Result<RunSummary> {
    if settings.target == RenameTarget::List {
        bail!("扫描模式只能重命名文件或目录");
    }

    let start_dir = current_dir()?;
    let roots: Vec<String> = paths
        .iter()
        .map(|path| path_ops::resolve(&start_dir, path))
        .collect();

    let mut summary = RunSummary::new(settings.target, settings.rename.dry_run);
    let progress = create_progress_bar(settings.show_progress);

    let mut planner = RenamePlanner::new(settings.target, settings.transform.clone(), settings.start_number)
        .with_invert(settings.invert)
        .with_show_files(settings.show_files)
        .with_progress(progress.clone());
    if let Some(list_path) = &settings.to_list {
        let base = display_base(settings, &start_dir);
        planner = planner.with_pair_list(PairListWriter::create(list_path, settings.smart_quote, base)?);
    }

    let scanner = TreeScanner::new(settings.filters.clone(), abort.clone())
        .with_max_depth(settings.max_depth)
        .with_recurse(settings.recurse);

    summary.candidates = scanner.scan_paths(&roots, &mut planner)?;
    summary.refused = planner.rejected();
    let plans = planner.finish()?;
    tracing::debug!("扫描完成，{} 个候选，{} 个待重命名", summary.candidates, plans.len());

    apply_plans(&plans, settings, &start_dir, &abort, &mut summary, &progress);
    progress.finish_and_clear();

    summary.finish();
    Ok(summary)
}

/// 按名称对列表重命名
pub fn run_from_list(settings: &RunSettings, list_path: &Path, abort: AbortFlag) -> Result<RunSummary> {
    let start_dir = current_dir()?;
    let plans = pair_list::read_pairs_from_file(list_path, &start_dir)?;

    let mut summary = RunSummary::new(RenameTarget::List, settings.rename.dry_run);
    summary.candidates = plans.iter().filter(|plan| !plan.is_identity()).count();

    let progress = create_progress_bar(settings.show_progress);
    apply_plans(&plans, settings, &start_dir, &abort, &mut summary, &progress);
    progress.finish_and_clear();

    summary.finish();
    Ok(summary)
}

/// 依次执行计划并统计结果
fn apply_plans(
    plans: &[RenamePlan],
    settings: &RunSettings,
    start_dir: &str,
    abort: &AbortFlag,
    summary: &mut RunSummary,
    progress: &ProgressBar,
) {
    let mut executor = RenameExecutor::new(settings.rename);
    let base = display_base(settings, start_dir);

    for (index, plan) in plans.iter().enumerate() {
        if abort.load(Ordering::SeqCst) {
            tracing::info!("已中止，剩余 {} 项未处理", plans.len() - index);
            summary.aborted = true;
            break;
        }
        if plan.is_identity() {
            continue;
        }

        let (from, to) = plan.oriented(settings.invert);
        progress.set_message(format!("重命名: {}", path_ops::display_relative(from, base)));
        progress.tick();

        match executor.execute(plan, settings.invert) {
            Ok(()) => {
                summary.renamed += 1;
                tracing::debug!(
                    "重命名 {} 到 {}",
                    path_ops::display_relative(from, base),
                    path_ops::display_relative(to, base)
                );
            }
            Err(err) => {
                tracing::warn!("{}", err);
                if err.is_refusal() {
                    summary.refused += 1;
                } else {
                    summary.failed += 1;
                }
            }
        }
    }

    if abort.load(Ordering::SeqCst) {
        summary.aborted = true;
    }
}

fn current_dir() -> Result<String> {
    let dir = env::current_dir().context("无法获取当前工作目录")?;
    Ok(path_ops::normalize(&dir))
}

/// 显示路径时去掉的前缀；`full_path` 时保留完整路径
fn display_base<'a>(settings: &RunSettings, start_dir: &'a str) -> &'a str {
    if settings.full_path {
        ""
    } else {
        start_dir
    }
}

/// 创建进度条（未启用时隐藏）
fn create_progress_bar(enabled: bool) -> ProgressBar {
    if !enabled || cfg!(test) {
        return ProgressBar::hidden();
    }

    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} [{elapsed_precise}] {msg}") {
        pb.set_style(style.tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]));
    }
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::operations::transform::CaseFold;
    use crate::scanner::{new_abort_flag, PatternList};
    use std::fs;
    use tempfile::tempdir;

    fn lowercase_settings() -> RunSettings {
        RunSettings {
            transform: NameTransform {
                case_fold: CaseFold::Lower,
                ..NameTransform::default()
            },
            recurse: true,
            ..RunSettings::default()
        }
    }

    #[test]
    fn test_run_rename_files() {
        let temp_dir = tempdir().unwrap();
        fs::create_dir(temp_dir.path().join("Sub")).unwrap();
        fs::write(temp_dir.path().join("A.TXT"), "a").unwrap();
        fs::write(temp_dir.path().join("Sub").join("B.TXT"), "b").unwrap();
        fs::write(temp_dir.path().join("keep.txt"), "k").unwrap();

        let root = temp_dir.path().to_string_lossy().to_string();
        let summary = run_rename(&lowercase_settings(), &[root], new_abort_flag()).unwrap();

        assert_eq!(summary.renamed, 2);
        assert_eq!(summary.candidates, 2);
        assert!(temp_dir.path().join("a.txt").exists());
        assert!(temp_dir.path().join("Sub").join("b.txt").exists());
        // 文件模式不改目录名
        assert!(temp_dir.path().join("Sub").is_dir());
    }

    #[test]
    fn test_run_rename_directories_nested() {
        let temp_dir = tempdir().unwrap();
        fs::create_dir_all(temp_dir.path().join("OUTER").join("INNER")).unwrap();
        fs::write(temp_dir.path().join("OUTER").join("INNER").join("F.TXT"), "f").unwrap();

        let settings = RunSettings {
            target: RenameTarget::Directories,
            ..lowercase_settings()
        };
        let root = temp_dir.path().to_string_lossy().to_string();
        let summary = run_rename(&settings, &[root], new_abort_flag()).unwrap();

        assert_eq!(summary.renamed, 2);
        assert_eq!(summary.failed, 0);
        assert!(temp_dir.path().join("outer").join("inner").join("F.TXT").exists());
    }

    #[test]
    fn test_refusals_are_counted() {
        let temp_dir = tempdir().unwrap();
        fs::write(temp_dir.path().join("A.txt"), "upper").unwrap();
        fs::write(temp_dir.path().join("b.txt"), "b").unwrap();

        let settings = RunSettings {
            transform: NameTransform {
                substitution: Some(crate::operations::transform::Substitution::parse("/A/b/").unwrap()),
                ..NameTransform::default()
            },
            filters: ScanFilters {
                include_files: PatternList::from_globs(&["A.*"]).unwrap(),
                ..ScanFilters::default()
            },
            ..RunSettings::default()
        };
        let root = temp_dir.path().to_string_lossy().to_string();
        let summary = run_rename(&settings, &[root], new_abort_flag()).unwrap();

        assert_eq!(summary.renamed, 0);
        assert_eq!(summary.refused, 1);
        assert_eq!(fs::read_to_string(temp_dir.path().join("b.txt")).unwrap(), "b");
    }

    #[test]
    fn test_empty_result_name_is_refused() {
        let temp_dir = tempdir().unwrap();
        fs::write(temp_dir.path().join("a.txt"), "a").unwrap();

        let settings = RunSettings {
            transform: NameTransform {
                substitution: Some(crate::operations::transform::Substitution::parse("/.*//").unwrap()),
                ..NameTransform::default()
            },
            ..RunSettings::default()
        };
        let root = temp_dir.path().to_string_lossy().to_string();
        let summary = run_rename(&settings, &[root], new_abort_flag()).unwrap();

        assert_eq!(summary.renamed, 0);
        assert_eq!(summary.refused, 1);
        assert!(temp_dir.path().join("a.txt").exists());
    }

    #[test]
    fn test_refused_rename_keeps_its_number() {
        let temp_dir = tempdir().unwrap();
        fs::write(temp_dir.path().join("a.txt"), "a").unwrap();
        fs::write(temp_dir.path().join("b.txt"), "b").unwrap();
        fs::write(temp_dir.path().join("f1.txt"), "existing").unwrap();

        let settings = RunSettings {
            transform: NameTransform {
                parts: Some(crate::operations::parts::PartsTemplate::parse("'f'#.E").unwrap()),
                ..NameTransform::default()
            },
            filters: ScanFilters {
                include_files: PatternList::from_globs(&["[ab]\\.txt"]).unwrap(),
                ..ScanFilters::default()
            },
            ..RunSettings::default()
        };
        let root = temp_dir.path().to_string_lossy().to_string();
        let summary = run_rename(&settings, &[root], new_abort_flag()).unwrap();

        // 序号在规划时分配，被拒绝的计划不会归还序号
        assert_eq!(summary.refused, 1);
        assert_eq!(summary.renamed, 1);
        assert_eq!(fs::read_to_string(temp_dir.path().join("f1.txt")).unwrap(), "existing");
        assert!(temp_dir.path().join("f2.txt").exists());
    }

    #[test]
    fn test_abort_before_apply() {
        let temp_dir = tempdir().unwrap();
        fs::write(temp_dir.path().join("X.TXT"), "x").unwrap();

        let abort = new_abort_flag();
        abort.store(true, Ordering::SeqCst);
        let root = temp_dir.path().to_string_lossy().to_string();
        let summary = run_rename(&lowercase_settings(), &[root], abort).unwrap();

        assert!(summary.aborted);
        assert_eq!(summary.renamed, 0);
        assert!(temp_dir.path().join("X.TXT").exists());
    }

    #[test]
    fn test_run_from_list() {
        let temp_dir = tempdir().unwrap();
        let old = temp_dir.path().join("old name.txt");
        let new = temp_dir.path().join("new.txt");
        let same = temp_dir.path().join("same.txt");
        fs::write(&old, "o").unwrap();
        fs::write(&same, "s").unwrap();

        let list = temp_dir.path().join("pairs.csv");
        fs::write(
            &list,
            format!(
                "\"{}\",\"{}\"\n{},{}\n",
                old.display(),
                new.display(),
                same.display(),
                same.display()
            ),
        )
        .unwrap();

        let summary = run_from_list(&RunSettings::default(), &list, new_abort_flag()).unwrap();

        assert_eq!(summary.candidates, 1);
        assert_eq!(summary.renamed, 1);
        assert!(new.exists());
        assert!(!old.exists());
    }

    #[test]
    fn test_missing_roots_fail_setup() {
        let temp_dir = tempdir().unwrap();
        let missing = temp_dir.path().join("a").join("b").to_string_lossy().to_string();
        assert!(run_rename(&lowercase_settings(), &[missing], new_abort_flag()).is_err());
    }
}
