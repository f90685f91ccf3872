use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use tempfile::tempdir;
use walkdir::WalkDir;

use file_rename_cli::models::RenameTarget;
use file_rename_cli::operations::{CaseFold, NameTransform, PartsTemplate, Substitution};
use file_rename_cli::scanner::{PatternList, ScanFilters};
use file_rename_cli::{new_abort_flag, run_from_list, run_rename, RenameOptions, RunSettings};

/// 目录树快照：相对路径 -> 文件内容（目录为 None）
fn snapshot(root: &Path) -> BTreeMap<String, Option<Vec<u8>>> {
    WalkDir::new(root)
        .min_depth(1)
        .into_iter()
        .map(|entry| {
            let entry = entry.unwrap();
            let relative = entry.path().strip_prefix(root).unwrap().to_string_lossy().to_string();
            let content = if entry.file_type().is_file() {
                Some(fs::read(entry.path()).unwrap())
            } else {
                None
            };
            (relative, content)
        })
        .collect()
}

fn names_in(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().to_string())
        .collect();
    names.sort();
    names
}

/// 创建一个包含多层目录和混合大小写名称的测试树
fn build_tree(root: &Path) {
    fs::create_dir_all(root.join("Photos").join("Trip 2024")).unwrap();
    fs::create_dir_all(root.join("Docs")).unwrap();
    fs::create_dir_all(root.join(".git")).unwrap();

    fs::write(root.join("README.TXT"), "readme").unwrap();
    fs::write(root.join("Photos").join("IMG 001.JPG"), "one").unwrap();
    fs::write(root.join("Photos").join("IMG 002.JPG"), "two").unwrap();
    fs::write(root.join("Photos").join("Trip 2024").join("Beach Day.JPG"), "beach").unwrap();
    fs::write(root.join("Docs").join("Notes.MD"), "notes").unwrap();
    fs::write(root.join(".git").join("HEAD"), "ref").unwrap();
}

fn root_arg(path: &Path) -> String {
    path.to_string_lossy().to_string()
}

fn lowercase_with_underscores() -> NameTransform {
    NameTransform {
        case_fold: CaseFold::Lower,
        substitution: Some(Substitution::parse("/ /_/").unwrap()),
        parts: None,
    }
}

#[test]
fn test_dry_run_leaves_tree_untouched_and_matches_real_run() {
    let dry_dir = tempdir().unwrap();
    let real_dir = tempdir().unwrap();
    build_tree(dry_dir.path());
    build_tree(real_dir.path());

    let settings = RunSettings {
        transform: lowercase_with_underscores(),
        recurse: true,
        ..RunSettings::default()
    };
    let dry_settings = RunSettings {
        rename: RenameOptions {
            dry_run: true,
            ..RenameOptions::default()
        },
        ..settings.clone()
    };

    let before = snapshot(dry_dir.path());
    let dry_summary = run_rename(&dry_settings, &[root_arg(dry_dir.path())], new_abort_flag()).unwrap();
    assert_eq!(snapshot(dry_dir.path()), before);

    let real_summary = run_rename(&settings, &[root_arg(real_dir.path())], new_abort_flag()).unwrap();

    assert!(dry_summary.dry_run);
    assert_eq!(dry_summary.candidates, real_summary.candidates);
    assert_eq!(dry_summary.renamed, real_summary.renamed);
    assert_eq!(dry_summary.refused, real_summary.refused);
    // 默认不排除任何目录，.git 中的文件同样处理
    assert_eq!(real_summary.renamed, 6);

    let root = real_dir.path();
    assert_eq!(names_in(root), vec![".git", "Docs", "Photos", "readme.txt"]);
    assert_eq!(names_in(&root.join("Photos")), vec!["Trip 2024", "img_001.jpg", "img_002.jpg"]);
    assert_eq!(names_in(&root.join("Photos").join("Trip 2024")), vec!["beach_day.jpg"]);
    assert_eq!(names_in(&root.join(".git")), vec!["head"]);
    assert_eq!(
        fs::read_to_string(root.join("Photos").join("img_002.jpg")).unwrap(),
        "two"
    );
}

#[test]
fn test_version_control_directories_are_not_entered() {
    let temp_dir = tempdir().unwrap();
    build_tree(temp_dir.path());

    let settings = RunSettings {
        transform: NameTransform {
            case_fold: CaseFold::Upper,
            ..NameTransform::default()
        },
        filters: ScanFilters {
            exclude_dirs: PatternList::from_globs(&["*/.git"]).unwrap(),
            ..ScanFilters::default()
        },
        recurse: true,
        ..RunSettings::default()
    };
    run_rename(&settings, &[root_arg(temp_dir.path())], new_abort_flag()).unwrap();

    assert!(temp_dir.path().join(".git").join("HEAD").exists());
    assert!(temp_dir.path().join("Docs").join("NOTES.MD").exists());
}

#[test]
fn test_depth_limit() {
    let temp_dir = tempdir().unwrap();
    build_tree(temp_dir.path());

    let settings = RunSettings {
        transform: lowercase_with_underscores(),
        recurse: true,
        max_depth: 1,
        ..RunSettings::default()
    };
    let summary = run_rename(&settings, &[root_arg(temp_dir.path())], new_abort_flag()).unwrap();

    assert_eq!(summary.renamed, 5);
    // 第二层目录不再进入
    assert!(temp_dir
        .path()
        .join("Photos")
        .join("Trip 2024")
        .join("Beach Day.JPG")
        .exists());
}

#[test]
fn test_file_pattern_argument_with_numbering() {
    let temp_dir = tempdir().unwrap();
    build_tree(temp_dir.path());
    let photos = temp_dir.path().join("Photos");

    let settings = RunSettings {
        transform: NameTransform {
            parts: Some(PartsTemplate::parse("'trip_'##.e").unwrap()),
            ..NameTransform::default()
        },
        start_number: 7,
        ..RunSettings::default()
    };
    let pattern = format!("{}{}*.JPG", root_arg(&photos), std::path::MAIN_SEPARATOR);
    let summary = run_rename(&settings, &[pattern], new_abort_flag()).unwrap();

    assert_eq!(summary.renamed, 2);
    assert_eq!(names_in(&photos), vec!["Trip 2024", "trip_07.jpg", "trip_08.jpg"]);

    let mut contents: Vec<String> = ["trip_07.jpg", "trip_08.jpg"]
        .iter()
        .map(|name| fs::read_to_string(photos.join(name)).unwrap())
        .collect();
    contents.sort();
    assert_eq!(contents, vec!["one", "two"]);
}

#[test]
fn test_collision_refused_then_forced() {
    let temp_dir = tempdir().unwrap();
    fs::write(temp_dir.path().join("draft.txt"), "new content").unwrap();
    fs::write(temp_dir.path().join("final.txt"), "old content").unwrap();

    let mut settings = RunSettings {
        transform: NameTransform {
            substitution: Some(Substitution::parse("#draft#final#").unwrap()),
            ..NameTransform::default()
        },
        filters: ScanFilters {
            include_files: PatternList::from_globs(&["draft.*"]).unwrap(),
            ..ScanFilters::default()
        },
        ..RunSettings::default()
    };

    let summary = run_rename(&settings, &[root_arg(temp_dir.path())], new_abort_flag()).unwrap();
    assert_eq!(summary.refused, 1);
    assert_eq!(fs::read_to_string(temp_dir.path().join("final.txt")).unwrap(), "old content");

    settings.rename.force_overwrite = true;
    let summary = run_rename(&settings, &[root_arg(temp_dir.path())], new_abort_flag()).unwrap();
    assert_eq!(summary.renamed, 1);
    assert_eq!(names_in(temp_dir.path()), vec!["final.txt"]);
    assert_eq!(fs::read_to_string(temp_dir.path().join("final.txt")).unwrap(), "new content");
}

#[test]
fn test_directory_mode_renames_whole_chain() {
    let temp_dir = tempdir().unwrap();
    build_tree(temp_dir.path());

    let settings = RunSettings {
        target: RenameTarget::Directories,
        transform: lowercase_with_underscores(),
        filters: ScanFilters {
            exclude_dirs: PatternList::from_globs(&["*/.git"]).unwrap(),
            ..ScanFilters::default()
        },
        recurse: true,
        ..RunSettings::default()
    };
    let summary = run_rename(&settings, &[root_arg(temp_dir.path())], new_abort_flag()).unwrap();

    assert_eq!(summary.target, RenameTarget::Directories);
    assert_eq!(summary.renamed, 3);
    assert_eq!(summary.failed, 0);
    // 文件名保持不变
    assert!(temp_dir
        .path()
        .join("photos")
        .join("trip_2024")
        .join("Beach Day.JPG")
        .exists());
    assert!(temp_dir.path().join("README.TXT").exists());
}

#[test]
fn test_pair_list_round_trip() {
    let work_dir = tempdir().unwrap();
    let list_dir = tempdir().unwrap();
    build_tree(work_dir.path());
    let list = list_dir.path().join("pairs.csv");

    // 演练时写出名称对列表
    let settings = RunSettings {
        transform: lowercase_with_underscores(),
        recurse: true,
        to_list: Some(list.clone()),
        smart_quote: true,
        rename: RenameOptions {
            dry_run: true,
            ..RenameOptions::default()
        },
        ..RunSettings::default()
    };
    let before = snapshot(work_dir.path());
    run_rename(&settings, &[root_arg(work_dir.path())], new_abort_flag()).unwrap();
    assert_eq!(snapshot(work_dir.path()), before);

    let text = fs::read_to_string(&list).unwrap();
    assert!(text.contains("IMG 001.JPG\","));
    assert_eq!(text.lines().count(), 6);

    // 按列表执行
    let applied = run_from_list(&RunSettings::default(), &list, new_abort_flag()).unwrap();
    assert_eq!(applied.target, RenameTarget::List);
    assert_eq!(applied.renamed, 6);
    assert!(work_dir.path().join("Photos").join("img_001.jpg").exists());

    // 反向执行恢复原状
    let restore = RunSettings {
        invert: true,
        ..RunSettings::default()
    };
    let restored = run_from_list(&restore, &list, new_abort_flag()).unwrap();
    assert_eq!(restored.renamed, 6);
    assert_eq!(snapshot(work_dir.path()), before);
}

#[tokio::test]
async fn test_run_on_blocking_pool() {
    let temp_dir = tempdir().unwrap();
    fs::write(temp_dir.path().join("Mixed Case.TXT"), "x").unwrap();

    let settings = RunSettings {
        transform: lowercase_with_underscores(),
        ..RunSettings::default()
    };
    let paths = vec![root_arg(temp_dir.path())];
    let summary = tokio::task::spawn_blocking(move || run_rename(&settings, &paths, new_abort_flag()))
        .await
        .unwrap()
        .unwrap();

    assert_eq!(summary.renamed, 1);
    assert!(summary.elapsed_ms.is_some());
    assert!(temp_dir.path().join("mixed_case.txt").exists());
}
