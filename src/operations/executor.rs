use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::RenameError;
use crate::models::RenamePlan;
use crate::utils::path_ops;

/// 重命名选项
#[derive(Debug, Clone, Copy)]
pub struct RenameOptions {
    /// 只做判断，不实际改动文件系统
    pub dry_run: bool,

    /// 目标已存在时先删除
    pub force_overwrite: bool,

    /// 只有大小写不同的新旧路径视为同一条目
    pub case_insensitive_collisions: bool,

    /// 切换到父目录后用相对名称执行重命名
    pub change_directory: bool,
}

impl Default for RenameOptions {
    fn default() -> Self {
        Self {
            dry_run: false,
            force_overwrite: false,
            case_insensitive_collisions: true,
            change_directory: false,
        }
    }
}

/// 重命名执行器
///
/// 每次调用都是一个独立的事务，唯一的状态是"上次切换到的目录"缓存，
/// 用于避免重复切换工作目录。一次运行使用一个执行器；
/// 执行器释放时恢复第一次切换前的工作目录。
#[derive(Debug)]
pub struct RenameExecutor {
    options: RenameOptions,
    last_dir: Option<String>,

    /// 第一次切换目录前的工作目录
    original_dir: Option<PathBuf>,
}

impl RenameExecutor {
    pub fn new(options: RenameOptions) -> Self {
        Self {
            options,
            last_dir: None,
            original_dir: None,
        }
    }

    /// 清空目录缓存并回到原来的工作目录
    pub fn reset(&mut self) {
        self.last_dir = None;
        if let Some(original) = self.original_dir.take() {
            if let Err(err) = env::set_current_dir(&original) {
                tracing::warn!("{} 无法回到目录 {}", err, original.display());
            }
        }
    }

    /// 执行重命名，失败时输出诊断信息
    pub fn rename(&mut self, old_path: &str, new_path: &str) -> bool {
        match self.try_rename(old_path, new_path) {
            Ok(()) => true,
            Err(err) => {
                tracing::warn!("{}", err);
                false
            }
        }
    }

    /// 按计划方向执行
    pub fn execute(&mut self, plan: &RenamePlan, invert: bool) -> Result<(), RenameError> {
        let (from, to) = plan.oriented(invert);
        self.try_rename(from, to)
    }

    /// 执行重命名并返回具体错误
    ///
    /// 新旧路径必须位于同一目录。目标已存在时根据 `force_overwrite`
    /// 决定删除还是拒绝；演练模式下所有判断照常进行，只跳过实际调用。
    pub fn try_rename(&mut self, old_path: &str, new_path: &str) -> Result<(), RenameError> {
        let new_name = path_ops::base_name_of(new_path);
        if !path_ops::is_valid_name(new_name) {
            return Err(RenameError::InvalidName {
                name: new_name.to_string(),
                path: new_path.to_string(),
            });
        }

        let old_dir = path_ops::directory_of(old_path);
        let new_dir = path_ops::directory_of(new_path);
        if old_dir != new_dir {
            return Err(RenameError::DirectoryMismatch {
                old: old_path.to_string(),
                new: new_path.to_string(),
            });
        }

        if path_ops::exists(new_path) && !self.same_entry(old_path, new_path) {
            if !self.options.force_overwrite {
                return Err(RenameError::TargetExists {
                    path: new_path.to_string(),
                });
            }

            if self.options.dry_run {
                tracing::info!("将删除已有目标 {}", new_path);
            } else if !path_ops::delete_file(new_path) {
                tracing::warn!(
                    "{}，仍尝试重命名",
                    RenameError::DeleteFailed {
                        path: new_path.to_string()
                    }
                );
            }
        }

        let (from, to) = self.working_paths(old_dir, old_path, new_path);

        if self.options.dry_run {
            tracing::debug!("演练: {} -> {}", old_path, new_path);
            return Ok(());
        }

        fs::rename(from, to).map_err(|source| RenameError::RenameFailed {
            old: old_path.to_string(),
            new: new_path.to_string(),
            source,
        })
    }

    /// 判断新旧路径是否指向同一条目
    fn same_entry(&self, old_path: &str, new_path: &str) -> bool {
        if old_path == new_path {
            return true;
        }
        if !self.options.case_insensitive_collisions
            || old_path.to_lowercase() != new_path.to_lowercase()
        {
            return false;
        }
        same_file(old_path, new_path)
    }

    /// 需要时切换到公共父目录，并返回实际传给重命名调用的参数
    fn working_paths<'a>(&mut self, dir: &str, old_path: &'a str, new_path: &'a str) -> (&'a str, &'a str) {
        if !self.options.change_directory || dir.is_empty() || !Path::new(dir).is_absolute() {
            return (old_path, new_path);
        }

        if self.change_dir(dir) {
            (path_ops::base_name_of(old_path), path_ops::base_name_of(new_path))
        } else {
            (old_path, new_path)
        }
    }

    fn change_dir(&mut self, dir: &str) -> bool {
        if self.last_dir.as_deref() == Some(dir) {
            return true;
        }

        if self.original_dir.is_none() {
            self.original_dir = env::current_dir().ok();
        }

        match env::set_current_dir(dir) {
            Ok(()) => {
                tracing::debug!("切换目录到 {}", dir);
                self.last_dir = Some(dir.to_string());
                true
            }
            Err(err) => {
                tracing::warn!("{} 无法切换到目录 {}", err, dir);
                self.last_dir = None;
                false
            }
        }
    }
}

impl Drop for RenameExecutor {
    fn drop(&mut self) {
        self.reset();
    }
}

/// 大小写不同的两个路径是否是同一个文件（大小写不敏感的文件系统）
#[cfg(unix)]
fn same_file(a: &str, b: &str) -> bool {
    use std::os::unix::fs::MetadataExt;

    match (fs::symlink_metadata(a), fs::symlink_metadata(b)) {
        (Ok(x), Ok(y)) => x.dev() == y.dev() && x.ino() == y.ino(),
        _ => false,
    }
}

#[cfg(not(unix))]
fn same_file(_a: &str, _b: &str) -> bool {
    true
}
