use std::cmp::Reverse;

use anyhow::{Context, Result};
use indicatif::ProgressBar;

use crate::error::RenameError;
use crate::models::{RenamePlan, RenameTarget};
use crate::operations::pair_list::FilePairListWriter;
use crate::operations::transform::NameTransform;
use crate::scanner::ScanHandler;
use crate::utils::path_ops;

/// 重命名规划器 - 作为扫描回调，为每个候选条目计算新名称
///
/// 扫描阶段只记录计划，实际重命名在扫描结束后进行，
/// 这样目录枚举不会看到自己刚改过的名称。
pub struct RenamePlanner {
    target: RenameTarget,
    transform: NameTransform,

    /// 模板中 `#` 使用的序号
    next_number: u64,

    /// 列表输出时交换新旧名称
    invert: bool,

    /// 把候选路径打印到标准输出
    show_files: bool,

    pair_list: Option<FilePairListWriter>,
    progress: ProgressBar,
    plans: Vec<RenamePlan>,

    /// 转换结果不是合法名称而被拒绝的数量
    rejected: usize,
}

impl RenamePlanner {
    pub fn new(target: RenameTarget, transform: NameTransform, start_number: u64) -> Self {
        Self {
            target,
            transform,
            next_number: start_number,
            invert: false,
            show_files: false,
            pair_list: None,
            progress: ProgressBar::hidden(),
            plans: Vec::new(),
            rejected: 0,
        }
    }

    pub fn with_invert(mut self, invert: bool) -> Self {
        self.invert = invert;
        self
    }

    pub fn with_show_files(mut self, show_files: bool) -> Self {
        self.show_files = show_files;
        self
    }

    pub fn with_pair_list(mut self, pair_list: FilePairListWriter) -> Self {
        self.pair_list = Some(pair_list);
        self
    }

    pub fn with_progress(mut self, progress: ProgressBar) -> Self {
        self.progress = progress;
        self
    }

    pub fn plans(&self) -> &[RenamePlan] {
        &self.plans
    }

    pub fn rejected(&self) -> usize {
        self.rejected
    }

    /// 结束规划，返回按执行顺序排列的计划
    ///
    /// 目录按深度从深到浅排列，父目录改名不会影响尚未执行的子目录路径。
    pub fn finish(mut self) -> Result<Vec<RenamePlan>> {
        if let Some(pair_list) = self.pair_list.as_mut() {
            pair_list.flush().context("写入名称列表失败")?;
        }

        if self.target == RenameTarget::Directories {
            self.plans.sort_by_key(|plan| Reverse(plan.depth()));
        }
        Ok(self.plans)
    }

    fn plan(&mut self, full_path: &str, name: &str) -> bool {
        let new_name = self.transform.apply(name, self.next_number);
        if !path_ops::is_valid_name(&new_name) {
            tracing::warn!(
                "{}",
                RenameError::InvalidName {
                    name: new_name,
                    path: full_path.to_string(),
                }
            );
            self.rejected += 1;
            return false;
        }

        let new_path = path_ops::with_base_name(full_path, &new_name);

        if let Some(pair_list) = self.pair_list.as_mut() {
            let (first, second) = if self.invert {
                (new_path.as_str(), full_path)
            } else {
                (full_path, new_path.as_str())
            };
            if let Err(err) = pair_list.write_pair(first, second) {
                tracing::warn!("写入名称列表失败: {}", err);
            }
        }

        if self.show_files {
            println!("{}", full_path);
        }

        self.progress.set_message(format!("规划: {} | 待重命名: {}", name, self.plans.len()));
        self.progress.tick();

        if new_path == full_path {
            tracing::trace!("名称未变化: {}", full_path);
            return false;
        }

        self.next_number += 1;
        self.plans.push(RenamePlan::new(full_path, new_path));
        true
    }
}

impl ScanHandler for RenamePlanner {
    fn on_directory(&mut self, full_path: &str) -> bool {
        if self.target != RenameTarget::Directories {
            return false;
        }
        let name = path_ops::base_name_of(full_path).to_string();
        self.plan(full_path, &name)
    }

    fn on_file(&mut self, full_path: &str, name: &str) -> bool {
        if self.target != RenameTarget::Files {
            return false;
        }
        self.plan(full_path, name)
    }
}
