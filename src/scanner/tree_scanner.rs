use std::fs;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use anyhow::{bail, Result};

use crate::error::RenameError;
use crate::scanner::directory::DirectoryIterator;
use crate::scanner::filters::ScanFilters;
use crate::utils::path_ops;

/// 外部设置的中止标志，只会从 false 变为 true
pub type AbortFlag = Arc<AtomicBool>;

/// 创建未触发的中止标志
pub fn new_abort_flag() -> AbortFlag {
    Arc::new(AtomicBool::new(false))
}

/// 扫描回调，由调用方实现
///
/// 返回值只影响匹配计数，不影响遍历流程。
pub trait ScanHandler {
    /// 接受一个目录时调用
    fn on_directory(&mut self, full_path: &str) -> bool;

    /// 接受一个文件时调用
    fn on_file(&mut self, full_path: &str, name: &str) -> bool;
}

/// 递归目录扫描器 - 应用过滤规则并把条目交给回调处理
pub struct TreeScanner {
    filters: ScanFilters,

    /// 最大递归深度，0 表示不限制
    max_depth: usize,

    /// 是否进入子目录
    recurse: bool,

    abort: AbortFlag,
}

impl TreeScanner {
    /// 创建新的扫描器
    pub fn new(filters: ScanFilters, abort: AbortFlag) -> Self {
        Self {
            filters,
            max_depth: 0,
            recurse: false,
            abort,
        }
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_recurse(mut self, recurse: bool) -> Self {
        self.recurse = recurse;
        self
    }

    fn aborted(&self) -> bool {
        self.abort.load(Ordering::SeqCst)
    }

    /// 扫描所有根路径，返回匹配总数
    ///
    /// 只有没有给出任何路径或所有路径都不存在时才返回错误，
    /// 单个目录无法读取只记录诊断信息。
    pub fn scan_paths<H: ScanHandler>(&self, paths: &[String], handler: &mut H) -> Result<usize> {
        if paths.is_empty() {
            bail!("没有指定要扫描的路径");
        }

        let any_present = paths.iter().any(|path| {
            path_ops::exists(path) || path_ops::exists(path_ops::directory_of(&path_ops::absolute(path)))
        });
        if !any_present {
            bail!("所有扫描路径都不存在: {}", paths.join(", "));
        }

        let mut total = 0;
        for path in paths {
            if self.aborted() {
                tracing::info!("扫描已中止");
                break;
            }
            total += self.scan_path(path, handler);
        }
        Ok(total)
    }

    /// 扫描单个根路径：普通文件直接处理，否则按目录（或文件模式）遍历
    pub fn scan_path<H: ScanHandler>(&self, path: &str, handler: &mut H) -> usize {
        let is_file = fs::metadata(path).map(|m| m.is_file()).unwrap_or(false);
        if is_file {
            self.scan_one(path, handler)
        } else {
            self.scan_recursive(path, 0, handler)
        }
    }

    /// 处理单个文件：按文件名过滤后交给文件回调
    pub fn scan_one<H: ScanHandler>(&self, path: &str, handler: &mut H) -> usize {
        let name = path_ops::base_name_of(path);
        if self.filters.accepts_file(name) && handler.on_file(path, name) {
            1
        } else {
            0
        }
    }

    /// 递归遍历目录，返回整个子树的匹配数
    pub fn scan_recursive<H: ScanHandler>(&self, path: &str, depth: usize, handler: &mut H) -> usize {
        let mut directory = DirectoryIterator::new(path);
        if !directory.begin() {
            tracing::warn!("{}", RenameError::DirectoryUnreadable { path: path.to_string() });
            return 0;
        }

        let mut count = 0;
        loop {
            if self.aborted() {
                tracing::debug!("中止标志已设置，停止遍历 {}", path);
                break;
            }

            if let Some(entry) = directory.current() {
                // 复制出来，回调期间不再借用迭代器
                let full_path = entry.full_path.to_string();
                let is_dir = entry.is_dir;

                if is_dir {
                    if self.accepts_directory(&full_path, depth) {
                        if handler.on_directory(&full_path) {
                            count += 1;
                        }
                        if self.recurse {
                            count += self.scan_recursive(&full_path, depth + 1, handler);
                        }
                    }
                } else if !full_path.is_empty() {
                    count += self.scan_one(&full_path, handler);
                }
            }

            if !directory.advance() {
                break;
            }
        }

        count
    }

    fn accepts_directory(&self, full_path: &str, depth: usize) -> bool {
        (self.max_depth == 0 || depth < self.max_depth) && self.filters.accepts_dir(full_path)
    }
}
