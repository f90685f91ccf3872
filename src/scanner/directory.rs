use std::fs::{self, ReadDir};

use crate::scanner::filters::Pattern;
use crate::utils::path_ops;

/// 当前迭代位置的条目视图
///
/// 借用自迭代器，迭代器前进或关闭后即失效，需要保留的数据请自行复制。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DirEntry<'a> {
    /// 条目名称（不含目录）
    pub name: &'a str,

    /// 完整路径：目录 + 分隔符 + 名称
    pub full_path: &'a str,

    /// 是否是目录（不跟随符号链接）
    pub is_dir: bool,
}

#[derive(Debug)]
struct CurrentEntry {
    name: String,
    full_path: String,
    is_dir: bool,
}

#[derive(Debug)]
enum IterState {
    Closed,
    Open {
        handle: ReadDir,
        current: CurrentEntry,
    },
}

/// 目录游标 - 逐个返回目录中的条目
///
/// 构造后处于关闭状态；`begin` 打开并定位到第一个有效条目，
/// `advance` 前进到下一个，遍历结束后回到关闭状态并释放句柄。
#[derive(Debug)]
pub struct DirectoryIterator {
    /// 构造时给定的参数（目录，或 "目录/文件模式"）
    argument: String,

    /// 实际枚举的目录
    base_dir: String,

    /// 参数不是目录时，最后一段作为文件名模式
    name_filter: Option<Pattern>,

    state: IterState,
}

impl DirectoryIterator {
    pub fn new(argument: impl Into<String>) -> Self {
        Self {
            argument: argument.into(),
            base_dir: String::new(),
            name_filter: None,
            state: IterState::Closed,
        }
    }

    /// 打开目录并定位到第一个有效条目
    ///
    /// 目录无法打开或没有任何有效条目时返回 false。
    pub fn begin(&mut self) -> bool {
        self.close();

        let resolved = path_ops::absolute(&self.argument);
        if std::path::Path::new(&resolved).is_dir() {
            self.base_dir = resolved;
            self.name_filter = None;
        } else {
            // 把最后一段当作文件名模式，枚举其所在目录
            let glob = path_ops::base_name_of(&resolved);
            self.name_filter = match Pattern::from_glob(glob) {
                Ok(pattern) => Some(pattern),
                Err(err) => {
                    tracing::debug!("{:#}", err);
                    return false;
                }
            };
            self.base_dir = path_ops::directory_of(&resolved).to_string();
            if self.base_dir.is_empty() {
                self.base_dir = path_ops::SEPARATOR.to_string();
            }
        }

        let mut handle = match fs::read_dir(&self.base_dir) {
            Ok(handle) => handle,
            Err(err) => {
                tracing::debug!("打开目录失败 {}: {}", self.base_dir, err);
                return false;
            }
        };

        match self.next_eligible(&mut handle) {
            Some(current) => {
                self.state = IterState::Open { handle, current };
                true
            }
            None => false,
        }
    }

    /// 前进到下一个有效条目；处于关闭状态时等同于 `begin`
    pub fn advance(&mut self) -> bool {
        let mut handle = match std::mem::replace(&mut self.state, IterState::Closed) {
            IterState::Closed => return self.begin(),
            IterState::Open { handle, .. } => handle,
        };

        match self.next_eligible(&mut handle) {
            Some(current) => {
                self.state = IterState::Open { handle, current };
                true
            }
            // handle 在这里被释放
            None => false,
        }
    }

    /// 关闭并释放目录句柄
    pub fn close(&mut self) {
        self.state = IterState::Closed;
    }

    pub fn is_open(&self) -> bool {
        matches!(self.state, IterState::Open { .. })
    }

    /// 当前条目
    pub fn current(&self) -> Option<DirEntry<'_>> {
        match &self.state {
            IterState::Open { current, .. } => Some(DirEntry {
                name: &current.name,
                full_path: &current.full_path,
                is_dir: current.is_dir,
            }),
            IterState::Closed => None,
        }
    }

    pub fn is_directory(&self) -> bool {
        self.current().map(|entry| entry.is_dir).unwrap_or(false)
    }

    pub fn current_name(&self) -> Option<&str> {
        self.current().map(|entry| entry.name)
    }

    pub fn current_full_path(&self) -> Option<&str> {
        self.current().map(|entry| entry.full_path)
    }

    /// 实际枚举的目录（`begin` 之后有效）
    pub fn base_dir(&self) -> &str {
        &self.base_dir
    }

    fn next_eligible(&self, handle: &mut ReadDir) -> Option<CurrentEntry> {
        for entry in handle.by_ref() {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    tracing::debug!("读取目录条目失败 {}: {}", self.base_dir, err);
                    continue;
                }
            };

            let name = match entry.file_name().into_string() {
                Ok(name) => name,
                Err(raw) => {
                    tracing::warn!("跳过非 UTF-8 名称: {:?}", raw);
                    continue;
                }
            };

            let is_dir = entry.file_type().map(|t| t.is_dir()).unwrap_or(false);
            if is_dir && is_dot_entry(&name) {
                continue;
            }

            if let Some(filter) = &self.name_filter {
                if !filter.matches(&name) {
                    continue;
                }
            }

            let full_path = path_ops::join(&self.base_dir, &name);
            return Some(CurrentEntry {
                name,
                full_path,
                is_dir,
            });
        }
        None
    }
}

/// 需要自动跳过的点目录
///
/// 以 '.' 开头且第二个字符不是字母或数字（或没有第二个字符）。
/// 除 "." 和 ".." 外也会跳过 "..." 之类的名称，`.git` 这样的普通隐藏目录不受影响。
#[cfg(unix)]
fn is_dot_entry(name: &str) -> bool {
    let mut chars = name.chars();
    match (chars.next(), chars.next()) {
        (Some('.'), None) => true,
        (Some('.'), Some(second)) => !second.is_alphanumeric(),
        _ => false,
    }
}

/// 需要自动跳过的点目录：名称全部由 '.' 组成
#[cfg(not(unix))]
fn is_dot_entry(name: &str) -> bool {
    !name.is_empty() && name.chars().all(|c| c == '.')
}
