//! 单个条目处理过程中的错误类型。
//!
//! 这些错误都在本地恢复：记录一条诊断信息后继续处理其余条目。

use std::io;
use thiserror::Error;

/// 扫描或重命名单个条目时可能出现的错误
#[derive(Error, Debug)]
pub enum RenameError {
    /// 目录无法打开枚举，跳过该子树
    #[error("无法扫描目录: {path}")]
    DirectoryUnreadable { path: String },

    /// 目标已存在且未指定强制覆盖
    #[error("目标已存在: {path}")]
    TargetExists { path: String },

    /// 新名称为空、是 "." / ".."，或包含路径分隔符
    #[error("新名称无效 '{name}': {path}")]
    InvalidName { name: String, path: String },

    /// 新旧路径不在同一目录
    #[error("新旧路径不在同一目录: {old} -> {new}")]
    DirectoryMismatch { old: String, new: String },

    /// 底层重命名调用失败
    #[error("{source} 重命名 {old} 到 {new} 失败")]
    RenameFailed {
        old: String,
        new: String,
        #[source]
        source: io::Error,
    },

    /// 强制覆盖时删除已有目标失败
    #[error("无法删除已有目标: {path}")]
    DeleteFailed { path: String },
}

impl RenameError {
    /// 是否属于拒绝执行（未改动文件系统）
    pub fn is_refusal(&self) -> bool {
        matches!(
            self,
            RenameError::TargetExists { .. }
                | RenameError::DirectoryMismatch { .. }
                | RenameError::InvalidName { .. }
        )
    }
}
