use serde::{Deserialize, Serialize};

use crate::utils::path_ops;

/// 一次重命名尝试：旧完整路径 -> 新完整路径
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenamePlan {
    pub old_path: String,
    pub new_path: String,
}

impl RenamePlan {
    pub fn new(old_path: impl Into<String>, new_path: impl Into<String>) -> Self {
        Self {
            old_path: old_path.into(),
            new_path: new_path.into(),
        }
    }

    /// 新旧路径相同，无需任何操作
    pub fn is_identity(&self) -> bool {
        self.old_path == self.new_path
    }

    /// 按方向返回 (源, 目标)，`invert` 时交换
    pub fn oriented(&self, invert: bool) -> (&str, &str) {
        if invert {
            (&self.new_path, &self.old_path)
        } else {
            (&self.old_path, &self.new_path)
        }
    }

    /// 旧路径的层级深度（分隔符个数）
    pub fn depth(&self) -> usize {
        self.old_path.matches(path_ops::SEPARATOR).count()
    }
}
