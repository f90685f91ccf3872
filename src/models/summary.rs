use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::utils::{format_elapsed, format_timestamp};

/// 本次运行处理的对象
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RenameTarget {
    /// 扫描并重命名文件
    Files,
    /// 扫描并重命名目录
    Directories,
    /// 按名称对列表重命名
    List,
}

impl RenameTarget {
    pub fn display_name(&self) -> &'static str {
        match self {
            RenameTarget::Files => "Files",
            RenameTarget::Directories => "Directories",
            RenameTarget::List => "Pairs",
        }
    }
}

/// 一次运行的统计结果
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunSummary {
    pub target: RenameTarget,

    /// 是否为演练模式
    pub dry_run: bool,

    /// 扫描阶段接受的候选数量
    pub candidates: usize,

    /// 成功重命名的数量
    pub renamed: usize,

    /// 被拒绝的数量（目标已存在、目录不一致）
    pub refused: usize,

    /// 执行失败的数量
    pub failed: usize,

    /// 是否被中止
    pub aborted: bool,

    pub started_at: DateTime<Utc>,

    pub finished_at: Option<DateTime<Utc>>,

    /// 耗时（毫秒）
    pub elapsed_ms: Option<u64>,
}

impl RunSummary {
    pub fn new(target: RenameTarget, dry_run: bool) -> Self {
        Self {
            target,
            dry_run,
            candidates: 0,
            renamed: 0,
            refused: 0,
            failed: 0,
            aborted: false,
            started_at: Utc::now(),
            finished_at: None,
            elapsed_ms: None,
        }
    }

    /// 结束统计
    pub fn finish(&mut self) {
        let end_time = Utc::now();
        self.finished_at = Some(end_time);
        self.elapsed_ms = Some(
            end_time
                .signed_duration_since(self.started_at)
                .to_std()
                .unwrap_or_default()
                .as_millis() as u64,
        );
    }

    /// 最终摘要行
    pub fn summary_line(&self) -> String {
        let mut line = format!(" {}={} renamed", self.target.display_name(), self.renamed);
        if self.refused > 0 || self.failed > 0 {
            line.push_str(&format!(", {} 拒绝, {} 失败", self.refused, self.failed));
        }
        if self.dry_run {
            line.push_str(" (演练)");
        }
        if self.aborted {
            line.push_str(" (已中止)");
        }
        line
    }

    /// 详细信息（开始时间和耗时）
    pub fn detail_line(&self) -> String {
        let elapsed = self
            .elapsed_ms
            .map(|ms| format_elapsed(Duration::from_millis(ms)))
            .unwrap_or_else(|| "进行中...".to_string());
        format!("开始于 {}，耗时 {}", format_timestamp(self.started_at), elapsed)
    }
}
