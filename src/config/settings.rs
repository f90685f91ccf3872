use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::config::defaults::DefaultConfig;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// 扫描配置
    pub scan: ScanConfig,

    /// 过滤规则
    pub filters: FilterConfig,

    /// 重命名配置
    pub rename: RenameConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    /// 最大扫描深度，0 表示不限制
    pub max_depth: usize,

    /// 是否进入子目录
    pub recurse: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterConfig {
    /// 包含的文件名模式
    pub include_files: Vec<String>,

    /// 排除的文件名模式
    pub exclude_files: Vec<String>,

    /// 包含的目录路径模式
    pub include_dirs: Vec<String>,

    /// 排除的目录路径模式
    pub exclude_dirs: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RenameConfig {
    /// 序号起始值
    pub start_number: u64,

    /// 只在包含空格时加引号
    pub smart_quote: bool,

    /// 列表使用完整路径
    pub full_path: bool,

    /// 只有大小写不同的名称视为同一条目
    pub case_insensitive_collisions: bool,

    /// 切换到父目录后用相对名称重命名
    pub change_directory: bool,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            max_depth: 0,
            recurse: false,
        }
    }
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            include_files: Vec::new(),
            exclude_files: DefaultConfig::default_exclude_files(),
            include_dirs: Vec::new(),
            exclude_dirs: DefaultConfig::default_exclude_dirs(),
        }
    }
}

impl Default for RenameConfig {
    fn default() -> Self {
        Self {
            start_number: 1,
            smart_quote: false,
            full_path: false,
            case_insensitive_collisions: true,
            change_directory: true,
        }
    }
}

impl Config {
    /// 从文件加载配置
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("无法读取配置文件: {}", path.display()))?;
        let config: Self = toml::from_str(&content)
            .with_context(|| format!("配置文件格式错误: {}", path.display()))?;
        Ok(config)
    }

    /// 保存配置到文件
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)?;

        // 确保目录存在
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(path, content)?;
        Ok(())
    }

    /// 获取默认配置文件路径
    pub fn default_config_path() -> Result<PathBuf> {
        let mut path = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("无法找到配置目录"))?;
        path.push("file-rename-cli");
        path.push("config.toml");
        Ok(path)
    }

    /// 加载配置，如果文件不存在则创建默认配置
    pub fn load_or_create_default() -> Result<Self> {
        let config_path = Self::default_config_path()?;

        if config_path.exists() {
            Self::load_from_file(&config_path)
        } else {
            let config = Self::default();
            if let Err(err) = config.save_to_file(&config_path) {
                tracing::debug!("无法写入默认配置 {}: {:#}", config_path.display(), err);
            }
            Ok(config)
        }
    }
}
