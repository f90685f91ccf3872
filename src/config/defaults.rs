pub struct DefaultConfig;

impl DefaultConfig {
    /// 默认排除的目录（按完整路径匹配）
    pub fn default_exclude_dirs() -> Vec<String> {
        vec![
            // 版本控制目录
            "*/.git".to_string(),
            "*/.svn".to_string(),
            "*/.hg".to_string(),
            // macOS 系统目录
            "*/.Trash".to_string(),
            "*/.Trashes".to_string(),
            "*/.Spotlight-V100".to_string(),
            "*/.fseventsd".to_string(),
        ]
    }

    /// 默认排除的文件
    pub fn default_exclude_files() -> Vec<String> {
        vec![
            ".DS_Store".to_string(),
            "Thumbs\\.db".to_string(),
            "desktop\\.ini".to_string(),
        ]
    }
}
