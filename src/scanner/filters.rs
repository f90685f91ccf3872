use anyhow::{Context, Result};
use regex::Regex;

/// 编译后的匹配规则，对整个字符串做区分大小写的完整匹配
///
/// 源字符串使用类 glob 语法：`*` 转换为 `.*`，`?` 转换为 `.`，
/// 其余字符保持正则含义。
#[derive(Debug, Clone)]
pub struct Pattern {
    source: String,
    regex: Regex,
}

impl Pattern {
    /// 从 glob 风格的字符串编译
    pub fn from_glob(glob: &str) -> Result<Self> {
        let mut translated = String::with_capacity(glob.len() + 8);
        translated.push_str("^(?:");
        for ch in glob.chars() {
            match ch {
                '*' => translated.push_str(".*"),
                '?' => translated.push('.'),
                other => translated.push(other),
            }
        }
        translated.push_str(")$");

        let regex = Regex::new(&translated)
            .with_context(|| format!("无效的匹配模式: {}", glob))?;

        Ok(Self {
            source: glob.to_string(),
            regex,
        })
    }

    /// 原始模式字符串
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn matches(&self, text: &str) -> bool {
        self.regex.is_match(text)
    }
}

/// 有序的匹配规则列表，任意一条匹配即视为匹配
#[derive(Debug, Clone, Default)]
pub struct PatternList {
    patterns: Vec<Pattern>,
}

impl PatternList {
    pub fn new() -> Self {
        Self::default()
    }

    /// 从一组 glob 字符串编译
    pub fn from_globs<S: AsRef<str>>(globs: &[S]) -> Result<Self> {
        let patterns = globs
            .iter()
            .map(|glob| Pattern::from_glob(glob.as_ref()))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { patterns })
    }

    pub fn push(&mut self, pattern: Pattern) {
        self.patterns.push(pattern);
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    /// 判断名称是否匹配
    ///
    /// 列表为空（或名称为空）时返回调用方给定的 `empty_result`：
    /// 包含列表传 true 表示"全部接受"，排除列表传 false 表示"不排除"。
    pub fn matches(&self, name: &str, empty_result: bool) -> bool {
        if self.patterns.is_empty() || name.is_empty() {
            return empty_result;
        }
        self.patterns.iter().any(|pattern| pattern.matches(name))
    }
}

/// 文件与目录的包含/排除规则
#[derive(Debug, Clone, Default)]
pub struct ScanFilters {
    pub include_files: PatternList,
    pub exclude_files: PatternList,
    pub include_dirs: PatternList,
    pub exclude_dirs: PatternList,
}

impl ScanFilters {
    /// 文件按名称过滤：先排除后包含
    pub fn accepts_file(&self, name: &str) -> bool {
        !name.is_empty()
            && !self.exclude_files.matches(name, false)
            && self.include_files.matches(name, true)
    }

    /// 目录按完整路径过滤：先排除后包含
    pub fn accepts_dir(&self, full_path: &str) -> bool {
        !self.exclude_dirs.matches(full_path, false) && self.include_dirs.matches(full_path, true)
    }
}
