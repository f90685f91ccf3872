use anyhow::{bail, Context, Result};
use regex::Regex;

use crate::operations::parts::PartsTemplate;

/// 大小写转换方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CaseFold {
    #[default]
    None,
    Lower,
    Upper,
}

/// 正则替换规则，写法为 `/from/to/`，第一个字符即分隔符
#[derive(Debug, Clone)]
pub struct Substitution {
    from: Regex,
    to: String,
}

impl Substitution {
    pub fn parse(rule: &str) -> Result<Self> {
        let mut chars = rule.chars();
        let delimiter = match chars.next() {
            Some(delimiter) => delimiter,
            None => bail!("替换规则为空"),
        };

        let mut pieces = chars.as_str().split(delimiter);
        let from = pieces.next().unwrap_or_default();
        let to = pieces.next().unwrap_or_default();
        if from.is_empty() {
            bail!("替换规则缺少匹配模式: {}", rule);
        }

        let from = Regex::new(from).with_context(|| format!("无效的替换模式: {}", rule))?;
        Ok(Self {
            from,
            to: to.to_string(),
        })
    }

    /// 替换所有匹配
    pub fn apply(&self, name: &str) -> String {
        self.from.replace_all(name, self.to.as_str()).into_owned()
    }
}

/// 名称转换：大小写 -> 正则替换 -> 名称模板
#[derive(Debug, Clone, Default)]
pub struct NameTransform {
    pub case_fold: CaseFold,
    pub substitution: Option<Substitution>,
    pub parts: Option<PartsTemplate>,
}

impl NameTransform {
    /// 没有配置任何转换
    pub fn is_noop(&self) -> bool {
        self.case_fold == CaseFold::None && self.substitution.is_none() && self.parts.is_none()
    }

    /// 计算新名称，`number` 是当前序号
    pub fn apply(&self, name: &str, number: u64) -> String {
        let mut result = match self.case_fold {
            CaseFold::None => name.to_string(),
            CaseFold::Lower => name.to_lowercase(),
            CaseFold::Upper => name.to_uppercase(),
        };

        if let Some(substitution) = &self.substitution {
            result = substitution.apply(&result);
        }

        if let Some(parts) = &self.parts {
            let (stem, ext) = split_extension(&result);
            result = parts.render(stem, ext, number);
        }

        result
    }
}

/// 在最后一个 '.' 处拆分名称和扩展名；没有 '.' 时扩展名为空
pub fn split_extension(name: &str) -> (&str, &str) {
    match name.rfind('.') {
        Some(pos) => (&name[..pos], &name[pos + 1..]),
        None => (name, ""),
    }
}
