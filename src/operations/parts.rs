use std::str::FromStr;

use anyhow::{bail, Result};

/// 名称模板中的片段
#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    /// `N` 原名称（不含扩展名）
    Stem,
    /// `n` 小写名称
    StemLower,
    /// `E` 扩展名
    Ext,
    /// `e` 小写扩展名
    ExtLower,
    /// `#` 序号，宽度为连续 `#` 的个数
    Number(usize),
    /// 原样输出的文本
    Literal(String),
}

/// 名称模板 - 由名称、扩展名和序号重新拼出文件名
///
/// 例如 `N-#.E`、`n_####.E`、`N.'foo'`。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartsTemplate {
    source: String,
    tokens: Vec<Token>,
}

impl PartsTemplate {
    pub fn parse(template: &str) -> Result<Self> {
        let mut tokens: Vec<Token> = Vec::new();
        let mut chars = template.chars().peekable();

        fn push_literal(tokens: &mut Vec<Token>, text: &str) {
            if let Some(Token::Literal(last)) = tokens.last_mut() {
                last.push_str(text);
            } else {
                tokens.push(Token::Literal(text.to_string()));
            }
        }

        while let Some(ch) = chars.next() {
            match ch {
                'N' => tokens.push(Token::Stem),
                'n' => tokens.push(Token::StemLower),
                'E' => tokens.push(Token::Ext),
                'e' => tokens.push(Token::ExtLower),
                '#' => {
                    let mut width = 1;
                    while chars.peek() == Some(&'#') {
                        chars.next();
                        width += 1;
                    }
                    tokens.push(Token::Number(width));
                }
                '\'' => {
                    let mut literal = String::new();
                    let mut closed = false;
                    for inner in chars.by_ref() {
                        if inner == '\'' {
                            closed = true;
                            break;
                        }
                        literal.push(inner);
                    }
                    if !closed {
                        bail!("名称模板中的引号未闭合: {}", template);
                    }
                    push_literal(&mut tokens, &literal);
                }
                '\\' => match chars.next() {
                    Some('t') => push_literal(&mut tokens, "\t"),
                    Some('n') => push_literal(&mut tokens, "\n"),
                    Some(other) => push_literal(&mut tokens, &other.to_string()),
                    None => push_literal(&mut tokens, "\\"),
                },
                other => push_literal(&mut tokens, &other.to_string()),
            }
        }

        Ok(Self {
            source: template.to_string(),
            tokens,
        })
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// 按模板拼出新名称
    ///
    /// 扩展名为空时，紧挨在扩展名前面的 '.' 会被去掉。
    pub fn render(&self, stem: &str, ext: &str, number: u64) -> String {
        let mut out = String::with_capacity(stem.len() + ext.len() + 8);
        for token in &self.tokens {
            match token {
                Token::Stem => out.push_str(stem),
                Token::StemLower => out.push_str(&stem.to_lowercase()),
                Token::Ext | Token::ExtLower => {
                    if ext.is_empty() {
                        if out.ends_with('.') {
                            out.pop();
                        }
                    } else if matches!(token, Token::ExtLower) {
                        out.push_str(&ext.to_lowercase());
                    } else {
                        out.push_str(ext);
                    }
                }
                Token::Number(width) => {
                    out.push_str(&format!("{:0width$}", number, width = *width));
                }
                Token::Literal(text) => out.push_str(text),
            }
        }
        out
    }
}

impl FromStr for PartsTemplate {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}
