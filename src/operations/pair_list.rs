use std::borrow::Cow;
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};

use crate::models::RenamePlan;
use crate::utils::path_ops;

/// 去掉首尾成对的双引号
fn strip_quotes(word: &str) -> &str {
    if word.len() >= 2 && word.starts_with('"') && word.ends_with('"') {
        &word[1..word.len() - 1]
    } else {
        word
    }
}

/// 解析一行 `"old","new"` 或 `old,new`
pub fn parse_line(line: &str) -> Option<(String, String)> {
    let line = line.trim_end_matches(['\r', '\n']);
    if line.trim().is_empty() {
        return None;
    }

    let (first, second) = match line.find("\",\"") {
        Some(pos) => (&line[..pos + 1], &line[pos + 2..]),
        None => {
            let pos = line.find(',')?;
            (&line[..pos], &line[pos + 1..])
        }
    };

    Some((strip_quotes(first).to_string(), strip_quotes(second).to_string()))
}

/// 读取名称对列表，相对路径基于 `base_dir` 解析
///
/// 无法解析的行输出警告后跳过。
pub fn read_pairs<R: BufRead>(reader: R, base_dir: &str) -> Result<Vec<RenamePlan>> {
    let mut plans = Vec::new();
    for (index, line) in reader.lines().enumerate() {
        let line = line.with_context(|| format!("读取名称列表第 {} 行失败", index + 1))?;
        if line.trim().is_empty() {
            continue;
        }
        match parse_line(&line) {
            Some((old, new)) => plans.push(RenamePlan::new(
                path_ops::resolve(base_dir, &old),
                path_ops::resolve(base_dir, &new),
            )),
            None => tracing::warn!("第 {} 行缺少分隔符，已跳过: {}", index + 1, line),
        }
    }
    Ok(plans)
}

/// 从文件读取名称对列表
pub fn read_pairs_from_file(path: &Path, base_dir: &str) -> Result<Vec<RenamePlan>> {
    let file = File::open(path).with_context(|| format!("无法打开名称列表: {}", path.display()))?;
    read_pairs(BufReader::new(file), base_dir)
}

/// 加引号；`smart` 时只有包含空格才加
pub fn quote(path: &str, smart: bool) -> Cow<'_, str> {
    if smart && !path.contains(' ') {
        Cow::Borrowed(path)
    } else {
        Cow::Owned(format!("\"{}\"", path))
    }
}

/// 名称对列表输出
pub struct PairListWriter<W: Write> {
    writer: W,
    smart_quote: bool,

    /// 非空时，位于该目录下的路径输出为相对路径
    base_dir: String,
}

/// 输出到文件的列表
pub type FilePairListWriter = PairListWriter<Box<dyn Write + Send>>;

impl PairListWriter<Box<dyn Write + Send>> {
    /// 创建列表文件
    pub fn create(path: &Path, smart_quote: bool, base_dir: &str) -> Result<Self> {
        let file = File::create(path).with_context(|| format!("无法创建名称列表: {}", path.display()))?;
        Ok(Self::new(Box::new(BufWriter::new(file)), smart_quote, base_dir))
    }
}

impl<W: Write> PairListWriter<W> {
    pub fn new(writer: W, smart_quote: bool, base_dir: &str) -> Self {
        Self {
            writer,
            smart_quote,
            base_dir: base_dir.to_string(),
        }
    }

    /// 写入一行 old,new
    pub fn write_pair(&mut self, old_path: &str, new_path: &str) -> std::io::Result<()> {
        let old_path = path_ops::display_relative(old_path, &self.base_dir);
        let new_path = path_ops::display_relative(new_path, &self.base_dir);
        writeln!(
            self.writer,
            "{},{}",
            quote(old_path, self.smart_quote),
            quote(new_path, self.smart_quote)
        )
    }

    pub fn flush(&mut self) -> std::io::Result<()> {
        self.writer.flush()
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}
