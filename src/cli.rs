use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "file-rename-cli")]
#[command(about = "批量重命名文件和目录：大小写转换、正则替换、按模板重排名称")]
#[command(version = "0.1.0")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 配置文件路径
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// 详细输出
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// 扫描目录并重命名匹配的文件（或目录）
    Rename {
        /// 要扫描的目录、文件或 "目录/文件模式"
        #[arg(default_value = ".")]
        paths: Vec<String>,

        #[command(flatten)]
        filters: FilterArgs,

        #[command(flatten)]
        naming: NamingArgs,

        #[command(flatten)]
        common: CommonArgs,
    },

    /// 按名称对列表重命名，每行 "old","new" 或 old,new
    Apply {
        /// 名称对列表文件
        list: PathBuf,

        #[command(flatten)]
        common: CommonArgs,
    },

    /// 管理配置
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// 过滤和遍历选项
#[derive(Args, Clone, Default)]
pub struct FilterArgs {
    /// 包含的文件名模式（* 和 ? 通配，其余为正则），可重复
    #[arg(short = 'i', long = "include-file", value_name = "PATTERN")]
    pub include_files: Vec<String>,

    /// 排除的文件名模式，可重复
    #[arg(short = 'e', long = "exclude-file", value_name = "PATTERN")]
    pub exclude_files: Vec<String>,

    /// 包含的目录路径模式（匹配完整路径），可重复
    #[arg(short = 'I', long = "include-dir", value_name = "PATTERN")]
    pub include_dirs: Vec<String>,

    /// 排除的目录路径模式（匹配完整路径），可重复
    #[arg(short = 'E', long = "exclude-dir", value_name = "PATTERN")]
    pub exclude_dirs: Vec<String>,

    /// 进入子目录
    #[arg(short, long)]
    pub recurse: bool,

    /// 最大递归深度（配合 -r），0 表示不限制
    #[arg(short, long)]
    pub depth: Option<usize>,

    /// 重命名目录而不是文件
    #[arg(short = 'D', long)]
    pub directories: bool,
}

/// 名称转换选项
#[derive(Args, Clone, Default)]
pub struct NamingArgs {
    /// 转为小写
    #[arg(short = 'c', long, conflicts_with = "upper")]
    pub lower: bool,

    /// 转为大写
    #[arg(short = 'C', long)]
    pub upper: bool,

    /// 正则替换，写法 /from/to/（第一个字符为分隔符）
    #[arg(long, value_name = "/FROM/TO/", allow_hyphen_values = true)]
    pub sub: Option<String>,

    /// 名称模板：N=名称 n=小写名称 E=扩展名 e=小写扩展名 #=序号 'text'=原文
    #[arg(long, value_name = "TEMPLATE")]
    pub parts: Option<String>,

    /// 序号起始值
    #[arg(long, value_name = "NUM")]
    pub start: Option<u64>,

    /// 打印扫描到的文件
    #[arg(long)]
    pub show_files: bool,
}

/// 执行和输出选项
#[derive(Args, Clone, Default)]
pub struct CommonArgs {
    /// 演练：只输出将要执行的操作，不改动文件
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    /// 目标已存在时先删除
    #[arg(long)]
    pub force: bool,

    /// 反向执行：新名称改回旧名称
    #[arg(short = '2', long)]
    pub invert: bool,

    /// 把 "old","new" 名称对写入文件
    #[arg(long, value_name = "FILE")]
    pub to_list: Option<PathBuf>,

    /// 只在包含空格时加引号
    #[arg(long)]
    pub smart_quote: bool,

    /// 使用完整路径（默认相对于当前目录）
    #[arg(long)]
    pub full: bool,

    /// 显示进度
    #[arg(long)]
    pub progress: bool,

    /// 摘要输出格式
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// 显示当前配置
    Show,

    /// 显示配置文件路径
    Path,

    /// 重置为默认配置
    Reset,
}

#[derive(clap::ValueEnum, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// 文本格式
    #[default]
    Text,
    /// JSON 格式
    Json,
}
