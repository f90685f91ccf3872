use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf, MAIN_SEPARATOR};

/// 路径分隔符
pub const SEPARATOR: char = MAIN_SEPARATOR;

/// 属主写权限位
pub const OWNER_WRITE: u32 = 0o200;

/// 目录部分：最后一个分隔符之前的内容，没有分隔符时为空
pub fn directory_of(path: &str) -> &str {
    match path.rfind(SEPARATOR) {
        Some(pos) => &path[..pos],
        None => "",
    }
}

/// 文件名部分：最后一个分隔符之后的内容，没有分隔符时返回整个输入
pub fn base_name_of(path: &str) -> &str {
    match path.rfind(SEPARATOR) {
        Some(pos) => &path[pos + 1..],
        None => path,
    }
}

/// 扩展名：文件名中最后一个 '.' 之后的内容
///
/// 纯字面解析，`"a"` 和 `"a."` 都得到空扩展名。
pub fn extension_of(path: &str) -> &str {
    let name = base_name_of(path);
    match name.rfind('.') {
        Some(pos) => &name[pos + 1..],
        None => "",
    }
}

/// 拼接目录和名称，不产生重复分隔符
pub fn join(dir: &str, name: &str) -> String {
    if dir.is_empty() {
        name.to_string()
    } else if dir.ends_with(SEPARATOR) {
        format!("{}{}", dir, name)
    } else {
        format!("{}{}{}", dir, SEPARATOR, name)
    }
}

/// 能否作为单个条目的名称：非空、不是 "." 或 ".."、不含分隔符
pub fn is_valid_name(name: &str) -> bool {
    !name.is_empty() && name != "." && name != ".." && !name.contains(['/', SEPARATOR])
}

/// 保留目录部分，替换文件名
pub fn with_base_name(path: &str, name: &str) -> String {
    let dir_len = path.len() - base_name_of(path).len();
    format!("{}{}", &path[..dir_len], name)
}

/// 按字面规则规范化路径：去掉 `.`、折叠 `..` 和重复分隔符
pub fn normalize(path: &Path) -> String {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other.as_os_str()),
        }
    }
    out.to_string_lossy().into_owned()
}

/// 相对路径基于 `base` 解析为规范化的绝对路径
pub fn resolve(base: &str, path: &str) -> String {
    let candidate = Path::new(path);
    if candidate.is_absolute() {
        normalize(candidate)
    } else {
        normalize(&Path::new(base).join(candidate))
    }
}

/// 基于当前工作目录得到规范化的绝对路径
pub fn absolute(path: &str) -> String {
    let path = if path.is_empty() { "." } else { path };
    match std::path::absolute(path) {
        Ok(abs) => normalize(&abs),
        Err(_) => normalize(Path::new(path)),
    }
}

/// 位于 `base` 之下的路径显示为相对路径，否则原样返回
pub fn display_relative<'a>(path: &'a str, base: &str) -> &'a str {
    if base.is_empty() {
        return path;
    }
    match path.strip_prefix(base) {
        Some(rest) if rest.starts_with(SEPARATOR) => &rest[1..],
        _ => path,
    }
}

/// 路径上是否存在任何条目（文件、目录或符号链接本身）
pub fn exists(path: &str) -> bool {
    fs::symlink_metadata(path).is_ok()
}

/// 确保条目带有指定权限位
///
/// `recurse_up` 为真时对每一级父目录做同样的处理。不存在的层级直接跳过，
/// 只有 chmod 调用失败才返回 false。
pub fn set_permission(path: &str, mode: u32, recurse_up: bool) -> bool {
    if path.len() <= 1 {
        return true;
    }

    let ok = match fs::metadata(path) {
        Ok(metadata) => match add_mode(path, &metadata, mode) {
            Ok(()) => true,
            Err(err) => {
                tracing::debug!("修改权限失败 {}: {}", path, err);
                false
            }
        },
        Err(_) => true,
    };

    if recurse_up {
        let parent = directory_of(path).to_string();
        set_permission(&parent, mode, true) && ok
    } else {
        ok
    }
}

#[cfg(unix)]
fn add_mode(path: &str, metadata: &fs::Metadata, mode: u32) -> io::Result<()> {
    use std::os::unix::fs::PermissionsExt;

    let current = metadata.permissions().mode();
    if current & mode == mode {
        return Ok(());
    }
    fs::set_permissions(path, fs::Permissions::from_mode(current | mode))
}

#[cfg(not(unix))]
fn add_mode(path: &str, metadata: &fs::Metadata, mode: u32) -> io::Result<()> {
    let mut permissions = metadata.permissions();
    if mode & OWNER_WRITE == 0 || !permissions.readonly() {
        return Ok(());
    }
    permissions.set_readonly(false);
    fs::set_permissions(path, permissions)
}

fn remove_entry(path: &str) -> io::Result<()> {
    let metadata = fs::symlink_metadata(path)?;
    if metadata.is_dir() {
        fs::remove_dir(path)
    } else {
        fs::remove_file(path)
    }
}

/// 删除文件（或空目录）
///
/// 权限不足时先补上写权限再重试一次。成功和失败都会输出诊断信息。
pub fn delete_file(path: &str) -> bool {
    let mut result = remove_entry(path);

    if let Err(err) = &result {
        if err.kind() == io::ErrorKind::PermissionDenied {
            set_permission(path, OWNER_WRITE, true);
            result = remove_entry(path);
        }
    }

    match result {
        Ok(()) => {
            tracing::info!("已删除 {}", path);
            true
        }
        Err(err) => {
            tracing::warn!("{} 删除失败 {}", err, path);
            false
        }
    }
}
