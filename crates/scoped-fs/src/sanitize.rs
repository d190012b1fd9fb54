//! 路径清洗模块。
//!
//! 将不受信任的相对路径解析到受信任的基目录之内，拒绝任何逃逸。
//! 每个读、写、目录列举入口都经过这里，是整个系统唯一的信任边界。

use std::ffi::OsString;
use std::io;
use std::path::{Path, PathBuf};

use tracing::warn;

use crate::error::{Result, ScopeError};

/// 把不受信任的相对路径解析为基目录内的绝对路径。
///
/// 统一分隔符（`\` 按 `/` 处理）、去掉前导分隔符使输入无法充当绝对路径、
/// 逐段消解 `.`/`..`，再把剩余部分拼到规范化后的基目录上做前缀检查。
/// 任何逃逸（`..` 越过顶端、符号链接指向根外）都返回 `AccessDenied`。
pub fn resolve_within(base: &Path, requested: &str) -> Result<PathBuf> {
    let normalized = requested.replace('\\', "/");
    let trimmed = normalized.trim_start_matches('/');

    let mut segments: Vec<&str> = Vec::new();
    for segment in trimmed.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                if segments.pop().is_none() {
                    warn!(requested, "path traversal attempt rejected");
                    return Err(ScopeError::AccessDenied(requested.to_string()));
                }
            }
            other => segments.push(other),
        }
    }

    let base_canon = base.canonicalize()?;
    let mut joined = base_canon.clone();
    for segment in &segments {
        joined.push(segment);
    }

    // 写入的目标可能尚不存在，对最深的已存在祖先做规范化再比较前缀。
    let resolved = canonicalize_existing_ancestor(&joined)?;
    if !resolved.starts_with(&base_canon) {
        warn!(requested, resolved = %resolved.display(), "resolved path escapes the base directory");
        return Err(ScopeError::AccessDenied(requested.to_string()));
    }

    Ok(resolved)
}

/// 对路径中最深的已存在祖先做 canonicalize，再拼回不存在的剩余部分。
fn canonicalize_existing_ancestor(path: &Path) -> Result<PathBuf> {
    let mut existing = path.to_path_buf();
    let mut remainder: Vec<OsString> = Vec::new();

    loop {
        match existing.canonicalize() {
            Ok(canon) => {
                let mut resolved = canon;
                for part in remainder.iter().rev() {
                    resolved.push(part);
                }
                return Ok(resolved);
            }
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                match (existing.file_name(), existing.parent()) {
                    (Some(name), Some(parent)) => {
                        remainder.push(name.to_os_string());
                        existing = parent.to_path_buf();
                    }
                    _ => return Err(ScopeError::Io(err)),
                }
            }
            Err(err) => return Err(ScopeError::Io(err)),
        }
    }
}
