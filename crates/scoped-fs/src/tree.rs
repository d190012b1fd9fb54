//! 目录树列举模块。
//!
//! 从起始目录向下做前序遍历，受深度上限与隐藏规则约束，
//! 用规范化路径的已访问集合避免符号链接环导致的无限递归。

use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use glob::Pattern;
use serde::Serialize;
use tracing::{debug, warn};

use crate::error::{Result, ScopeError};
use crate::scope::FileScope;

/// 遍历深度硬上限，调用方给出的深度会被钳制到此值以内。
pub const MAX_TREE_DEPTH: usize = 20;

/// 内置缓存目录名，始终隐藏，不计入子目录判断。
pub const CACHE_DIR_NAME: &str = ".tmb";

/// 目录树节点，按前序排列返回。
#[derive(Debug, Clone, Serialize)]
pub struct DirNode {
    /// 带根标签的显示路径。
    pub path: String,
    /// 是否存在至少一个可见（未隐藏且可访问）的子目录。
    #[serde(rename = "hasChildren")]
    pub has_children: bool,
}

impl FileScope {
    /// 列出目录子树。
    ///
    /// 软失败（起点清洗失败、不存在、不是目录、剥离根标签后仍含 `..`）
    /// 返回空列表而不是错误；单个条目的权限错误跳过并记日志，
    /// 只有枚举本身的非权限错误才中止整个列举。
    pub fn list_tree(
        &self,
        start: &str,
        max_depth: usize,
        hide: &[String],
    ) -> Result<Vec<DirNode>> {
        let label = self.root_label();

        // 起始路径允许把根标签重复为第一段，剥掉后再解析。
        let normalized = start.replace('\\', "/");
        let trimmed = normalized.trim_matches('/');
        let stripped = if trimmed == label {
            ""
        } else if let Some(rest) = trimmed.strip_prefix(&format!("{label}/")) {
            rest
        } else {
            trimmed
        };

        if stripped.split('/').any(|segment| segment == "..") {
            debug!(start, "tree start contains a traversal segment, returning empty");
            return Ok(Vec::new());
        }

        let start_abs = match self.resolve(stripped) {
            Ok(path) => path,
            Err(err) => {
                debug!(start, error = %err, "tree start failed to resolve, returning empty");
                return Ok(Vec::new());
            }
        };
        if !start_abs.is_dir() {
            return Ok(Vec::new());
        }

        let depth = max_depth.min(MAX_TREE_DEPTH);
        let patterns = compile_patterns(hide);

        let rel_display: Vec<&str> = stripped
            .split('/')
            .filter(|segment| !segment.is_empty() && *segment != ".")
            .collect();
        let display = if rel_display.is_empty() {
            label
        } else {
            format!("{label}/{}", rel_display.join("/"))
        };

        let mut nodes = Vec::new();
        let mut visited = HashSet::new();
        self.walk(&start_abs, &display, depth, &patterns, &mut visited, &mut nodes)?;
        Ok(nodes)
    }

    /// 前序访问一个目录：先记录节点，再按名称升序递归可见子目录。
    fn walk(
        &self,
        dir: &Path,
        display: &str,
        depth_left: usize,
        hide: &[Pattern],
        visited: &mut HashSet<PathBuf>,
        out: &mut Vec<DirNode>,
    ) -> Result<()> {
        let canonical = match dir.canonicalize() {
            Ok(path) => path,
            Err(err) => {
                warn!(path = %dir.display(), error = %err, "skipping unresolvable directory");
                return Ok(());
            }
        };
        if !visited.insert(canonical) {
            debug!(path = %dir.display(), "skipping already-visited directory");
            return Ok(());
        }

        if depth_left == 0 {
            // 到达深度界限时不展开子项，只做廉价的存在性判断。
            let has_children = has_visible_child(dir, hide)?;
            out.push(DirNode {
                path: display.to_string(),
                has_children,
            });
            return Ok(());
        }

        let children = visible_children(dir, hide)?;
        out.push(DirNode {
            path: display.to_string(),
            has_children: !children.is_empty(),
        });

        for name in children {
            let child_display = format!("{display}/{name}");
            self.walk(
                &dir.join(&name),
                &child_display,
                depth_left - 1,
                hide,
                visited,
                out,
            )?;
        }
        Ok(())
    }
}

/// 编译调用方给出的隐藏模式，非法模式跳过并记日志。
fn compile_patterns(hide: &[String]) -> Vec<Pattern> {
    let mut patterns = Vec::with_capacity(hide.len());
    for raw in hide {
        match Pattern::new(raw) {
            Ok(pattern) => patterns.push(pattern),
            Err(err) => warn!(pattern = %raw, error = %err, "ignoring invalid hide pattern"),
        }
    }
    patterns
}

fn is_hidden(name: &str, hide: &[Pattern]) -> bool {
    name == CACHE_DIR_NAME || hide.iter().any(|pattern| pattern.matches(name))
}

/// 列出目录下可见子目录名，按名称升序（区分大小写）。
///
/// 目录本身不可枚举（权限）时按无子目录处理；单个条目的类型检查
/// 失败跳过；枚举中途的非权限错误向上传播。
fn visible_children(dir: &Path, hide: &[Pattern]) -> Result<Vec<String>> {
    let mut names = Vec::new();
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(err) if err.kind() == io::ErrorKind::PermissionDenied => {
            warn!(path = %dir.display(), "cannot enumerate directory: permission denied");
            return Ok(names);
        }
        Err(err) => return Err(ScopeError::Io(err)),
    };

    for entry in entries {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) if err.kind() == io::ErrorKind::PermissionDenied => {
                warn!(path = %dir.display(), "skipping inaccessible entry");
                continue;
            }
            Err(err) => return Err(ScopeError::Io(err)),
        };

        let name = entry.file_name().to_string_lossy().to_string();
        if is_hidden(&name, hide) {
            continue;
        }

        if entry_is_directory(&entry.path()) == Some(true) {
            names.push(name);
        }
    }

    names.sort();
    Ok(names)
}

/// 判断目录下是否存在至少一个可见子目录，找到第一个即返回。
fn has_visible_child(dir: &Path, hide: &[Pattern]) -> Result<bool> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(err) if err.kind() == io::ErrorKind::PermissionDenied => {
            warn!(path = %dir.display(), "cannot enumerate directory: permission denied");
            return Ok(false);
        }
        Err(err) => return Err(ScopeError::Io(err)),
    };

    for entry in entries {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) if err.kind() == io::ErrorKind::PermissionDenied => continue,
            Err(err) => return Err(ScopeError::Io(err)),
        };

        let name = entry.file_name().to_string_lossy().to_string();
        if is_hidden(&name, hide) {
            continue;
        }
        if entry_is_directory(&entry.path()) == Some(true) {
            return Ok(true);
        }
    }
    Ok(false)
}

/// 跟随符号链接判断条目是否为目录。
///
/// 权限错误记警告，悬空或自环链接等无法归类的条目记调试日志，
/// 两者都按"跳过"处理（返回 `None`）。
fn entry_is_directory(path: &Path) -> Option<bool> {
    match fs::metadata(path) {
        Ok(metadata) => Some(metadata.is_dir()),
        Err(err) if err.kind() == io::ErrorKind::PermissionDenied => {
            warn!(path = %path.display(), "skipping entry: permission denied during type check");
            None
        }
        Err(err) => {
            debug!(path = %path.display(), error = %err, "skipping unclassifiable entry");
            None
        }
    }
}
