//! 根目录解析模块。
//!
//! 启动时按 覆盖 > 权限默认 > 打包回退 的顺序探测候选目录，
//! 取第一个可用者作为进程生命周期内不变的根目录。

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{info, warn};

/// 根目录覆盖用的环境变量名。
pub const ROOT_ENV_VAR: &str = "WEBDESK_ROOT";

/// 打包回退目录名，位于可执行文件旁。
const FALLBACK_DIR_NAME: &str = "files";

/// 根目录的来源标签。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RootSource {
    /// 操作员通过环境变量显式指定。
    Override,
    /// 按进程权限选出的默认目录。
    PrivilegeDefault,
    /// 随程序打包的回退目录。
    BundledFallback,
}

impl RootSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            RootSource::Override => "WEBDESK_ROOT override",
            RootSource::PrivilegeDefault => "privilege default",
            RootSource::BundledFallback => "bundled fallback",
        }
    }
}

#[derive(Debug, Error)]
pub enum RootError {
    #[error("没有可用的根目录，请通过 {0} 显式指定一个可读写的目录")]
    NoUsableRoot(&'static str),
}

/// 解析根目录：构建候选列表并返回第一个可用候选。
pub fn resolve_root() -> Result<(PathBuf, RootSource), RootError> {
    select_root(candidates())
}

/// 从给定候选列表中选出第一个可用的根目录。
pub fn select_root(
    candidates: Vec<(PathBuf, RootSource)>,
) -> Result<(PathBuf, RootSource), RootError> {
    for (path, source) in candidates {
        match probe_candidate(&path) {
            Ok(()) => {
                info!(root = %path.display(), source = source.as_str(), "root directory selected");
                return Ok((path, source));
            }
            Err(err) => {
                warn!(
                    candidate = %path.display(),
                    source = source.as_str(),
                    error = %err,
                    "root candidate unusable, trying next"
                );
                advise_on_permission(source, &err);
            }
        }
    }
    Err(RootError::NoUsableRoot(ROOT_ENV_VAR))
}

fn candidates() -> Vec<(PathBuf, RootSource)> {
    let mut list = Vec::new();

    if let Ok(value) = std::env::var(ROOT_ENV_VAR) {
        if !value.is_empty() {
            list.push((PathBuf::from(value), RootSource::Override));
        }
    }

    if let Some(default) = privilege_default() {
        list.push((default, RootSource::PrivilegeDefault));
    }

    if let Some(fallback) = bundled_fallback() {
        list.push((fallback, RootSource::BundledFallback));
    }

    list
}

/// 按进程权限给出默认根：超级用户用文件系统根，否则用调用用户的主目录。
fn privilege_default() -> Option<PathBuf> {
    if is_superuser() {
        Some(PathBuf::from("/"))
    } else {
        dirs::home_dir()
    }
}

#[cfg(unix)]
fn is_superuser() -> bool {
    // SAFETY: geteuid 无参数且不会失败。
    unsafe { libc::geteuid() == 0 }
}

#[cfg(not(unix))]
fn is_superuser() -> bool {
    false
}

fn bundled_fallback() -> Option<PathBuf> {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|dir| dir.join(FALLBACK_DIR_NAME)))
}

/// 探测候选目录是否可用：按需创建、确认可写、确认可枚举子项。
///
/// 单个子项的权限错误只记日志并跳过，仅枚举本身失败才淘汰候选。
fn probe_candidate(path: &Path) -> io::Result<()> {
    if !path.exists() {
        fs::create_dir_all(path)?;
    }

    let metadata = fs::metadata(path)?;
    if !metadata.is_dir() {
        return Err(io::Error::other(format!(
            "candidate {} is not a directory",
            path.display()
        )));
    }

    // 能在目录里创建临时文件即认为可写，文件在句柄释放时自动删除。
    tempfile::tempfile_in(path)?;

    for entry in fs::read_dir(path)? {
        match entry {
            Ok(entry) => {
                if let Err(err) = entry.file_type() {
                    warn!(
                        child = %entry.path().display(),
                        error = %err,
                        "skipping unreadable child during root probe"
                    );
                }
            }
            Err(err) if err.kind() == io::ErrorKind::PermissionDenied => {
                warn!(error = %err, "skipping inaccessible child during root probe");
            }
            Err(err) => {
                warn!(error = %err, "skipping unreadable child during root probe");
            }
        }
    }

    Ok(())
}

/// macOS 下主目录探测因权限失败时提示 Full Disk Access，仅为日志建议。
fn advise_on_permission(source: RootSource, err: &io::Error) {
    if cfg!(target_os = "macos")
        && source == RootSource::PrivilegeDefault
        && err.kind() == io::ErrorKind::PermissionDenied
    {
        info!(
            "home directory is inaccessible; on macOS, grant the process Full Disk Access \
             under System Settings > Privacy & Security"
        );
    }
}
