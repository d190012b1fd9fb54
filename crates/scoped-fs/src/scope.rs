//! 受限文件系统作用域。
//!
//! 持有启动时选定的根目录，所有读写都经过路径清洗确认在根内。

use std::fs;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::error::Result;
use crate::sanitize::resolve_within;

/// 根目录 basename 为空时使用的回退显示标签。
pub const ROOT_LABEL_FALLBACK: &str = "root";

/// 受限文件系统作用域，进程生命周期内不可变，可在请求间无锁共享。
#[derive(Debug, Clone)]
pub struct FileScope {
    root: PathBuf,
}

impl FileScope {
    /// 以给定根目录创建作用域。
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    /// 根目录的绝对路径。
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// 根目录的显示标签：basename，为空或只剩分隔符时用回退标签。
    pub fn root_label(&self) -> String {
        match self.root.file_name() {
            Some(name) if !name.is_empty() => name.to_string_lossy().to_string(),
            _ => ROOT_LABEL_FALLBACK.to_string(),
        }
    }

    /// 把相对路径解析为根内的绝对路径。
    pub fn resolve(&self, relative: &str) -> Result<PathBuf> {
        resolve_within(&self.root, relative)
    }

    /// 读取整个文件为文本。
    pub fn read_text(&self, relative: &str) -> Result<String> {
        let path = self.resolve(relative)?;
        info!(path = %path.display(), "reading file");
        Ok(fs::read_to_string(&path)?)
    }

    /// 用整段文本创建或覆盖文件，非流式，不做部分写入恢复。
    pub fn write_text(&self, relative: &str, content: &str) -> Result<()> {
        let path = self.resolve(relative)?;
        info!(path = %path.display(), bytes = content.len(), "writing file");
        fs::write(&path, content)?;
        Ok(())
    }
}
