//! Scoped FS - 受限文件系统访问层。
//!
//! 该 crate 提供根目录解析、路径清洗、目录树列举与整文件读写，
//! 供 server 集成为 API 路由，为前端文件管理与编辑器组件提供支持。

pub mod error;
pub mod root;
pub mod sanitize;
pub mod scope;
pub mod tree;

pub use error::{Result, ScopeError};
pub use root::{ROOT_ENV_VAR, RootError, RootSource, resolve_root, select_root};
pub use sanitize::resolve_within;
pub use scope::FileScope;
pub use tree::{CACHE_DIR_NAME, DirNode, MAX_TREE_DEPTH};
