//! API 路由模块。
//!
//! 提供前端文件管理与编辑器组件所需的读、写与目录树 API。

pub mod error;
pub mod files;
pub mod state;
pub mod tree;

pub use files::create_files_router;
pub use state::AppState;
pub use tree::create_tree_router;
