//! 统一的应用状态。

use scoped_fs::FileScope;

/// 各处理器共享的应用状态，启动后只读。
#[derive(Clone)]
pub struct AppState {
    /// 受限文件系统作用域。
    pub scope: FileScope,
    /// 请求未给出时使用的隐藏模式。
    pub default_hide: Vec<String>,
    /// 请求未给出时使用的遍历深度。
    pub default_depth: usize,
}

impl AppState {
    /// 创建新的应用状态。
    pub fn new(scope: FileScope, default_hide: Vec<String>, default_depth: usize) -> Self {
        Self {
            scope,
            default_hide,
            default_depth,
        }
    }
}
