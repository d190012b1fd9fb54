//! 目录树 API 路由。
//!
//! 为文件管理组件的文件夹树提供 `{ path, hasChildren }` 节点列表。

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Query, State},
    routing::get,
};
use scoped_fs::DirNode;
use serde::Deserialize;

use super::error::ApiError;
use super::state::AppState;

/// 创建目录树 API 路由。
pub fn create_tree_router() -> Router<Arc<AppState>> {
    Router::new().route("/api/tree", get(list_tree))
}

/// 目录树查询参数。
#[derive(Debug, Deserialize)]
struct TreeQuery {
    /// 起始相对路径，可以用根标签作为第一段。
    #[serde(default)]
    path: String,
    /// 最大遍历深度，超出硬上限会被钳制。
    depth: Option<usize>,
    /// 逗号分隔的隐藏模式列表。
    hide: Option<String>,
}

/// 列出目录子树。软失败返回空列表。
async fn list_tree(
    State(state): State<Arc<AppState>>,
    Query(query): Query<TreeQuery>,
) -> Result<Json<Vec<DirNode>>, ApiError> {
    // 查询参数在边界归一化为固定形状，核心逻辑不接触原始请求。
    let depth = query.depth.unwrap_or(state.default_depth);
    let hide = match query.hide {
        Some(raw) => split_patterns(&raw),
        None => state.default_hide.clone(),
    };

    let nodes = state.scope.list_tree(&query.path, depth, &hide)?;
    Ok(Json(nodes))
}

fn split_patterns(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|pattern| !pattern.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::split_patterns;

    #[test]
    fn test_split_patterns_trims_and_drops_empty() {
        assert_eq!(
            split_patterns("*.bak, .git,,node_modules "),
            vec!["*.bak", ".git", "node_modules"]
        );
        assert!(split_patterns("").is_empty());
    }
}
