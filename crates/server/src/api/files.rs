//! 文件内容 API 路由。
//!
//! 提供编辑器组件所需的整文件读写能力。

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Query, State},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};

use super::error::ApiError;
use super::state::AppState;

/// 创建文件内容 API 路由。
pub fn create_files_router() -> Router<Arc<AppState>> {
    Router::new()
        // 读取整个文件
        .route("/api/read", get(read_file))
        // 创建或覆盖整个文件
        .route("/api/save", post(save_file))
}

/// 读取文件查询参数。
#[derive(Debug, Deserialize)]
struct ReadQuery {
    /// 根内相对路径。
    #[serde(default)]
    path: Option<String>,
}

/// 以纯文本返回整个文件内容。
async fn read_file(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ReadQuery>,
) -> Result<String, ApiError> {
    let path = query
        .path
        .filter(|path| !path.is_empty())
        .ok_or_else(|| ApiError::bad_request("missing required parameter: path"))?;
    Ok(state.scope.read_text(&path)?)
}

/// 保存文件请求体。
#[derive(Debug, Deserialize)]
struct SaveRequest {
    /// 根内相对路径。
    #[serde(default)]
    path: String,
    /// 完整文件内容。
    #[serde(default)]
    content: String,
}

#[derive(Debug, Serialize)]
struct SaveResponse {
    message: String,
}

/// 用请求体里的文本创建或覆盖文件。
async fn save_file(
    State(state): State<Arc<AppState>>,
    Json(request): Json<SaveRequest>,
) -> Result<Json<SaveResponse>, ApiError> {
    if request.path.is_empty() {
        return Err(ApiError::bad_request("missing required parameter: path"));
    }
    state.scope.write_text(&request.path, &request.content)?;
    Ok(Json(SaveResponse {
        message: format!("saved {}", request.path),
    }))
}
