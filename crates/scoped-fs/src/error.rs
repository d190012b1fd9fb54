use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScopeError {
    #[error("访问被拒绝: {0}")]
    AccessDenied(String),

    #[error("IO 错误: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ScopeError>;
