//! 服务器配置。
//!
//! 从可选的 webdesk.toml 读取监听地址与目录树默认参数；
//! 根目录本身由环境变量与根解析器决定，不在此文件内。

use std::path::Path;

use anyhow::Context;
use serde::Deserialize;

type Result<T> = anyhow::Result<T>;

#[derive(Debug, Deserialize)]
pub struct ServerConfig {
    /// 监听地址。
    #[serde(default = "default_addr")]
    pub addr: String,
    /// 未随请求给出时使用的隐藏模式。
    #[serde(default)]
    pub default_hide: Vec<String>,
    /// 未随请求给出时使用的遍历深度。
    #[serde(default = "default_depth")]
    pub default_depth: usize,
}

impl ServerConfig {
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;
        Self::from_str(&content)
            .with_context(|| format!("failed to parse config file: {}", path.display()))
    }

    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Result<Self> {
        toml::from_str(s).context("failed to deserialize server config")
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: default_addr(),
            default_hide: Vec::new(),
            default_depth: default_depth(),
        }
    }
}

fn default_addr() -> String {
    "127.0.0.1:8080".to_string()
}

fn default_depth() -> usize {
    2
}
