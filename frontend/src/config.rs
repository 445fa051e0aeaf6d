//! 运行时配置
//!
//! 从页面 `<body>` 的 data 属性读取，缺失时使用默认值。

use tracing::info;

const DEFAULT_API_BASE: &str = "/api";
const DEFAULT_TOKEN_KEY: &str = "token";

const ATTR_API_BASE: &str = "data-api-base";
const ATTR_TOKEN_KEY: &str = "data-token-key";

/// 前端运行时配置
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// API 前缀，所有请求都拼接在它后面
    pub api_base: String,
    /// 凭据在 localStorage 中的键名
    pub token_key: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            token_key: DEFAULT_TOKEN_KEY.to_string(),
        }
    }
}

impl AppConfig {
    /// 通过属性查询函数构造配置，读不到就用默认值
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let read = |attr: &str, default: &str| {
            lookup(attr)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| {
                    info!("{attr} not set, using default: {default}");
                    default.to_string()
                })
        };

        Self {
            api_base: read(ATTR_API_BASE, DEFAULT_API_BASE)
                .trim_end_matches('/')
                .to_string(),
            token_key: read(ATTR_TOKEN_KEY, DEFAULT_TOKEN_KEY),
        }
    }

    /// 从当前文档的 `<body>` 读取
    pub fn from_document() -> Self {
        let body = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.body());
        Self::from_lookup(|attr| body.as_ref().and_then(|b| b.get_attribute(attr)))
    }

    /// 拼接完整 URL
    pub fn url(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.api_base, path)
        } else {
            format!("{}/{}", self.api_base, path)
        }
    }
}
