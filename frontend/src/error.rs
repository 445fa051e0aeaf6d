use serde_json::Value;
use thiserror::Error;

// =========================================================
// 核心错误类型
// =========================================================

/// 前端统一错误类型
///
/// - `Http`: 服务端返回非 2xx，携带状态码、可读消息和原始响应体
/// - `Network`: 请求未能到达服务端
/// - `Decode`: 2xx 响应体与期望类型不符
/// - `Validation`: 客户端校验失败，请求不会发出
/// - `Superseded`: 渲染过程中有更新的导航，结果被丢弃（不展示给用户）
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{message}")]
    Http {
        status: u16,
        message: String,
        body: Value,
    },
    #[error("Сетевая ошибка: {0}")]
    Network(String),
    #[error("Некорректный ответ сервера: {0}")]
    Decode(String),
    #[error("{0}")]
    Validation(String),
    #[error("render superseded by a newer navigation")]
    Superseded,
}

impl AppError {
    /// 从非 2xx 响应构造错误
    ///
    /// 消息优先取 body 的 `error`，其次 `message`，最后回退到状态文本。
    pub fn from_response(status: u16, status_text: &str, body: Value) -> Self {
        let field = |name: &str| {
            body.get(name)
                .and_then(Value::as_str)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
        };
        let message = field("error")
            .or_else(|| field("message"))
            .unwrap_or_else(|| {
                if status_text.is_empty() {
                    format!("HTTP {}", status)
                } else {
                    status_text.to_string()
                }
            });
        AppError::Http {
            status,
            message,
            body,
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        AppError::Validation(message.into())
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            AppError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(401)
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }

    pub fn is_superseded(&self) -> bool {
        matches!(self, AppError::Superseded)
    }

    /// 原始响应体
    #[cfg(test)]
    pub fn body(&self) -> Option<&Value> {
        match self {
            AppError::Http { body, .. } => Some(body),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(e: serde_json::Error) -> Self {
        AppError::Decode(e.to_string())
    }
}

pub type AppResult<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_message_prefers_error_field() {
        let err = AppError::from_response(
            400,
            "Bad Request",
            json!({ "error": "Неверный taskId", "message": "ignored" }),
        );
        assert_eq!(err.to_string(), "Неверный taskId");
        assert_eq!(err.status(), Some(400));
    }

    #[test]
    fn test_message_falls_back_to_message_then_status_text() {
        let err = AppError::from_response(409, "Conflict", json!({ "message": "Тест добавлен" }));
        assert_eq!(err.to_string(), "Тест добавлен");

        let err = AppError::from_response(502, "Bad Gateway", json!("<html>oops</html>"));
        assert_eq!(err.to_string(), "Bad Gateway");
        assert_eq!(err.body(), Some(&json!("<html>oops</html>")));
    }

    #[test]
    fn test_status_helpers() {
        assert!(AppError::from_response(401, "", Value::Null).is_unauthorized());
        assert!(AppError::from_response(404, "Not Found", Value::Null).is_not_found());
        assert_eq!(
            AppError::from_response(500, "", Value::Null).to_string(),
            "HTTP 500"
        );
        assert!(!AppError::validation("Введите код.").is_unauthorized());
    }
}
