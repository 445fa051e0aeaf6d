//! 视图渲染器
//!
//! 每个页面模块负责：拉取数据 -> 构造页面模型 -> 通过 `Mount` 挂载到自己的容器。
//! 页面模型是纯数据，由 `components` 中对应的组件渲染成 DOM。
//! 交互处理函数（提交、上传、管理操作）也放在这里，组件只负责收集输入。

use std::future::Future;

use chelper_shared::SubmitResult;
use tracing::warn;

use crate::context::AppContext;
use crate::error::{AppError, AppResult};
use crate::shell::Mount;
use crate::web::route::AppRoute;

pub mod admin;
pub mod home;
pub mod login;
pub mod profile;
pub mod task;
pub mod tasks;
pub mod topic;

pub use admin::AdminPage;
pub use home::MainPage;
pub use profile::ProfilePage;
pub use task::TaskPage;
pub use tasks::TasksPage;
pub use topic::TopicPage;

/// 挂载到视图容器的页面模型
#[derive(Debug, Clone)]
pub enum Page {
    Main(MainPage),
    Topic(TopicPage),
    Tasks(TasksPage),
    Task(TaskPage),
    Login,
    Register,
    Profile(ProfilePage),
    Admin(AdminPage),
    /// 顶层渲染失败时的通用错误信息
    Error(String),
}

/// 结果框：`result-box success` / `result-box error`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultBox {
    pub success: bool,
    pub text: String,
}

impl ResultBox {
    pub fn success(text: impl Into<String>) -> Self {
        Self {
            success: true,
            text: text.into(),
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            success: false,
            text: text.into(),
        }
    }

    /// 判题结果，例如 `✗ wrong output (2/4)`
    pub fn verdict(result: &SubmitResult) -> Self {
        let score = result.score();
        if result.passed {
            Self::success(format!("✓ Все тесты пройдены. ({score})"))
        } else {
            let message = result
                .message
                .as_deref()
                .filter(|m| !m.is_empty())
                .unwrap_or("Тесты не пройдены");
            Self::error(format!("✗ {message} ({score})"))
        }
    }

    pub fn class(&self) -> &'static str {
        if self.success {
            "result-box success"
        } else {
            "result-box error"
        }
    }
}

/// 错误的展示文本；没有内容时使用 `fallback`
pub fn failure_text(err: &AppError, fallback: &str) -> String {
    let text = err.to_string();
    if text.trim().is_empty() {
        fallback.to_string()
    } else {
        text
    }
}

/// 尽力而为的子请求：失败只记日志，返回 `None`，不中断外层渲染
pub(crate) async fn best_effort<T>(
    what: &str,
    request: impl Future<Output = AppResult<T>>,
) -> Option<T> {
    match request.await {
        Ok(value) => Some(value),
        Err(err) => {
            warn!(%err, "best-effort fetch of {what} failed");
            None
        }
    }
}

/// 把路由分发给对应的渲染器
pub async fn render(ctx: &AppContext, route: &AppRoute, mount: &Mount) -> AppResult<()> {
    match route {
        AppRoute::Main { query } => home::render(ctx, query.as_deref(), mount).await,
        AppRoute::Topic { id } => topic::render(ctx, id, mount).await,
        AppRoute::Tasks { topic_id } => tasks::render(ctx, topic_id, mount).await,
        AppRoute::Task { id } => task::render(ctx, id, mount).await,
        AppRoute::Login => login::render_login(mount),
        AppRoute::Register => login::render_register(mount),
        AppRoute::Profile { username } => profile::render(ctx, username.as_deref(), mount).await,
        AppRoute::Admin => admin::render(ctx, mount).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(passed: bool, passed_tests: u32, message: Option<&str>) -> SubmitResult {
        SubmitResult {
            passed,
            passed_tests,
            total_tests: 4,
            message: message.map(str::to_string),
        }
    }

    #[test]
    fn test_failed_verdict_carries_score_and_message() {
        let verdict = ResultBox::verdict(&result(false, 2, Some("wrong output")));
        assert_eq!(verdict.class(), "result-box error");
        assert!(verdict.text.contains("2/4"));
        assert!(verdict.text.contains("wrong output"));
    }

    #[test]
    fn test_failed_verdict_without_message_uses_default() {
        let verdict = ResultBox::verdict(&result(false, 0, None));
        assert_eq!(verdict.text, "✗ Тесты не пройдены (0/4)");
    }

    #[test]
    fn test_passed_verdict_is_success() {
        let verdict = ResultBox::verdict(&result(true, 4, None));
        assert!(verdict.success);
        assert_eq!(verdict.text, "✓ Все тесты пройдены. (4/4)");
    }

    #[test]
    fn test_failure_text_fallback() {
        let err = AppError::validation("");
        assert_eq!(failure_text(&err, "Ошибка входа"), "Ошибка входа");
        let err = AppError::validation("Неверный пароль");
        assert_eq!(failure_text(&err, "Ошибка входа"), "Неверный пароль");
    }
}
