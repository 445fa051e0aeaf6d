//! 任务页
//!
//! 三种分支：
//! - 未登录：登录提示
//! - 已有通过的提交：成功横幅 + 提交历史，不再显示提交表单
//! - 其余情况：代码编辑器、文件导入和提交按钮
//!
//! 管理员额外看到任务编辑、删除和添加测试用例的面板。

use chelper_shared::{Attempt, MessageResponse, SubmitResult, Task, TestCaseDraft};
use tracing::{debug, info};

use super::{Page, ResultBox, best_effort};
use crate::context::AppContext;
use crate::error::{AppError, AppResult};
use crate::shell::Mount;
use crate::web::router::RenderOrchestrator;

pub const EMPTY_CODE: &str = "Введите код.";
pub const EMPTY_EXPECTED_OUTPUT: &str = "Введите expectedOutput";
pub const TEST_ADDED: &str = "✓ Тест успешно добавлен";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskAccess {
    Guest,
    Passed,
    Open,
}

impl TaskAccess {
    /// 任意一次通过即视为已完成，之后的失败提交不影响
    pub fn resolve(authenticated: bool, attempts: &[Attempt]) -> Self {
        if !authenticated {
            TaskAccess::Guest
        } else if attempts.iter().any(|a| a.passed) {
            TaskAccess::Passed
        } else {
            TaskAccess::Open
        }
    }
}

#[derive(Debug, Clone)]
pub struct TaskPage {
    pub task: Task,
    /// 尽力获取，失败时为空
    pub topic_title: String,
    pub access: TaskAccess,
    pub attempts: Vec<Attempt>,
    pub admin_controls: bool,
    /// 上一次提交的判题结果
    pub verdict: Option<ResultBox>,
}

pub async fn render(ctx: &AppContext, id: &str, mount: &Mount) -> AppResult<()> {
    let task = ctx.api.task(id).await?;
    mount.checkpoint()?;

    let topic_title = best_effort("topic title", ctx.api.topic(&task.topic_id.to_string()))
        .await
        .map(|t| t.title)
        .unwrap_or_default();
    mount.checkpoint()?;

    let attempts = if ctx.session.is_authenticated() {
        let attempts = best_effort("task attempts", ctx.api.my_attempts_for_task(id))
            .await
            .unwrap_or_default();
        mount.checkpoint()?;
        attempts
    } else {
        Vec::new()
    };

    // 会话可能在上面的 await 期间被清除
    let access = TaskAccess::resolve(ctx.session.is_authenticated(), &attempts);
    debug!(task = id, ?access, attempts = attempts.len(), "task access resolved");

    mount.show(Page::Task(TaskPage {
        task,
        topic_title,
        access,
        attempts,
        admin_controls: ctx.session.is_admin(),
        verdict: ctx.flash.take(id),
    }));
    Ok(())
}

/// 提交代码
///
/// 空代码在发请求前被拒绝。成功后把判题结果交给下一次渲染并重渲染当前位置。
pub async fn submit_solution(
    orchestrator: &RenderOrchestrator,
    task_id: &str,
    code: &str,
) -> AppResult<SubmitResult> {
    let code = code.trim();
    if code.is_empty() {
        return Err(AppError::validation(EMPTY_CODE));
    }

    let ctx = orchestrator.context();
    let result = ctx.api.submit(task_id, code).await?;
    info!(
        task = task_id,
        passed = result.passed,
        score = %result.score(),
        "solution checked"
    );

    ctx.flash.put(task_id, ResultBox::verdict(&result));
    orchestrator.rerender().await;
    Ok(result)
}

/// 为任务添加测试用例
pub async fn add_test(
    ctx: &AppContext,
    task_id: &str,
    input: &str,
    expected_output: &str,
) -> AppResult<MessageResponse> {
    if expected_output.trim().is_empty() {
        return Err(AppError::validation(EMPTY_EXPECTED_OUTPUT));
    }
    ctx.api
        .add_test(
            task_id,
            TestCaseDraft {
                input: input.to_string(),
                expected_output: expected_output.to_string(),
            },
        )
        .await
}

/// 在新窗口查看某次提交的代码；失败静默忽略
pub async fn view_attempt_code(ctx: &AppContext, attempt_id: i64) {
    let id = attempt_id.to_string();
    if let Some(attempt) = best_effort("attempt code", ctx.api.attempt(&id)).await {
        ctx.shell.open_code_window(attempt.code.as_deref().unwrap_or_default());
    }
}

#[cfg(test)]
mod tests;
