//! 主题下的任务列表

use chelper_shared::Task;

use super::{Page, best_effort};
use crate::context::AppContext;
use crate::error::AppResult;
use crate::shell::Mount;

pub const DEFAULT_TITLE: &str = "Задачи";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskListing {
    /// 未登录：显示登录/注册提示而不是列表
    LoginRequired,
    Tasks(Vec<Task>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TasksPage {
    pub topic_id: String,
    pub topic_title: String,
    pub listing: TaskListing,
}

pub async fn render(ctx: &AppContext, topic_id: &str, mount: &Mount) -> AppResult<()> {
    let topic_title = best_effort("topic title", ctx.api.topic(topic_id))
        .await
        .map(|t| t.title)
        .unwrap_or_else(|| DEFAULT_TITLE.to_string());
    mount.checkpoint()?;

    let tasks = ctx.api.tasks_by_topic(topic_id).await?;
    mount.checkpoint()?;

    // await 之后重新读取会话
    let listing = if ctx.session.is_authenticated() {
        TaskListing::Tasks(tasks)
    } else {
        TaskListing::LoginRequired
    };

    mount.show(Page::Tasks(TasksPage {
        topic_id: topic_id.to_string(),
        topic_title,
        listing,
    }));
    Ok(())
}
