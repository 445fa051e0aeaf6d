//! 管理面板
//!
//! 结构化表单代替逐个弹窗：一次收集全部字段，校验后单次提交。
//! 成功后给出提示并重渲染列表；失败时错误留在表单里。
//! 任务的编辑和删除在任务页上进行。

use chelper_shared::{Task, TaskDraft, Topic, TopicDraft};
use tracing::info;

use super::Page;
use crate::context::AppContext;
use crate::error::{AppError, AppResult};
use crate::shell::{Mount, Notice};
use crate::web::route::AppRoute;
use crate::web::router::RenderOrchestrator;

pub const ACCESS_DENIED: &str = "Доступ только для администратора";
pub const EMPTY_TITLE: &str = "Введите название";
pub const TOPIC_CREATED: &str = "Тема создана";
pub const TOPIC_UPDATED: &str = "Тема обновлена";
pub const TOPIC_DELETED: &str = "Тема удалена";
pub const TASK_UPDATED: &str = "Задача обновлена";
pub const TASK_DELETED: &str = "Задача удалена";
pub const TASK_CREATED: &str =
    "Задача создана. Добавьте минимум 4 теста через API: POST /api/admin/tasks/{taskId}/tests";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdminPage {
    Denied,
    Topics(Vec<Topic>),
}

/// 主题表单的输入
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TopicForm {
    pub title: String,
    pub description: String,
    pub content: String,
}

impl TopicForm {
    /// 从已有主题预填，用于编辑
    pub fn from_topic(topic: &Topic) -> Self {
        Self {
            title: topic.title.clone(),
            description: topic.description.clone().unwrap_or_default(),
            content: topic.content.clone().unwrap_or_default(),
        }
    }

    fn into_draft(self, sort_order: Option<i32>) -> AppResult<TopicDraft> {
        let title = required_title(&self.title)?;
        Ok(TopicDraft {
            title,
            description: self.description.trim().to_string(),
            content: self.content,
            sort_order,
        })
    }
}

/// 任务表单的输入
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskForm {
    pub title: String,
    pub condition: String,
}

impl TaskForm {
    /// 从已有任务预填，用于编辑
    pub fn from_task(task: &Task) -> Self {
        Self {
            title: task.title.clone(),
            condition: task.condition.clone(),
        }
    }

    fn into_draft(self, sort_order: Option<i32>) -> AppResult<TaskDraft> {
        Ok(TaskDraft {
            title: required_title(&self.title)?,
            condition: self.condition,
            sort_order,
        })
    }
}

fn required_title(title: &str) -> AppResult<String> {
    let title = title.trim();
    if title.is_empty() {
        Err(AppError::validation(EMPTY_TITLE))
    } else {
        Ok(title.to_string())
    }
}

pub async fn render(ctx: &AppContext, mount: &Mount) -> AppResult<()> {
    if !ctx.session.is_admin() {
        mount.show(Page::Admin(AdminPage::Denied));
        return Ok(());
    }

    let topics = ctx.api.list_topics().await?;
    mount.checkpoint()?;

    mount.show(Page::Admin(AdminPage::Topics(topics)));
    Ok(())
}

/// 操作成功：提示并重渲染
async fn done(orchestrator: &RenderOrchestrator, message: &str) {
    orchestrator
        .context()
        .shell
        .notify(Notice::Success(message.to_string()));
    orchestrator.rerender().await;
}

pub async fn create_topic(orchestrator: &RenderOrchestrator, form: TopicForm) -> AppResult<Topic> {
    let draft = form.into_draft(Some(0))?;
    let topic = orchestrator.context().api.create_topic(draft).await?;
    info!(id = topic.id, title = %topic.title, "topic created");
    done(orchestrator, TOPIC_CREATED).await;
    Ok(topic)
}

pub async fn update_topic(
    orchestrator: &RenderOrchestrator,
    id: i64,
    form: TopicForm,
) -> AppResult<Topic> {
    let draft = form.into_draft(None)?;
    let topic = orchestrator
        .context()
        .api
        .update_topic(&id.to_string(), draft)
        .await?;
    info!(id, "topic updated");
    done(orchestrator, TOPIC_UPDATED).await;
    Ok(topic)
}

pub async fn delete_topic(orchestrator: &RenderOrchestrator, id: i64) -> AppResult<()> {
    orchestrator
        .context()
        .api
        .delete_topic(&id.to_string())
        .await?;
    info!(id, "topic deleted");
    done(orchestrator, TOPIC_DELETED).await;
    Ok(())
}

pub async fn create_task(
    orchestrator: &RenderOrchestrator,
    topic_id: i64,
    form: TaskForm,
) -> AppResult<Task> {
    let draft = form.into_draft(Some(0))?;
    let task = orchestrator
        .context()
        .api
        .create_task(&topic_id.to_string(), draft)
        .await?;
    info!(id = task.id, topic_id, "task created");
    done(orchestrator, TASK_CREATED).await;
    Ok(task)
}

pub async fn update_task(
    orchestrator: &RenderOrchestrator,
    id: i64,
    form: TaskForm,
) -> AppResult<Task> {
    let draft = form.into_draft(None)?;
    let task = orchestrator
        .context()
        .api
        .update_task(&id.to_string(), draft)
        .await?;
    info!(id, "task updated");
    done(orchestrator, TASK_UPDATED).await;
    Ok(task)
}

/// 删除任务后回到所属主题的任务列表
pub async fn delete_task(orchestrator: &RenderOrchestrator, task: &Task) -> AppResult<()> {
    let ctx = orchestrator.context();
    ctx.api.delete_task(&task.id.to_string()).await?;
    info!(id = task.id, topic_id = task.topic_id, "task deleted");
    ctx.shell.notify(Notice::Success(TASK_DELETED.to_string()));
    ctx.navigator.navigate(&AppRoute::Tasks {
        topic_id: task.topic_id.to_string(),
    });
    Ok(())
}
