//! 主题页
//!
//! 内容是服务端已清洗的富文本，前端原样插入，只给代码块加上样式类。

use chelper_shared::Topic;

use super::Page;
use crate::context::AppContext;
use crate::error::AppResult;
use crate::shell::Mount;

const EMPTY_CONTENT: &str = "<p>Нет описания.</p>";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopicPage {
    pub topic: Topic,
    pub task_count: usize,
    pub content_html: String,
}

impl TopicPage {
    /// 有任务时才显示"去做题"按钮
    pub fn has_tasks(&self) -> bool {
        self.task_count > 0
    }
}

/// 为 `<pre>` 加上 `code-block` 样式；空内容给出占位文本
pub fn prepare_content(content: Option<&str>) -> String {
    match content.filter(|c| !c.is_empty()) {
        Some(c) => c.replace("<pre>", r#"<pre class="code-block">"#),
        None => EMPTY_CONTENT.to_string(),
    }
}

pub async fn render(ctx: &AppContext, id: &str, mount: &Mount) -> AppResult<()> {
    let topic = ctx.api.topic(id).await?;
    mount.checkpoint()?;
    let tasks = ctx.api.tasks_by_topic(id).await?;
    mount.checkpoint()?;

    let content_html = prepare_content(topic.content.as_deref());
    mount.show(Page::Topic(TopicPage {
        topic,
        task_count: tasks.len(),
        content_html,
    }));
    Ok(())
}
