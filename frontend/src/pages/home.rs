//! 主页：主题列表与搜索

use chelper_shared::Topic;

use super::Page;
use crate::context::AppContext;
use crate::error::AppResult;
use crate::shell::Mount;
use crate::web::route::AppRoute;

pub const EMPTY_STATE: &str = "Ничего не найдено";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MainPage {
    /// 搜索框的值
    pub query: String,
    pub topics: Vec<Topic>,
}

impl MainPage {
    pub fn is_empty(&self) -> bool {
        self.topics.is_empty()
    }
}

pub async fn render(ctx: &AppContext, query: Option<&str>, mount: &Mount) -> AppResult<()> {
    let topics = match query {
        Some(q) => ctx.api.search_topics(q).await?,
        None => ctx.api.list_topics().await?,
    };
    mount.checkpoint()?;

    mount.show(Page::Main(MainPage {
        query: query.unwrap_or_default().to_string(),
        topics,
    }));
    Ok(())
}

/// 搜索框每次输入后的导航目标；空白输入回到完整列表
pub fn search_location(term: &str) -> AppRoute {
    let term = term.trim();
    AppRoute::Main {
        query: (!term.is_empty()).then(|| term.to_string()),
    }
}
