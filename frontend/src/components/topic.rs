use leptos::prelude::*;

use crate::pages::TopicPage;
use crate::web::route::AppRoute;

#[component]
pub fn TopicView(page: TopicPage) -> impl IntoView {
    let tasks_href = AppRoute::Tasks {
        topic_id: page.topic.id.to_string(),
    }
    .href();
    let call_to_action = page.has_tasks().then(|| {
        view! {
            <p class="tasks-cta">
                <a href=tasks_href class="btn btn-primary">
                    {format!("Перейти к задачам ({})", page.task_count)}
                </a>
            </p>
            <p class="meta">"Доступ к задачам — только для авторизованных пользователей."</p>
        }
    });

    view! {
        <a href="#/" class="back-link">"← Назад к темам"</a>
        <div class="topic-content">
            <h1>{page.topic.title}</h1>
            {page.topic.image_path.map(|src| view! { <img src=src alt="" /> })}
            // 服务端已清洗的富文本
            <div inner_html=page.content_html></div>
            {call_to_action}
        </div>
    }
}
