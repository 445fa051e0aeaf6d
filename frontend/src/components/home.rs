use chelper_shared::Topic;
use leptos::html::Input;
use leptos::prelude::*;
use tracing::warn;

use crate::components::app::use_app;
use crate::pages::MainPage;
use crate::pages::home::{EMPTY_STATE, search_location};
use crate::web::route::AppRoute;

#[component]
pub fn MainView(page: MainPage) -> impl IntoView {
    let app = use_app();
    let input_ref = NodeRef::<Input>::new();
    let query = page.query.clone();

    // 每次输入都会重新导航并重建视图，把焦点和光标还给搜索框
    Effect::new(move |_| {
        if let Some(input) = input_ref.get() {
            if !query.is_empty() {
                let end = input.value().encode_utf16().count() as u32;
                let focused = input.focus();
                if let Err(err) = focused.and_then(|_| input.set_selection_range(end, end)) {
                    warn!(?err, "failed to restore search focus");
                }
            }
        }
    });

    let on_input = move |ev: leptos::ev::Event| {
        let term = event_target_value(&ev);
        app.ctx().navigator.navigate(&search_location(&term));
    };

    let topics = if page.is_empty() {
        view! { <li class="empty-state">{EMPTY_STATE}</li> }.into_any()
    } else {
        page.topics
            .into_iter()
            .map(|topic| view! { <TopicCard topic=topic /> })
            .collect_view()
            .into_any()
    };

    view! {
        <h1 class="page-title">"Темы"</h1>
        <input
            type="text"
            class="search-box"
            id="search-input"
            placeholder="Поиск по темам..."
            node_ref=input_ref
            prop:value=page.query
            on:input=on_input
        />
        <ul class="topic-list">{topics}</ul>
    }
}

#[component]
fn TopicCard(topic: Topic) -> impl IntoView {
    let href = AppRoute::Topic {
        id: topic.id.to_string(),
    }
    .href();

    view! {
        <li>
            <a href=href class="topic-card">
                <h3>{topic.title}</h3>
                {topic.description.filter(|d| !d.is_empty()).map(|d| view! { <p class="meta">{d}</p> })}
                {topic.has_tasks.then(|| view! { <p class="meta">"Есть задачи"</p> })}
            </a>
        </li>
    }
}
