//! 表单字段渲染
//!
//! 只负责输入框与 signal 的双向绑定，提交逻辑在外层组件。

use leptos::prelude::*;

use super::form_state::{TaskFormState, TopicFormState};

/// 主题字段：名称、简介、正文
#[component]
pub fn TopicFields(state: TopicFormState, id_prefix: String) -> impl IntoView {
    let title_id = format!("{id_prefix}-title");
    let description_id = format!("{id_prefix}-description");
    let content_id = format!("{id_prefix}-content");

    view! {
        <div class="form-group">
            <label for=title_id.clone()>"Название темы"</label>
            <input
                id=title_id
                type="text"
                required
                prop:value=move || state.title.get()
                on:input=move |ev| state.title.set(event_target_value(&ev))
            />
        </div>
        <div class="form-group">
            <label for=description_id.clone()>"Краткое описание (необязательно)"</label>
            <input
                id=description_id
                type="text"
                prop:value=move || state.description.get()
                on:input=move |ev| state.description.set(event_target_value(&ev))
            />
        </div>
        <div class="form-group">
            <label for=content_id.clone()>"Содержимое темы (HTML/текст, необязательно)"</label>
            <textarea
                id=content_id
                class="code-editor"
                prop:value=move || state.content.get()
                on:input=move |ev| state.content.set(event_target_value(&ev))
            ></textarea>
        </div>
    }
}

/// 任务字段：名称、条件
#[component]
pub fn TaskFields(state: TaskFormState, id_prefix: String) -> impl IntoView {
    let title_id = format!("{id_prefix}-title");
    let condition_id = format!("{id_prefix}-condition");

    view! {
        <div class="form-group">
            <label for=title_id.clone()>"Название задачи"</label>
            <input
                id=title_id
                type="text"
                required
                prop:value=move || state.title.get()
                on:input=move |ev| state.title.set(event_target_value(&ev))
            />
        </div>
        <div class="form-group">
            <label for=condition_id.clone()>"Условие задачи (текст)"</label>
            <textarea
                id=condition_id
                class="code-editor"
                prop:value=move || state.condition.get()
                on:input=move |ev| state.condition.set(event_target_value(&ev))
            ></textarea>
        </div>
    }
}

/// 表单错误行
#[component]
pub fn FieldError(error: RwSignal<Option<String>>) -> impl IntoView {
    view! {
        <div class="error-msg" class:hidden=move || error.get().is_none()>
            {move || error.get().unwrap_or_default()}
        </div>
    }
}
