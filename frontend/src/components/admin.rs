//! 管理面板组件
//!
//! 主题列表，每行可展开编辑表单、新建任务表单或删除确认。
//! 任务页上的任务编辑面板也在这里。

mod fields;
mod form_state;

use std::future::Future;

use chelper_shared::{Task, Topic};
use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::components::app::use_app;
use crate::error::AppResult;
use crate::pages::admin::{self, ACCESS_DENIED, AdminPage};
use crate::web::route::AppRoute;

use fields::{FieldError, TaskFields, TopicFields};
use form_state::{TaskFormState, TopicFormState};

/// 行内当前展开的面板
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RowPanel {
    Closed,
    Edit,
    AddTask,
    ConfirmDelete,
}

impl RowPanel {
    /// 再次点击同一按钮时收起
    fn toggled(self, target: RowPanel) -> RowPanel {
        if self == target { RowPanel::Closed } else { target }
    }
}

/// 提交表单动作：失败时错误写回表单，成功由页面层负责提示和重渲染
fn run_action<T, F>(busy: RwSignal<bool>, error: RwSignal<Option<String>>, action: F)
where
    F: Future<Output = AppResult<T>> + 'static,
    T: 'static,
{
    busy.set(true);
    error.set(None);
    spawn_local(async move {
        if let Err(err) = action.await {
            error.try_set(Some(err.to_string()));
        }
        busy.try_set(false);
    });
}

#[component]
pub fn AdminView(page: AdminPage) -> impl IntoView {
    let topics = match page {
        AdminPage::Denied => {
            return view! { <p class="error-msg">{ACCESS_DENIED}</p> }.into_any();
        }
        AdminPage::Topics(topics) => topics,
    };

    view! {
        <h1 class="page-title">"Админ-панель"</h1>
        <div class="admin-section">
            <h2>"Темы"</h2>
            <ul class="topic-list">
                {topics
                    .into_iter()
                    .map(|topic| view! { <TopicRow topic=topic /> })
                    .collect_view()}
            </ul>
            <NewTopicForm />
        </div>
        <p class="meta">
            "Добавление тестов: на странице задачи или через API "
            "(POST /api/admin/tasks/:taskId/tests с body { \"input\": \"...\", \"expectedOutput\": \"...\" }). "
            "Минимум 4 теста на задачу."
        </p>
    }
    .into_any()
}

#[component]
fn TopicRow(topic: Topic) -> impl IntoView {
    let app = use_app();
    let panel = RwSignal::new(RowPanel::Closed);
    let topic_id = topic.id;
    let edit = TopicFormState::for_topic(&topic);
    let task = TaskFormState::new();
    let busy = RwSignal::new(false);
    let delete_error = RwSignal::new(Option::<String>::None);

    let toggle = move |target: RowPanel| {
        panel.update(|p| *p = p.toggled(target));
    };

    let on_edit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        let orchestrator = app.orchestrator();
        let form = edit.to_form();
        run_action(edit.busy, edit.error, async move {
            admin::update_topic(&orchestrator, topic_id, form).await
        });
    };

    let on_add_task = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        let orchestrator = app.orchestrator();
        let form = task.to_form();
        run_action(task.busy, task.error, async move {
            admin::create_task(&orchestrator, topic_id, form).await
        });
    };

    let on_delete = move |_| {
        let orchestrator = app.orchestrator();
        run_action(busy, delete_error, async move {
            admin::delete_topic(&orchestrator, topic_id).await
        });
    };

    let href = AppRoute::Topic {
        id: topic_id.to_string(),
    }
    .href();
    let edit_prefix = format!("edit-topic-{topic_id}");
    let task_prefix = format!("new-task-{topic_id}");

    view! {
        <li>
            <a href=href class="topic-card">{topic.title}</a>
            <button type="button" class="btn btn-secondary edit-topic-btn" on:click=move |_| toggle(RowPanel::Edit)>
                "Изменить"
            </button>
            <button type="button" class="btn btn-secondary add-task-btn" on:click=move |_| toggle(RowPanel::AddTask)>
                "+ Задача"
            </button>
            <button type="button" class="btn btn-secondary delete-topic-btn" on:click=move |_| toggle(RowPanel::ConfirmDelete)>
                "Удалить"
            </button>

            <Show when=move || panel.get() == RowPanel::Edit>
                <form class="inline-form" on:submit=on_edit>
                    <TopicFields state=edit id_prefix=edit_prefix.clone() />
                    <FieldError error=edit.error />
                    <div class="form-actions">
                        <button type="submit" class="btn btn-primary" disabled=move || edit.busy.get()>
                            "Сохранить"
                        </button>
                    </div>
                </form>
            </Show>

            <Show when=move || panel.get() == RowPanel::AddTask>
                <form class="inline-form" on:submit=on_add_task>
                    <TaskFields state=task id_prefix=task_prefix.clone() />
                    <FieldError error=task.error />
                    <div class="form-actions">
                        <button type="submit" class="btn btn-primary" disabled=move || task.busy.get()>
                            "Создать задачу"
                        </button>
                        <button type="button" class="btn btn-secondary" on:click=move |_| {
                            task.reset();
                            panel.set(RowPanel::Closed);
                        }>
                            "Отмена"
                        </button>
                    </div>
                </form>
            </Show>

            <Show when=move || panel.get() == RowPanel::ConfirmDelete>
                <div class="inline-form">
                    <p>"Удалить тему вместе со всеми задачами?"</p>
                    <FieldError error=delete_error />
                    <div class="form-actions">
                        <button type="button" class="btn btn-primary" disabled=move || busy.get() on:click=on_delete>
                            "Да, удалить"
                        </button>
                        <button type="button" class="btn btn-secondary" on:click=move |_| panel.set(RowPanel::Closed)>
                            "Отмена"
                        </button>
                    </div>
                </div>
            </Show>
        </li>
    }
}

#[component]
fn NewTopicForm() -> impl IntoView {
    let app = use_app();
    let open = RwSignal::new(false);
    let state = TopicFormState::new();

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        let orchestrator = app.orchestrator();
        let form = state.to_form();
        run_action(state.busy, state.error, async move {
            admin::create_topic(&orchestrator, form).await
        });
    };

    view! {
        <button type="button" class="btn btn-primary" id="admin-add-topic" on:click=move |_| open.update(|o| *o = !*o)>
            "+ Добавить тему"
        </button>
        <Show when=move || open.get()>
            <form class="inline-form" id="new-topic-form" on:submit=on_submit>
                <TopicFields state=state id_prefix="new-topic".to_string() />
                <FieldError error=state.error />
                <div class="form-actions">
                    <button type="submit" class="btn btn-primary" disabled=move || state.busy.get()>
                        "Создать"
                    </button>
                    <button type="button" class="btn btn-secondary" on:click=move |_| {
                        state.reset();
                        open.set(false);
                    }>
                        "Отмена"
                    </button>
                </div>
            </form>
        </Show>
    }
}

/// 任务页上的管理面板：编辑或删除当前任务
#[component]
pub fn TaskEditor(task: Task) -> impl IntoView {
    let app = use_app();
    let panel = RwSignal::new(RowPanel::Closed);
    let edit = TaskFormState::for_task(&task);
    let busy = RwSignal::new(false);
    let delete_error = RwSignal::new(Option::<String>::None);
    let task_id = task.id;
    let task = StoredValue::new(task);

    let toggle = move |target: RowPanel| {
        panel.update(|p| *p = p.toggled(target));
    };

    let on_edit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        let orchestrator = app.orchestrator();
        let form = edit.to_form();
        run_action(edit.busy, edit.error, async move {
            admin::update_task(&orchestrator, task_id, form).await
        });
    };

    let on_delete = move |_| {
        let orchestrator = app.orchestrator();
        let task = task.get_value();
        run_action(busy, delete_error, async move {
            admin::delete_task(&orchestrator, &task).await
        });
    };

    view! {
        <div class="form-actions">
            <button type="button" class="btn btn-secondary" id="edit-task-btn" on:click=move |_| toggle(RowPanel::Edit)>
                "Изменить задачу"
            </button>
            <button type="button" class="btn btn-secondary" id="delete-task-btn" on:click=move |_| toggle(RowPanel::ConfirmDelete)>
                "Удалить задачу"
            </button>
        </div>

        <Show when=move || panel.get() == RowPanel::Edit>
            <form class="inline-form" on:submit=on_edit>
                <TaskFields state=edit id_prefix=format!("edit-task-{task_id}") />
                <FieldError error=edit.error />
                <div class="form-actions">
                    <button type="submit" class="btn btn-primary" disabled=move || edit.busy.get()>
                        "Сохранить"
                    </button>
                </div>
            </form>
        </Show>

        <Show when=move || panel.get() == RowPanel::ConfirmDelete>
            <div class="inline-form">
                <p>"Удалить задачу вместе с тестами и попытками?"</p>
                <FieldError error=delete_error />
                <div class="form-actions">
                    <button type="button" class="btn btn-primary" disabled=move || busy.get() on:click=on_delete>
                        "Да, удалить"
                    </button>
                    <button type="button" class="btn btn-secondary" on:click=move |_| panel.set(RowPanel::Closed)>
                        "Отмена"
                    </button>
                </div>
            </div>
        </Show>
    }
}
