//! 提交记录表格
//!
//! 任务页只列出本任务的提交，个人资料页列出全部提交并带任务/主题链接。

use chelper_shared::Attempt;
use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::components::app::use_app;
use crate::pages::profile::NO_ATTEMPTS;
use crate::pages::task::view_attempt_code;
use crate::web::route::AppRoute;

fn created(attempt: &Attempt) -> String {
    attempt.created_at.format_in(&chrono::Local)
}

fn score(attempt: &Attempt) -> String {
    format!("{}/{}", attempt.passed_tests, attempt.total_tests)
}

#[component]
fn Badge(passed: bool, fail_label: &'static str) -> impl IntoView {
    let (class, label) = if passed {
        ("badge badge-success", "Зачёт")
    } else {
        ("badge badge-fail", fail_label)
    };
    view! { <span class=class>{label}</span> }
}

/// 在新窗口打开提交的代码
#[component]
fn CodeLink(id: i64) -> impl IntoView {
    let app = use_app();
    let on_click = move |ev: leptos::ev::MouseEvent| {
        ev.prevent_default();
        let ctx = app.ctx();
        spawn_local(async move { view_attempt_code(&ctx, id).await });
    };
    view! { <a href="#" class="view-attempt" on:click=on_click>"Код"</a> }
}

#[component]
pub fn TaskAttemptsTable(attempts: Vec<Attempt>) -> impl IntoView {
    (!attempts.is_empty()).then(|| {
        let title = format!("Мои попытки ({})", attempts.len());
        view! {
            <h2 class="attempts-title">{title}</h2>
            <table class="attempts-table">
                <thead>
                    <tr><th>"Дата"</th><th>"Результат"</th><th>"Тесты"</th><th></th></tr>
                </thead>
                <tbody>
                    {attempts
                        .into_iter()
                        .map(|a| view! {
                            <tr>
                                <td>{created(&a)}</td>
                                <td><Badge passed=a.passed fail_label="Не зачёт" /></td>
                                <td>{score(&a)}</td>
                                <td><CodeLink id=a.id /></td>
                            </tr>
                        })
                        .collect_view()}
                </tbody>
            </table>
        }
    })
}

#[component]
pub fn AttemptHistoryTable(attempts: Vec<Attempt>) -> impl IntoView {
    if attempts.is_empty() {
        let empty = view! { <p class="empty-state">{NO_ATTEMPTS}</p> };
        return empty.into_any();
    }

    view! {
        <h2 class="attempts-title">"Мои попытки"</h2>
        <table class="attempts-table">
            <thead>
                <tr>
                    <th>"Задача"</th>
                    <th>"Тема"</th>
                    <th>"Результат"</th>
                    <th>"Тесты"</th>
                    <th>"Дата"</th>
                    <th></th>
                </tr>
            </thead>
            <tbody>
                {attempts
                    .into_iter()
                    .map(|a| {
                        let task_href = AppRoute::Task { id: a.task_id.to_string() }.href();
                        let topic_href = a
                            .topic_id
                            .map(|id| AppRoute::Topic { id: id.to_string() }.href())
                            .unwrap_or_else(|| "#/".to_string());
                        view! {
                            <tr>
                                <td><a href=task_href>{a.task_title.clone()}</a></td>
                                <td><a href=topic_href>{a.topic_title.clone()}</a></td>
                                <td><Badge passed=a.passed fail_label="Нет" /></td>
                                <td>{score(&a)}</td>
                                <td>{created(&a)}</td>
                                <td><CodeLink id=a.id /></td>
                            </tr>
                        }
                    })
                    .collect_view()}
            </tbody>
        </table>
    }
    .into_any()
}
