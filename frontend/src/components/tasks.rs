use leptos::prelude::*;

use crate::pages::TasksPage;
use crate::pages::tasks::TaskListing;
use crate::web::route::AppRoute;

/// 登录/注册提示
#[component]
pub fn LoginRequired(
    message: &'static str,
    #[prop(optional)] with_register: bool,
) -> impl IntoView {
    view! {
        <div class="required-login">
            <p>{message}</p>
            <a href=AppRoute::Login.href() class="btn btn-primary">"Вход"</a>
            {with_register.then(|| view! {
                <a href=AppRoute::Register.href() class="btn btn-secondary">"Регистрация"</a>
            })}
        </div>
    }
}

#[component]
pub fn TasksView(page: TasksPage) -> impl IntoView {
    let back = AppRoute::Topic {
        id: page.topic_id.clone(),
    }
    .href();

    let body = match page.listing {
        TaskListing::LoginRequired => view! {
            <LoginRequired
                message="Чтобы решать задачи, войдите или зарегистрируйтесь."
                with_register=true
            />
        }
        .into_any(),
        TaskListing::Tasks(tasks) if tasks.is_empty() => {
            view! { <ul class="task-list"><li class="empty-state">"Задач пока нет"</li></ul> }
                .into_any()
        }
        TaskListing::Tasks(tasks) => view! {
            <ul class="task-list">
                {tasks
                    .into_iter()
                    .map(|task| {
                        let href = AppRoute::Task { id: task.id.to_string() }.href();
                        view! { <li><a href=href>{task.title}</a></li> }
                    })
                    .collect_view()}
            </ul>
        }
        .into_any(),
    };

    view! {
        <a href=back class="back-link">"← Назад к теме"</a>
        <h1 class="page-title">{format!("{} — Задачи", page.topic_title)}</h1>
        {body}
    }
}
