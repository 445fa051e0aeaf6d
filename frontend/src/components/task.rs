use leptos::html::Input;
use leptos::prelude::*;
use leptos::task::spawn_local;
use tracing::warn;

use crate::components::admin::TaskEditor;
use crate::components::app::use_app;
use crate::components::attempts::TaskAttemptsTable;
use crate::components::tasks::LoginRequired;
use crate::pages::task::{self, TEST_ADDED, TaskAccess};
use crate::pages::{ResultBox, TaskPage};
use crate::web::file;
use crate::web::route::AppRoute;

/// 结果框；`None` 时不渲染
fn result_box(state: Option<ResultBox>) -> Option<impl IntoView> {
    state.map(|r| {
        let class = r.class();
        view! { <div class=class>{r.text}</div> }
    })
}

#[component]
pub fn TaskView(page: TaskPage) -> impl IntoView {
    let task_id = page.task.id.to_string();
    let admin = page.admin_controls.then(|| page.task.clone());
    let back = AppRoute::Tasks {
        topic_id: page.task.topic_id.to_string(),
    }
    .href();

    let body = match page.access {
        TaskAccess::Guest => view! {
            <LoginRequired message="Чтобы отправить решение, войдите или зарегистрируйтесь." />
        }
        .into_any(),
        TaskAccess::Passed => view! {
            <div class="result-box success">"✓ Задача уже сдана. Повторная отправка недоступна."</div>
            <TaskAttemptsTable attempts=page.attempts />
        }
        .into_any(),
        TaskAccess::Open => view! {
            <SolutionEditor task_id=task_id.clone() verdict=page.verdict />
            <TaskAttemptsTable attempts=page.attempts />
        }
        .into_any(),
    };

    view! {
        <a href=back class="back-link">{format!("← {} — Задачи", page.topic_title)}</a>
        <h1 class="page-title">{page.task.title}</h1>
        <div class="task-condition">{page.task.condition}</div>
        {body}
        {admin.map(|task| view! {
            <TaskEditor task=task />
            <TestCasePanel task_id=task_id />
        })}
    }
}

/// 代码编辑器 + 文件导入 + 提交
#[component]
fn SolutionEditor(task_id: String, verdict: Option<ResultBox>) -> impl IntoView {
    let app = use_app();
    let code = RwSignal::new(String::new());
    let checking = RwSignal::new(false);
    let result = RwSignal::new(verdict);
    let file_ref = NodeRef::<Input>::new();

    let on_file = move |_| {
        let Some(input) = file_ref.get() else {
            return;
        };
        let Some(picked) = file::selected_file(&input) else {
            return;
        };
        // 清空以便再次选择同一个文件
        input.set_value("");
        spawn_local(async move {
            match file::read_text(&picked).await {
                Ok(text) => {
                    code.try_set(text);
                }
                Err(err) => warn!(%err, "code import failed"),
            }
        });
    };

    let on_submit = move |_| {
        let orchestrator = app.orchestrator();
        let task_id = task_id.clone();
        let source = code.get_untracked();
        checking.set(true);
        result.set(None);
        spawn_local(async move {
            // 成功后整页重渲染，判题结果随新页面一起显示
            if let Err(err) = task::submit_solution(&orchestrator, &task_id, &source).await {
                result.try_set(Some(ResultBox::error(err.to_string())));
            }
            checking.try_set(false);
        });
    };

    view! {
        <div class="editor-wrap">
            <label for="code-editor">"Ваш код (1С или текст решения)"</label>
            <textarea
                id="code-editor"
                class="code-editor"
                placeholder="Вставьте код или загрузите файл с кодом..."
                prop:value=move || code.get()
                on:input=move |ev| code.set(event_target_value(&ev))
            ></textarea>
            <p class="meta">
                <label class="btn btn-secondary file-picker">
                    "Выбрать файл с кодом"
                    <input
                        type="file"
                        id="code-file-input"
                        accept=".bsl,.txt,.1c,.xml"
                        class="hidden"
                        node_ref=file_ref
                        on:change=on_file
                    />
                </label>
            </p>
        </div>
        <div class="form-actions">
            <button
                type="button"
                class="btn btn-primary"
                id="submit-task-btn"
                disabled=move || checking.get()
                on:click=on_submit
            >
                "Отправить на проверку"
            </button>
        </div>
        <div id="submit-result">
            <Show when=move || checking.get()>
                <div class="loading">"Проверка..."</div>
            </Show>
            {move || result_box(result.get())}
        </div>
    }
}

/// 管理员：添加测试用例
#[component]
fn TestCasePanel(task_id: String) -> impl IntoView {
    let app = use_app();
    let input = RwSignal::new(String::new());
    let expected = RwSignal::new(String::new());
    let busy = RwSignal::new(false);
    let result = RwSignal::new(Option::<ResultBox>::None);

    let on_add = move |_| {
        let ctx = app.ctx();
        let task_id = task_id.clone();
        let (test_input, test_output) = (input.get_untracked(), expected.get_untracked());
        busy.set(true);
        result.set(None);
        spawn_local(async move {
            let outcome = task::add_test(&ctx, &task_id, &test_input, &test_output).await;
            match outcome {
                Ok(_) => {
                    result.try_set(Some(ResultBox::success(TEST_ADDED)));
                    input.try_set(String::new());
                    expected.try_set(String::new());
                }
                Err(err) => {
                    result.try_set(Some(ResultBox::error(err.to_string())));
                }
            }
            busy.try_set(false);
        });
    };

    view! {
        <div class="editor-wrap test-panel">
            <h2>"Тесты задачи"</h2>
            <p class="meta">"Добавление тест-кейсов для автопроверки"</p>

            <label for="test-input">"Input"</label>
            <textarea
                id="test-input"
                class="code-editor"
                placeholder="Входные данные теста..."
                prop:value=move || input.get()
                on:input=move |ev| input.set(event_target_value(&ev))
            ></textarea>

            <label for="test-output">"Expected output"</label>
            <textarea
                id="test-output"
                class="code-editor"
                placeholder="Ожидаемый результат..."
                prop:value=move || expected.get()
                on:input=move |ev| expected.set(event_target_value(&ev))
            ></textarea>

            <div class="form-actions">
                <button
                    type="button"
                    class="btn btn-primary"
                    id="add-test-btn"
                    disabled=move || busy.get()
                    on:click=on_add
                >
                    "Добавить тест"
                </button>
            </div>

            <div id="add-test-result">
                <Show when=move || busy.get()>
                    <div class="loading">"Добавление теста..."</div>
                </Show>
                {move || result_box(result.get())}
            </div>
        </div>
    }
}
