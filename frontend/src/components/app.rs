//! 应用外壳组件
//!
//! 导航栏、加载遮罩、每个视图一个 `<section id="view-…">` 容器和提示框。
//! 容器内容完全由 `ShellSignals` 驱动，渲染器从不直接接触 DOM。

use std::rc::Rc;

use futures::future::LocalBoxFuture;
use leptos::prelude::*;
use leptos::task::spawn_local;
use tracing::{info, warn};

use crate::components::admin::AdminView;
use crate::components::home::MainView;
use crate::components::login::{LoginView, RegisterView};
use crate::components::profile::ProfileView;
use crate::components::task::TaskView;
use crate::components::tasks::TasksView;
use crate::components::topic::TopicView;
use crate::config::AppConfig;
use crate::context::AppContext;
use crate::pages::{self, Page};
use crate::shell::{NavState, ViewId};
use crate::web::router::{HashNavigator, RenderOrchestrator, Spawner, listen_hash_changes};
use crate::web::{
    BrowserStorage, FetchHttpClient, LeptosShell, MemoryStorage, ShellSignals, TokenStorage,
};

/// 组件访问编排器的句柄
///
/// 编排器含 `Rc`，不能放进普通的（要求 `Send`）存储，这里用本地存储包一层，得到 `Copy` 句柄。
#[derive(Clone, Copy)]
pub struct AppHandle {
    orchestrator: StoredValue<Rc<RenderOrchestrator>, LocalStorage>,
}

impl AppHandle {
    fn new(orchestrator: Rc<RenderOrchestrator>) -> Self {
        Self {
            orchestrator: StoredValue::new_local(orchestrator),
        }
    }

    pub fn orchestrator(&self) -> Rc<RenderOrchestrator> {
        self.orchestrator.get_value()
    }

    pub fn ctx(&self) -> AppContext {
        self.orchestrator().context().clone()
    }
}

/// 从 Context 获取应用句柄
pub fn use_app() -> AppHandle {
    expect_context::<AppHandle>()
}

fn token_storage() -> Rc<dyn TokenStorage> {
    if BrowserStorage::is_available() {
        Rc::new(BrowserStorage)
    } else {
        warn!("localStorage unavailable, session will not survive reload");
        Rc::new(MemoryStorage::new())
    }
}

#[component]
pub fn App() -> impl IntoView {
    // 1. 外壳信号
    let signals = ShellSignals::new();
    provide_context(signals);

    // 2. 组装上下文
    let ctx = AppContext::new(
        AppConfig::from_document(),
        token_storage(),
        Rc::new(FetchHttpClient),
        Rc::new(LeptosShell::new(signals)),
        Rc::new(HashNavigator),
    );

    // 3. 编排器与 hashchange 监听
    let spawn: Spawner = Rc::new(|fut: LocalBoxFuture<'static, ()>| spawn_local(fut));
    let orchestrator = RenderOrchestrator::new(ctx, spawn.clone());
    listen_hash_changes(orchestrator.clone(), spawn);
    provide_context(AppHandle::new(orchestrator.clone()));

    // 4. 恢复用户后渲染当前位置
    spawn_local(async move {
        let ctx = orchestrator.context();
        ctx.load_user().await;
        let location = ctx.navigator.current();
        info!(%location, "initial render");
        orchestrator.render(&location).await;
    });

    view! {
        <NavBar />
        <main class="container">
            <div id="view-loading" class="loading" class:hidden=move || !signals.loading.get()>
                "Загрузка..."
            </div>
            {ViewId::ALL
                .into_iter()
                .map(|view| view! { <ViewSection view=view /> })
                .collect_view()}
        </main>
        <Toast />
    }
}

#[component]
fn NavBar() -> impl IntoView {
    let nav = expect_context::<ShellSignals>().nav;
    let app = use_app();

    let on_logout = move |ev: leptos::ev::MouseEvent| {
        ev.prevent_default();
        pages::login::logout(&app.ctx());
    };

    view! {
        <header class="header">
            <a href="#/" class="logo">"CHelper"</a>
            <nav class="nav">
                <a href="#/">"Темы"</a>
                <span id="nav-guest" class:hidden=move || nav.get() != NavState::Guest>
                    <a href="#/login">"Вход"</a>
                    <a href="#/register">"Регистрация"</a>
                </span>
                <span id="nav-user" class:hidden=move || nav.get() == NavState::Guest>
                    <a href="#/profile">"Профиль"</a>
                    <a href="#" id="logout-btn" on:click=on_logout>"Выход"</a>
                </span>
                <span id="nav-admin" class:hidden=move || nav.get() != NavState::Admin>
                    <a href="#/admin">"Админка"</a>
                </span>
            </nav>
        </header>
    }
}

#[component]
fn ViewSection(view: ViewId) -> impl IntoView {
    let signals = expect_context::<ShellSignals>();
    let page = signals.page(view);

    view! {
        <section id=view.container_id() class:hidden=move || signals.visible.get() != Some(view)>
            {move || page.get().map(render_page)}
        </section>
    }
}

fn render_page(page: Page) -> AnyView {
    match page {
        Page::Main(page) => view! { <MainView page=page /> }.into_any(),
        Page::Topic(page) => view! { <TopicView page=page /> }.into_any(),
        Page::Tasks(page) => view! { <TasksView page=page /> }.into_any(),
        Page::Task(page) => view! { <TaskView page=page /> }.into_any(),
        Page::Login => view! { <LoginView /> }.into_any(),
        Page::Register => view! { <RegisterView /> }.into_any(),
        Page::Profile(page) => view! { <ProfileView page=page /> }.into_any(),
        Page::Admin(page) => view! { <AdminView page=page /> }.into_any(),
        Page::Error(message) => {
            view! { <p class="error-msg">{format!("Ошибка: {message}")}</p> }.into_any()
        }
    }
}

#[component]
fn Toast() -> impl IntoView {
    let notice = expect_context::<ShellSignals>().notice;

    view! {
        {move || {
            notice
                .get()
                .map(|n| {
                    let class = if n.is_error() {
                        "toast toast-error"
                    } else {
                        "toast toast-success"
                    };
                    view! { <div class=class role="status">{n.text().to_string()}</div> }
                })
        }}
    }
}
