//! 测试工具：Mock HTTP 客户端、记录型外壳与导航、数据构造函数

use std::cell::{Cell, RefCell};
use std::collections::{BTreeSet, HashMap, HashSet};
use std::future::Future;
use std::pin::Pin;
use std::rc::Rc;
use std::task::{Context, Poll};

use async_trait::async_trait;
use chelper_shared::{Attempt, CreatedAt, ROLE_ADMIN, Task, Topic, UserProfile};
use futures::future::LocalBoxFuture;
use serde_json::{Value, json};

use crate::config::AppConfig;
use crate::context::{AppContext, Navigator};
use crate::error::{AppError, AppResult};
use crate::pages::Page;
use crate::shell::{NavState, Notice, Shell, ViewId};
use crate::web::route::AppRoute;
use crate::web::router::{RenderOrchestrator, Spawner};
use crate::web::{HttpClient, HttpRequest, HttpResponse, MemoryStorage, TokenStorage};

pub const API: &str = "/api";
pub const TOKEN_KEY: &str = "token";

// =========================================================
// MockHttpClient
// =========================================================

#[derive(Clone)]
enum Canned {
    Response(HttpResponse),
    NetworkError(String),
}

/// 让出一次执行权，用于在 `join!` 中交错两次渲染
#[derive(Default)]
struct YieldOnce {
    yielded: bool,
}

impl Future for YieldOnce {
    type Output = ();

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<()> {
        if self.yielded {
            Poll::Ready(())
        } else {
            self.yielded = true;
            cx.waker().wake_by_ref();
            Poll::Pending
        }
    }
}

/// 按 `"METHOD url"` 匹配的 Mock 客户端
///
/// 未配置的路由返回 404。
#[derive(Default)]
pub struct MockHttpClient {
    routes: RefCell<HashMap<String, Canned>>,
    slow: RefCell<HashSet<String>>,
    log: RefCell<Vec<HttpRequest>>,
}

fn key(method: &str, path: &str) -> String {
    format!("{} {}{}", method, API, path)
}

impl MockHttpClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(&self, method: &str, path: &str, status: u16, body: Value) {
        let body = if body.is_null() {
            String::new()
        } else {
            body.to_string()
        };
        self.routes.borrow_mut().insert(
            key(method, path),
            Canned::Response(HttpResponse {
                status,
                status_text: String::new(),
                body,
            }),
        );
    }

    pub fn ok(&self, method: &str, path: &str, body: Value) {
        self.respond(method, path, 200, body);
    }

    pub fn fail(&self, method: &str, path: &str, status: u16, error: &str) {
        self.respond(method, path, status, json!({ "error": error }));
    }

    pub fn network_error(&self, method: &str, path: &str) {
        self.routes.borrow_mut().insert(
            key(method, path),
            Canned::NetworkError("connection refused".to_string()),
        );
    }

    /// 该路由在响应前先让出一次执行权
    pub fn slow(&self, method: &str, path: &str) {
        self.slow.borrow_mut().insert(key(method, path));
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.log.borrow().clone()
    }

    /// 某个路由被请求的次数
    pub fn count(&self, method: &str, path: &str) -> usize {
        let wanted = key(method, path);
        self.log
            .borrow()
            .iter()
            .filter(|r| format!("{} {}", r.method.as_str(), r.url) == wanted)
            .count()
    }

    pub fn last(&self) -> Option<HttpRequest> {
        self.log.borrow().last().cloned()
    }

    pub fn last_matching(&self, method: &str, path: &str) -> Option<HttpRequest> {
        let wanted = key(method, path);
        self.log
            .borrow()
            .iter()
            .rev()
            .find(|r| format!("{} {}", r.method.as_str(), r.url) == wanted)
            .cloned()
    }
}

#[async_trait(?Send)]
impl HttpClient for MockHttpClient {
    async fn send(&self, req: HttpRequest) -> AppResult<HttpResponse> {
        let key = format!("{} {}", req.method.as_str(), req.url);
        self.log.borrow_mut().push(req);

        let is_slow = self.slow.borrow().contains(&key);
        if is_slow {
            YieldOnce::default().await;
        }

        let canned = self.routes.borrow().get(&key).cloned();
        match canned {
            Some(Canned::Response(resp)) => Ok(resp),
            Some(Canned::NetworkError(msg)) => Err(AppError::Network(msg)),
            None => Ok(HttpResponse {
                status: 404,
                status_text: "Not Found".to_string(),
                body: json!({ "error": "not found" }).to_string(),
            }),
        }
    }
}

// =========================================================
// RecordingShell / RecordingNavigator
// =========================================================

/// 记录所有 DOM 操作的外壳
#[derive(Default)]
pub struct RecordingShell {
    loading: Cell<bool>,
    visible: RefCell<BTreeSet<ViewId>>,
    pages: RefCell<HashMap<ViewId, Page>>,
    mounts: RefCell<Vec<ViewId>>,
    nav: Cell<NavState>,
    notices: RefCell<Vec<Notice>>,
    code_windows: RefCell<Vec<String>>,
}

impl RecordingShell {
    pub fn is_loading(&self) -> bool {
        self.loading.get()
    }

    pub fn visible(&self) -> Vec<ViewId> {
        self.visible.borrow().iter().copied().collect()
    }

    pub fn page(&self, view: ViewId) -> Option<Page> {
        self.pages.borrow().get(&view).cloned()
    }

    /// 当前唯一可见视图中的页面
    pub fn shown(&self) -> Option<Page> {
        let visible = self.visible();
        match visible.as_slice() {
            [view] => self.page(*view),
            _ => None,
        }
    }

    pub fn mounts(&self) -> Vec<ViewId> {
        self.mounts.borrow().clone()
    }

    pub fn nav(&self) -> NavState {
        self.nav.get()
    }

    pub fn notices(&self) -> Vec<Notice> {
        self.notices.borrow().clone()
    }

    pub fn code_windows(&self) -> Vec<String> {
        self.code_windows.borrow().clone()
    }
}

impl Shell for RecordingShell {
    fn set_loading(&self, visible: bool) {
        self.loading.set(visible);
    }

    fn hide_all(&self) {
        self.visible.borrow_mut().clear();
    }

    fn mount(&self, view: ViewId, page: Page) {
        self.pages.borrow_mut().insert(view, page);
        self.visible.borrow_mut().insert(view);
        self.mounts.borrow_mut().push(view);
    }

    fn set_nav(&self, nav: NavState) {
        self.nav.set(nav);
    }

    fn notify(&self, notice: Notice) {
        self.notices.borrow_mut().push(notice);
    }

    fn open_code_window(&self, code: &str) {
        self.code_windows.borrow_mut().push(code.to_string());
    }
}

#[derive(Default)]
pub struct RecordingNavigator {
    location: RefCell<String>,
    history: RefCell<Vec<AppRoute>>,
}

impl RecordingNavigator {
    pub fn history(&self) -> Vec<AppRoute> {
        self.history.borrow().clone()
    }
}

impl Navigator for RecordingNavigator {
    fn current(&self) -> String {
        self.location.borrow().clone()
    }

    fn navigate(&self, route: &AppRoute) {
        self.location.replace(route.href());
        self.history.borrow_mut().push(route.clone());
    }
}

// =========================================================
// Harness
// =========================================================

type Queue = Rc<RefCell<Vec<LocalBoxFuture<'static, ()>>>>;

/// 组装好的应用：Mock 传输层 + 记录型外壳 + 编排器
pub struct Harness {
    pub client: Rc<MockHttpClient>,
    pub shell: Rc<RecordingShell>,
    pub navigator: Rc<RecordingNavigator>,
    pub storage: Rc<MemoryStorage>,
    pub ctx: AppContext,
    pub orchestrator: Rc<RenderOrchestrator>,
    spawned: Queue,
}

impl Harness {
    pub fn new() -> Self {
        let client = Rc::new(MockHttpClient::new());
        let shell = Rc::new(RecordingShell::default());
        let navigator = Rc::new(RecordingNavigator::default());
        let storage = Rc::new(MemoryStorage::new());

        let config = AppConfig {
            api_base: API.to_string(),
            token_key: TOKEN_KEY.to_string(),
        };
        let ctx = AppContext::new(
            config,
            storage.clone(),
            client.clone(),
            shell.clone(),
            navigator.clone(),
        );

        let spawned: Queue = Rc::new(RefCell::new(Vec::new()));
        let queue = spawned.clone();
        let spawn: Spawner =
            Rc::new(move |fut: LocalBoxFuture<'static, ()>| queue.borrow_mut().push(fut));
        let orchestrator = RenderOrchestrator::new(ctx.clone(), spawn);

        Self {
            client,
            shell,
            navigator,
            storage,
            ctx,
            orchestrator,
            spawned,
        }
    }

    /// 写入令牌并通过 `/profile/me` 恢复用户
    pub async fn login_as(&self, user: UserProfile) {
        self.storage.set(TOKEN_KEY, "jwt-token");
        self.client
            .ok("GET", "/profile/me", serde_json::to_value(&user).unwrap());
        self.ctx.load_user().await;
        assert!(self.ctx.session.is_authenticated());
    }

    pub async fn render(&self, location: &str) {
        self.orchestrator.render(location).await;
    }

    /// 依次执行被投递的后台任务（例如会话过期后的重渲染）
    pub async fn run_spawned(&self) -> usize {
        let mut ran = 0;
        loop {
            let next = {
                let mut queue = self.spawned.borrow_mut();
                if queue.is_empty() {
                    None
                } else {
                    Some(queue.remove(0))
                }
            };
            match next {
                Some(fut) => {
                    fut.await;
                    ran += 1;
                }
                None => return ran,
            }
        }
    }
}

// =========================================================
// 数据构造
// =========================================================

pub fn user(name: &str) -> UserProfile {
    UserProfile {
        username: name.to_string(),
        email: format!("{name}@example.com"),
        avatar_path: None,
        roles: vec!["USER".to_string()],
    }
}

pub fn admin(name: &str) -> UserProfile {
    UserProfile {
        roles: vec!["USER".to_string(), ROLE_ADMIN.to_string()],
        ..user(name)
    }
}

pub fn topic(id: i64, title: &str) -> Topic {
    Topic {
        id,
        title: title.to_string(),
        description: None,
        content: None,
        image_path: None,
        sort_order: None,
        has_tasks: false,
    }
}

pub fn task(id: i64, topic_id: i64, title: &str) -> Task {
    Task {
        id,
        topic_id,
        title: title.to_string(),
        condition: "Выведите сумму двух чисел".to_string(),
        sort_order: None,
    }
}

pub fn attempt(id: i64, task_id: i64, passed: bool) -> Attempt {
    Attempt {
        id,
        task_id,
        task_title: "Сумма".to_string(),
        topic_id: Some(1),
        topic_title: "Основы".to_string(),
        code: None,
        passed,
        passed_tests: if passed { 4 } else { 1 },
        total_tests: 4,
        message: None,
        created_at: CreatedAt::Text("2024-03-05T09:07:03Z".to_string()),
    }
}

pub fn to_json<T: serde::Serialize>(value: &T) -> Value {
    serde_json::to_value(value).unwrap()
}
