//! 路由服务模块 - 核心引擎
//!
//! 实现"监听 -> 解析 -> 分发 -> 挂载"的渲染流程：
//! 1. 进入加载状态：显示加载指示，隐藏所有视图容器
//! 2. 解析位置并分发给对应的页面渲染器
//! 3. 渲染器只显示自己的容器；失败时在主容器显示错误
//! 4. 离开加载状态
//!
//! 每次渲染持有一个代数票据。新的导航会让旧票据失效，
//! 旧渲染的迟到结果被静默丢弃，不再修改 DOM。

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use futures::future::LocalBoxFuture;
use tracing::{debug, info, warn};
use wasm_bindgen::prelude::*;

use super::route::AppRoute;
use crate::context::{AppContext, Navigator};
use crate::pages::{self, Page};
use crate::shell::{Mount, ViewId};

/// 把 future 交给单线程执行器
pub type Spawner = Rc<dyn Fn(LocalBoxFuture<'static, ()>)>;

/// 渲染票据
#[derive(Clone)]
pub struct RenderTicket {
    id: u64,
    latest: Rc<Cell<u64>>,
}

impl RenderTicket {
    pub fn is_current(&self) -> bool {
        self.latest.get() == self.id
    }
}

/// 渲染编排器
pub struct RenderOrchestrator {
    ctx: AppContext,
    latest: Rc<Cell<u64>>,
    location: RefCell<Option<String>>,
}

impl RenderOrchestrator {
    /// 创建编排器，并在会话过期时重渲染当前位置
    pub fn new(ctx: AppContext, spawn: Spawner) -> Rc<Self> {
        let orchestrator = Rc::new(Self {
            ctx,
            latest: Rc::new(Cell::new(0)),
            location: RefCell::new(None),
        });

        let weak: Weak<Self> = Rc::downgrade(&orchestrator);
        orchestrator
            .ctx
            .session
            .on_logout(move || {
                if let Some(orchestrator) = weak.upgrade() {
                    info!("session expired, re-rendering current view");
                    spawn(Box::pin(async move { orchestrator.rerender().await }));
                }
            })
            .keep();

        orchestrator
    }

    pub fn context(&self) -> &AppContext {
        &self.ctx
    }

    /// 开启新一代渲染，之前的票据全部失效
    fn begin(&self, location: &str) -> RenderTicket {
        let id = self.latest.get() + 1;
        self.latest.set(id);
        self.location.replace(Some(location.to_string()));
        RenderTicket {
            id,
            latest: self.latest.clone(),
        }
    }

    /// 渲染指定位置
    pub async fn render(&self, location: &str) {
        let ticket = self.begin(location);
        let shell = self.ctx.shell.clone();
        shell.set_loading(true);
        shell.hide_all();

        let route = AppRoute::from_location(location);
        info!(%route, "render");
        self.ctx.flash.retain(match &route {
            AppRoute::Task { id } => Some(id.as_str()),
            _ => None,
        });
        let mount = Mount::new(route.view(), ticket.clone(), shell.clone());

        match pages::render(&self.ctx, &route, &mount).await {
            Ok(()) => {}
            Err(err) if err.is_superseded() || !ticket.is_current() => {
                debug!(%route, "stale render discarded");
            }
            Err(err) => {
                if err.is_unauthorized() {
                    info!(%route, "render interrupted by expired session");
                } else {
                    warn!(%err, status = ?err.status(), %route, "render failed");
                }
                shell.hide_all();
                shell.mount(ViewId::Main, Page::Error(err.to_string()));
            }
        }

        if ticket.is_current() {
            shell.set_loading(false);
        }
    }

    /// 重新渲染最近一次的位置；尚未渲染过时什么也不做
    pub async fn rerender(&self) {
        let location = self.location.borrow().clone();
        if let Some(location) = location {
            self.render(&location).await;
        }
    }
}

// =========================================================
// 浏览器绑定
// =========================================================

/// 获取当前 URL fragment
fn current_hash() -> String {
    web_sys::window()
        .and_then(|w| w.location().hash().ok())
        .unwrap_or_default()
}

/// 基于 `location.hash` 的导航
#[derive(Clone, Copy, Default)]
pub struct HashNavigator;

impl Navigator for HashNavigator {
    fn current(&self) -> String {
        current_hash()
    }

    fn navigate(&self, route: &AppRoute) {
        if let Some(window) = web_sys::window() {
            if window.location().set_hash(&route.to_path()).is_err() {
                warn!(%route, "failed to update location hash");
            }
        }
    }
}

/// 初始化 hashchange 监听
pub fn listen_hash_changes(orchestrator: Rc<RenderOrchestrator>, spawn: Spawner) {
    let closure = Closure::<dyn Fn()>::new(move || {
        let orchestrator = orchestrator.clone();
        spawn(Box::pin(async move {
            orchestrator.render(&current_hash()).await;
        }));
    });

    if let Some(window) = web_sys::window() {
        let callback = closure.as_ref().unchecked_ref();
        if let Err(err) = window.add_event_listener_with_callback("hashchange", callback) {
            warn!(?err, "failed to listen for hashchange");
        }
    }

    // 泄漏闭包以保持监听器存活
    closure.forget();
}
