//! 基于 Leptos 信号的页面外壳
//!
//! 渲染器写信号，`components::App` 读信号渲染 DOM：
//! - 每个视图容器一个页面槽位
//! - `visible` 记录当前唯一可见的容器
//! - 提示 3 秒后自动消失

use std::cell::RefCell;

use leptos::prelude::*;
use tracing::warn;

use super::timer::Timeout;
use crate::pages::Page;
use crate::shell::{NavState, Notice, Shell, ViewId};

const NOTICE_MILLIS: u32 = 3_000;
const CODE_WINDOW_FEATURES: &str = "width=700,height=500";
const CODE_STYLE: &str = "padding:1rem;font-family:monospace;white-space:pre-wrap;";

/// 外壳状态信号，`Copy`，可直接放进组件闭包
#[derive(Clone, Copy)]
pub struct ShellSignals {
    pub loading: RwSignal<bool>,
    pub visible: RwSignal<Option<ViewId>>,
    pages: [RwSignal<Option<Page>>; ViewId::COUNT],
    pub nav: RwSignal<NavState>,
    pub notice: RwSignal<Option<Notice>>,
}

impl ShellSignals {
    pub fn new() -> Self {
        Self {
            loading: RwSignal::new(true),
            visible: RwSignal::new(None),
            pages: std::array::from_fn(|_| RwSignal::new(None)),
            nav: RwSignal::new(NavState::Guest),
            notice: RwSignal::new(None),
        }
    }

    pub fn page(&self, view: ViewId) -> RwSignal<Option<Page>> {
        self.pages[view.index()]
    }
}

impl Default for ShellSignals {
    fn default() -> Self {
        Self::new()
    }
}

pub struct LeptosShell {
    signals: ShellSignals,
    notice_timer: RefCell<Option<Timeout>>,
}

impl LeptosShell {
    pub fn new(signals: ShellSignals) -> Self {
        Self {
            signals,
            notice_timer: RefCell::new(None),
        }
    }
}

impl Shell for LeptosShell {
    fn set_loading(&self, visible: bool) {
        self.signals.loading.set(visible);
    }

    fn hide_all(&self) {
        self.signals.visible.set(None);
    }

    fn mount(&self, view: ViewId, page: Page) {
        self.signals.page(view).set(Some(page));
        self.signals.visible.set(Some(view));
    }

    fn set_nav(&self, nav: NavState) {
        self.signals.nav.set(nav);
    }

    fn notify(&self, notice: Notice) {
        let slot = self.signals.notice;
        slot.set(Some(notice));
        // 新提示重新计时，旧定时器随 drop 取消
        self.notice_timer
            .replace(Some(Timeout::new(NOTICE_MILLIS, move || slot.set(None))));
    }

    fn open_code_window(&self, code: &str) {
        let opened = web_sys::window()
            .and_then(|w| {
                w.open_with_url_and_target_and_features("", "_blank", CODE_WINDOW_FEATURES)
                    .ok()
                    .flatten()
            })
            .and_then(|w| w.document());
        let Some(document) = opened else {
            warn!("code window blocked or unavailable");
            return;
        };

        let appended = document
            .create_element("pre")
            .and_then(|pre| {
                pre.set_attribute("style", CODE_STYLE)?;
                pre.set_text_content(Some(code));
                match document.body() {
                    Some(body) => body.append_child(&pre).map(|_| ()),
                    None => Ok(()),
                }
            });
        if appended.is_err() {
            warn!("failed to write code window");
        }
    }
}
