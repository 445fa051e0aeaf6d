//! 页面外壳抽象
//!
//! 视图渲染器不直接操作 DOM，而是通过 `Shell` 把页面模型挂载到
//! 各自的视图容器（`view-main`、`view-topic` ...）。
//! 生产实现基于 Leptos 信号（`web::LeptosShell`），测试使用记录型实现。

use std::rc::Rc;

use chelper_shared::UserProfile;

use crate::error::{AppError, AppResult};
use crate::pages::Page;
use crate::web::router::RenderTicket;

/// 互斥的顶层视图
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ViewId {
    Main,
    Topic,
    Tasks,
    Task,
    Login,
    Register,
    Profile,
    Admin,
}

impl ViewId {
    pub const COUNT: usize = 8;

    pub const ALL: [ViewId; Self::COUNT] = [
        ViewId::Main,
        ViewId::Topic,
        ViewId::Tasks,
        ViewId::Task,
        ViewId::Login,
        ViewId::Register,
        ViewId::Profile,
        ViewId::Admin,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        match self {
            ViewId::Main => "main",
            ViewId::Topic => "topic",
            ViewId::Tasks => "tasks",
            ViewId::Task => "task",
            ViewId::Login => "login",
            ViewId::Register => "register",
            ViewId::Profile => "profile",
            ViewId::Admin => "admin",
        }
    }

    /// 对应的 DOM 容器 id
    pub fn container_id(self) -> String {
        format!("view-{}", self.name())
    }
}

/// 导航栏状态：访客 / 已登录 / 管理员
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NavState {
    #[default]
    Guest,
    User,
    Admin,
}

impl NavState {
    pub fn for_user(user: Option<&UserProfile>) -> Self {
        match user {
            None => NavState::Guest,
            Some(u) if u.is_admin() => NavState::Admin,
            Some(_) => NavState::User,
        }
    }
}

/// 非阻塞提示（替代 alert）
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Success(String),
    Error(String),
}

impl Notice {
    pub fn text(&self) -> &str {
        match self {
            Notice::Success(s) | Notice::Error(s) => s,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Notice::Error(_))
    }
}

/// DOM 外壳
pub trait Shell {
    /// 显示/隐藏加载指示
    fn set_loading(&self, visible: bool);
    /// 隐藏全部视图容器
    fn hide_all(&self);
    /// 把页面注入到视图容器并显示它
    fn mount(&self, view: ViewId, page: Page);
    fn set_nav(&self, nav: NavState);
    fn notify(&self, notice: Notice);
    /// 在新窗口中以预格式文本展示代码
    fn open_code_window(&self, code: &str);
}

/// 一次渲染对单个视图容器的挂载权
///
/// 渲染器只能显示自己的容器，并且只在票据仍然有效时生效。
pub struct Mount {
    view: ViewId,
    ticket: RenderTicket,
    shell: Rc<dyn Shell>,
}

impl Mount {
    pub fn new(view: ViewId, ticket: RenderTicket, shell: Rc<dyn Shell>) -> Self {
        Self {
            view,
            ticket,
            shell,
        }
    }

    /// await 之后调用：已有更新的渲染则中止
    pub fn checkpoint(&self) -> AppResult<()> {
        if self.ticket.is_current() {
            Ok(())
        } else {
            Err(AppError::Superseded)
        }
    }

    /// 挂载页面；票据失效时静默丢弃并返回 false
    pub fn show(&self, page: Page) -> bool {
        if !self.ticket.is_current() {
            return false;
        }
        self.shell.mount(self.view, page);
        true
    }
}
