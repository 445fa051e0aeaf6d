//! CHelper 前端应用
//!
//! 基于 hash 路由的单页应用，分层如下：
//! - `session` / `api`: 会话状态与 REST 网关
//! - `web::router`: 渲染编排（过期渲染丢弃、视图互斥）
//! - `pages`: 各视图的数据加载，产出 `Page`
//! - `components`: 把 `Page` 画成 DOM

mod api;
mod config;
mod context;
mod error;
mod pages;
mod session;
mod shell;
#[cfg(test)]
mod testing;

mod components {
    mod admin;
    pub mod app;
    mod attempts;
    mod home;
    mod login;
    mod profile;
    mod task;
    mod tasks;
    mod topic;
}

// 原生 Web API 封装模块
// 对 fetch、localStorage、File、定时器的轻量封装，不引入 gloo-* 系列 crate。
pub(crate) mod web {
    pub mod file;
    mod http;
    pub mod route;
    pub mod router;
    mod shell;
    mod storage;
    mod timer;

    pub use http::{FetchHttpClient, FilePart, HttpBody, HttpClient, HttpRequest, HttpResponse};
    pub use shell::{LeptosShell, ShellSignals};
    pub use storage::{BrowserStorage, MemoryStorage, TokenStorage};
}

pub use components::app::App;
