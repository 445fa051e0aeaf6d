//! 登录 / 注册 / 退出
//!
//! 成功后保存令牌、重新拉取当前用户并跳转到主页。
//! 失败时错误交给表单就地显示，不发生导航。

use chelper_shared::Registration;
use tracing::info;

use super::Page;
use crate::context::AppContext;
use crate::error::AppResult;
use crate::shell::Mount;
use crate::web::route::AppRoute;

pub const LOGIN_FAILED: &str = "Ошибка входа";
pub const REGISTER_FAILED: &str = "Ошибка регистрации";

pub fn render_login(mount: &Mount) -> AppResult<()> {
    mount.show(Page::Login);
    Ok(())
}

pub fn render_register(mount: &Mount) -> AppResult<()> {
    mount.show(Page::Register);
    Ok(())
}

async fn complete_sign_in(ctx: &AppContext, token: &str) {
    ctx.session.set_token(Some(token));
    ctx.load_user().await;
    ctx.navigator.navigate(&AppRoute::default());
}

pub async fn login(ctx: &AppContext, username: &str, password: &str) -> AppResult<()> {
    let resp = ctx.api.login(username, password).await?;
    info!(%username, "logged in");
    complete_sign_in(ctx, &resp.token).await;
    Ok(())
}

pub async fn register(ctx: &AppContext, registration: Registration) -> AppResult<()> {
    let username = registration.username.clone();
    let resp = ctx.api.register(registration).await?;
    info!(%username, "registered");
    complete_sign_in(ctx, &resp.token).await;
    Ok(())
}

/// 主动退出：清除令牌和用户，回到主页
pub fn logout(ctx: &AppContext) {
    info!("logged out");
    ctx.session.clear();
    ctx.navigator.navigate(&AppRoute::default());
}
