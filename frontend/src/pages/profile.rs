//! 个人资料页
//!
//! 目标用户名取自路由，缺省时为当前用户。本人或管理员可以看到提交历史，
//! 历史始终是查看者自己的提交（`/attempts/my`），而不是目标用户的。
//! 本人还可以上传头像、修改邮箱和密码。

use chelper_shared::{Attempt, ProfileChanges, UserProfile};
use tracing::{debug, info, warn};

use super::Page;
use crate::context::AppContext;
use crate::error::{AppError, AppResult};
use crate::shell::{Mount, Notice};
use crate::web::FilePart;
use crate::web::router::RenderOrchestrator;

pub const NO_TARGET: &str = "Укажите пользователя или войдите.";
pub const NOT_FOUND: &str = "Пользователь не найден";
pub const ATTEMPTS_FAILED: &str = "Не удалось загрузить попытки";
pub const NO_ATTEMPTS: &str = "Попыток пока нет";
pub const NOTHING_TO_CHANGE: &str = "Нечего изменять";
pub const PROFILE_UPDATED: &str = "Профиль обновлён";

#[derive(Debug, Clone)]
pub enum AttemptsSection {
    /// 查看者既不是本人也不是管理员
    Hidden,
    Failed,
    Loaded(Vec<Attempt>),
}

#[derive(Debug, Clone)]
pub enum ProfilePage {
    NoTarget,
    NotFound,
    Found {
        user: UserProfile,
        is_me: bool,
        attempts: AttemptsSection,
    },
}

pub async fn render(ctx: &AppContext, username: Option<&str>, mount: &Mount) -> AppResult<()> {
    let current = ctx.session.current_user();
    let target = username
        .map(str::to_string)
        .or_else(|| current.as_ref().map(|u| u.username.clone()));
    let Some(target) = target else {
        mount.show(Page::Profile(ProfilePage::NoTarget));
        return Ok(());
    };

    let user = match ctx.api.profile(&target).await {
        Ok(user) => user,
        Err(err) => {
            mount.checkpoint()?;
            if err.is_not_found() {
                debug!(username = %target, "profile not found");
            } else {
                warn!(%err, username = %target, "profile lookup failed");
            }
            mount.show(Page::Profile(ProfilePage::NotFound));
            return Ok(());
        }
    };
    mount.checkpoint()?;

    let can_see_attempts = ctx.session.is_user(&target) || ctx.session.is_admin();
    let attempts = if can_see_attempts {
        let section = match ctx.api.my_attempts().await {
            Ok(list) => AttemptsSection::Loaded(list),
            Err(err) => {
                debug!(%err, "attempt history unavailable");
                AttemptsSection::Failed
            }
        };
        mount.checkpoint()?;
        section
    } else {
        AttemptsSection::Hidden
    };

    mount.show(Page::Profile(ProfilePage::Found {
        is_me: ctx.session.is_user(&target),
        user,
        attempts,
    }));
    Ok(())
}

/// 修改邮箱/密码，空输入表示不修改
pub async fn update_profile(
    orchestrator: &RenderOrchestrator,
    email: &str,
    new_password: &str,
) -> AppResult<UserProfile> {
    let changes = ProfileChanges::from_inputs(email, new_password);
    if changes.is_empty() {
        return Err(AppError::validation(NOTHING_TO_CHANGE));
    }

    let ctx = orchestrator.context();
    let user = ctx.api.update_profile(changes).await?;
    info!(username = %user.username, "profile updated");
    ctx.load_user().await;
    ctx.shell.notify(Notice::Success(PROFILE_UPDATED.to_string()));
    orchestrator.rerender().await;
    Ok(user)
}

/// 上传头像，之后重新拉取当前用户并重渲染
pub async fn upload_avatar(orchestrator: &RenderOrchestrator, file: FilePart) -> AppResult<()> {
    let ctx = orchestrator.context();
    let resp = ctx.api.upload_avatar(file).await?;
    info!(avatar = ?resp.avatar_path, "avatar uploaded");
    ctx.load_user().await;
    orchestrator.rerender().await;
    Ok(())
}

#[cfg(test)]
mod tests;
