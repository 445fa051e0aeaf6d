use chelper_shared::UserProfile;
use leptos::html::Input;
use leptos::prelude::*;
use leptos::task::spawn_local;
use tracing::warn;

use crate::components::app::use_app;
use crate::components::attempts::AttemptHistoryTable;
use crate::pages::profile::{
    self, ATTEMPTS_FAILED, AttemptsSection, NOT_FOUND, NO_TARGET, ProfilePage,
};
use crate::shell::Notice;
use crate::web::file;

#[component]
pub fn ProfileView(page: ProfilePage) -> impl IntoView {
    match page {
        ProfilePage::NoTarget => view! { <p class="empty-state">{NO_TARGET}</p> }.into_any(),
        ProfilePage::NotFound => view! { <p class="error-msg">{NOT_FOUND}</p> }.into_any(),
        ProfilePage::Found {
            user,
            is_me,
            attempts,
        } => {
            let attempts = match attempts {
                AttemptsSection::Hidden => None,
                AttemptsSection::Failed => {
                    Some(view! { <p class="error-msg">{ATTEMPTS_FAILED}</p> }.into_any())
                }
                AttemptsSection::Loaded(list) => {
                    Some(view! { <AttemptHistoryTable attempts=list /> }.into_any())
                }
            };
            view! {
                <ProfileHeader user=user is_me=is_me />
                {attempts}
            }
            .into_any()
        }
    }
}

#[component]
fn ProfileHeader(user: UserProfile, is_me: bool) -> impl IntoView {
    let avatar = match user.avatar_path.filter(|p| !p.is_empty()) {
        Some(src) => view! { <img src=src alt="" class="avatar" /> }.into_any(),
        None => view! { <div class="avatar avatar-placeholder"></div> }.into_any(),
    };

    view! {
        <h1 class="page-title">"Профиль"</h1>
        <div class="profile-header">
            {avatar}
            <div>
                <strong>{user.username}</strong>
                <p class="meta">{user.email.clone()}</p>
                {is_me.then(|| view! {
                    <AvatarPicker />
                    <AccountEditor email=user.email />
                })}
            </div>
        </div>
    }
}

/// 头像上传
#[component]
fn AvatarPicker() -> impl IntoView {
    let app = use_app();
    let file_ref = NodeRef::<Input>::new();

    let on_change = move |_| {
        let Some(input) = file_ref.get() else {
            return;
        };
        let Some(picked) = file::selected_file(&input) else {
            return;
        };
        let orchestrator = app.orchestrator();
        spawn_local(async move {
            let outcome = match file::read_part(&picked).await {
                Ok(part) => profile::upload_avatar(&orchestrator, part).await,
                Err(err) => Err(err),
            };
            if let Err(err) = outcome {
                warn!(%err, "avatar upload failed");
                orchestrator
                    .context()
                    .shell
                    .notify(Notice::Error(err.to_string()));
            }
        });
    };

    view! {
        <label class="btn btn-secondary file-picker">
            "Изменить аватар"
            <input
                type="file"
                accept="image/*"
                id="avatar-input"
                class="hidden"
                node_ref=file_ref
                on:change=on_change
            />
        </label>
    }
}

/// 修改邮箱/密码，空字段表示不修改
#[component]
fn AccountEditor(email: String) -> impl IntoView {
    let app = use_app();
    let open = RwSignal::new(false);
    let new_email = RwSignal::new(email);
    let new_password = RwSignal::new(String::new());
    let busy = RwSignal::new(false);
    let error_msg = RwSignal::new(Option::<String>::None);

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        let orchestrator = app.orchestrator();
        let (email, password) = (new_email.get_untracked(), new_password.get_untracked());
        busy.set(true);
        error_msg.set(None);
        spawn_local(async move {
            if let Err(err) = profile::update_profile(&orchestrator, &email, &password).await {
                error_msg.try_set(Some(err.to_string()));
            }
            busy.try_set(false);
        });
    };

    view! {
        <button type="button" class="btn btn-secondary" id="edit-profile-btn" on:click=move |_| open.update(|o| *o = !*o)>
            "Изменить почту / пароль"
        </button>
        <Show when=move || open.get()>
            <form class="inline-form" id="profile-form" on:submit=on_submit>
                <div class="form-group">
                    <label for="profile-email">"Новый email"</label>
                    <input
                        id="profile-email"
                        type="email"
                        prop:value=move || new_email.get()
                        on:input=move |ev| new_email.set(event_target_value(&ev))
                    />
                </div>
                <div class="form-group">
                    <label for="profile-password">"Новый пароль (оставьте пустым, чтобы не менять)"</label>
                    <input
                        id="profile-password"
                        type="password"
                        autocomplete="new-password"
                        prop:value=move || new_password.get()
                        on:input=move |ev| new_password.set(event_target_value(&ev))
                    />
                </div>
                <div class="error-msg" class:hidden=move || error_msg.get().is_none()>
                    {move || error_msg.get().unwrap_or_default()}
                </div>
                <div class="form-actions">
                    <button type="submit" class="btn btn-primary" disabled=move || busy.get()>
                        "Сохранить"
                    </button>
                </div>
            </form>
        </Show>
    }
}
