use chelper_shared::Registration;
use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::components::app::use_app;
use crate::pages::failure_text;
use crate::pages::login::{self, LOGIN_FAILED, REGISTER_FAILED};
use crate::web::route::AppRoute;

/// 表单错误提示，空时隐藏
#[component]
fn FormError(id: &'static str, message: RwSignal<Option<String>>) -> impl IntoView {
    view! {
        <div id=id class="error-msg" class:hidden=move || message.get().is_none()>
            {move || message.get().unwrap_or_default()}
        </div>
    }
}

#[component]
pub fn LoginView() -> impl IntoView {
    let app = use_app();
    let username = RwSignal::new(String::new());
    let password = RwSignal::new(String::new());
    let is_submitting = RwSignal::new(false);
    let error_msg = RwSignal::new(Option::<String>::None);

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        let ctx = app.ctx();
        let (name, secret) = (username.get_untracked(), password.get_untracked());
        is_submitting.set(true);
        spawn_local(async move {
            match login::login(&ctx, &name, &secret).await {
                Ok(()) => {
                    error_msg.try_set(None);
                }
                Err(err) => {
                    error_msg.try_set(Some(failure_text(&err, LOGIN_FAILED)));
                }
            }
            is_submitting.try_set(false);
        });
    };

    view! {
        <div class="auth-card">
            <h1>"Вход"</h1>
            <form id="login-form" on:submit=on_submit>
                <div class="form-group">
                    <label for="login-username">"Имя пользователя"</label>
                    <input
                        id="login-username"
                        type="text"
                        name="username"
                        required
                        autocomplete="username"
                        prop:value=move || username.get()
                        on:input=move |ev| username.set(event_target_value(&ev))
                    />
                </div>
                <div class="form-group">
                    <label for="login-password">"Пароль"</label>
                    <input
                        id="login-password"
                        type="password"
                        name="password"
                        required
                        autocomplete="current-password"
                        prop:value=move || password.get()
                        on:input=move |ev| password.set(event_target_value(&ev))
                    />
                </div>
                <FormError id="login-error" message=error_msg />
                <div class="form-actions">
                    <button type="submit" class="btn btn-primary" disabled=move || is_submitting.get()>
                        "Войти"
                    </button>
                    <a href=AppRoute::Register.href() class="btn btn-secondary">"Регистрация"</a>
                </div>
            </form>
        </div>
    }
}

#[component]
pub fn RegisterView() -> impl IntoView {
    let app = use_app();
    let username = RwSignal::new(String::new());
    let email = RwSignal::new(String::new());
    let password = RwSignal::new(String::new());
    let is_submitting = RwSignal::new(false);
    let error_msg = RwSignal::new(Option::<String>::None);

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        let ctx = app.ctx();
        let registration = Registration {
            username: username.get_untracked(),
            email: email.get_untracked(),
            password: password.get_untracked(),
        };
        is_submitting.set(true);
        spawn_local(async move {
            match login::register(&ctx, registration).await {
                Ok(()) => {
                    error_msg.try_set(None);
                }
                Err(err) => {
                    error_msg.try_set(Some(failure_text(&err, REGISTER_FAILED)));
                }
            }
            is_submitting.try_set(false);
        });
    };

    view! {
        <div class="auth-card">
            <h1>"Регистрация"</h1>
            <form id="register-form" on:submit=on_submit>
                <div class="form-group">
                    <label for="register-username">"Имя пользователя"</label>
                    <input
                        id="register-username"
                        type="text"
                        name="username"
                        required
                        minlength="2"
                        autocomplete="username"
                        prop:value=move || username.get()
                        on:input=move |ev| username.set(event_target_value(&ev))
                    />
                </div>
                <div class="form-group">
                    <label for="register-email">"Email"</label>
                    <input
                        id="register-email"
                        type="email"
                        name="email"
                        required
                        autocomplete="email"
                        prop:value=move || email.get()
                        on:input=move |ev| email.set(event_target_value(&ev))
                    />
                </div>
                <div class="form-group">
                    <label for="register-password">"Пароль"</label>
                    <input
                        id="register-password"
                        type="password"
                        name="password"
                        required
                        minlength="6"
                        autocomplete="new-password"
                        prop:value=move || password.get()
                        on:input=move |ev| password.set(event_target_value(&ev))
                    />
                </div>
                <FormError id="register-error" message=error_msg />
                <div class="form-actions">
                    <button type="submit" class="btn btn-primary" disabled=move || is_submitting.get()>
                        "Зарегистрироваться"
                    </button>
                    <a href=AppRoute::Login.href() class="btn btn-secondary">"Вход"</a>
                </div>
            </form>
        </div>
    }
}
