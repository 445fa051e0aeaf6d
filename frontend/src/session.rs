//! 会话存储
//!
//! 持有登录令牌（持久化）和当前用户（仅内存，启动时重新拉取）。
//! 不变式：有用户必有令牌；清除令牌会同时清除用户。
//!
//! 两类订阅：
//! - `on_change`: 会话任意变化后触发，用于重算导航栏
//! - `on_logout`: 令牌因 401 过期被清除时触发，无负载，订阅者自行重读会话

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use chelper_shared::UserProfile;
use tracing::{debug, info, warn};

use crate::api::ApiGateway;
use crate::web::TokenStorage;

// =========================================================
// 订阅机制
// =========================================================

type Listener = Rc<dyn Fn()>;

#[derive(Default)]
struct ListenerList {
    next_id: Cell<u64>,
    entries: RefCell<Vec<(u64, Listener)>>,
}

impl ListenerList {
    fn add(self: &Rc<Self>, listener: Listener) -> Subscription {
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        self.entries.borrow_mut().push((id, listener));
        Subscription {
            list: Rc::downgrade(self),
            id,
        }
    }

    fn emit(&self) {
        // 先复制再调用，监听器内部可以再订阅或取消订阅
        let snapshot: Vec<Listener> = self
            .entries
            .borrow()
            .iter()
            .map(|(_, l)| l.clone())
            .collect();
        for listener in snapshot {
            listener();
        }
    }
}

/// 订阅句柄，drop 时自动取消订阅
#[must_use = "dropping a Subscription unsubscribes immediately"]
pub struct Subscription {
    list: Weak<ListenerList>,
    id: u64,
}

impl Subscription {
    /// 保持订阅直到程序结束
    pub fn keep(self) {
        std::mem::forget(self);
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(list) = self.list.upgrade() {
            list.entries.borrow_mut().retain(|(id, _)| *id != self.id);
        }
    }
}

// =========================================================
// SessionStore
// =========================================================

struct SessionInner {
    storage: Rc<dyn TokenStorage>,
    token_key: String,
    user: RefCell<Option<UserProfile>>,
    changed: Rc<ListenerList>,
    logout: Rc<ListenerList>,
}

/// 会话存储，克隆开销很小（内部 `Rc`）
#[derive(Clone)]
pub struct SessionStore {
    inner: Rc<SessionInner>,
}

impl SessionStore {
    pub fn new(storage: Rc<dyn TokenStorage>, token_key: impl Into<String>) -> Self {
        Self {
            inner: Rc::new(SessionInner {
                storage,
                token_key: token_key.into(),
                user: RefCell::new(None),
                changed: Rc::new(ListenerList::default()),
                logout: Rc::new(ListenerList::default()),
            }),
        }
    }

    pub fn token(&self) -> Option<String> {
        self.inner
            .storage
            .get(&self.inner.token_key)
            .filter(|t| !t.is_empty())
    }

    /// 设置或清除令牌；清除时一并清除当前用户
    pub fn set_token(&self, token: Option<&str>) {
        match token.filter(|t| !t.is_empty()) {
            Some(token) => {
                if !self.inner.storage.set(&self.inner.token_key, token) {
                    warn!("failed to persist session token");
                }
            }
            None => {
                self.inner.storage.delete(&self.inner.token_key);
                self.inner.user.replace(None);
            }
        }
        self.inner.changed.emit();
    }

    pub fn current_user(&self) -> Option<UserProfile> {
        self.inner.user.borrow().clone()
    }

    /// 设置当前用户；没有令牌时拒绝写入，保持不变式
    pub fn set_user(&self, user: Option<UserProfile>) {
        let user = if self.token().is_some() { user } else { None };
        self.inner.user.replace(user);
        self.inner.changed.emit();
    }

    pub fn is_authenticated(&self) -> bool {
        self.inner.user.borrow().is_some()
    }

    pub fn is_admin(&self) -> bool {
        self.inner
            .user
            .borrow()
            .as_ref()
            .is_some_and(UserProfile::is_admin)
    }

    /// 当前用户是否就是 `username`
    pub fn is_user(&self, username: &str) -> bool {
        self.inner
            .user
            .borrow()
            .as_ref()
            .is_some_and(|u| u.username == username)
    }

    /// 主动退出：清除令牌和用户
    pub fn clear(&self) {
        self.set_token(None);
    }

    /// 会话过期（收到 401）
    ///
    /// 返回是否真的清除了令牌；只有清除了令牌才广播 logout 信号，
    /// 匿名请求收到的 401 不会反复触发重渲染。
    pub fn expire(&self) -> bool {
        let had_token = self.token().is_some();
        if !had_token {
            return false;
        }
        info!("session expired, clearing credentials");
        self.set_token(None);
        self.inner.logout.emit();
        true
    }

    /// 根据令牌拉取当前用户
    ///
    /// 没有令牌时直接清空用户；拉取失败（包括 401）时清除整个会话。
    pub async fn load_user(&self, api: &ApiGateway) {
        if self.token().is_none() {
            self.set_user(None);
            return;
        }
        match api.my_profile().await {
            Ok(user) => {
                debug!(username = %user.username, "current user loaded");
                self.set_user(Some(user));
            }
            Err(err) => {
                warn!(%err, "failed to load current user, discarding token");
                self.clear();
            }
        }
    }

    pub fn on_change(&self, listener: impl Fn() + 'static) -> Subscription {
        self.inner.changed.add(Rc::new(listener))
    }

    pub fn on_logout(&self, listener: impl Fn() + 'static) -> Subscription {
        self.inner.logout.add(Rc::new(listener))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::web::MemoryStorage;

    fn store() -> SessionStore {
        SessionStore::new(Rc::new(MemoryStorage::new()), "token")
    }

    fn user(name: &str) -> UserProfile {
        UserProfile {
            username: name.to_string(),
            email: format!("{name}@example.com"),
            avatar_path: None,
            roles: vec!["USER".to_string()],
        }
    }

    #[test]
    fn test_user_requires_token() {
        let session = store();
        session.set_user(Some(user("ivan")));
        assert!(session.current_user().is_none());

        session.set_token(Some("jwt"));
        session.set_user(Some(user("ivan")));
        assert!(session.is_user("ivan"));
    }

    #[test]
    fn test_clearing_token_clears_user() {
        let session = store();
        session.set_token(Some("jwt"));
        session.set_user(Some(user("ivan")));

        session.set_token(None);
        assert!(session.token().is_none());
        assert!(session.current_user().is_none());
    }

    #[test]
    fn test_expire_signals_only_when_token_present() {
        let session = store();
        let fired = Rc::new(Cell::new(0));
        let counter = fired.clone();
        let _sub = session.on_logout(move || counter.set(counter.get() + 1));

        assert!(!session.expire());
        assert_eq!(fired.get(), 0);

        session.set_token(Some("jwt"));
        assert!(session.expire());
        assert_eq!(fired.get(), 1);
        assert!(session.token().is_none());
    }

    #[test]
    fn test_subscription_drop_unsubscribes() {
        let session = store();
        let fired = Rc::new(Cell::new(0));
        let counter = fired.clone();
        let sub = session.on_change(move || counter.set(counter.get() + 1));

        session.set_token(Some("a"));
        assert_eq!(fired.get(), 1);

        drop(sub);
        session.set_token(Some("b"));
        assert_eq!(fired.get(), 1);
    }

    #[test]
    fn test_listener_sees_updated_state() {
        let session = store();
        let observed = Rc::new(RefCell::new(Vec::new()));
        let log = observed.clone();
        let reader = session.clone();
        let _sub = session.on_change(move || log.borrow_mut().push(reader.is_authenticated()));

        session.set_token(Some("jwt"));
        session.set_user(Some(user("ivan")));
        session.clear();

        assert_eq!(*observed.borrow(), vec![false, true, false]);
    }
}
