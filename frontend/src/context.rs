//! 应用上下文
//!
//! 启动时构造一次，显式传入每个渲染器和交互处理函数，
//! 替代全局可变的会话状态。

use std::cell::RefCell;
use std::rc::Rc;

use crate::api::ApiGateway;
use crate::config::AppConfig;
use crate::pages::ResultBox;
use crate::session::SessionStore;
use crate::shell::{NavState, Shell};
use crate::web::HttpClient;
use crate::web::TokenStorage;
use crate::web::route::AppRoute;

/// 位置导航
pub trait Navigator {
    /// 当前位置（URL fragment，含 `#`）
    fn current(&self) -> String;
    /// 跳转；生产实现修改 `location.hash`，由 hashchange 触发渲染
    fn navigate(&self, route: &AppRoute);
}

/// 一次性提示：由交互处理函数写入，下一次同一对象的渲染取走
///
/// 提交判题后整页重渲染，判题结果借此带到新的页面模型里。
#[derive(Clone, Default)]
pub struct Flash {
    slot: Rc<RefCell<Option<(String, ResultBox)>>>,
}

impl Flash {
    pub fn put(&self, key: impl Into<String>, result: ResultBox) {
        self.slot.replace(Some((key.into(), result)));
    }

    /// 取走提示；键不匹配时同样清空，避免串到其它页面
    pub fn take(&self, key: &str) -> Option<ResultBox> {
        self.slot
            .take()
            .and_then(|(k, result)| (k == key).then_some(result))
    }

    /// 渲染前调用：只保留属于即将渲染对象的提示
    pub fn retain(&self, key: Option<&str>) {
        let mut slot = self.slot.borrow_mut();
        if slot.as_ref().is_some_and(|(k, _)| Some(k.as_str()) != key) {
            *slot = None;
        }
    }
}

#[derive(Clone)]
pub struct AppContext {
    pub session: SessionStore,
    pub api: ApiGateway,
    pub shell: Rc<dyn Shell>,
    pub navigator: Rc<dyn Navigator>,
    pub flash: Flash,
}

impl AppContext {
    pub fn new(
        config: AppConfig,
        storage: Rc<dyn TokenStorage>,
        client: Rc<dyn HttpClient>,
        shell: Rc<dyn Shell>,
        navigator: Rc<dyn Navigator>,
    ) -> Self {
        let config = Rc::new(config);
        let session = SessionStore::new(storage, config.token_key.clone());
        let api = ApiGateway::new(config.clone(), client, session.clone());

        // 会话任意变化后重算导航栏
        let nav_shell = shell.clone();
        let nav_session = session.clone();
        session
            .on_change(move || {
                nav_shell.set_nav(NavState::for_user(nav_session.current_user().as_ref()))
            })
            .keep();

        Self {
            session,
            api,
            shell,
            navigator,
            flash: Flash::default(),
        }
    }

    /// 根据令牌恢复当前用户（页面加载、登录、上传头像后）
    pub async fn load_user(&self) {
        self.session.load_user(&self.api).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flash_is_taken_once() {
        let flash = Flash::default();
        flash.put("42", ResultBox::error("boom"));
        assert_eq!(flash.take("42"), Some(ResultBox::error("boom")));
        assert_eq!(flash.take("42"), None);
    }

    #[test]
    fn test_flash_for_other_key_is_dropped() {
        let flash = Flash::default();
        flash.put("42", ResultBox::error("boom"));
        assert_eq!(flash.take("7"), None);
        assert_eq!(flash.take("42"), None);
    }

    #[test]
    fn test_flash_retain_keeps_only_matching_key() {
        let flash = Flash::default();
        flash.put("42", ResultBox::error("boom"));
        flash.retain(Some("42"));
        assert_eq!(flash.take("42"), Some(ResultBox::error("boom")));

        flash.put("42", ResultBox::error("boom"));
        flash.retain(None);
        assert_eq!(flash.take("42"), None);
    }
}
