//! 路由定义模块 - 领域模型
//!
//! 这是纯粹的业务逻辑层，不依赖于 DOM 或 web_sys。
//! 位置字符串（URL fragment）先拆成 `RouteLocation`，再按路由表匹配成 `AppRoute`。

use std::collections::BTreeMap;
use std::fmt::Display;

use crate::shell::ViewId;

/// 解析后的位置：首段路径、最多两个 id、查询参数
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RouteLocation {
    pub path: String,
    pub id: Option<String>,
    pub id2: Option<String>,
    pub query: BTreeMap<String, String>,
}

fn decode_component(raw: &str) -> String {
    let spaced = raw.replace('+', " ");
    urlencoding::decode(&spaced)
        .map(|s| s.into_owned())
        .unwrap_or(spaced)
}

impl RouteLocation {
    /// 解析 `#/topic/5`、`/?q=term`、`profile/ivan` 等形式
    pub fn parse(location: &str) -> Self {
        let trimmed = location.trim_start_matches('#');
        let (path_part, query_part) = match trimmed.split_once('?') {
            Some((p, q)) => (p, Some(q)),
            None => (trimmed, None),
        };

        let mut segments = path_part
            .split('/')
            .filter(|s| !s.is_empty())
            .map(decode_component);

        let query = query_part
            .map(|q| {
                q.split('&')
                    .filter(|pair| !pair.is_empty())
                    .map(|pair| match pair.split_once('=') {
                        Some((k, v)) => (decode_component(k), decode_component(v)),
                        None => (decode_component(pair), String::new()),
                    })
                    .collect()
            })
            .unwrap_or_default();

        Self {
            path: segments.next().unwrap_or_default(),
            id: segments.next(),
            id2: segments.next(),
            query,
        }
    }

    pub fn query_param(&self, key: &str) -> Option<&str> {
        self.query.get(key).map(String::as_str)
    }
}

/// 应用路由枚举
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppRoute {
    /// 主题列表，可带搜索词
    Main { query: Option<String> },
    Topic { id: String },
    Tasks { topic_id: String },
    Task { id: String },
    Login,
    Register,
    /// 未指定用户名时展示当前用户
    Profile { username: Option<String> },
    Admin,
}

impl Default for AppRoute {
    fn default() -> Self {
        AppRoute::Main { query: None }
    }
}

/// 路由模式：首段路径 + 是否需要 id
struct RoutePattern {
    path: &'static str,
    needs_id: bool,
    build: fn(&RouteLocation) -> AppRoute,
}

fn required_id(loc: &RouteLocation) -> String {
    loc.id.clone().unwrap_or_default()
}

const ROUTES: &[RoutePattern] = &[
    RoutePattern {
        path: "topic",
        needs_id: true,
        build: |loc| AppRoute::Topic { id: required_id(loc) },
    },
    RoutePattern {
        path: "tasks",
        needs_id: true,
        build: |loc| AppRoute::Tasks {
            topic_id: required_id(loc),
        },
    },
    RoutePattern {
        path: "task",
        needs_id: true,
        build: |loc| AppRoute::Task { id: required_id(loc) },
    },
    RoutePattern {
        path: "login",
        needs_id: false,
        build: |_| AppRoute::Login,
    },
    RoutePattern {
        path: "register",
        needs_id: false,
        build: |_| AppRoute::Register,
    },
    RoutePattern {
        path: "profile",
        needs_id: false,
        build: |loc| AppRoute::Profile {
            username: loc.id.clone(),
        },
    },
    RoutePattern {
        path: "admin",
        needs_id: false,
        build: |_| AppRoute::Admin,
    },
];

impl AppRoute {
    /// 按路由表匹配；未知或缺少 id 的路径回退到主页
    pub fn resolve(loc: &RouteLocation) -> Self {
        ROUTES
            .iter()
            .find(|p| p.path == loc.path && (!p.needs_id || loc.id.is_some()))
            .map(|p| (p.build)(loc))
            .unwrap_or_else(|| AppRoute::Main {
                query: loc
                    .query_param("q")
                    .map(str::trim)
                    .filter(|q| !q.is_empty())
                    .map(str::to_string),
            })
    }

    pub fn from_location(location: &str) -> Self {
        Self::resolve(&RouteLocation::parse(location))
    }

    /// 路由对应的视图容器
    pub fn view(&self) -> ViewId {
        match self {
            AppRoute::Main { .. } => ViewId::Main,
            AppRoute::Topic { .. } => ViewId::Topic,
            AppRoute::Tasks { .. } => ViewId::Tasks,
            AppRoute::Task { .. } => ViewId::Task,
            AppRoute::Login => ViewId::Login,
            AppRoute::Register => ViewId::Register,
            AppRoute::Profile { .. } => ViewId::Profile,
            AppRoute::Admin => ViewId::Admin,
        }
    }

    /// 生成可导航的 fragment（不含 `#`）
    pub fn to_path(&self) -> String {
        let enc = |s: &str| urlencoding::encode(s).into_owned();
        match self {
            AppRoute::Main { query: None } => "/".to_string(),
            AppRoute::Main { query: Some(q) } => format!("/?q={}", enc(q)),
            AppRoute::Topic { id } => format!("/topic/{}", enc(id)),
            AppRoute::Tasks { topic_id } => format!("/tasks/{}", enc(topic_id)),
            AppRoute::Task { id } => format!("/task/{}", enc(id)),
            AppRoute::Login => "/login".to_string(),
            AppRoute::Register => "/register".to_string(),
            AppRoute::Profile { username: None } => "/profile".to_string(),
            AppRoute::Profile { username: Some(u) } => format!("/profile/{}", enc(u)),
            AppRoute::Admin => "/admin".to_string(),
        }
    }

    /// `href` 属性用的完整 fragment
    pub fn href(&self) -> String {
        format!("#{}", self.to_path())
    }
}

impl Display for AppRoute {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_path())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_location_parts() {
        let loc = RouteLocation::parse("#/task/42/extra?q=a+b&x=%D1%8F");
        assert_eq!(loc.path, "task");
        assert_eq!(loc.id.as_deref(), Some("42"));
        assert_eq!(loc.id2.as_deref(), Some("extra"));
        assert_eq!(loc.query_param("q"), Some("a b"));
        assert_eq!(loc.query_param("x"), Some("я"));
    }

    #[test]
    fn test_empty_location_is_main() {
        assert_eq!(AppRoute::from_location(""), AppRoute::Main { query: None });
        assert_eq!(AppRoute::from_location("#/"), AppRoute::Main { query: None });
        assert_eq!(
            AppRoute::from_location("#/?q=sort"),
            AppRoute::Main {
                query: Some("sort".to_string())
            }
        );
    }

    #[test]
    fn test_routes_with_ids() {
        assert_eq!(
            AppRoute::from_location("#/topic/5"),
            AppRoute::Topic { id: "5".into() }
        );
        assert_eq!(
            AppRoute::from_location("#/tasks/5"),
            AppRoute::Tasks {
                topic_id: "5".into()
            }
        );
        assert_eq!(
            AppRoute::from_location("#/task/42"),
            AppRoute::Task { id: "42".into() }
        );
        assert_eq!(
            AppRoute::from_location("#/profile"),
            AppRoute::Profile { username: None }
        );
        assert_eq!(
            AppRoute::from_location("#/profile/ivan"),
            AppRoute::Profile {
                username: Some("ivan".into())
            }
        );
    }

    #[test]
    fn test_missing_id_or_unknown_falls_back_to_main() {
        assert_eq!(AppRoute::from_location("#/topic"), AppRoute::default());
        assert_eq!(AppRoute::from_location("#/nowhere/1"), AppRoute::default());
    }

    #[test]
    fn test_to_path_round_trips_through_parser() {
        let routes = [
            AppRoute::Main {
                query: Some("сортировка пузырьком".into()),
            },
            AppRoute::Profile {
                username: Some("ivan petrov".into()),
            },
            AppRoute::Admin,
        ];
        for route in routes {
            assert_eq!(AppRoute::from_location(&route.href()), route);
        }
    }

    #[test]
    fn test_every_route_maps_to_its_view() {
        assert_eq!(AppRoute::Login.view(), ViewId::Login);
        assert_eq!(AppRoute::Task { id: "1".into() }.view(), ViewId::Task);
        assert_eq!(AppRoute::default().view(), ViewId::Main);
    }
}
