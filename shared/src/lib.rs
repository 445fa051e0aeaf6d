use serde::{Deserialize, Serialize};

pub mod date;
pub mod protocol;

pub use date::CreatedAt;

// =========================================================
// 常量定义 (Constants)
// =========================================================

pub const ROLE_ADMIN: &str = "ADMIN";
pub const HEADER_AUTHORIZATION: &str = "Authorization";

// =========================================================
// 领域模型 (Domain Models)
// =========================================================

/// 用户资料
///
/// `roles` 由服务端给出，前端只用它决定展示哪些控件。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub avatar_path: Option<String>,
    #[serde(default)]
    pub roles: Vec<String>,
}

impl UserProfile {
    pub fn has_role(&self, role: &str) -> bool {
        self.roles.iter().any(|r| r == role)
    }

    pub fn is_admin(&self) -> bool {
        self.has_role(ROLE_ADMIN)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Topic {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    /// 富文本内容，服务端负责清洗
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub image_path: Option<String>,
    #[serde(default)]
    pub sort_order: Option<i32>,
    #[serde(default)]
    pub has_tasks: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: i64,
    pub topic_id: i64,
    pub title: String,
    #[serde(default)]
    pub condition: String,
    #[serde(default)]
    pub sort_order: Option<i32>,
}

/// 一次提交记录，由服务端生成，前端只读
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attempt {
    pub id: i64,
    pub task_id: i64,
    #[serde(default)]
    pub task_title: String,
    #[serde(default)]
    pub topic_id: Option<i64>,
    #[serde(default)]
    pub topic_title: String,
    /// 列表接口可能不返回代码，单条查询时才有
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub passed: bool,
    #[serde(default)]
    pub passed_tests: u32,
    #[serde(default)]
    pub total_tests: u32,
    #[serde(default)]
    pub message: Option<String>,
    pub created_at: CreatedAt,
}

/// 提交判题结果
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitResult {
    pub passed: bool,
    #[serde(default)]
    pub passed_tests: u32,
    #[serde(default)]
    pub total_tests: u32,
    #[serde(default)]
    pub message: Option<String>,
}

impl SubmitResult {
    /// 形如 `2/4` 的测试统计
    pub fn score(&self) -> String {
        format!("{}/{}", self.passed_tests, self.total_tests)
    }
}

// =========================================================
// 请求/响应负载 (Payloads)
// =========================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenResponse {
    pub token: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvatarResponse {
    #[serde(default)]
    pub avatar_path: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MessageResponse {
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Registration {
    pub username: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitCode {
    pub task_id: i64,
    pub code: String,
}

/// 资料修改：空字段不序列化，表示"不修改"
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileChanges {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub new_password: Option<String>,
}

impl ProfileChanges {
    /// 空输入视为不修改
    pub fn from_inputs(email: &str, new_password: &str) -> Self {
        let non_empty = |s: &str| {
            let s = s.trim();
            (!s.is_empty()).then(|| s.to_string())
        };
        Self {
            email: non_empty(email),
            new_password: non_empty(new_password),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.email.is_none() && self.new_password.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopicDraft {
    pub title: String,
    pub description: String,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_order: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskDraft {
    pub title: String,
    pub condition: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_order: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestCaseDraft {
    pub input: String,
    pub expected_output: String,
}
