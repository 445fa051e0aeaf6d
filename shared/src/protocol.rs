//! 接口协议定义
//!
//! 每个请求类型绑定：HTTP 方法、路径（含路径参数）、请求体和响应类型。
//! 路径均相对于 API 前缀（如 `/api`）。

use crate::{
    Attempt, Credentials, MessageResponse, ProfileChanges, Registration, SubmitCode, SubmitResult,
    Task, TaskDraft, TestCaseDraft, TokenResponse, Topic, TopicDraft, UserProfile,
};
use serde::Serialize;
use serde::de::{DeserializeOwned, IgnoredAny};

/// HTTP Methods for API Requests
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
        }
    }
}

/// A trait that defines the request-response relationship and metadata for an API endpoint.
pub trait ApiRequest {
    /// The response type returned by this request.
    type Response: DeserializeOwned;
    /// The JSON body type; `()` for requests without a body.
    type Body: Serialize;
    /// The HTTP method.
    const METHOD: HttpMethod;

    /// The URL path, relative to the API prefix.
    fn path(&self) -> String;

    fn body(&self) -> Option<&Self::Body> {
        None
    }
}

fn encode(segment: &str) -> String {
    urlencoding::encode(segment).into_owned()
}

macro_rules! get_request {
    ($name:ident => $resp:ty, |$this:ident| $path:expr) => {
        impl ApiRequest for $name {
            type Response = $resp;
            type Body = ();
            const METHOD: HttpMethod = HttpMethod::Get;

            fn path(&self) -> String {
                let $this = self;
                $path
            }
        }
    };
}

// =========================================================
// Auth
// =========================================================

#[derive(Debug)]
pub struct Login(pub Credentials);

impl ApiRequest for Login {
    type Response = TokenResponse;
    type Body = Credentials;
    const METHOD: HttpMethod = HttpMethod::Post;

    fn path(&self) -> String {
        "/auth/login".to_string()
    }

    fn body(&self) -> Option<&Credentials> {
        Some(&self.0)
    }
}

#[derive(Debug)]
pub struct Register(pub Registration);

impl ApiRequest for Register {
    type Response = TokenResponse;
    type Body = Registration;
    const METHOD: HttpMethod = HttpMethod::Post;

    fn path(&self) -> String {
        "/auth/register".to_string()
    }

    fn body(&self) -> Option<&Registration> {
        Some(&self.0)
    }
}

// =========================================================
// Topics & Tasks
// =========================================================

#[derive(Debug)]
pub struct ListTopics;
get_request!(ListTopics => Vec<Topic>, |_r| "/topics".to_string());

#[derive(Debug)]
pub struct SearchTopics {
    pub query: String,
}
get_request!(SearchTopics => Vec<Topic>, |r| format!("/topics/search?q={}", encode(&r.query)));

#[derive(Debug)]
pub struct GetTopic {
    pub id: String,
}
get_request!(GetTopic => Topic, |r| format!("/topics/{}", encode(&r.id)));

#[derive(Debug)]
pub struct ListTasks {
    pub topic_id: String,
}
get_request!(ListTasks => Vec<Task>, |r| format!("/topics/{}/tasks", encode(&r.topic_id)));

#[derive(Debug)]
pub struct GetTask {
    pub id: String,
}
get_request!(GetTask => Task, |r| format!("/tasks/{}", encode(&r.id)));

#[derive(Debug)]
pub struct Submit {
    pub task_id: String,
    pub body: SubmitCode,
}

impl ApiRequest for Submit {
    type Response = SubmitResult;
    type Body = SubmitCode;
    const METHOD: HttpMethod = HttpMethod::Post;

    fn path(&self) -> String {
        format!("/tasks/{}/submit", encode(&self.task_id))
    }

    fn body(&self) -> Option<&SubmitCode> {
        Some(&self.body)
    }
}

// =========================================================
// Attempts
// =========================================================

#[derive(Debug)]
pub struct MyAttempts;
get_request!(MyAttempts => Vec<Attempt>, |_r| "/attempts/my".to_string());

#[derive(Debug)]
pub struct MyAttemptsForTask {
    pub task_id: String,
}
get_request!(MyAttemptsForTask => Vec<Attempt>, |r| format!("/attempts/my/task/{}", encode(&r.task_id)));

#[derive(Debug)]
pub struct GetAttempt {
    pub id: String,
}
get_request!(GetAttempt => Attempt, |r| format!("/attempts/{}", encode(&r.id)));

// =========================================================
// Profile
// =========================================================

#[derive(Debug)]
pub struct MyProfile;
get_request!(MyProfile => UserProfile, |_r| "/profile/me".to_string());

#[derive(Debug)]
pub struct PublicProfile {
    pub username: String,
}
get_request!(PublicProfile => UserProfile, |r| format!("/profile/user/{}", encode(&r.username)));

#[derive(Debug)]
pub struct UpdateProfile(pub ProfileChanges);

impl ApiRequest for UpdateProfile {
    type Response = UserProfile;
    type Body = ProfileChanges;
    const METHOD: HttpMethod = HttpMethod::Put;

    fn path(&self) -> String {
        "/profile/me".to_string()
    }

    fn body(&self) -> Option<&ProfileChanges> {
        Some(&self.0)
    }
}

/// 头像上传走 multipart，不经过 `ApiRequest`，这里只固定路径
pub const AVATAR_UPLOAD_PATH: &str = "/profile/me/avatar";
pub const AVATAR_FIELD_NAME: &str = "file";

// =========================================================
// Admin
// =========================================================

#[derive(Debug)]
pub struct CreateTopic(pub TopicDraft);

impl ApiRequest for CreateTopic {
    type Response = Topic;
    type Body = TopicDraft;
    const METHOD: HttpMethod = HttpMethod::Post;

    fn path(&self) -> String {
        "/admin/topics".to_string()
    }

    fn body(&self) -> Option<&TopicDraft> {
        Some(&self.0)
    }
}

#[derive(Debug)]
pub struct UpdateTopic {
    pub id: String,
    pub draft: TopicDraft,
}

impl ApiRequest for UpdateTopic {
    type Response = Topic;
    type Body = TopicDraft;
    const METHOD: HttpMethod = HttpMethod::Put;

    fn path(&self) -> String {
        format!("/admin/topics/{}", encode(&self.id))
    }

    fn body(&self) -> Option<&TopicDraft> {
        Some(&self.draft)
    }
}

#[derive(Debug)]
pub struct DeleteTopic {
    pub id: String,
}

impl ApiRequest for DeleteTopic {
    type Response = IgnoredAny;
    type Body = ();
    const METHOD: HttpMethod = HttpMethod::Delete;

    fn path(&self) -> String {
        format!("/admin/topics/{}", encode(&self.id))
    }
}

#[derive(Debug)]
pub struct CreateTask {
    pub topic_id: String,
    pub draft: TaskDraft,
}

impl ApiRequest for CreateTask {
    type Response = Task;
    type Body = TaskDraft;
    const METHOD: HttpMethod = HttpMethod::Post;

    fn path(&self) -> String {
        format!("/admin/topics/{}/tasks", encode(&self.topic_id))
    }

    fn body(&self) -> Option<&TaskDraft> {
        Some(&self.draft)
    }
}

#[derive(Debug)]
pub struct UpdateTask {
    pub id: String,
    pub draft: TaskDraft,
}

impl ApiRequest for UpdateTask {
    type Response = Task;
    type Body = TaskDraft;
    const METHOD: HttpMethod = HttpMethod::Put;

    fn path(&self) -> String {
        format!("/admin/tasks/{}", encode(&self.id))
    }

    fn body(&self) -> Option<&TaskDraft> {
        Some(&self.draft)
    }
}

#[derive(Debug)]
pub struct DeleteTask {
    pub id: String,
}

impl ApiRequest for DeleteTask {
    type Response = IgnoredAny;
    type Body = ();
    const METHOD: HttpMethod = HttpMethod::Delete;

    fn path(&self) -> String {
        format!("/admin/tasks/{}", encode(&self.id))
    }
}

#[derive(Debug)]
pub struct AddTestCase {
    pub task_id: String,
    pub case: TestCaseDraft,
}

impl ApiRequest for AddTestCase {
    type Response = MessageResponse;
    type Body = TestCaseDraft;
    const METHOD: HttpMethod = HttpMethod::Post;

    fn path(&self) -> String {
        format!("/admin/tasks/{}/tests", encode(&self.task_id))
    }

    fn body(&self) -> Option<&TestCaseDraft> {
        Some(&self.case)
    }
}
