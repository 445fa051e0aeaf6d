//! API 网关
//!
//! 把领域操作翻译成 HTTP 调用：拼接前缀、注入 Bearer 令牌、JSON 编解码。
//! 401 时先清除会话并广播 logout，再把错误交给调用方。

use std::rc::Rc;

use chelper_shared::protocol::{self, ApiRequest, HttpMethod};
use chelper_shared::{
    Attempt, AvatarResponse, Credentials, HEADER_AUTHORIZATION, MessageResponse, ProfileChanges,
    Registration, SubmitCode, SubmitResult, Task, TaskDraft, TestCaseDraft, TokenResponse, Topic,
    TopicDraft, UserProfile,
};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};

use crate::config::AppConfig;
use crate::error::{AppError, AppResult};
use crate::session::SessionStore;
use crate::web::{FilePart, HttpBody, HttpClient, HttpRequest, HttpResponse};

const UPLOAD_FAILED: &str = "Ошибка загрузки";

/// 响应体：有内容时按 JSON 解析，解析失败退回原始文本
fn parse_body(text: &str) -> Value {
    if text.is_empty() {
        return Value::Null;
    }
    serde_json::from_str(text).unwrap_or_else(|_| Value::String(text.to_string()))
}

#[derive(Clone)]
pub struct ApiGateway {
    config: Rc<AppConfig>,
    client: Rc<dyn HttpClient>,
    session: SessionStore,
}

impl ApiGateway {
    pub fn new(config: Rc<AppConfig>, client: Rc<dyn HttpClient>, session: SessionStore) -> Self {
        Self {
            config,
            client,
            session,
        }
    }

    fn authorized(&self, mut req: HttpRequest) -> HttpRequest {
        if let Some(token) = self.session.token() {
            req = req.with_header(HEADER_AUTHORIZATION, &format!("Bearer {}", token));
        }
        req
    }

    /// 统一处理 401：先清会话，再交给调用方
    fn check_session(&self, resp: &HttpResponse) {
        if resp.status == 401 && self.session.expire() {
            warn!("received 401, session cleared");
        }
    }

    /// 发送强类型请求并获取解析后的响应
    pub async fn send<R: ApiRequest>(&self, req: &R) -> AppResult<R::Response> {
        let path = req.path();
        let url = self.config.url(&path);
        let mut http =
            HttpRequest::new(&url, R::METHOD).with_header("Content-Type", "application/json");
        if let Some(body) = req.body() {
            http = http.with_body(HttpBody::Json(serde_json::to_string(body)?));
        }
        let http = self.authorized(http);

        debug!(method = R::METHOD.as_str(), %path, "api request");
        let resp = self.client.send(http).await?;
        self.check_session(&resp);

        let body = parse_body(&resp.body);
        if !resp.ok() {
            return Err(AppError::from_response(resp.status, &resp.status_text, body));
        }
        decode(body)
    }

    // =========================================================
    // Auth
    // =========================================================

    pub async fn login(&self, username: &str, password: &str) -> AppResult<TokenResponse> {
        self.send(&protocol::Login(Credentials {
            username: username.to_string(),
            password: password.to_string(),
        }))
        .await
    }

    pub async fn register(&self, registration: Registration) -> AppResult<TokenResponse> {
        self.send(&protocol::Register(registration)).await
    }

    // =========================================================
    // Topics & Tasks
    // =========================================================

    pub async fn list_topics(&self) -> AppResult<Vec<Topic>> {
        self.send(&protocol::ListTopics).await
    }

    pub async fn search_topics(&self, query: &str) -> AppResult<Vec<Topic>> {
        self.send(&protocol::SearchTopics {
            query: query.to_string(),
        })
        .await
    }

    pub async fn topic(&self, id: &str) -> AppResult<Topic> {
        self.send(&protocol::GetTopic { id: id.to_string() }).await
    }

    pub async fn tasks_by_topic(&self, topic_id: &str) -> AppResult<Vec<Task>> {
        self.send(&protocol::ListTasks {
            topic_id: topic_id.to_string(),
        })
        .await
    }

    pub async fn task(&self, id: &str) -> AppResult<Task> {
        self.send(&protocol::GetTask { id: id.to_string() }).await
    }

    pub async fn submit(&self, task_id: &str, code: &str) -> AppResult<SubmitResult> {
        let numeric_id = task_id
            .parse::<i64>()
            .map_err(|_| AppError::validation("Неверный идентификатор задачи"))?;
        self.send(&protocol::Submit {
            task_id: task_id.to_string(),
            body: SubmitCode {
                task_id: numeric_id,
                code: code.to_string(),
            },
        })
        .await
    }

    // =========================================================
    // Attempts
    // =========================================================

    pub async fn my_attempts(&self) -> AppResult<Vec<Attempt>> {
        self.send(&protocol::MyAttempts).await
    }

    pub async fn my_attempts_for_task(&self, task_id: &str) -> AppResult<Vec<Attempt>> {
        self.send(&protocol::MyAttemptsForTask {
            task_id: task_id.to_string(),
        })
        .await
    }

    pub async fn attempt(&self, id: &str) -> AppResult<Attempt> {
        self.send(&protocol::GetAttempt { id: id.to_string() })
            .await
    }

    // =========================================================
    // Profile
    // =========================================================

    pub async fn my_profile(&self) -> AppResult<UserProfile> {
        self.send(&protocol::MyProfile).await
    }

    pub async fn profile(&self, username: &str) -> AppResult<UserProfile> {
        self.send(&protocol::PublicProfile {
            username: username.to_string(),
        })
        .await
    }

    pub async fn update_profile(&self, changes: ProfileChanges) -> AppResult<UserProfile> {
        self.send(&protocol::UpdateProfile(changes)).await
    }

    /// 上传头像
    ///
    /// multipart 请求体，不带 JSON Content-Type；失败时消息取 body 的 `error`。
    pub async fn upload_avatar(&self, file: FilePart) -> AppResult<AvatarResponse> {
        let url = self.config.url(protocol::AVATAR_UPLOAD_PATH);
        let part = HttpBody::Multipart {
            field: protocol::AVATAR_FIELD_NAME.to_string(),
            file,
        };
        let http = self.authorized(HttpRequest::new(&url, HttpMethod::Post).with_body(part));

        let resp = self.client.send(http).await?;
        self.check_session(&resp);

        let body = parse_body(&resp.body);
        if resp.ok() {
            return decode(body);
        }
        let message = body
            .get("error")
            .and_then(Value::as_str)
            .unwrap_or(UPLOAD_FAILED)
            .to_string();
        Err(AppError::Http {
            status: resp.status,
            message,
            body,
        })
    }

    // =========================================================
    // Admin
    // =========================================================

    pub async fn create_topic(&self, draft: TopicDraft) -> AppResult<Topic> {
        self.send(&protocol::CreateTopic(draft)).await
    }

    pub async fn update_topic(&self, id: &str, draft: TopicDraft) -> AppResult<Topic> {
        self.send(&protocol::UpdateTopic {
            id: id.to_string(),
            draft,
        })
        .await
    }

    pub async fn delete_topic(&self, id: &str) -> AppResult<()> {
        self.send(&protocol::DeleteTopic { id: id.to_string() })
            .await
            .map(|_| ())
    }

    pub async fn create_task(&self, topic_id: &str, draft: TaskDraft) -> AppResult<Task> {
        self.send(&protocol::CreateTask {
            topic_id: topic_id.to_string(),
            draft,
        })
        .await
    }

    pub async fn update_task(&self, id: &str, draft: TaskDraft) -> AppResult<Task> {
        self.send(&protocol::UpdateTask {
            id: id.to_string(),
            draft,
        })
        .await
    }

    pub async fn delete_task(&self, id: &str) -> AppResult<()> {
        self.send(&protocol::DeleteTask { id: id.to_string() })
            .await
            .map(|_| ())
    }

    pub async fn add_test(&self, task_id: &str, case: TestCaseDraft) -> AppResult<MessageResponse> {
        self.send(&protocol::AddTestCase {
            task_id: task_id.to_string(),
            case,
        })
        .await
    }
}

fn decode<T: DeserializeOwned>(body: Value) -> AppResult<T> {
    serde_json::from_value(body).map_err(AppError::from)
}
