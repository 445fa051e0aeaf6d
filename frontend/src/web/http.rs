//! HTTP 请求封装模块
//!
//! `HttpClient` 抽象出传输层，生产环境使用 `web_sys::fetch`，测试使用 Mock。

use std::collections::BTreeMap;

use async_trait::async_trait;
use chelper_shared::protocol::HttpMethod;
use js_sys::{Array, Uint8Array};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Blob, BlobPropertyBag, FormData, Headers, Request, RequestInit, Response};

use crate::error::{AppError, AppResult};

// =========================================================
// 请求/响应结构
// =========================================================

/// 待上传的文件
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilePart {
    pub name: String,
    pub mime: String,
    pub bytes: Vec<u8>,
}

/// 请求体
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HttpBody {
    /// 已序列化的 JSON 文本
    Json(String),
    /// multipart 表单，单个文件字段
    Multipart { field: String, file: FilePart },
}

#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub url: String,
    pub method: HttpMethod,
    pub headers: BTreeMap<String, String>,
    pub body: Option<HttpBody>,
}

impl HttpRequest {
    pub fn new(url: &str, method: HttpMethod) -> Self {
        Self {
            url: url.to_string(),
            method,
            headers: BTreeMap::new(),
            body: None,
        }
    }

    pub fn with_header(mut self, key: &str, value: &str) -> Self {
        self.headers.insert(key.to_string(), value.to_string());
        self
    }

    pub fn with_body(mut self, body: HttpBody) -> Self {
        self.body = Some(body);
        self
    }
}

#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub status_text: String,
    pub body: String,
}

impl HttpResponse {
    /// 检查响应是否成功 (2xx)
    pub fn ok(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// HTTP 客户端特性 (Trait)
///
/// (?Send) 是因为浏览器环境下 `JsFuture` 不是 Send 的
#[async_trait(?Send)]
pub trait HttpClient {
    async fn send(&self, req: HttpRequest) -> AppResult<HttpResponse>;
}

// =========================================================
// 实现层: fetch 客户端
// =========================================================

fn js_err(e: JsValue) -> String {
    e.as_string().unwrap_or_else(|| format!("{:?}", e))
}

fn form_data(field: &str, file: &FilePart) -> Result<FormData, JsValue> {
    let form = FormData::new()?;
    let chunk = Uint8Array::from(file.bytes.as_slice());
    let parts = Array::of1(&chunk);
    let opts = BlobPropertyBag::new();
    opts.set_type(&file.mime);
    let blob = Blob::new_with_u8_array_sequence_and_options(&parts, &opts)?;
    form.append_with_blob_and_filename(field, &blob, &file.name)?;
    Ok(form)
}

/// 基于 `window.fetch` 的客户端
#[derive(Clone, Copy, Default)]
pub struct FetchHttpClient;

#[async_trait(?Send)]
impl HttpClient for FetchHttpClient {
    async fn send(&self, req: HttpRequest) -> AppResult<HttpResponse> {
        let headers = Headers::new()
            .map_err(|e| AppError::Network(format!("创建 Headers 失败: {}", js_err(e))))?;
        for (key, value) in &req.headers {
            headers
                .set(key, value)
                .map_err(|e| AppError::Network(format!("设置 Header 失败: {}", js_err(e))))?;
        }

        let opts = RequestInit::new();
        opts.set_method(req.method.as_str());
        opts.set_headers(&headers.into());

        match &req.body {
            Some(HttpBody::Json(text)) => opts.set_body(&JsValue::from_str(text)),
            // multipart 不设置 Content-Type，由浏览器补上 boundary
            Some(HttpBody::Multipart { field, file }) => {
                let form = form_data(field, file).map_err(|e| AppError::Network(js_err(e)))?;
                opts.set_body(&form.into());
            }
            None => {}
        }

        let request = Request::new_with_str_and_init(&req.url, &opts)
            .map_err(|e| AppError::Network(js_err(e)))?;

        let window = web_sys::window()
            .ok_or_else(|| AppError::Network("无法获取 window 对象".to_string()))?;

        let resp_value = JsFuture::from(window.fetch_with_request(&request))
            .await
            .map_err(|e| AppError::Network(js_err(e)))?;

        let response: Response = resp_value
            .dyn_into()
            .map_err(|e| AppError::Network(format!("Response 类型转换失败: {}", js_err(e))))?;

        let text_promise = response
            .text()
            .map_err(|e| AppError::Network(js_err(e)))?;
        let body = JsFuture::from(text_promise)
            .await
            .map_err(|e| AppError::Network(js_err(e)))?
            .as_string()
            .unwrap_or_default();

        Ok(HttpResponse {
            status: response.status(),
            status_text: response.status_text(),
            body,
        })
    }
}
