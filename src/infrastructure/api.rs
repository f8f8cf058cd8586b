//! 플랫폼 REST API 연동 구현.

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, StatusCode};
use serde_json::Value;
use tracing::debug;
use url::Url;

use crate::application::ports::ApiGateway;
use crate::domain::api::{ApiError, ApiRequest, HttpMethod};

pub struct HttpApiGateway {
    client: Client,
    base: Url,
}

impl HttpApiGateway {
    /// base URL은 `http`/`https`만 허용한다.
    pub fn new(base_url: &str) -> anyhow::Result<Self> {
        let trimmed = base_url.trim().trim_end_matches('/');
        let base = Url::parse(trimmed)?;
        if !matches!(base.scheme(), "http" | "https") {
            anyhow::bail!("unsupported URL scheme `{}`", base.scheme());
        }
        Ok(Self {
            client: Client::new(),
            base,
        })
    }

    /// `base` 경로 뒤에 요청 경로(이미 인코딩됨)를 붙인다.
    pub fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base.as_str().trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    fn request(&self, method: HttpMethod, url: String, token: &str) -> RequestBuilder {
        let method = match method {
            HttpMethod::Get => Method::GET,
            HttpMethod::Post => Method::POST,
            HttpMethod::Patch => Method::PATCH,
            HttpMethod::Delete => Method::DELETE,
        };
        self.client
            .request(method, url)
            .header("User-Agent", concat!("babylon/", env!("CARGO_PKG_VERSION")))
            .header("Accept", "application/json")
            .bearer_auth(token)
    }
}

#[async_trait]
impl ApiGateway for HttpApiGateway {
    async fn send(&self, request: &ApiRequest, token: &str) -> Result<Value, ApiError> {
        let url = self.endpoint(&request.path);
        debug!(method = %request.method, url = %url, "api request");

        let mut builder = self.request(request.method, url, token);
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let resp = builder.send().await.map_err(transport_error)?;
        let status = resp.status();
        let body = resp.text().await.map_err(transport_error)?;

        if !status.is_success() {
            return Err(ApiError::from_status(status.as_u16(), error_message(status, &body)));
        }
        if body.trim().is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_str(&body).map_err(|e| ApiError::Unknown {
            status: Some(status.as_u16()),
            message: format!("invalid JSON response: {e}"),
        })
    }
}

fn transport_error(err: reqwest::Error) -> ApiError {
    if err.is_connect() || err.is_timeout() {
        return ApiError::ServiceUnavailable(err.to_string());
    }
    ApiError::Unknown {
        status: err.status().map(|s| s.as_u16()),
        message: err.to_string(),
    }
}

/// 오류 응답 본문에서 사람이 읽을 메시지를 고른다.
fn error_message(status: StatusCode, body: &str) -> String {
    let parsed: Option<Value> = serde_json::from_str(body).ok();
    let detail = parsed.as_ref().and_then(|v| {
        ["detail", "message", "title", "error"]
            .iter()
            .find_map(|key| v.get(key).and_then(Value::as_str))
    });
    match detail {
        Some(detail) => detail.to_string(),
        None if body.trim().is_empty() => status
            .canonical_reason()
            .unwrap_or("no response body")
            .to_string(),
        None => body.trim().to_string(),
    }
}
