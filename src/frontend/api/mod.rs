use crate::{
    common::{ApiErrorBody, Payload},
    frontend::utils::errors::{FrontendError, FrontendResult},
};
use async_trait::async_trait;
use http::{Method, StatusCode};
use log::info;
use serde::Deserialize;

pub mod comment;
pub mod transport;

pub const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded; charset=UTF-8";
pub const JSON_ACCEPT: &str = "application/json, text/javascript, */*; q=0.01";

/// A request as handed to a [`Transport`]. Always a POST with a form encoded
/// body and json declared as the expected response type.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct JsonPost {
    pub url: String,
    pub body: String,
}

impl JsonPost {
    pub fn method(&self) -> Method {
        Method::POST
    }

    pub fn headers(&self) -> [(&'static str, &'static str); 3] {
        [
            ("content-type", FORM_CONTENT_TYPE),
            ("accept", JSON_ACCEPT),
            ("x-requested-with", "XMLHttpRequest"),
        ]
    }
}

/// Raw answer of the server, before json parsing.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub text: String,
    pub url: String,
}

#[async_trait(?Send)]
pub trait Transport {
    async fn send(&self, request: &JsonPost) -> FrontendResult<RawResponse>;
}

#[derive(Clone, Debug)]
pub struct ApiClient<T> {
    transport: T,
}

impl<T: Transport> ApiClient<T> {
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// POST `payload` to `url` and parse the json answer.
    ///
    /// Fails with [`FrontendError::Api`] when the server reports an error
    /// envelope, even together with status 200.
    pub async fn post_json<R>(&self, url: &str, payload: impl Into<Payload>) -> FrontendResult<R>
    where
        R: for<'de> Deserialize<'de>,
    {
        let request = JsonPost {
            url: url.to_string(),
            body: payload.into().encode()?,
        };
        let res = self.transport.send(&request).await?;
        Self::response(res)
    }

    fn response<R>(res: RawResponse) -> FrontendResult<R>
    where
        R: for<'de> Deserialize<'de>,
    {
        let RawResponse { status, text, url } = res;
        let json: Option<serde_json::Value> = serde_json::from_str(&text).ok();
        let success = StatusCode::from_u16(status)
            .map(|s| s.is_success())
            .unwrap_or(false);
        if let Some(body) = json.as_ref().and_then(|j| error_envelope(j, success)) {
            info!("API error: {text} on {url} status {status}");
            return Err(FrontendError::Api(body));
        }
        if !success {
            info!("API error: {text} on {url} status {status}");
            return Err(FrontendError::Http { status, body: text });
        }
        let json = json.ok_or_else(|| {
            info!("Failed to deserialize api response: {text} on {url}");
            FrontendError::Decode(text.clone())
        })?;
        Ok(serde_json::from_value(json)?)
    }
}

/// The error envelope in `json`, if any.
///
/// A non-empty `error` marks a failure on any status. After a non-2xx status
/// a non-empty `message` is enough.
fn error_envelope(json: &serde_json::Value, success: bool) -> Option<ApiErrorBody> {
    let field = |name: &str| {
        json.get(name)
            .and_then(|v| v.as_str())
            .filter(|v| !v.is_empty())
            .map(str::to_string)
    };
    let error = field("error");
    let message = field("message");
    if error.is_none() && (success || message.is_none()) {
        return None;
    }
    Some(ApiErrorBody {
        error: error.unwrap_or_default(),
        data: field("data"),
        message,
    })
}
