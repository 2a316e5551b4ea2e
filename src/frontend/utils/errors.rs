use crate::{
    common::ApiErrorBody,
    frontend::{components::error_banner::ErrorBanner, dom::DomError},
};
use log::warn;
use std::{error::Error, fmt::Display};

pub type FrontendResult<T> = Result<T, FrontendError>;

#[derive(Debug, Clone, PartialEq)]
pub enum FrontendError {
    /// The server answered with its error envelope.
    Api(ApiErrorBody),
    /// Non-success status without a readable error envelope.
    Http { status: u16, body: String },
    /// Success status, but the body was not the expected json.
    Decode(String),
    /// The request never produced a response.
    Transport(String),
    /// Markup required by a component is missing.
    Dom(DomError),
}

impl FrontendError {
    pub fn new(message: impl Into<String>) -> Self {
        Self::Transport(message.into())
    }

    pub fn message(&self) -> String {
        self.to_string()
    }

    /// Form field the error refers to, used for highlighting.
    pub fn field(&self) -> Option<&str> {
        match self {
            FrontendError::Api(body) => body.field(),
            _ => None,
        }
    }
}

pub trait FrontendResultExt<T> {
    /// Run `on_success` with the value, or show the error in `banner`.
    fn error_banner<F>(self, banner: &ErrorBanner, on_success: F)
    where
        F: FnOnce(T);
}

impl<T> FrontendResultExt<T> for FrontendResult<T> {
    fn error_banner<F>(self, banner: &ErrorBanner, on_success: F)
    where
        F: FnOnce(T),
    {
        match self {
            Ok(o) => on_success(o),
            Err(e) => {
                warn!("{e}");
                if let Err(dom_err) = banner.show(Some(&e.message()), e.field()) {
                    warn!("Failed to show error: {dom_err}");
                }
            }
        }
    }
}

impl Display for FrontendError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FrontendError::Api(body) => {
                write!(f, "{}", body.display_message().unwrap_or("Request failed"))
            }
            FrontendError::Http { status, body } if body.is_empty() => {
                write!(f, "Request failed with status {status}")
            }
            FrontendError::Http { body, .. } => write!(f, "{body}"),
            FrontendError::Decode(text) => write!(f, "Invalid response: {text}"),
            FrontendError::Transport(text) => write!(f, "{text}"),
            FrontendError::Dom(e) => write!(f, "{e}"),
        }
    }
}

impl Error for FrontendError {}

impl From<ApiErrorBody> for FrontendError {
    fn from(value: ApiErrorBody) -> Self {
        Self::Api(value)
    }
}

impl From<DomError> for FrontendError {
    fn from(value: DomError) -> Self {
        Self::Dom(value)
    }
}

#[cfg(feature = "ssr")]
#[cfg(not(target_family = "wasm"))]
impl From<reqwest::Error> for FrontendError {
    fn from(value: reqwest::Error) -> Self {
        Self::Transport(value.to_string())
    }
}

#[cfg(target_family = "wasm")]
impl From<gloo_net::Error> for FrontendError {
    fn from(value: gloo_net::Error) -> Self {
        Self::Transport(value.to_string())
    }
}

impl From<url::ParseError> for FrontendError {
    fn from(value: url::ParseError) -> Self {
        Self::Transport(value.to_string())
    }
}

impl From<serde_urlencoded::ser::Error> for FrontendError {
    fn from(value: serde_urlencoded::ser::Error) -> Self {
        Self::Transport(value.to_string())
    }
}

impl From<serde_json::Error> for FrontendError {
    fn from(value: serde_json::Error) -> Self {
        Self::Decode(value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        common::config::FeedbackConfig,
        frontend::dom::{memory::MemoryDom, Dom},
    };
    use pretty_assertions::assert_eq;
    use std::rc::Rc;

    #[test]
    fn error_banner_ext() -> Result<(), DomError> {
        let dom = Rc::new(MemoryDom::new());
        let alert = dom.add(dom.body(), "div", "alert-error");
        let group = dom.add(dom.body(), "div", "control-group field-title");
        let banner = ErrorBanner::new(dom.clone(), dom.body(), &FeedbackConfig::default())?;

        let mut seen = None;
        FrontendResult::Ok(3).error_banner(&banner, |v| seen = Some(v));
        assert_eq!(Some(3), seen);
        assert_eq!("", dom.text(alert));

        let failed: FrontendResult<i32> =
            Err(ApiErrorBody::new("value:invalid").with_data("title").into());
        failed.error_banner(&banner, |_| unreachable!());
        assert_eq!("value:invalid", dom.text(alert));
        assert!(dom.has_class(group, "error"));
        Ok(())
    }

    #[test]
    fn api_error_message_falls_back_to_code() {
        let err = FrontendError::from(ApiErrorBody::new("bad").with_data("email"));
        assert_eq!("bad", err.message());
        assert_eq!(Some("email"), err.field());

        let err = FrontendError::from(ApiErrorBody::default());
        assert_eq!("Request failed", err.message());
    }

    #[test]
    fn http_error_without_body() {
        let err = FrontendError::Http {
            status: 502,
            body: String::new(),
        };
        assert_eq!("Request failed with status 502", err.message());
        assert_eq!(None, err.field());
    }
}
