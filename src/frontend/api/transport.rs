use super::{JsonPost, RawResponse, Transport};
use crate::frontend::utils::errors::FrontendResult;
use async_trait::async_trait;

/// Sends requests with the browser fetch api, including cookies.
#[cfg(target_family = "wasm")]
#[derive(Clone, Debug, Default)]
pub struct BrowserTransport;

#[cfg(target_family = "wasm")]
#[async_trait(?Send)]
impl Transport for BrowserTransport {
    async fn send(&self, request: &JsonPost) -> FrontendResult<RawResponse> {
        use gloo_net::http::RequestBuilder;
        use web_sys::RequestCredentials;

        let mut builder = RequestBuilder::new(&request.url)
            .method(request.method())
            .credentials(RequestCredentials::Include);
        for (name, value) in request.headers() {
            builder = builder.header(name, value);
        }
        let res = builder.body(request.body.clone())?.send().await?;
        let status = res.status();
        let text = res.text().await?;
        Ok(RawResponse {
            status,
            text,
            url: res.url(),
        })
    }
}

/// Sends requests with reqwest, resolving relative urls against `base`.
#[cfg(feature = "ssr")]
#[cfg(not(target_family = "wasm"))]
#[derive(Clone, Debug)]
pub struct ReqwestTransport {
    client: reqwest::Client,
    base: url::Url,
}

#[cfg(feature = "ssr")]
#[cfg(not(target_family = "wasm"))]
impl ReqwestTransport {
    pub fn new(client: reqwest::Client, base: url::Url) -> Self {
        Self { client, base }
    }
}

#[cfg(feature = "ssr")]
#[cfg(not(target_family = "wasm"))]
#[async_trait(?Send)]
impl Transport for ReqwestTransport {
    async fn send(&self, request: &JsonPost) -> FrontendResult<RawResponse> {
        let url = self.base.join(&request.url)?;
        let mut req = self.client.request(request.method(), url);
        for (name, value) in request.headers() {
            req = req.header(name, value);
        }
        let res = req.body(request.body.clone()).send().await?;
        let status = res.status().as_u16();
        let url = res.url().to_string();
        let text = res.text().await?;
        Ok(RawResponse { status, text, url })
    }
}
