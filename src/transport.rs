use std::time::Duration;

use log::debug;
use reqwest::{header, Method, StatusCode};
use url::Url;

use crate::mirror::Mirror;

pub const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/114.0.0.0 Safari/537.36";

#[derive(Debug)]
pub enum Body<'a> {
    Empty,
    Form(&'a [(&'static str, &'a str)]),
}

#[derive(Debug)]
pub struct Request<'a> {
    pub method: Method,
    pub url: Url,
    pub body: Body<'a>,
}
impl<'a> Request<'a> {
    pub fn get(url: Url) -> Self {
        Self {
            method: Method::GET,
            url,
            body: Body::Empty,
        }
    }
    pub fn post(url: Url, body: Body<'a>) -> Self {
        Self {
            method: Method::POST,
            url,
            body,
        }
    }
}

#[derive(Debug)]
pub struct RawResponse {
    pub status: StatusCode,
    pub body: String,
}

/// Issues one request and returns the status together with the whole body.
#[allow(async_fn_in_trait)]
pub trait Transport {
    async fn send(&self, request: Request<'_>) -> anyhow::Result<RawResponse>;
}
impl<T: Transport> Transport for &T {
    async fn send(&self, request: Request<'_>) -> anyhow::Result<RawResponse> {
        (**self).send(request).await
    }
}

pub struct ReqwestTransport {
    client: reqwest::Client,
    timeout: Duration,
}

impl ReqwestTransport {
    /// Bare client with only the user agent, used to check whether a mirror is alive.
    pub fn for_probe(timeout: Duration) -> reqwest::Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .build()?;
        Ok(Self { client, timeout })
    }

    /// Cookie-keeping client whose headers are fixed to the given mirror.
    /// Every account gets a new one, so no cookie outlives its account.
    pub fn for_session(mirror: &Mirror, timeout: Duration) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .cookie_store(true)
            .connection_verbose(true)
            .default_headers(session_headers(mirror)?)
            .build()?;
        Ok(Self { client, timeout })
    }
}

fn session_headers(mirror: &Mirror) -> anyhow::Result<header::HeaderMap> {
    let mut headers = header::HeaderMap::new();
    headers.insert(header::USER_AGENT, header::HeaderValue::from_static(USER_AGENT));
    headers.insert(
        header::ACCEPT,
        header::HeaderValue::from_static("application/json, text/javascript, */*; q=0.01"),
    );
    headers.insert(
        header::ACCEPT_LANGUAGE,
        header::HeaderValue::from_static("zh-CN,zh;q=0.9,en;q=0.8"),
    );
    headers.insert(
        header::CONTENT_TYPE,
        header::HeaderValue::from_static("application/x-www-form-urlencoded; charset=UTF-8"),
    );
    headers.insert(
        "x-requested-with",
        header::HeaderValue::from_static("XMLHttpRequest"),
    );
    headers.insert(header::ORIGIN, mirror.origin().parse()?);
    headers.insert(header::REFERER, mirror.referer().parse()?);
    Ok(headers)
}

impl Transport for ReqwestTransport {
    async fn send(&self, request: Request<'_>) -> anyhow::Result<RawResponse> {
        debug!("{} {}", request.method, request.url);
        let builder = self
            .client
            .request(request.method, request.url)
            .timeout(self.timeout);
        let builder = match request.body {
            Body::Empty => builder,
            Body::Form(form) => builder.form(form),
        };
        let response = builder.send().await?;
        let status = response.status();
        let body = response.text().await?;
        debug!("Received {status} with {} bytes", body.len());
        Ok(RawResponse { status, body })
    }
}

#[cfg(test)]
mod tests {
    use reqwest::header;

    use super::session_headers;
    use crate::mirror::Mirror;

    #[test]
    fn session_headers_follow_mirror() {
        let headers = session_headers(&Mirror::from("ikuuu.one".to_owned())).unwrap();
        assert_eq!(headers[header::ORIGIN], "https://ikuuu.one");
        assert_eq!(headers[header::REFERER], "https://ikuuu.one/auth/login");
        assert_eq!(headers["x-requested-with"], "XMLHttpRequest");
    }
}
