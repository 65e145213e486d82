use log::{debug, info};
use reqwest::StatusCode;
use serde::Deserialize;

use crate::{
    account::Account,
    mirror::Mirror,
    transport::{Body, Request, Transport},
};

#[derive(Debug, Clone, Copy, derive_more::Display)]
pub enum Step {
    #[display("login")]
    Login,
    #[display("check-in")]
    CheckIn,
    #[display("user info")]
    UserInfo,
}

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("Failed to {step}: server returned {status}")]
    Status { step: Step, status: StatusCode },
    #[error("Failed to {step}: response was not the expected JSON: {source}")]
    Json {
        step: Step,
        #[source]
        source: serde_json::Error,
    },
    #[error("Failed to {step}: {source:#}")]
    Transport {
        step: Step,
        #[source]
        source: anyhow::Error,
    },
}

/// The `{"ret": .., "msg": ..}` envelope returned by login and check-in.
#[derive(Debug, Deserialize)]
struct MessageResponse {
    msg: String,
}

/// Raw body of `/user`, which may or may not be JSON.
#[derive(Debug)]
pub struct UserPage {
    pub raw: String,
    pub json: Option<serde_json::Value>,
}
impl UserPage {
    pub fn new(raw: String) -> Self {
        let json = serde_json::from_str(&raw).ok();
        Self { raw, json }
    }
}

/// An authenticated conversation with one mirror.
/// Every request goes through the same transport so that the login cookie is reused.
pub struct Session<'t, T> {
    transport: &'t T,
    mirror: Mirror,
}

impl<'t, T: Transport> Session<'t, T> {
    pub fn new(transport: &'t T, mirror: Mirror) -> Self {
        Self { transport, mirror }
    }

    pub fn mirror(&self) -> &Mirror {
        &self.mirror
    }

    /// Returns the message shown by the panel after submitting the credentials.
    pub async fn login(&self, account: &Account) -> Result<String, SessionError> {
        info!("[{}] Logging in via {}", account.email, self.mirror);
        let form: [(&str, &str); 2] = [
            ("email", account.email.as_ref()),
            ("passwd", account.password.as_ref()),
        ];
        let url = self.url(Step::Login, Mirror::login_url)?;
        let body = self
            .request_ok(Step::Login, Request::post(url, Body::Form(&form)))
            .await?;
        parse_message(Step::Login, &body)
    }

    pub async fn check_in(&self) -> Result<String, SessionError> {
        let url = self.url(Step::CheckIn, Mirror::check_in_url)?;
        let body = self
            .request_ok(Step::CheckIn, Request::post(url, Body::Empty))
            .await?;
        parse_message(Step::CheckIn, &body)
    }

    pub async fn user_page(&self) -> Result<UserPage, SessionError> {
        let url = self.url(Step::UserInfo, Mirror::user_url)?;
        let body = self.request_ok(Step::UserInfo, Request::get(url)).await?;
        let page = UserPage::new(body);
        debug!(
            "User page: {} bytes, json = {}",
            page.raw.len(),
            page.json.is_some()
        );
        Ok(page)
    }

    fn url(
        &self,
        step: Step,
        endpoint: fn(&Mirror) -> Result<url::Url, url::ParseError>,
    ) -> Result<url::Url, SessionError> {
        endpoint(&self.mirror).map_err(|e| SessionError::Transport {
            step,
            source: e.into(),
        })
    }

    async fn request_ok(&self, step: Step, request: Request<'_>) -> Result<String, SessionError> {
        let response = self
            .transport
            .send(request)
            .await
            .map_err(|source| SessionError::Transport { step, source })?;
        if response.status != StatusCode::OK {
            return Err(SessionError::Status {
                step,
                status: response.status,
            });
        }
        Ok(response.body)
    }
}

fn parse_message(step: Step, body: &str) -> Result<String, SessionError> {
    serde_json::from_str::<MessageResponse>(body)
        .map(|response| response.msg)
        .map_err(|source| SessionError::Json { step, source })
}
