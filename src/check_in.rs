use std::time::Duration;

use log::{error, info, warn};
use scraper::Html;

use crate::{
    account::{Account, Email},
    api::{Session, SessionError},
    decode,
    mirror::{select_mirror, Mirror, MirrorUnavailable},
    quota::{self, Quota},
    transport::{ReqwestTransport, Transport},
};

pub const FAILURE_MESSAGE: &str = "check-in failed";

#[derive(Debug, thiserror::Error)]
pub enum CheckInError {
    #[error(transparent)]
    Unavailable(#[from] MirrorUnavailable),
    #[error(transparent)]
    Session(#[from] SessionError),
    #[error("Failed to set up the HTTP session: {0:#}")]
    Setup(anyhow::Error),
}

/// What happened to one account.
/// `mirror` and `login_message` are kept even when a later step fails.
#[derive(Debug)]
pub struct CheckInOutcome {
    pub email: Email,
    pub mirror: Option<Mirror>,
    pub login_message: Option<String>,
    pub message: String,
    pub quota: Option<Quota>,
    pub error: Option<String>,
}

impl CheckInOutcome {
    fn new(email: Email) -> Self {
        Self {
            email,
            mirror: None,
            login_message: None,
            message: FAILURE_MESSAGE.to_owned(),
            quota: None,
            error: None,
        }
    }

    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}

/// Runs the whole pipeline for one account and never fails:
/// any error ends up as the failure message with no quota.
pub async fn check_in_account<P, S>(
    probe: &P,
    mirrors: &[Mirror],
    open_session: impl FnOnce(&Mirror) -> anyhow::Result<S>,
    account: &Account,
) -> CheckInOutcome
where
    P: Transport,
    S: Transport,
{
    let mut outcome = CheckInOutcome::new(account.email.clone());
    if let Err(e) = run(probe, mirrors, open_session, account, &mut outcome).await {
        error!("[{}] {e}", account.email);
        outcome.message = FAILURE_MESSAGE.to_owned();
        outcome.quota = None;
        outcome.error = Some(e.to_string());
    }
    outcome
}

async fn run<P, S>(
    probe: &P,
    mirrors: &[Mirror],
    open_session: impl FnOnce(&Mirror) -> anyhow::Result<S>,
    account: &Account,
    outcome: &mut CheckInOutcome,
) -> Result<(), CheckInError>
where
    P: Transport,
    S: Transport,
{
    let mirror = select_mirror(probe, mirrors).await?;
    outcome.mirror = Some(mirror.clone());

    let transport = open_session(&mirror).map_err(CheckInError::Setup)?;
    let session = Session::new(&transport, mirror);
    let login_message = session.login(account).await?;
    info!("[{}] {login_message}", account.email);
    outcome.login_message = Some(login_message);

    let message = session.check_in().await?;
    info!("[{}] Checked in: {message}", account.email);

    let page = session.user_page().await?;
    let html = decode::extract_html(&page);
    let quota = quota::parse(&Html::parse_document(&html));
    if quota.is_none() {
        warn!("[{}] Remaining quota was not found in the user page", account.email);
    }

    outcome.message = message;
    outcome.quota = quota;
    Ok(())
}

/// Checks in with real HTTP clients.
/// Mirrors are probed again for every account.
#[derive(Debug)]
pub struct CheckInRunner {
    pub mirrors: Vec<Mirror>,
    pub probe_timeout: Duration,
    pub request_timeout: Duration,
}

impl CheckInRunner {
    pub async fn check_in(&self, account: &Account) -> CheckInOutcome {
        let probe = match ReqwestTransport::for_probe(self.probe_timeout) {
            Ok(probe) => probe,
            Err(e) => {
                let mut outcome = CheckInOutcome::new(account.email.clone());
                error!("[{}] Failed to build the HTTP client: {e}", account.email);
                outcome.error = Some(e.to_string());
                return outcome;
            }
        };
        check_in_account(
            &probe,
            &self.mirrors,
            |mirror| ReqwestTransport::for_session(mirror, self.request_timeout),
            account,
        )
        .await
    }
}
