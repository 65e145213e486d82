use derive_more::{AsRef, Display, From};
use log::{info, warn};
use reqwest::StatusCode;
use serde::Deserialize;
use url::Url;

use crate::transport::{Request, Transport};

pub const DEFAULT_MIRRORS: [&str; 4] = ["ikuuu.de", "ikuuu.one", "ikuuu.pw", "ikuuu.org"];

/// A domain name serving the panel, without scheme.
#[derive(Clone, PartialEq, Eq, Debug, From, AsRef, Display, Deserialize)]
#[as_ref(forward)]
pub struct Mirror(String);

impl Mirror {
    pub fn defaults() -> Vec<Mirror> {
        DEFAULT_MIRRORS
            .iter()
            .map(|&domain| domain.to_owned().into())
            .collect()
    }

    pub fn origin(&self) -> String {
        format!("https://{}", self.0)
    }
    pub fn referer(&self) -> String {
        format!("https://{}/auth/login", self.0)
    }

    fn url(&self, path: &str) -> Result<Url, url::ParseError> {
        Url::parse(&format!("https://{}{path}", self.0))
    }
    pub fn root_url(&self) -> Result<Url, url::ParseError> {
        self.url("/")
    }
    pub fn login_url(&self) -> Result<Url, url::ParseError> {
        self.url("/auth/login")
    }
    pub fn check_in_url(&self) -> Result<Url, url::ParseError> {
        self.url("/user/checkin")
    }
    pub fn user_url(&self) -> Result<Url, url::ParseError> {
        self.url("/user")
    }
}

#[derive(Debug, thiserror::Error)]
#[error("None of the {tried} mirror(s) is available; check the network connection")]
pub struct MirrorUnavailable {
    pub tried: usize,
}

/// Returns the first candidate answering `200 OK` to a plain GET.
/// Candidates after the chosen one are never contacted.
pub async fn select_mirror<T: Transport>(
    transport: &T,
    candidates: &[Mirror],
) -> Result<Mirror, MirrorUnavailable> {
    for mirror in candidates {
        match probe(transport, mirror).await {
            Ok(StatusCode::OK) => {
                info!("Mirror {mirror} is available");
                return Ok(mirror.clone());
            }
            Ok(status) => warn!("Mirror {mirror} is unavailable: server returned {status}"),
            Err(e) => warn!("Mirror {mirror} is unavailable: {e:#}"),
        }
    }
    Err(MirrorUnavailable {
        tried: candidates.len(),
    })
}

async fn probe<T: Transport>(transport: &T, mirror: &Mirror) -> anyhow::Result<StatusCode> {
    let response = transport.send(Request::get(mirror.root_url()?)).await?;
    Ok(response.status)
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use anyhow::bail;
    use reqwest::StatusCode;

    use super::{select_mirror, Mirror};
    use crate::transport::{RawResponse, Request, Transport};

    /// Answers each host with a fixed outcome; `None` means the request timed out.
    struct FakeProbe {
        answers: Vec<(&'static str, Option<StatusCode>)>,
        visited: RefCell<Vec<String>>,
    }
    impl FakeProbe {
        fn new(answers: Vec<(&'static str, Option<StatusCode>)>) -> Self {
            Self {
                answers,
                visited: RefCell::new(vec![]),
            }
        }
    }
    impl Transport for FakeProbe {
        async fn send(&self, request: Request<'_>) -> anyhow::Result<RawResponse> {
            let host = request.url.host_str().unwrap_or_default().to_owned();
            self.visited.borrow_mut().push(host.clone());
            match self.answers.iter().find(|(h, _)| *h == host) {
                Some((_, Some(status))) => Ok(RawResponse {
                    status: *status,
                    body: String::new(),
                }),
                _ => bail!("operation timed out"),
            }
        }
    }

    fn mirrors(names: &[&str]) -> Vec<Mirror> {
        names.iter().map(|&s| Mirror::from(s.to_owned())).collect()
    }

    #[tokio::test]
    async fn picks_first_ok_and_stops() {
        let probe = FakeProbe::new(vec![
            ("a.example", None),
            ("b.example", Some(StatusCode::OK)),
            ("c.example", Some(StatusCode::OK)),
        ]);
        let chosen = select_mirror(&probe, &mirrors(&["a.example", "b.example", "c.example"]))
            .await
            .unwrap();
        assert_eq!(chosen.to_string(), "b.example");
        assert_eq!(*probe.visited.borrow(), ["a.example", "b.example"]);
    }

    #[tokio::test]
    async fn non_ok_status_is_skipped() {
        let probe = FakeProbe::new(vec![
            ("a.example", Some(StatusCode::FORBIDDEN)),
            ("b.example", Some(StatusCode::OK)),
        ]);
        let chosen = select_mirror(&probe, &mirrors(&["a.example", "b.example"]))
            .await
            .unwrap();
        assert_eq!(chosen.to_string(), "b.example");
    }

    #[tokio::test]
    async fn fails_when_nothing_answers() {
        let probe = FakeProbe::new(vec![("a.example", Some(StatusCode::BAD_GATEWAY))]);
        let err = select_mirror(&probe, &mirrors(&["a.example", "b.example"]))
            .await
            .unwrap_err();
        assert_eq!(err.tried, 2);
        assert_eq!(probe.visited.borrow().len(), 2);
    }

    #[test]
    fn endpoint_urls() {
        let mirror = Mirror::from("ikuuu.de".to_owned());
        assert_eq!(mirror.login_url().unwrap().as_str(), "https://ikuuu.de/auth/login");
        assert_eq!(mirror.check_in_url().unwrap().as_str(), "https://ikuuu.de/user/checkin");
        assert_eq!(mirror.user_url().unwrap().as_str(), "https://ikuuu.de/user");
        assert_eq!(mirror.root_url().unwrap().as_str(), "https://ikuuu.de/");
    }

    #[test]
    fn default_order() {
        let defaults = Mirror::defaults();
        assert_eq!(defaults.first().unwrap().to_string(), "ikuuu.de");
        assert_eq!(defaults.last().unwrap().to_string(), "ikuuu.org");
    }
}
