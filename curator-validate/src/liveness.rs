//! URL liveness checking.
//!
//! Policy per URL:
//! 1. Unparseable → error, stop.
//! 2. `http` scheme → warning, continue.
//! 3. Checks disabled → accept.
//! 4. Any scheme other than `http`/`https` → error, stop.
//! 5. `HEAD` probe; on failure or non-2xx, one `GET` retry. Only the retry's
//!    outcome can produce an error, and a timeout is reported as such.

use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use url::Url;

use curator_core::Record;

use crate::ValidateError;

/// Default per-request bound for a liveness probe.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Label used for a record's main URL in messages.
pub const MAIN_URL_LABEL: &str = "url";

/// Liveness settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LivenessConfig {
    /// When `false` no network request is made; a URL that parses is accepted.
    pub enabled: bool,
    pub timeout: Duration,
}

impl Default for LivenessConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

/// Request method used by a probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProbeMethod {
    Head,
    Get,
}

/// Why a probe produced no status at all.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeError {
    Timeout,
    Transport(String),
}

/// One network round trip returning the HTTP status code.
#[async_trait]
pub trait Probe: Send + Sync {
    async fn probe(&self, method: ProbeMethod, url: &Url) -> Result<u16, ProbeError>;
}

/// [`Probe`] backed by a shared `reqwest` client.
pub struct HttpProbe {
    client: reqwest::Client,
}

impl HttpProbe {
    pub fn new(timeout: Duration) -> Result<Self, ValidateError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .redirect(reqwest::redirect::Policy::limited(10))
            .user_agent(concat!("curator/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl Probe for HttpProbe {
    async fn probe(&self, method: ProbeMethod, url: &Url) -> Result<u16, ProbeError> {
        let request = match method {
            ProbeMethod::Head => self.client.head(url.clone()),
            ProbeMethod::Get => self.client.get(url.clone()),
        };
        match request.send().await {
            Ok(response) => Ok(response.status().as_u16()),
            Err(err) if err.is_timeout() => Err(ProbeError::Timeout),
            Err(err) => Err(ProbeError::Transport(err.to_string())),
        }
    }
}

/// Outcome of checking one or more URLs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct UrlCheck {
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl UrlCheck {
    fn merge(&mut self, other: UrlCheck) {
        self.errors.extend(other.errors);
        self.warnings.extend(other.warnings);
    }
}

/// Applies the liveness policy through a [`Probe`].
pub struct UrlChecker<P = HttpProbe> {
    probe: P,
    config: LivenessConfig,
}

impl UrlChecker<HttpProbe> {
    /// Checker backed by real HTTP requests.
    pub fn http(config: LivenessConfig) -> Result<Self, ValidateError> {
        Ok(Self {
            probe: HttpProbe::new(config.timeout)?,
            config,
        })
    }
}

impl<P: Probe> UrlChecker<P> {
    pub fn with_probe(probe: P, config: LivenessConfig) -> Self {
        Self { probe, config }
    }

    pub fn config(&self) -> &LivenessConfig {
        &self.config
    }

    /// Check a single URL; `label` prefixes every message (`url`, `links.github`).
    pub async fn check(&self, label: &str, raw: &str) -> UrlCheck {
        let mut out = UrlCheck::default();
        let url = match Url::parse(raw) {
            Ok(url) => url,
            Err(err) => {
                out.errors.push(format!("{label}: invalid URL '{raw}' ({err})"));
                return out;
            }
        };

        if url.scheme() == "http" {
            out.warnings
                .push(format!("{label}: {raw} uses unencrypted http, prefer https"));
        }
        if !self.config.enabled {
            return out;
        }
        if !matches!(url.scheme(), "http" | "https") {
            out.errors.push(format!(
                "{label}: unsupported protocol '{}' in {raw}",
                url.scheme()
            ));
            return out;
        }

        match self.probe.probe(ProbeMethod::Head, &url).await {
            Ok(status) if is_success(status) => return out,
            Ok(status) => {
                tracing::debug!(url = %raw, status, "HEAD rejected, retrying with GET");
            }
            Err(err) => {
                tracing::debug!(url = %raw, ?err, "HEAD failed, retrying with GET");
            }
        }

        match self.probe.probe(ProbeMethod::Get, &url).await {
            Ok(status) if is_success(status) => {}
            Ok(status) => out
                .errors
                .push(format!("{label}: {raw} responded with HTTP {status}")),
            Err(ProbeError::Timeout) => out.errors.push(format!(
                "{label}: {raw} timed out after {}s",
                self.config.timeout.as_secs()
            )),
            Err(ProbeError::Transport(msg)) => out
                .errors
                .push(format!("{label}: {raw} is unreachable ({msg})")),
        }
        out
    }

    /// Check a record's main URL and every entry in `links`, one at a time.
    pub async fn check_record(&self, record: &Record) -> UrlCheck {
        let mut out = self.check(MAIN_URL_LABEL, &record.url).await;
        if let Some(links) = &record.links {
            for (key, url) in links.entries() {
                let label = format!("links.{key}");
                out.merge(self.check(&label, url).await);
            }
        }
        out
    }
}

fn is_success(status: u16) -> bool {
    (200..300).contains(&status)
}
