// Shared HTTP transport for all bridge requests.
//
// Wraps `reqwest::Client` behind three verbs (GET/PUT/POST) that all
// return a normalized [`Envelope`]. Higher layers re-express transport
// failures as their own domain error kind -- raw `reqwest` errors never
// cross the crate API unwrapped.

use std::time::Duration;

use serde::Serialize;
use serde_json::Value;
use tracing::debug;

/// GET requests carry a fixed timeout; writes do not (the bridge can be
/// slow to apply state changes, and a write cut off mid-flight is worse
/// than a slow one).
pub const GET_TIMEOUT: Duration = Duration::from_secs(10);

/// Normalized view of a bridge HTTP response.
///
/// `ok` is `true` iff the status code indicates success; `body` holds
/// the parsed JSON and is present only when `ok` (and the body parsed).
#[derive(Debug, Clone)]
pub struct Envelope {
    pub status: u16,
    pub ok: bool,
    pub body: Option<Value>,
}

impl Envelope {
    async fn read(resp: reqwest::Response) -> Self {
        let status = resp.status();
        let ok = status.is_success();
        let body = if ok {
            resp.json::<Value>().await.ok()
        } else {
            None
        };
        Self {
            status: status.as_u16(),
            ok,
            body,
        }
    }
}

/// Blocking-style request issuer: one request in flight at a time, no
/// background tasks, no retries.
#[derive(Debug, Clone)]
pub struct Transport {
    http: reqwest::Client,
    get_timeout: Duration,
}

impl Transport {
    /// Build a transport with the default GET timeout.
    pub fn new() -> Result<Self, reqwest::Error> {
        Self::with_get_timeout(GET_TIMEOUT)
    }

    /// Build a transport with a custom GET timeout.
    pub fn with_get_timeout(get_timeout: Duration) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("huelink/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { http, get_timeout })
    }

    /// Send a GET request (with the fixed timeout) and normalize the response.
    pub async fn get(&self, url: &str) -> Result<Envelope, reqwest::Error> {
        debug!("GET {url}");

        let resp = self
            .http
            .get(url)
            .timeout(self.get_timeout)
            .send()
            .await?;

        Ok(Envelope::read(resp).await)
    }

    /// Send a PUT request with a JSON body and normalize the response.
    pub async fn put(
        &self,
        url: &str,
        body: &impl Serialize,
    ) -> Result<Envelope, reqwest::Error> {
        debug!("PUT {url}");

        let resp = self.http.put(url).json(body).send().await?;
        Ok(Envelope::read(resp).await)
    }

    /// Send a POST request with a JSON body and normalize the response.
    pub async fn post(
        &self,
        url: &str,
        body: &impl Serialize,
    ) -> Result<Envelope, reqwest::Error> {
        debug!("POST {url}");

        let resp = self.http.post(url).json(body).send().await?;
        Ok(Envelope::read(resp).await)
    }
}
