// Bridge address resolution.
//
// Two paths: cloud N-UPnP discovery when the caller supplies nothing,
// or a probe of `GET http://{address}/api/` when an address is given.
// Both make exactly one network call.

use serde_json::Value;
use tracing::debug;
use url::Url;

use crate::error::Error;
use crate::transport::Transport;

/// The fixed cloud discovery endpoint. Returns a JSON array of
/// `{ "internalipaddress": "..." }` objects, one per bridge seen on the
/// caller's public IP.
pub const NUPNP_ENDPOINT: &str = "https://www.meethue.com/api/nupnp";

/// A bridge network address (host or host:port) that has either come
/// from cloud discovery or answered the API probe. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BridgeAddress(String);

impl BridgeAddress {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for BridgeAddress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Resolves a bridge address via cloud discovery or a direct probe.
pub struct BridgeLocator<'a> {
    transport: &'a Transport,
    nupnp_endpoint: String,
}

impl<'a> BridgeLocator<'a> {
    /// Locator using the default cloud discovery endpoint.
    pub fn new(transport: &'a Transport) -> Self {
        Self::with_endpoint(transport, NUPNP_ENDPOINT)
    }

    /// Locator with a custom discovery endpoint (the cloud host has
    /// moved over the years; also used to point tests at a mock server).
    pub fn with_endpoint(transport: &'a Transport, endpoint: impl Into<String>) -> Self {
        Self {
            transport,
            nupnp_endpoint: endpoint.into(),
        }
    }

    /// Resolve a bridge address.
    ///
    /// With `Some(address)` the address is probed and returned unchanged;
    /// with `None` the cloud discovery endpoint is consulted.
    pub async fn resolve(&self, address: Option<&str>) -> Result<BridgeAddress, Error> {
        match address {
            Some(addr) => self.probe(addr).await,
            None => self.discover().await,
        }
    }

    /// Ask the cloud endpoint for the first bridge on this network.
    ///
    /// Every failure mode -- request error, non-ok response, empty array,
    /// missing field -- collapses into [`Error::Discovery`].
    pub async fn discover(&self) -> Result<BridgeAddress, Error> {
        let envelope = self
            .transport
            .get(&self.nupnp_endpoint)
            .await
            .map_err(|e| Error::Discovery {
                message: e.to_string(),
            })?;

        if !envelope.ok {
            return Err(Error::Discovery {
                message: format!("discovery endpoint returned HTTP {}", envelope.status),
            });
        }

        let address = envelope
            .body
            .as_ref()
            .and_then(Value::as_array)
            .and_then(|bridges| bridges.first())
            .and_then(|bridge| bridge.get("internalipaddress"))
            .and_then(Value::as_str)
            .ok_or_else(|| Error::Discovery {
                message: "no bridge on this network (is it connected?)".into(),
            })?;

        debug!("discovered bridge at {address}");
        Ok(BridgeAddress(address.to_owned()))
    }

    /// Probe a user-supplied address against the bridge root config
    /// endpoint. The probe body is discarded; only ok/not-ok matters.
    pub async fn probe(&self, address: &str) -> Result<BridgeAddress, Error> {
        let url = probe_url(address)?;

        let envelope = self
            .transport
            .get(url.as_str())
            .await
            .map_err(|e| Error::InvalidAddress {
                address: address.to_owned(),
                message: e.to_string(),
            })?;

        if !envelope.ok {
            return Err(Error::InvalidAddress {
                address: address.to_owned(),
                message: format!("bridge probe returned HTTP {}", envelope.status),
            });
        }

        Ok(BridgeAddress(address.to_owned()))
    }
}

/// Build the probe URL, rejecting addresses that cannot form a valid URL
/// before any network call is made.
fn probe_url(address: &str) -> Result<Url, Error> {
    Url::parse(&format!("http://{address}/api/")).map_err(|e| Error::InvalidAddress {
        address: address.to_owned(),
        message: e.to_string(),
    })
}
