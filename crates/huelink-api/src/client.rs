// Bridge client: bootstrap sequence and session state.
//
// `connect` runs the full bootstrap -- resolve address, establish
// credential, enumerate lights -- and hands back a ready client. Any
// bootstrap failure aborts construction; there is no partially-usable
// client. Light operations live in `lights.rs` as inherent methods.

use std::collections::{BTreeSet, HashMap};
use std::time::Duration;

use serde_json::Value;
use tracing::debug;

use crate::discovery::{BridgeAddress, BridgeLocator, NUPNP_ENDPOINT};
use crate::error::Error;
use crate::pairing::{AppIdentity, Credential, CredentialManager, LinkPrompt};
use crate::transport::{GET_TIMEOUT, Transport};

/// Construction-time options for [`BridgeClient::connect`].
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Bridge address (host or host:port). `None` triggers cloud discovery.
    pub address: Option<String>,
    /// Existing credential. `None` triggers the pairing handshake.
    pub credential: Option<String>,
    /// Application identity used only when a new credential is minted.
    pub identity: AppIdentity,
    /// Timeout applied to GET requests.
    pub get_timeout: Duration,
    /// Cloud discovery endpoint (overridable; the default host has moved
    /// over the years).
    pub discovery_endpoint: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            address: None,
            credential: None,
            identity: AppIdentity::default(),
            get_timeout: GET_TIMEOUT,
            discovery_endpoint: NUPNP_ENDPOINT.to_owned(),
        }
    }
}

/// Established bridge session: address, credential, and the derived
/// request prefix. Immutable after bootstrap.
#[derive(Clone)]
pub struct Session {
    address: BridgeAddress,
    credential: Credential,
    base_url: String,
}

impl Session {
    pub(crate) fn new(address: BridgeAddress, credential: Credential) -> Self {
        let base_url = format!("http://{address}/api/{credential}");
        Self {
            address,
            credential,
            base_url,
        }
    }

    pub fn address(&self) -> &BridgeAddress {
        &self.address
    }

    pub fn credential(&self) -> &Credential {
        &self.credential
    }

    pub(crate) fn lights_url(&self) -> String {
        format!("{}/lights/", self.base_url)
    }

    pub(crate) fn light_url(&self, id: &str) -> String {
        format!("{}/lights/{id}/", self.base_url)
    }

    pub(crate) fn light_state_url(&self, id: &str) -> String {
        format!("{}/lights/{id}/state", self.base_url)
    }
}

// The base URL embeds the credential; redact it like the credential itself.
impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("address", &self.address)
            .field("credential", &self.credential)
            .finish_non_exhaustive()
    }
}

/// Client for one lighting bridge.
///
/// All state is per-instance: two clients never share an address,
/// credential, or light set. Every light operation is an independent
/// blocking round trip; nothing is cached between calls.
#[derive(Debug)]
pub struct BridgeClient {
    pub(crate) transport: Transport,
    pub(crate) session: Session,
    lights: BTreeSet<String>,
    names: HashMap<String, String>,
}

impl BridgeClient {
    /// Bootstrap a client without an interactive prompt.
    ///
    /// If no credential is configured, the pairing handshake runs
    /// immediately -- headless callers poll this until the operator has
    /// pressed the link button (see [`Error::requires_link_button`]).
    pub async fn connect(config: ClientConfig) -> Result<Self, Error> {
        Self::bootstrap(config, None).await
    }

    /// Bootstrap a client, letting `prompt` walk the operator through
    /// the link-button press when a new credential must be minted.
    pub async fn connect_with_prompt(
        config: ClientConfig,
        prompt: &dyn LinkPrompt,
    ) -> Result<Self, Error> {
        Self::bootstrap(config, Some(prompt)).await
    }

    async fn bootstrap(
        config: ClientConfig,
        prompt: Option<&dyn LinkPrompt>,
    ) -> Result<Self, Error> {
        let transport = Transport::with_get_timeout(config.get_timeout)?;

        let locator = BridgeLocator::with_endpoint(&transport, config.discovery_endpoint.clone());
        let address = locator.resolve(config.address.as_deref()).await?;

        let manager = CredentialManager::new(&transport);
        let credential = manager
            .establish(
                &address,
                config.credential.as_deref(),
                &config.identity,
                prompt,
            )
            .await?;

        let mut client = Self {
            transport,
            session: Session::new(address, credential),
            lights: BTreeSet::new(),
            names: HashMap::new(),
        };
        client.refresh_lights().await?;

        debug!(
            bridge = %client.session.address(),
            lights = client.lights.len(),
            "bridge client ready"
        );
        Ok(client)
    }

    /// The established session (address, credential).
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// The light IDs from the last enumeration, in sorted order.
    pub fn light_ids(&self) -> impl Iterator<Item = &str> {
        self.lights.iter().map(String::as_str)
    }

    pub(crate) fn has_light(&self, id: &str) -> bool {
        self.lights.contains(id)
    }

    /// Re-enumerate the bridge's lights, replacing the snapshot taken at
    /// bootstrap. Lights added or removed on the bridge are not visible
    /// until this is called.
    pub async fn refresh_lights(&mut self) -> Result<(), Error> {
        let envelope = self
            .transport
            .get(&self.session.lights_url())
            .await
            .map_err(|e| Error::Registry {
                message: e.to_string(),
            })?;

        if !envelope.ok {
            return Err(Error::Registry {
                message: format!("bridge returned HTTP {}", envelope.status),
            });
        }

        // The light-ID set is exactly the key set of the returned object.
        let ids = envelope
            .body
            .as_ref()
            .and_then(Value::as_object)
            .ok_or_else(|| Error::Registry {
                message: "expected a JSON object keyed by light ID".into(),
            })?
            .keys()
            .cloned()
            .collect();

        self.lights = ids;
        Ok(())
    }

    /// Bind a friendly name to a light ID. Fails if the ID is not in the
    /// enumerated set.
    pub fn name_light(
        &mut self,
        name: impl Into<String>,
        id: impl Into<String>,
    ) -> Result<(), Error> {
        let id = id.into();
        if !self.has_light(&id) {
            return Err(Error::UnknownLight { id });
        }
        self.names.insert(name.into(), id);
        Ok(())
    }

    /// Look up the light ID bound to a friendly name.
    pub fn light_by_name(&self, name: &str) -> Option<&str> {
        self.names.get(name).map(String::as_str)
    }
}
