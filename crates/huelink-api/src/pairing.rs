// Credential establishment: validation of a supplied credential, or the
// press-button pairing handshake that mints a new one.

use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::discovery::BridgeAddress;
use crate::error::Error;
use crate::transport::Transport;

/// Identifies the application to the bridge at pairing time. The bridge
/// tags the minted credential with `"{app_name}#{device_name}"`; the
/// pair is never used again after that.
#[derive(Debug, Clone)]
pub struct AppIdentity {
    pub app_name: String,
    pub device_name: String,
}

impl AppIdentity {
    pub fn new(app_name: impl Into<String>, device_name: impl Into<String>) -> Self {
        Self {
            app_name: app_name.into(),
            device_name: device_name.into(),
        }
    }

    /// The `devicetype` string sent in the pairing request.
    fn devicetype(&self) -> String {
        format!("{}#{}", self.app_name, self.device_name)
    }
}

impl Default for AppIdentity {
    fn default() -> Self {
        Self::new("huelink", "default-device")
    }
}

/// An opaque bridge-issued access token, scoped to one bridge.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

// Tokens are secret material; keep them out of debug output.
impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Credential(<redacted>)")
    }
}

impl std::fmt::Display for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Strategy interface for the interactive part of the handshake.
///
/// The bridge requires a physical button press before it will mint a
/// credential. Interactive callers inject an implementation that tells
/// the operator what to do and then blocks until they confirm; headless
/// callers pass no prompt and poll [`CredentialManager::pair`] instead.
pub trait LinkPrompt {
    /// Tell the operator what to do (called before blocking).
    fn announce(&self, message: &str);

    /// Block until the operator signals that the button has been pressed.
    /// No timeout is imposed here; callers wanting one must wrap the call.
    fn wait_for_continue(&self);
}

#[derive(Serialize)]
struct PairRequest<'a> {
    devicetype: &'a str,
}

/// Validates a supplied credential or runs the pairing handshake.
pub struct CredentialManager<'a> {
    transport: &'a Transport,
}

impl<'a> CredentialManager<'a> {
    pub fn new(transport: &'a Transport) -> Self {
        Self { transport }
    }

    /// Establish a credential for `address`: validate `supplied` when
    /// present, otherwise run the handshake.
    pub async fn establish(
        &self,
        address: &BridgeAddress,
        supplied: Option<&str>,
        identity: &AppIdentity,
        prompt: Option<&dyn LinkPrompt>,
    ) -> Result<Credential, Error> {
        match supplied {
            Some(credential) => self.validate(address, credential).await,
            None => self.pair(address, identity, prompt).await,
        }
    }

    /// Check a credential against the bridge's config endpoint.
    ///
    /// Valid iff the response is ok AND the body is a JSON object AND
    /// that object contains a `config` key. The check is conjunctive:
    /// wrong type alone, or right type but missing key, fail identically.
    pub async fn validate(
        &self,
        address: &BridgeAddress,
        credential: &str,
    ) -> Result<Credential, Error> {
        let url = format!("http://{address}/api/{credential}");

        let envelope = self
            .transport
            .get(&url)
            .await
            .map_err(|e| Error::InvalidCredential {
                message: e.to_string(),
            })?;

        let authorized = envelope.ok
            && envelope
                .body
                .as_ref()
                .and_then(Value::as_object)
                .is_some_and(|obj| obj.contains_key("config"));

        if !authorized {
            return Err(Error::InvalidCredential {
                message: "bridge did not recognize this credential".into(),
            });
        }

        Ok(Credential(credential.to_owned()))
    }

    /// Run the press-button handshake and mint a new credential.
    ///
    /// POSTs `{"devicetype": "{app}#{device}"}` to the bridge root and
    /// extracts `[0].success.username` from the response. Any other
    /// shape -- the bridge's `[{"error": …}]` when the button has not
    /// been pressed, a transport failure, a non-ok status -- is
    /// [`Error::Handshake`]. The handshake is never retried internally;
    /// re-invoke after the physical button press.
    pub async fn pair(
        &self,
        address: &BridgeAddress,
        identity: &AppIdentity,
        prompt: Option<&dyn LinkPrompt>,
    ) -> Result<Credential, Error> {
        if let Some(prompt) = prompt {
            prompt.announce("Press the link button on the bridge to authenticate");
            prompt.wait_for_continue();
        }

        let url = format!("http://{address}/api/");
        let devicetype = identity.devicetype();

        let envelope = self
            .transport
            .post(&url, &PairRequest {
                devicetype: &devicetype,
            })
            .await
            .map_err(|e| Error::Handshake {
                message: e.to_string(),
            })?;

        // Success path is a one-element array: [{"success": {"username": …}}].
        let username = envelope
            .body
            .as_ref()
            .and_then(Value::as_array)
            .and_then(|entries| entries.first())
            .and_then(|entry| entry.get("success"))
            .and_then(|success| success.get("username"))
            .and_then(Value::as_str);

        let Some(username) = username else {
            return Err(Error::Handshake {
                message: "press the link button on the bridge, then retry; \
                          if you already have, check that the bridge is online \
                          and on the same network"
                    .into(),
            });
        };

        debug!("paired with bridge {address}");
        Ok(Credential(username.to_owned()))
    }
}
