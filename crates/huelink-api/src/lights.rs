// Light operations, implemented as inherent methods on `BridgeClient`.
//
// One uniform pattern: reads GET the light resource and decode it;
// writes PUT a single-field JSON payload to the light's `/state`
// sub-resource and hand the envelope back untouched. State is never
// cached -- every call is a fresh round trip.

use serde::{Deserialize, Serialize};

use crate::client::BridgeClient;
use crate::error::Error;
use crate::transport::Envelope;

/// Bridge-held state of one light.
///
/// Numeric ranges (`bri`/`sat` 0-254, `hue` 0-65535) are enforced by the
/// bridge, not here; lights without color support may omit `sat`/`hue`,
/// which decode as zero.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LightState {
    pub on: bool,
    #[serde(default)]
    pub bri: u8,
    #[serde(default)]
    pub sat: u8,
    #[serde(default)]
    pub hue: u16,
}

/// A light as the bridge describes it. Fields beyond name and state are
/// bridge-specific and ignored.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Light {
    #[serde(default)]
    pub name: String,
    pub state: LightState,
}

impl BridgeClient {
    // ── Reads ────────────────────────────────────────────────────────

    /// Fetch a light's full descriptor.
    pub async fn light(&self, id: &str) -> Result<Light, Error> {
        self.require_light(id)?;

        let url = self.session.light_url(id);
        let envelope = self.transport.get(&url).await?;
        let body = expect_body(envelope, &url)?;

        serde_json::from_value(body).map_err(|e| Error::Deserialization {
            message: e.to_string(),
        })
    }

    /// Fetch a light's `state` sub-object.
    pub async fn state(&self, id: &str) -> Result<LightState, Error> {
        Ok(self.light(id).await?.state)
    }

    pub async fn is_on(&self, id: &str) -> Result<bool, Error> {
        Ok(self.state(id).await?.on)
    }

    pub async fn brightness(&self, id: &str) -> Result<u8, Error> {
        Ok(self.state(id).await?.bri)
    }

    pub async fn saturation(&self, id: &str) -> Result<u8, Error> {
        Ok(self.state(id).await?.sat)
    }

    pub async fn hue(&self, id: &str) -> Result<u16, Error> {
        Ok(self.state(id).await?.hue)
    }

    // ── Writes ───────────────────────────────────────────────────────
    //
    // Writes return the bridge's envelope unmodified: a non-ok envelope
    // (the bridge's own validation rejecting a value, for instance)
    // surfaces to the caller without an `Err`. Only transport failures
    // and unknown IDs are errors.

    pub async fn set_on(&self, id: &str, on: bool) -> Result<Envelope, Error> {
        #[derive(Serialize)]
        struct Body {
            on: bool,
        }

        self.put_state(id, &Body { on }).await
    }

    pub async fn turn_on(&self, id: &str) -> Result<Envelope, Error> {
        self.set_on(id, true).await
    }

    pub async fn turn_off(&self, id: &str) -> Result<Envelope, Error> {
        self.set_on(id, false).await
    }

    /// Read the light's current `on` state, then write its negation.
    ///
    /// Two round trips, not atomic: a concurrent external mutation
    /// between them is a lost update. Known limitation, not remediated.
    pub async fn toggle(&self, id: &str) -> Result<Envelope, Error> {
        let on = self.is_on(id).await?;
        self.set_on(id, !on).await
    }

    /// Max meaningful value: 254.
    pub async fn set_brightness(&self, id: &str, bri: u8) -> Result<Envelope, Error> {
        #[derive(Serialize)]
        struct Body {
            bri: u8,
        }

        self.put_state(id, &Body { bri }).await
    }

    /// Max meaningful value: 254.
    pub async fn set_saturation(&self, id: &str, sat: u8) -> Result<Envelope, Error> {
        #[derive(Serialize)]
        struct Body {
            sat: u8,
        }

        self.put_state(id, &Body { sat }).await
    }

    /// Full range: 0-65535 (wraps around the color wheel).
    pub async fn set_hue(&self, id: &str, hue: u16) -> Result<Envelope, Error> {
        #[derive(Serialize)]
        struct Body {
            hue: u16,
        }

        self.put_state(id, &Body { hue }).await
    }

    // ── Helpers ──────────────────────────────────────────────────────

    async fn put_state(&self, id: &str, body: &impl Serialize) -> Result<Envelope, Error> {
        self.require_light(id)?;
        let url = self.session.light_state_url(id);
        Ok(self.transport.put(&url, body).await?)
    }

    fn require_light(&self, id: &str) -> Result<(), Error> {
        if self.has_light(id) {
            Ok(())
        } else {
            Err(Error::UnknownLight { id: id.to_owned() })
        }
    }
}

fn expect_body(envelope: Envelope, url: &str) -> Result<serde_json::Value, Error> {
    if !envelope.ok {
        return Err(Error::UnexpectedStatus {
            status: envelope.status,
            url: url.to_owned(),
        });
    }
    envelope.body.ok_or_else(|| Error::Deserialization {
        message: "bridge response was not JSON".into(),
    })
}
