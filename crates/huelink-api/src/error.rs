use thiserror::Error;

/// Top-level error type for the `huelink-api` crate.
///
/// Each bootstrap boundary (discovery, address probe, credential
/// establishment, light enumeration) collapses its failure modes into a
/// single variant, mirroring the bridge's own coarse reporting. The
/// `message` field preserves the underlying cause for humans; callers
/// pattern-match on the variant only.
#[derive(Debug, Error)]
pub enum Error {
    // ── Bootstrap ───────────────────────────────────────────────────
    /// Cloud discovery did not yield a bridge address (network failure,
    /// empty result, or malformed body -- all deliberately one kind).
    #[error("Bridge discovery failed: {message}")]
    Discovery { message: String },

    /// A user-supplied bridge address did not answer the API probe.
    #[error("Invalid bridge address '{address}': {message}")]
    InvalidAddress { address: String, message: String },

    /// A supplied credential was rejected by the bridge.
    #[error("Credential rejected by bridge: {message}")]
    InvalidCredential { message: String },

    /// The press-button pairing handshake did not yield a credential.
    /// Not retried internally -- press the link button and re-invoke.
    #[error("Pairing handshake failed: {message}")]
    Handshake { message: String },

    /// Light enumeration failed (non-ok response or non-object body).
    #[error("Light enumeration failed: {message}")]
    Registry { message: String },

    // ── Light operations ────────────────────────────────────────────
    /// The light ID is not in the last-enumerated set.
    #[error("Unknown light '{id}' -- not in the enumerated set")]
    UnknownLight { id: String },

    /// HTTP transport error during a light operation
    /// (connection refused, DNS failure, timeout, etc.)
    #[error("HTTP transport error: {0}")]
    Request(#[from] reqwest::Error),

    /// A read operation got a non-success status, so there is no body
    /// to decode. Write operations instead return the envelope as-is.
    #[error("Bridge returned HTTP {status} for {url}")]
    UnexpectedStatus { status: u16, url: String },

    /// JSON decoding of a bridge response failed.
    #[error("Could not decode bridge response: {message}")]
    Deserialization { message: String },
}

impl Error {
    /// Returns `true` if this error means the bridge's link button has
    /// not been pressed and re-invoking the pairing might resolve it.
    pub fn requires_link_button(&self) -> bool {
        matches!(self, Self::Handshake { .. })
    }

    /// Returns `true` if this is a transient transport error worth retrying.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Request(e) => e.is_timeout() || e.is_connect(),
            _ => false,
        }
    }
}
