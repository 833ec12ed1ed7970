//! CLI error types with miette diagnostics.
//!
//! Maps `huelink_api::Error` variants into user-facing errors with
//! actionable help text and stable exit codes.

use miette::Diagnostic;
use thiserror::Error;

use huelink_api::Error as ApiError;

/// Exit codes, stable for scripting.
pub mod exit_code {
    pub const SUCCESS: i32 = 0;
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const CONNECTION: i32 = 7;
}

#[derive(Debug, Error, Diagnostic)]
#[allow(dead_code)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────

    #[error("No bridge found on this network")]
    #[diagnostic(
        code(huelink::discovery_failed),
        help(
            "Check that the bridge is powered and on the same network.\n\
             If you know its address, pass it with --bridge (-b)."
        )
    )]
    DiscoveryFailed { reason: String },

    #[error("Could not reach a bridge at '{address}'")]
    #[diagnostic(
        code(huelink::bridge_unreachable),
        help("Verify the address, or drop --bridge to use cloud discovery.")
    )]
    BridgeUnreachable { address: String, reason: String },

    // ── Authentication ───────────────────────────────────────────────

    #[error("The bridge rejected this credential")]
    #[diagnostic(
        code(huelink::auth_failed),
        help(
            "Re-pair with the bridge: huelink pair --save\n\
             Or set HUE_CREDENTIAL to a valid credential."
        )
    )]
    AuthFailed { reason: String },

    #[error("Pairing failed -- the bridge's link button was not pressed")]
    #[diagnostic(
        code(huelink::pairing_required),
        help("Press the round link button on the bridge, then run the command again.")
    )]
    PairingRequired { reason: String },

    // ── Resources ────────────────────────────────────────────────────

    #[error("Light '{id}' not found")]
    #[diagnostic(
        code(huelink::light_not_found),
        help("Run: huelink lights list to see available lights")
    )]
    LightNotFound { id: String },

    // ── API ──────────────────────────────────────────────────────────

    #[error("Bridge request failed: {message}")]
    #[diagnostic(code(huelink::api_error))]
    Api { message: String },

    #[error("The bridge rejected the change (HTTP {status})")]
    #[diagnostic(
        code(huelink::rejected),
        help("The bridge validates values itself; check the range for this field.")
    )]
    Rejected { status: u16 },

    // ── Validation ───────────────────────────────────────────────────

    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(huelink::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────

    #[error(transparent)]
    #[diagnostic(code(huelink::config))]
    Config(Box<figment::Error>),

    // ── IO / Serialization ───────────────────────────────────────────

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Invalid JSON: {0}")]
    #[diagnostic(code(huelink::json))]
    Json(#[from] serde_json::Error),
}

impl From<figment::Error> for CliError {
    fn from(err: figment::Error) -> Self {
        Self::Config(Box::new(err))
    }
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::DiscoveryFailed { .. } | Self::BridgeUnreachable { .. } => exit_code::CONNECTION,
            Self::AuthFailed { .. } | Self::PairingRequired { .. } => exit_code::AUTH,
            Self::LightNotFound { .. } => exit_code::NOT_FOUND,
            Self::Validation { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }
}

// ── ApiError → CliError mapping ──────────────────────────────────────

impl From<ApiError> for CliError {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::Discovery { message } => CliError::DiscoveryFailed { reason: message },

            ApiError::InvalidAddress { address, message } => CliError::BridgeUnreachable {
                address,
                reason: message,
            },

            ApiError::InvalidCredential { message } => CliError::AuthFailed { reason: message },

            ApiError::Handshake { message } => CliError::PairingRequired { reason: message },

            ApiError::UnknownLight { id } => CliError::LightNotFound { id },

            ApiError::UnexpectedStatus { status, .. } => CliError::Rejected { status },

            other @ (ApiError::Registry { .. }
            | ApiError::Request(_)
            | ApiError::Deserialization { .. }) => CliError::Api {
                message: other.to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{CliError, exit_code};
    use huelink_api::Error as ApiError;

    #[test]
    fn pairing_errors_exit_with_auth_code() {
        let err: CliError = ApiError::Handshake {
            message: "button not pressed".into(),
        }
        .into();
        assert_eq!(err.exit_code(), exit_code::AUTH);
    }

    #[test]
    fn unknown_light_exits_with_not_found() {
        let err: CliError = ApiError::UnknownLight { id: "9".into() }.into();
        assert_eq!(err.exit_code(), exit_code::NOT_FOUND);
    }
}
