// huelink-api: Async Rust client for Hue-style lighting bridges

pub mod client;
pub mod discovery;
pub mod error;
pub mod lights;
pub mod pairing;
pub mod transport;

pub use client::{BridgeClient, ClientConfig, Session};
pub use discovery::{BridgeAddress, BridgeLocator};
pub use error::Error;
pub use lights::{Light, LightState};
pub use pairing::{AppIdentity, Credential, CredentialManager, LinkPrompt};
pub use transport::{Envelope, Transport};
