//! Client side of the Juno backend.
//!
//! [`JunoBackend`] lists every backend operation the dashboard performs;
//! [`JunoClient`] implements it over HTTP.

pub mod backend;
pub mod client;
pub mod error;

pub use backend::JunoBackend;
pub use client::JunoClient;
pub use error::SdkError;
