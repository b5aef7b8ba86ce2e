//! Instagram OAuth for creator account connection.
//!
//! Builds the authorize redirect, exchanges the returned code for an access
//! token, fetches the connected profile, and signs the `state` parameter that
//! ties a callback back to a creator.

pub mod client;
pub mod error;
pub mod state;
pub mod types;

pub use client::InstagramClient;
pub use error::OAuthError;
pub use state::{sign_state, verify_state, STATE_MAX_AGE_SECS};
pub use types::{AccessToken, InstagramProfile};
