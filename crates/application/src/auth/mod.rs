//! Request authentication and token refresh.
//!
//! This module provides:
//! - The bearer authenticator applied to every outgoing request
//! - The refresh exchange against the out-of-band refresh credential
//! - The gate that coalesces concurrent refreshes

mod authenticator;
mod gate;
mod refresh;

pub use authenticator::{authenticate, bearer};
pub use gate::RefreshGate;
pub use refresh::{DEFAULT_REFRESH_PATH, RefreshOutcome, TokenRefresher};
