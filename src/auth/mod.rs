//! Sign-in redirect gate over identity-provider sessions.

pub mod claims;
pub mod gate;
pub mod provider;

pub use claims::{PublicMetadata, TokenClaims};
pub use gate::{GateView, Identity, SessionState, resolve_view, role_path};
pub use provider::IdentityProvider;
