use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use once_cell::sync::OnceCell;

use super::claims::TokenClaims;
use super::gate::{Identity, SessionState};

/// Verifies session tokens issued by the identity provider. Until the
/// verification key is loaded every session reads as [`SessionState::Loading`].
pub struct IdentityProvider {
    key: OnceCell<DecodingKey>,
    validation: Validation,
}

impl Default for IdentityProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl IdentityProvider {
    pub fn new() -> Self {
        Self {
            key: OnceCell::new(),
            validation: Validation::new(Algorithm::HS256),
        }
    }

    pub fn with_secret(secret: &[u8]) -> Self {
        let provider = Self::new();
        provider.load(secret);
        provider
    }

    /// Install the HS256 verification key. Only the first call takes effect.
    pub fn load(&self, secret: &[u8]) -> bool {
        self.key.set(DecodingKey::from_secret(secret)).is_ok()
    }

    pub fn is_loaded(&self) -> bool {
        self.key.get().is_some()
    }

    pub fn session_for(&self, token: Option<&str>) -> SessionState {
        let Some(key) = self.key.get() else {
            return SessionState::Loading;
        };
        let Some(token) = token.filter(|token| !token.is_empty()) else {
            return SessionState::SignedOut;
        };

        match decode::<TokenClaims>(token, key, &self.validation) {
            Ok(data) => SessionState::SignedIn(Identity::from(data.claims)),
            Err(err) => {
                tracing::debug!("Rejected session token: {}", err);
                SessionState::SignedOut
            }
        }
    }
}
