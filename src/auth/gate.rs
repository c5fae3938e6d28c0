//! What the sign-in route shows for a given session.

use super::claims::TokenClaims;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub user_id: String,
    pub role: Option<String>,
}

impl Identity {
    /// The role, if present and non-empty.
    pub fn role(&self) -> Option<&str> {
        self.role.as_deref().filter(|role| !role.is_empty())
    }
}

impl From<TokenClaims> for Identity {
    fn from(claims: TokenClaims) -> Self {
        Self {
            user_id: claims.sub,
            role: claims.public_metadata.role,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    /// The identity provider has not finished loading.
    Loading,
    SignedOut,
    SignedIn(Identity),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateView {
    Loading,
    SignInForm,
    /// Navigate to the role's landing path.
    Redirect(String),
    /// Signed in without a role, stay on the sign-in route.
    AlreadySignedIn,
}

pub fn resolve_view(state: &SessionState) -> GateView {
    match state {
        SessionState::Loading => GateView::Loading,
        SessionState::SignedOut => GateView::SignInForm,
        SessionState::SignedIn(identity) => match identity.role() {
            Some(role) => GateView::Redirect(role_path(role)),
            None => GateView::AlreadySignedIn,
        },
    }
}

/// `/{role}` with the role encoded as a single path segment.
pub fn role_path(role: &str) -> String {
    format!("/{}", urlencoding::encode(role))
}
