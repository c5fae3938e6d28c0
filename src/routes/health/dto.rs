use serde::Serialize;
use utoipa::ToSchema;

#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    #[schema(example = "ok")]
    pub status: String,

    /// Whether the identity provider's verification key is loaded.
    pub identity_provider_loaded: bool,
}
