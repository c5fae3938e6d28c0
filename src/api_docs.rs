use utoipa::{
    Modify, OpenApi,
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
};

use crate::routes::{health, sign_in};

#[derive(OpenApi)]
#[openapi(
    paths(
        sign_in::route::index,
        sign_in::route::sign_in,
        health::route::health,
    ),
    components(schemas(health::dto::HealthResponse)),
    modifiers(&SecurityAddon),
    tags(
        (name = "Sign in", description = "Redirect gate in front of the role dashboards"),
        (name = "Health", description = "Liveness probe"),
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn both_gate_routes_document_bearer_auth() {
        let doc = ApiDoc::openapi();
        for path in ["/", "/sign-in"] {
            let operation = doc.paths.paths[path].get.as_ref().unwrap();
            let security = operation.security.as_ref().expect("no security on gate route");
            assert_eq!(security.len(), 1, "{path}");
        }

        let components = doc.components.unwrap();
        assert!(components.security_schemes.contains_key("bearer_auth"));
    }
}
