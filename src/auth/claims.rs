use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
}

/// Session token claims issued by the identity provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenClaims {
    pub sub: String,
    pub exp: i64,
    #[serde(default, alias = "public_metadata")]
    pub public_metadata: PublicMetadata,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_camel_case_metadata() {
        let claims: TokenClaims = serde_json::from_str(
            r#"{"sub":"user_1","exp":1,"publicMetadata":{"role":"teacher"}}"#,
        )
        .unwrap();
        assert_eq!(claims.public_metadata.role.as_deref(), Some("teacher"));
    }

    #[test]
    fn metadata_is_optional() {
        let claims: TokenClaims = serde_json::from_str(r#"{"sub":"user_1","exp":1}"#).unwrap();
        assert_eq!(claims.public_metadata, PublicMetadata::default());

        let claims: TokenClaims =
            serde_json::from_str(r#"{"sub":"user_1","exp":1,"public_metadata":{}}"#).unwrap();
        assert!(claims.public_metadata.role.is_none());
    }
}
