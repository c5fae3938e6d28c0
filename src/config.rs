use clap::Parser;

use crate::seed::SeedPlan;

/// Cookie the identity provider stores its session token in.
pub const SESSION_COOKIE: &str = "__session";

#[derive(Debug, Parser, Clone)]
#[clap(name = "school_api", about = "Sign-in gate for the school management app")]
pub struct ServerConfig {
    #[clap(long, env, default_value_t = 8080)]
    pub port: u16,

    #[clap(long, env, default_value_t = true)]
    pub swagger_enabled: bool,

    #[clap(long, env, default_value = "info")]
    pub log_level: String,

    /// HS256 secret of the identity provider. Without it the gate keeps
    /// answering with its loading state.
    #[clap(long, env)]
    pub jwt_secret: Option<String>,

    #[clap(long, env, default_value = "*")]
    pub cors_allowed_origins: String,

    #[clap(long, env, default_value = "local")]
    pub app_env: String,
}

#[derive(Debug, Parser, Clone)]
#[clap(name = "seed", about = "Reset and populate the school database with sample data")]
pub struct SeedConfig {
    #[clap(long, env)]
    pub database_url: String,

    #[clap(long, env, default_value = "info")]
    pub log_level: String,

    /// Create missing tables before seeding.
    #[clap(long, env = "SEED_CREATE_SCHEMA")]
    pub create_schema: bool,

    /// Check the consistency rules after seeding and fail on any violation.
    #[clap(long, env = "SEED_VERIFY")]
    pub verify: bool,

    /// Seed for the random field sampler, for reproducible datasets.
    #[clap(long, env = "SEED_RNG_SEED")]
    pub rng_seed: Option<u64>,

    #[clap(flatten)]
    pub plan: SeedPlan,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seed_config_reads_flags_and_plan_counts() {
        let config = SeedConfig::try_parse_from([
            "seed",
            "--database-url",
            "sqlite::memory:",
            "--verify",
            "--rng-seed",
            "42",
            "--students",
            "12",
        ])
        .unwrap();

        assert_eq!(config.database_url, "sqlite::memory:");
        assert!(config.verify);
        assert_eq!(config.rng_seed, Some(42));
        assert_eq!(config.plan.students, 12);
    }

    #[test]
    fn server_config_accepts_secret() {
        let config =
            ServerConfig::try_parse_from(["school_api", "--port", "9000", "--jwt-secret", "s3cret"])
                .unwrap();

        assert_eq!(config.port, 9000);
        assert_eq!(config.jwt_secret.as_deref(), Some("s3cret"));
    }
}
