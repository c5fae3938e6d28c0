use std::process::ExitCode;

use clap::Parser;
use sea_orm::DatabaseConnection;
use school_service::config::SeedConfig;
use school_service::db::{create_schema, get_database_connection};
use school_service::seed::{RandomSampler, Seeder, verify_consistency};
use school_service::utils::tracing::init_standard_tracing;

#[tokio::main]
async fn main() -> ExitCode {
    dotenv::dotenv().ok();
    let config = SeedConfig::parse();

    init_standard_tracing(env!("CARGO_CRATE_NAME"), &config.log_level);

    let db = match get_database_connection(&config.database_url).await {
        Ok(db) => db,
        Err(e) => {
            tracing::error!("Error during seeding: {:#}", e);
            return ExitCode::FAILURE;
        }
    };

    let outcome = seed(&db, &config).await;

    if let Err(e) = db.close().await {
        tracing::warn!("Failed to close database connection: {}", e);
    }

    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("Error during seeding: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn seed(db: &DatabaseConnection, config: &SeedConfig) -> anyhow::Result<()> {
    if config.create_schema {
        create_schema(db).await?;
    }

    let mut seeder = Seeder::new(db, config.plan.clone());
    if let Some(rng_seed) = config.rng_seed {
        tracing::info!("Using fixed RNG seed {}", rng_seed);
        seeder = seeder.with_sampler(RandomSampler::from_seed(rng_seed));
    }

    let report = seeder.run().await?;
    tracing::info!(report = %serde_json::to_string(&report)?, "Seed report");

    if config.verify {
        let consistency = verify_consistency(db).await?;
        if !consistency.is_consistent() {
            anyhow::bail!(
                "seeded data violates {} consistency rules: {}",
                consistency.violations.len(),
                serde_json::to_string(&consistency.violations)?
            );
        }
        tracing::info!("Seeded data passed all consistency rules.");
    }

    Ok(())
}
