use sea_orm::DbErr;

use crate::schema::{EntityKind, PlanError};

#[derive(Debug, thiserror::Error)]
pub enum SeedError {
    #[error(transparent)]
    Plan(#[from] PlanError),

    #[error("database error: {0}")]
    Database(#[from] DbErr),

    #[error("invalid seed plan: {0}")]
    InvalidPlan(String),

    #[error("cannot create {kind}: {dependency} has not been populated in this run")]
    MissingDependency {
        kind: EntityKind,
        dependency: EntityKind,
    },

    #[error("cannot create {kind}: no {dependency} record available to assign")]
    EmptyPool {
        kind: EntityKind,
        dependency: EntityKind,
    },

    #[error("cannot create {kind}: needs {required} {dependency} records but only {available} exist")]
    Insufficient {
        kind: EntityKind,
        dependency: EntityKind,
        required: usize,
        available: usize,
    },

    #[error("invalid date for {kind}: {detail}")]
    InvalidDate { kind: EntityKind, detail: String },
}
