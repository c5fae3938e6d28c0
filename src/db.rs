use std::time::Duration;

use anyhow::Context;
use sea_orm::{
    ConnectOptions, ConnectionTrait, Database, DatabaseConnection, DbErr, EntityTrait, Schema,
};

use crate::entities::prelude::*;
use crate::schema::{DependencyPlan, EntityKind};

pub async fn get_database_connection(database_url: &str) -> anyhow::Result<DatabaseConnection> {
    let mut options = ConnectOptions::new(database_url.to_owned());
    options
        .max_connections(10)
        .connect_timeout(Duration::from_secs(10))
        .sqlx_logging(false);

    let db = Database::connect(options)
        .await
        .context("Failed to connect to database")?;
    tracing::info!("Database connection established");
    Ok(db)
}

/// Create every table that does not exist yet, referenced tables first.
pub async fn create_schema<C: ConnectionTrait>(db: &C) -> anyhow::Result<()> {
    let plan = DependencyPlan::for_schema()?;
    for &kind in plan.creation_order() {
        create_table(db, kind)
            .await
            .with_context(|| format!("Failed to create table {kind}"))?;
    }
    tracing::info!("Schema ready ({} tables)", plan.creation_order().len());
    Ok(())
}

async fn create_table<C: ConnectionTrait>(db: &C, kind: EntityKind) -> Result<(), DbErr> {
    match kind {
        EntityKind::Admin => create_table_for(db, Admin).await,
        EntityKind::Subject => create_table_for(db, Subject).await,
        EntityKind::Teacher => create_table_for(db, Teacher).await,
        EntityKind::Grade => create_table_for(db, Grade).await,
        EntityKind::Class => create_table_for(db, Class).await,
        EntityKind::Parent => create_table_for(db, Parent).await,
        EntityKind::Student => create_table_for(db, Student).await,
        EntityKind::Announcement => create_table_for(db, Announcement).await,
        EntityKind::Event => create_table_for(db, Event).await,
        EntityKind::TeacherClass => create_table_for(db, TeacherClass).await,
        EntityKind::TeacherSubject => create_table_for(db, TeacherSubject).await,
        EntityKind::Lesson => create_table_for(db, Lesson).await,
        EntityKind::Assignment => create_table_for(db, Assignment).await,
        EntityKind::Exam => create_table_for(db, Exam).await,
        EntityKind::Attendance => create_table_for(db, Attendance).await,
        EntityKind::Result => create_table_for(db, ExamResult).await,
    }
}

async fn create_table_for<C, E>(db: &C, entity: E) -> Result<(), DbErr>
where
    C: ConnectionTrait,
    E: EntityTrait,
{
    let backend = db.get_database_backend();
    let mut statement = Schema::new(backend).create_table_from_entity(entity);
    statement.if_not_exists();
    db.execute(backend.build(&statement)).await?;
    Ok(())
}

#[cfg(test)]
pub(crate) mod test_support {
    use sea_orm::{ConnectOptions, Database, DatabaseConnection};

    /// Fresh in-memory sqlite database with the full schema.
    pub(crate) async fn memory_database() -> DatabaseConnection {
        let mut options = ConnectOptions::new("sqlite::memory:");
        options
            .max_connections(1)
            .min_connections(1)
            .sqlx_logging(false);

        let db = Database::connect(options)
            .await
            .expect("failed to open in-memory sqlite");
        super::create_schema(&db)
            .await
            .expect("failed to create schema");
        db
    }
}
