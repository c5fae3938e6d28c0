use sea_orm::{
    ActiveModelBehavior, ActiveModelTrait, ConnectionTrait, DbErr, EntityTrait, IntoActiveModel,
    PaginatorTrait, QueryOrder,
};

use crate::entities::prelude::*;
use crate::entities::{grade, subject};
use crate::schema::EntityKind;

/// Rows per `INSERT` statement, keeps bulk inserts under sqlite's bind limit.
const INSERT_BATCH_SIZE: usize = 200;

/// Persistence collaborator for the seeder: bulk delete per kind, bulk and
/// single inserts, find-all. Works on any connection or transaction handed
/// in by the caller.
pub struct SchoolRepository<'a, C> {
    db: &'a C,
}

impl<'a, C> SchoolRepository<'a, C>
where
    C: ConnectionTrait,
{
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    /// Delete every row of `kind`, returning the number of rows removed.
    pub async fn delete_all(&self, kind: EntityKind) -> Result<u64, DbErr> {
        let db = self.db;
        let result = match kind {
            EntityKind::Admin => Admin::delete_many().exec(db).await?,
            EntityKind::Subject => Subject::delete_many().exec(db).await?,
            EntityKind::Teacher => Teacher::delete_many().exec(db).await?,
            EntityKind::Grade => Grade::delete_many().exec(db).await?,
            EntityKind::Class => Class::delete_many().exec(db).await?,
            EntityKind::Parent => Parent::delete_many().exec(db).await?,
            EntityKind::Student => Student::delete_many().exec(db).await?,
            EntityKind::Announcement => Announcement::delete_many().exec(db).await?,
            EntityKind::Event => Event::delete_many().exec(db).await?,
            EntityKind::TeacherClass => TeacherClass::delete_many().exec(db).await?,
            EntityKind::TeacherSubject => TeacherSubject::delete_many().exec(db).await?,
            EntityKind::Lesson => Lesson::delete_many().exec(db).await?,
            EntityKind::Assignment => Assignment::delete_many().exec(db).await?,
            EntityKind::Exam => Exam::delete_many().exec(db).await?,
            EntityKind::Attendance => Attendance::delete_many().exec(db).await?,
            EntityKind::Result => ExamResult::delete_many().exec(db).await?,
        };
        Ok(result.rows_affected)
    }

    pub async fn count(&self, kind: EntityKind) -> Result<u64, DbErr> {
        let db = self.db;
        match kind {
            EntityKind::Admin => Admin::find().count(db).await,
            EntityKind::Subject => Subject::find().count(db).await,
            EntityKind::Teacher => Teacher::find().count(db).await,
            EntityKind::Grade => Grade::find().count(db).await,
            EntityKind::Class => Class::find().count(db).await,
            EntityKind::Parent => Parent::find().count(db).await,
            EntityKind::Student => Student::find().count(db).await,
            EntityKind::Announcement => Announcement::find().count(db).await,
            EntityKind::Event => Event::find().count(db).await,
            EntityKind::TeacherClass => TeacherClass::find().count(db).await,
            EntityKind::TeacherSubject => TeacherSubject::find().count(db).await,
            EntityKind::Lesson => Lesson::find().count(db).await,
            EntityKind::Assignment => Assignment::find().count(db).await,
            EntityKind::Exam => Exam::find().count(db).await,
            EntityKind::Attendance => Attendance::find().count(db).await,
            EntityKind::Result => ExamResult::find().count(db).await,
        }
    }

    /// Insert a single record and return it with its generated identifier.
    pub async fn create<A>(&self, model: A) -> Result<<A::Entity as EntityTrait>::Model, DbErr>
    where
        A: ActiveModelTrait + ActiveModelBehavior + Send + 'static,
        <A::Entity as EntityTrait>::Model: IntoActiveModel<A>,
    {
        model.insert(self.db).await
    }

    /// Insert many records without reading them back, in batches.
    pub async fn create_many<A>(&self, models: Vec<A>) -> Result<u64, DbErr>
    where
        A: ActiveModelTrait + Send + 'static,
        <A::Entity as EntityTrait>::Model: IntoActiveModel<A>,
    {
        let mut inserted = 0;
        let mut pending = models;
        while !pending.is_empty() {
            let take = pending.len().min(INSERT_BATCH_SIZE);
            let batch: Vec<A> = pending.drain(..take).collect();
            inserted += <A::Entity as EntityTrait>::insert_many(batch)
                .exec_without_returning(self.db)
                .await?;
        }
        Ok(inserted)
    }

    pub async fn find_all<E>(&self) -> Result<Vec<E::Model>, DbErr>
    where
        E: EntityTrait,
    {
        E::find().all(self.db).await
    }

    pub async fn find_grades(&self) -> Result<Vec<grade::Model>, DbErr> {
        Grade::find()
            .order_by_asc(grade::Column::Level)
            .all(self.db)
            .await
    }

    pub async fn find_subjects(&self) -> Result<Vec<subject::Model>, DbErr> {
        Subject::find()
            .order_by_asc(subject::Column::Id)
            .all(self.db)
            .await
    }
}
