//! Reset-and-populate procedure for the school database.
//!
//! A run deletes every kind in reverse dependency order, then creates the
//! sample dataset kind by kind in dependency order. Foreign keys are always
//! taken from records created earlier in the same run, never re-queried.

pub mod consistency;
pub mod error;
pub mod plan;
pub mod strategy;

use std::collections::{BTreeMap, BTreeSet};

use chrono::{Datelike, Days, NaiveDate, NaiveDateTime, Utc};
use sea_orm::{ConnectionTrait, Set};
use serde::Serialize;
use uuid::Uuid;

use crate::entities::sea_orm_active_enums::{Day, UserSex};
use crate::entities::{
    admin, announcement, assignment, attendance, class, event, exam, grade, lesson, parent,
    result, student, subject, teacher, teacher_class, teacher_subject,
};
use crate::repositories::SchoolRepository;
use crate::schema::{DependencyPlan, EntityKind};

pub use consistency::{ConsistencyReport, Violation, verify_consistency};
pub use error::SeedError;
pub use plan::SeedPlan;
pub use strategy::{AssignmentPolicy, FieldSampler, RandomSampler, RoundRobin};

const LESSON_START: (i32, u32, u32) = (2025, 9, 1);
const EXAM_START: (i32, u32, u32) = (2025, 10, 1);
const EVENT_DATE: (i32, u32, u32) = (2025, 11, 1);
const ASSIGNMENT_DURATION_DAYS: usize = 7;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SeedReport {
    pub deleted: BTreeMap<EntityKind, u64>,
    pub created: BTreeMap<EntityKind, usize>,
}

impl SeedReport {
    pub fn created(&self, kind: EntityKind) -> usize {
        self.created.get(&kind).copied().unwrap_or(0)
    }
}

/// Records created so far in the current run.
#[derive(Default)]
struct SeedContext {
    populated: BTreeSet<EntityKind>,
    grades: Vec<grade::Model>,
    subjects: Vec<subject::Model>,
    teachers: Vec<teacher::Model>,
    classes: Vec<class::Model>,
    parents: Vec<parent::Model>,
    students: Vec<student::Model>,
    lessons: Vec<lesson::Model>,
    exams: Vec<exam::Model>,
    assignments: Vec<assignment::Model>,
}

pub struct Seeder<'a, C> {
    repo: SchoolRepository<'a, C>,
    plan: SeedPlan,
    sampler: Box<dyn FieldSampler>,
    policy: Box<dyn AssignmentPolicy>,
}

impl<'a, C> Seeder<'a, C>
where
    C: ConnectionTrait,
{
    pub fn new(db: &'a C, plan: SeedPlan) -> Self {
        Self {
            repo: SchoolRepository::new(db),
            plan,
            sampler: Box::new(RandomSampler::from_entropy()),
            policy: Box::new(RoundRobin),
        }
    }

    pub fn with_sampler(mut self, sampler: impl FieldSampler + 'static) -> Self {
        self.sampler = Box::new(sampler);
        self
    }

    pub fn with_policy(mut self, policy: impl AssignmentPolicy + 'static) -> Self {
        self.policy = Box::new(policy);
        self
    }

    pub async fn run(&mut self) -> Result<SeedReport, SeedError> {
        self.plan.validate()?;
        let order = DependencyPlan::for_schema()?;
        let mut report = SeedReport::default();

        tracing::info!("Starting database seeding...");

        tracing::info!("Deleting existing data...");
        for kind in order.deletion_order() {
            let rows = self.repo.delete_all(kind).await?;
            tracing::debug!(%kind, rows, "Deleted rows");
            report.deleted.insert(kind, rows);
        }
        tracing::info!("Finished deleting data.");

        let mut ctx = SeedContext::default();
        for &kind in order.creation_order() {
            let created = self.populate(kind, &mut ctx).await?;
            report.created.insert(kind, created);
        }

        tracing::info!("Seeding completed successfully.");
        Ok(report)
    }

    async fn populate(&mut self, kind: EntityKind, ctx: &mut SeedContext) -> Result<usize, SeedError> {
        if let Some(&dependency) = kind
            .dependencies()
            .iter()
            .find(|dependency| !ctx.populated.contains(*dependency))
        {
            return Err(SeedError::MissingDependency { kind, dependency });
        }

        let created = match kind {
            EntityKind::Admin => self.seed_admins().await?,
            EntityKind::Grade => self.seed_grades(ctx).await?,
            EntityKind::Subject => self.seed_subjects(ctx).await?,
            EntityKind::Teacher => self.seed_teachers(ctx).await?,
            EntityKind::Class => self.seed_classes(ctx).await?,
            EntityKind::TeacherSubject => self.seed_teacher_subjects(ctx).await?,
            EntityKind::TeacherClass => self.seed_teacher_classes(ctx).await?,
            EntityKind::Parent => self.seed_parents(ctx).await?,
            EntityKind::Student => self.seed_students(ctx).await?,
            EntityKind::Lesson => self.seed_lessons(ctx).await?,
            EntityKind::Exam => self.seed_exams(ctx).await?,
            EntityKind::Assignment => self.seed_assignments(ctx).await?,
            EntityKind::Result => self.seed_results(ctx).await?,
            EntityKind::Attendance => self.seed_attendance(ctx).await?,
            EntityKind::Event => self.seed_events(ctx).await?,
            EntityKind::Announcement => self.seed_announcements(ctx).await?,
        };

        ctx.populated.insert(kind);
        Ok(created)
    }

    /// Pick the record of `pool` the policy assigns to the `index`-th new row.
    fn assign<'p, T>(
        &self,
        pool: &'p [T],
        index: usize,
        kind: EntityKind,
        dependency: EntityKind,
    ) -> Result<&'p T, SeedError> {
        self.policy
            .pick(index, pool.len())
            .and_then(|position| pool.get(position))
            .ok_or(SeedError::EmptyPool { kind, dependency })
    }

    async fn seed_admins(&mut self) -> Result<usize, SeedError> {
        let admins: Vec<admin::ActiveModel> = (1..=self.plan.admins)
            .map(|i| admin::ActiveModel {
                id: Set(Uuid::new_v4()),
                username: Set(format!("admin{i}")),
            })
            .collect();

        let created = self.repo.create_many(admins).await? as usize;
        tracing::info!("Created {} admins.", created);
        Ok(created)
    }

    async fn seed_grades(&mut self, ctx: &mut SeedContext) -> Result<usize, SeedError> {
        let grades: Vec<grade::ActiveModel> = (1..=self.plan.grades)
            .map(|level| grade::ActiveModel {
                level: Set(level as i32),
                ..Default::default()
            })
            .collect();

        self.repo.create_many(grades).await?;
        ctx.grades = self.repo.find_grades().await?;
        tracing::info!("Created {} grades.", ctx.grades.len());
        Ok(ctx.grades.len())
    }

    async fn seed_subjects(&mut self, ctx: &mut SeedContext) -> Result<usize, SeedError> {
        let subjects: Vec<subject::ActiveModel> = plan::SUBJECT_NAMES
            .iter()
            .take(self.plan.subjects)
            .map(|name| subject::ActiveModel {
                name: Set(name.to_string()),
                ..Default::default()
            })
            .collect();

        self.repo.create_many(subjects).await?;
        ctx.subjects = self.repo.find_subjects().await?;
        tracing::info!("Created {} subjects.", ctx.subjects.len());
        Ok(ctx.subjects.len())
    }

    async fn seed_teachers(&mut self, ctx: &mut SeedContext) -> Result<usize, SeedError> {
        let now = Utc::now().naive_utc();
        let birthday = day_at(EntityKind::Teacher, (now.year() - 30, 1, 1), 0, 0)?;

        for i in 1..=self.plan.teachers {
            let teacher = teacher::ActiveModel {
                id: Set(Uuid::new_v4()),
                username: Set(format!("teacher{i}")),
                name: Set(format!("TName{i}")),
                surname: Set(format!("TSurname{i}")),
                email: Set(Some(format!("teacher{i}@example.com"))),
                phone: Set(Some(format!("123-456-789{i}"))),
                address: Set(format!("Address{i}")),
                img: Set(None),
                blood_type: Set("A+".to_string()),
                sex: Set(UserSex::from_index(i)),
                birthday: Set(birthday),
                created_at: Set(now),
            };
            ctx.teachers.push(self.repo.create(teacher).await?);
        }

        tracing::info!("Created {} teachers.", ctx.teachers.len());
        Ok(ctx.teachers.len())
    }

    /// One class per grade, supervised 1:1 by the first teachers.
    async fn seed_classes(&mut self, ctx: &mut SeedContext) -> Result<usize, SeedError> {
        let required = ctx.grades.len();
        if ctx.teachers.len() < required {
            return Err(SeedError::Insufficient {
                kind: EntityKind::Class,
                dependency: EntityKind::Teacher,
                required,
                available: ctx.teachers.len(),
            });
        }

        for (grade, supervisor) in ctx.grades.iter().zip(&ctx.teachers) {
            let class = class::ActiveModel {
                name: Set(format!("{}A", grade.level)),
                capacity: Set(self.sampler.class_capacity()),
                grade_id: Set(grade.id),
                supervisor_id: Set(Some(supervisor.id)),
                ..Default::default()
            };
            ctx.classes.push(self.repo.create(class).await?);
        }

        tracing::info!("Created {} classes.", ctx.classes.len());
        Ok(ctx.classes.len())
    }

    async fn seed_teacher_subjects(&mut self, ctx: &mut SeedContext) -> Result<usize, SeedError> {
        let mut links = Vec::with_capacity(ctx.teachers.len());
        for (i, teacher) in ctx.teachers.iter().enumerate() {
            let subject = self.assign(&ctx.subjects, i, EntityKind::TeacherSubject, EntityKind::Subject)?;
            links.push(teacher_subject::ActiveModel {
                teacher_id: Set(teacher.id),
                subject_id: Set(subject.id),
            });
        }

        let created = self.repo.create_many(links).await? as usize;
        tracing::info!("Created {} teacher-subject relationships.", created);
        Ok(created)
    }

    async fn seed_teacher_classes(&mut self, ctx: &mut SeedContext) -> Result<usize, SeedError> {
        let mut links = Vec::with_capacity(ctx.teachers.len());
        for (i, teacher) in ctx.teachers.iter().enumerate() {
            let class = self.assign(&ctx.classes, i, EntityKind::TeacherClass, EntityKind::Class)?;
            links.push(teacher_class::ActiveModel {
                teacher_id: Set(teacher.id),
                class_id: Set(class.id),
            });
        }

        let created = self.repo.create_many(links).await? as usize;
        tracing::info!("Created {} teacher-class relationships.", created);
        Ok(created)
    }

    async fn seed_parents(&mut self, ctx: &mut SeedContext) -> Result<usize, SeedError> {
        let now = Utc::now().naive_utc();

        for i in 1..=self.plan.parents {
            let parent = parent::ActiveModel {
                id: Set(Uuid::new_v4()),
                username: Set(format!("parent{i}")),
                name: Set(format!("PName {i}")),
                surname: Set(format!("PSurname {i}")),
                email: Set(Some(format!("parent{i}@example.com"))),
                phone: Set(format!("987-654-00{i:02}")),
                address: Set(format!("Address{i}")),
                created_at: Set(now),
            };
            ctx.parents.push(self.repo.create(parent).await?);
        }

        tracing::info!("Created {} parents.", ctx.parents.len());
        Ok(ctx.parents.len())
    }

    /// A student's grade is always taken from the class it is placed in.
    async fn seed_students(&mut self, ctx: &mut SeedContext) -> Result<usize, SeedError> {
        let now = Utc::now().naive_utc();
        let birthday = day_at(EntityKind::Student, (now.year() - 10, 1, 1), 0, 0)?;

        for i in 1..=self.plan.students {
            let parent = self.assign(&ctx.parents, i - 1, EntityKind::Student, EntityKind::Parent)?;
            let class = self.assign(&ctx.classes, i - 1, EntityKind::Student, EntityKind::Class)?;

            let student = student::ActiveModel {
                id: Set(Uuid::new_v4()),
                username: Set(format!("student{i}")),
                name: Set(format!("SName{i}")),
                surname: Set(format!("SSurname {i}")),
                email: Set(Some(format!("student{i}@example.com"))),
                phone: Set(Some(format!("987-654-321{i}"))),
                address: Set(format!("Address{i}")),
                img: Set(None),
                blood_type: Set("O-".to_string()),
                sex: Set(UserSex::from_index(i)),
                birthday: Set(birthday),
                parent_id: Set(parent.id),
                class_id: Set(class.id),
                grade_id: Set(class.grade_id),
                created_at: Set(now),
            };
            let student = self.repo.create(student).await?;
            ctx.students.push(student);
        }

        tracing::info!("Created {} students.", ctx.students.len());
        Ok(ctx.students.len())
    }

    async fn seed_lessons(&mut self, ctx: &mut SeedContext) -> Result<usize, SeedError> {
        for i in 0..self.plan.lessons {
            let subject = self.assign(&ctx.subjects, i, EntityKind::Lesson, EntityKind::Subject)?;
            let class = self.assign(&ctx.classes, i, EntityKind::Lesson, EntityKind::Class)?;
            let teacher = self.assign(&ctx.teachers, i, EntityKind::Lesson, EntityKind::Teacher)?;

            let lesson = lesson::ActiveModel {
                name: Set(format!("Lesson {}", i + 1)),
                day: Set(Day::ALL[i % Day::ALL.len()]),
                start_time: Set(day_at(EntityKind::Lesson, LESSON_START, i, 9)?),
                end_time: Set(day_at(EntityKind::Lesson, LESSON_START, i, 10)?),
                subject_id: Set(subject.id),
                class_id: Set(class.id),
                teacher_id: Set(teacher.id),
                ..Default::default()
            };
            let lesson = self.repo.create(lesson).await?;
            ctx.lessons.push(lesson);
        }

        tracing::info!("Created {} lessons.", ctx.lessons.len());
        Ok(ctx.lessons.len())
    }

    /// Exams attach to the first lessons in order, one each.
    async fn seed_exams(&mut self, ctx: &mut SeedContext) -> Result<usize, SeedError> {
        let lessons = first_lessons(&ctx.lessons, self.plan.exams, EntityKind::Exam)?;

        for (i, lesson) in lessons.iter().enumerate() {
            let exam = exam::ActiveModel {
                title: Set(format!("Exam {}", i + 1)),
                start_time: Set(day_at(EntityKind::Exam, EXAM_START, i, 10)?),
                end_time: Set(day_at(EntityKind::Exam, EXAM_START, i, 11)?),
                lesson_id: Set(lesson.id),
                ..Default::default()
            };
            ctx.exams.push(self.repo.create(exam).await?);
        }

        tracing::info!("Created {} exams.", ctx.exams.len());
        Ok(ctx.exams.len())
    }

    async fn seed_assignments(&mut self, ctx: &mut SeedContext) -> Result<usize, SeedError> {
        let lessons = first_lessons(&ctx.lessons, self.plan.assignments, EntityKind::Assignment)?;

        for (i, lesson) in lessons.iter().enumerate() {
            let assignment = assignment::ActiveModel {
                title: Set(format!("Assignment {}", i + 1)),
                start_date: Set(day_at(EntityKind::Assignment, EXAM_START, i, 11)?),
                due_date: Set(day_at(
                    EntityKind::Assignment,
                    EXAM_START,
                    i + ASSIGNMENT_DURATION_DAYS,
                    11,
                )?),
                lesson_id: Set(lesson.id),
                ..Default::default()
            };
            ctx.assignments.push(self.repo.create(assignment).await?);
        }

        tracing::info!("Created {} assignments.", ctx.assignments.len());
        Ok(ctx.assignments.len())
    }

    /// First half exam results, second half assignment results.
    async fn seed_results(&mut self, ctx: &mut SeedContext) -> Result<usize, SeedError> {
        let exam_results = self.plan.exam_results();

        for i in 0..self.plan.results {
            let student = self.assign(&ctx.students, i, EntityKind::Result, EntityKind::Student)?;

            let (exam_id, assignment_id) = if i < exam_results {
                let exam = self.assign(&ctx.exams, i, EntityKind::Result, EntityKind::Exam)?;
                (Some(exam.id), None)
            } else {
                let assignment =
                    self.assign(&ctx.assignments, i, EntityKind::Result, EntityKind::Assignment)?;
                (None, Some(assignment.id))
            };

            let record = result::ActiveModel {
                score: Set(self.sampler.score()),
                exam_id: Set(exam_id),
                assignment_id: Set(assignment_id),
                student_id: Set(student.id),
                ..Default::default()
            };
            self.repo.create(record).await?;
        }

        tracing::info!("Created {} results.", self.plan.results);
        Ok(self.plan.results)
    }

    /// Attendance only for students enrolled in the lesson's class, dated at
    /// the lesson's start.
    async fn seed_attendance(&mut self, ctx: &mut SeedContext) -> Result<usize, SeedError> {
        let mut records = Vec::new();
        for lesson in &ctx.lessons {
            for student in ctx.students.iter().filter(|s| s.class_id == lesson.class_id) {
                records.push(attendance::ActiveModel {
                    date: Set(lesson.start_time),
                    present: Set(self.sampler.is_present()),
                    student_id: Set(student.id),
                    lesson_id: Set(lesson.id),
                    ..Default::default()
                });
            }
        }

        let created = self.repo.create_many(records).await? as usize;
        tracing::info!("Created {} attendance records.", created);
        Ok(created)
    }

    async fn seed_events(&mut self, ctx: &mut SeedContext) -> Result<usize, SeedError> {
        let start_time = day_at(EntityKind::Event, EVENT_DATE, 0, 17)?;
        let end_time = day_at(EntityKind::Event, EVENT_DATE, 0, 19)?;

        for class in &ctx.classes {
            let event = event::ActiveModel {
                title: Set(format!("Parent-Teacher Meeting for Class {}", class.name)),
                description: Set("Discuss student progress.".to_string()),
                start_time: Set(start_time),
                end_time: Set(end_time),
                class_id: Set(class.id),
                ..Default::default()
            };
            self.repo.create(event).await?;
        }

        tracing::info!("Created {} events.", ctx.classes.len());
        Ok(ctx.classes.len())
    }

    async fn seed_announcements(&mut self, ctx: &mut SeedContext) -> Result<usize, SeedError> {
        let now = Utc::now().naive_utc();

        for class in &ctx.classes {
            let announcement = announcement::ActiveModel {
                title: Set("Welcome to the new semester!".to_string()),
                description: Set(format!(
                    "Important dates for class {} will be posted here.",
                    class.name
                )),
                date: Set(now),
                class_id: Set(class.id),
                ..Default::default()
            };
            self.repo.create(announcement).await?;
        }

        tracing::info!("Created {} announcements.", ctx.classes.len());
        Ok(ctx.classes.len())
    }
}

fn first_lessons(
    lessons: &[lesson::Model],
    count: usize,
    kind: EntityKind,
) -> Result<&[lesson::Model], SeedError> {
    lessons.get(..count).ok_or(SeedError::Insufficient {
        kind,
        dependency: EntityKind::Lesson,
        required: count,
        available: lessons.len(),
    })
}

/// `base` shifted by `offset_days`, at `hour`:00.
fn day_at(
    kind: EntityKind,
    base: (i32, u32, u32),
    offset_days: usize,
    hour: u32,
) -> Result<NaiveDateTime, SeedError> {
    let (year, month, day) = base;
    NaiveDate::from_ymd_opt(year, month, day)
        .and_then(|date| date.checked_add_days(Days::new(offset_days as u64)))
        .and_then(|date| date.and_hms_opt(hour, 0, 0))
        .ok_or_else(|| SeedError::InvalidDate {
            kind,
            detail: format!("{year}-{month:02}-{day:02} + {offset_days} days at {hour}:00"),
        })
}

#[cfg(test)]
mod tests;
