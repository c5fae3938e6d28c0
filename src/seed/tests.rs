use std::collections::HashSet;

use sea_orm::{DatabaseConnection, EntityTrait};

use super::*;
use crate::db::test_support::memory_database;
use crate::entities::prelude::*;

/// Always picks the first record of a pool.
struct FirstOnly;

impl AssignmentPolicy for FirstOnly {
    fn pick(&self, _index: usize, len: usize) -> Option<usize> {
        (len > 0).then_some(0)
    }
}

struct FixedSampler;

impl FieldSampler for FixedSampler {
    fn class_capacity(&mut self) -> i32 {
        17
    }

    fn is_present(&mut self) -> bool {
        true
    }

    fn score(&mut self) -> i32 {
        88
    }
}

async fn seed_default(db: &DatabaseConnection) -> SeedReport {
    Seeder::new(db, SeedPlan::default())
        .with_sampler(RandomSampler::from_seed(11))
        .run()
        .await
        .expect("seed run failed")
}

#[tokio::test]
async fn default_plan_creates_sample_dataset() {
    let db = memory_database().await;
    let report = seed_default(&db).await;

    let expected = [
        (EntityKind::Admin, 2),
        (EntityKind::Grade, 6),
        (EntityKind::Subject, 10),
        (EntityKind::Teacher, 15),
        (EntityKind::Class, 6),
        (EntityKind::TeacherSubject, 15),
        (EntityKind::TeacherClass, 15),
        (EntityKind::Parent, 25),
        (EntityKind::Student, 50),
        (EntityKind::Lesson, 30),
        (EntityKind::Exam, 10),
        (EntityKind::Assignment, 10),
        (EntityKind::Result, 20),
        // 5 lessons per class, every student attends their own class's lessons.
        (EntityKind::Attendance, 250),
        (EntityKind::Event, 6),
        (EntityKind::Announcement, 6),
    ];

    let repo = SchoolRepository::new(&db);
    for (kind, count) in expected {
        assert_eq!(report.created(kind), count, "reported {kind}");
        assert_eq!(repo.count(kind).await.unwrap(), count as u64, "stored {kind}");
    }
}

#[tokio::test]
async fn seeded_store_satisfies_consistency_rules() {
    let db = memory_database().await;
    seed_default(&db).await;

    let report = verify_consistency(&db).await.unwrap();
    assert!(report.is_consistent(), "{:?}", report.violations);
}

#[tokio::test]
async fn students_share_their_class_grade() {
    let db = memory_database().await;
    seed_default(&db).await;

    let grades: HashSet<i32> = Grade::find()
        .all(&db)
        .await
        .unwrap()
        .into_iter()
        .map(|g| g.id)
        .collect();
    let classes = Class::find().all(&db).await.unwrap();
    for class in &classes {
        assert!(grades.contains(&class.grade_id));
    }

    for student in Student::find().all(&db).await.unwrap() {
        let class = classes.iter().find(|c| c.id == student.class_id).unwrap();
        assert_eq!(student.grade_id, class.grade_id);
    }
}

#[tokio::test]
async fn attendance_only_for_students_of_the_lesson_class() {
    let db = memory_database().await;
    seed_default(&db).await;

    let students = Student::find().all(&db).await.unwrap();
    let lessons = Lesson::find().all(&db).await.unwrap();

    for record in Attendance::find().all(&db).await.unwrap() {
        let student = students.iter().find(|s| s.id == record.student_id).unwrap();
        let lesson = lessons.iter().find(|l| l.id == record.lesson_id).unwrap();
        assert_eq!(student.class_id, lesson.class_id);
        assert_eq!(record.date, lesson.start_time);
    }
}

#[tokio::test]
async fn results_have_exactly_one_source_and_valid_scores() {
    let db = memory_database().await;
    seed_default(&db).await;

    let results = ExamResult::find().all(&db).await.unwrap();
    assert_eq!(results.len(), 20);

    let exam_results = results.iter().filter(|r| r.exam_id.is_some()).count();
    assert_eq!(exam_results, 10);
    for record in &results {
        assert!(record.has_single_source());
        assert!((60..=100).contains(&record.score));
    }

    for class in Class::find().all(&db).await.unwrap() {
        assert!((15..=20).contains(&class.capacity));
    }
}

#[tokio::test]
async fn six_grades_and_fifteen_teachers_give_six_distinct_supervisors() {
    let db = memory_database().await;
    seed_default(&db).await;

    let classes = Class::find().all(&db).await.unwrap();
    assert_eq!(classes.len(), 6);

    let teachers = Teacher::find().all(&db).await.unwrap();
    let supervisors: Vec<String> = classes
        .iter()
        .map(|class| {
            let supervisor_id = class.supervisor_id.expect("class without supervisor");
            teachers
                .iter()
                .find(|t| t.id == supervisor_id)
                .map(|t| t.username.clone())
                .unwrap()
        })
        .collect();

    let distinct: HashSet<&String> = supervisors.iter().collect();
    assert_eq!(distinct.len(), 6);

    let first_six: HashSet<String> = (1..=6).map(|i| format!("teacher{i}")).collect();
    assert_eq!(
        supervisors.into_iter().collect::<HashSet<_>>(),
        first_six
    );
}

#[tokio::test]
async fn rerun_resets_and_recreates_same_counts() {
    let db = memory_database().await;

    let first = Seeder::new(&db, SeedPlan::default()).run().await.unwrap();
    let second = Seeder::new(&db, SeedPlan::default()).run().await.unwrap();

    assert_eq!(first.created, second.created);
    for kind in EntityKind::ALL {
        assert_eq!(first.deleted[&kind], 0);
        assert_eq!(second.deleted[&kind], first.created(kind) as u64, "{kind}");
    }

    let repo = SchoolRepository::new(&db);
    for kind in EntityKind::ALL {
        assert_eq!(repo.count(kind).await.unwrap(), second.created(kind) as u64);
    }
}

#[tokio::test]
async fn invalid_plan_is_rejected_before_touching_data() {
    let db = memory_database().await;
    seed_default(&db).await;

    let plans = [
        SeedPlan {
            grades: 9,
            ..SeedPlan::default()
        },
        SeedPlan {
            teachers: 3,
            ..SeedPlan::default()
        },
        SeedPlan {
            lessons: 4,
            ..SeedPlan::default()
        },
        SeedPlan {
            parents: 0,
            ..SeedPlan::default()
        },
    ];

    let repo = SchoolRepository::new(&db);
    for plan in plans {
        let err = Seeder::new(&db, plan.clone()).run().await.unwrap_err();
        assert!(matches!(err, SeedError::InvalidPlan(_)), "{plan:?} gave {err}");

        assert_eq!(repo.count(EntityKind::Student).await.unwrap(), 50);
        assert_eq!(repo.count(EntityKind::Class).await.unwrap(), 6);
        assert_eq!(repo.count(EntityKind::Attendance).await.unwrap(), 250);
    }
}

/// Never picks anything, so the first assignment step fails mid-run.
struct NoPick;

impl AssignmentPolicy for NoPick {
    fn pick(&self, _index: usize, _len: usize) -> Option<usize> {
        None
    }
}

#[tokio::test]
async fn policy_without_a_pick_fails_with_empty_pool() {
    let db = memory_database().await;

    let err = Seeder::new(&db, SeedPlan::default())
        .with_policy(NoPick)
        .run()
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        SeedError::EmptyPool {
            kind: EntityKind::Student,
            dependency: EntityKind::Parent,
        }
    ));
}

#[tokio::test]
async fn failed_run_is_recovered_by_rerunning() {
    let db = memory_database().await;
    assert!(
        Seeder::new(&db, SeedPlan::default())
            .with_policy(NoPick)
            .run()
            .await
            .is_err()
    );

    // The failed run left teachers and classes behind.
    let repo = SchoolRepository::new(&db);
    assert_eq!(repo.count(EntityKind::Teacher).await.unwrap(), 15);
    assert_eq!(repo.count(EntityKind::Class).await.unwrap(), 6);

    let report = seed_default(&db).await;
    assert_eq!(report.deleted[&EntityKind::Teacher], 15);
    assert!(verify_consistency(&db).await.unwrap().is_consistent());
}

#[tokio::test]
async fn custom_strategies_drive_assignment_and_sampling() {
    let db = memory_database().await;
    let report = Seeder::new(&db, SeedPlan::default())
        .with_sampler(FixedSampler)
        .with_policy(FirstOnly)
        .run()
        .await
        .unwrap();

    // Every student and lesson lands in the first class.
    assert_eq!(report.created(EntityKind::Attendance), 30 * 50);

    let classes = Class::find().all(&db).await.unwrap();
    assert!(classes.iter().all(|c| c.capacity == 17));

    let attendance = Attendance::find().all(&db).await.unwrap();
    assert!(attendance.iter().all(|a| a.present));

    let results = ExamResult::find().all(&db).await.unwrap();
    assert!(results.iter().all(|r| r.score == 88));

    assert!(verify_consistency(&db).await.unwrap().is_consistent());
}

#[tokio::test]
async fn presence_rate_approximates_ninety_percent() {
    let db = memory_database().await;
    Seeder::new(&db, SeedPlan::default())
        .with_sampler(RandomSampler::from_seed(5))
        .with_policy(FirstOnly)
        .run()
        .await
        .unwrap();

    let attendance = Attendance::find().all(&db).await.unwrap();
    let present = attendance.iter().filter(|a| a.present).count();
    let rate = present as f64 / attendance.len() as f64;
    assert!((rate - 0.9).abs() < 0.05, "present rate was {rate}");
}

#[test]
fn lesson_dates_advance_one_day_per_lesson() {
    let first = day_at(EntityKind::Lesson, LESSON_START, 0, 9).unwrap();
    let last = day_at(EntityKind::Lesson, LESSON_START, 29, 10).unwrap();
    assert_eq!(first.to_string(), "2025-09-01 09:00:00");
    assert_eq!(last.to_string(), "2025-09-30 10:00:00");

    let due = day_at(EntityKind::Assignment, EXAM_START, 9 + ASSIGNMENT_DURATION_DAYS, 11).unwrap();
    assert_eq!(due.to_string(), "2025-10-17 11:00:00");
}

#[test]
fn impossible_date_is_reported() {
    let err = day_at(EntityKind::Event, (2025, 2, 30), 0, 9).unwrap_err();
    assert!(matches!(err, SeedError::InvalidDate { kind: EntityKind::Event, .. }));
}
