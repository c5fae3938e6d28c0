//! Cross-entity rules a seeded store must satisfy.
//!
//! `check` is pure over a loaded [`Snapshot`]; `verify_consistency` loads the
//! snapshot from the database first.

use std::collections::{BTreeMap, HashMap, HashSet};

use chrono::NaiveDateTime;
use sea_orm::{ConnectionTrait, DbErr};
use serde::Serialize;
use uuid::Uuid;

use super::strategy::{CAPACITY_RANGE, SCORE_RANGE};
use crate::entities::{attendance, class, grade, lesson, result, student};
use crate::entities::prelude::*;
use crate::repositories::SchoolRepository;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "rule", rename_all = "snake_case")]
pub enum Violation {
    ClassGradeMissing {
        class_id: i32,
        grade_id: i32,
    },
    CapacityOutOfRange {
        class_id: i32,
        capacity: i32,
    },
    SupervisorReused {
        teacher_id: Uuid,
        class_ids: Vec<i32>,
    },
    StudentClassMissing {
        student_id: Uuid,
        class_id: i32,
    },
    StudentGradeMismatch {
        student_id: Uuid,
        student_grade_id: i32,
        class_grade_id: i32,
    },
    AttendanceReferenceMissing {
        attendance_id: i32,
    },
    AttendanceClassMismatch {
        attendance_id: i32,
        student_class_id: i32,
        lesson_class_id: i32,
    },
    AttendanceDateMismatch {
        attendance_id: i32,
        date: NaiveDateTime,
        lesson_start: NaiveDateTime,
    },
    ResultSourceInvalid {
        result_id: i32,
        exam_id: Option<i32>,
        assignment_id: Option<i32>,
    },
    ScoreOutOfRange {
        result_id: i32,
        score: i32,
    },
}

/// The rows the rules look at.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    pub grades: Vec<grade::Model>,
    pub classes: Vec<class::Model>,
    pub students: Vec<student::Model>,
    pub lessons: Vec<lesson::Model>,
    pub attendance: Vec<attendance::Model>,
    pub results: Vec<result::Model>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ConsistencyReport {
    pub violations: Vec<Violation>,
}

impl ConsistencyReport {
    pub fn is_consistent(&self) -> bool {
        self.violations.is_empty()
    }
}

impl Snapshot {
    pub async fn load<C: ConnectionTrait>(db: &C) -> Result<Self, DbErr> {
        let repo = SchoolRepository::new(db);
        Ok(Self {
            grades: repo.find_all::<Grade>().await?,
            classes: repo.find_all::<Class>().await?,
            students: repo.find_all::<Student>().await?,
            lessons: repo.find_all::<Lesson>().await?,
            attendance: repo.find_all::<Attendance>().await?,
            results: repo.find_all::<ExamResult>().await?,
        })
    }
}

pub async fn verify_consistency<C: ConnectionTrait>(db: &C) -> Result<ConsistencyReport, DbErr> {
    let snapshot = Snapshot::load(db).await?;
    let violations = check(&snapshot);

    for violation in &violations {
        tracing::warn!(?violation, "Consistency rule violated");
    }
    tracing::info!("Consistency check found {} violations.", violations.len());

    Ok(ConsistencyReport { violations })
}

pub fn check(snapshot: &Snapshot) -> Vec<Violation> {
    let mut violations = Vec::new();

    let grade_ids: HashSet<i32> = snapshot.grades.iter().map(|g| g.id).collect();
    let classes: HashMap<i32, &class::Model> =
        snapshot.classes.iter().map(|c| (c.id, c)).collect();
    let students: HashMap<Uuid, &student::Model> =
        snapshot.students.iter().map(|s| (s.id, s)).collect();
    let lessons: HashMap<i32, &lesson::Model> =
        snapshot.lessons.iter().map(|l| (l.id, l)).collect();

    let mut supervised: BTreeMap<Uuid, Vec<i32>> = BTreeMap::new();
    for class in &snapshot.classes {
        if !grade_ids.contains(&class.grade_id) {
            violations.push(Violation::ClassGradeMissing {
                class_id: class.id,
                grade_id: class.grade_id,
            });
        }
        if !CAPACITY_RANGE.contains(&class.capacity) {
            violations.push(Violation::CapacityOutOfRange {
                class_id: class.id,
                capacity: class.capacity,
            });
        }
        if let Some(teacher_id) = class.supervisor_id {
            supervised.entry(teacher_id).or_default().push(class.id);
        }
    }
    for (teacher_id, class_ids) in supervised {
        if class_ids.len() > 1 {
            violations.push(Violation::SupervisorReused {
                teacher_id,
                class_ids,
            });
        }
    }

    for student in &snapshot.students {
        match classes.get(&student.class_id) {
            None => violations.push(Violation::StudentClassMissing {
                student_id: student.id,
                class_id: student.class_id,
            }),
            Some(class) if class.grade_id != student.grade_id => {
                violations.push(Violation::StudentGradeMismatch {
                    student_id: student.id,
                    student_grade_id: student.grade_id,
                    class_grade_id: class.grade_id,
                })
            }
            Some(_) => {}
        }
    }

    for record in &snapshot.attendance {
        let (Some(student), Some(lesson)) =
            (students.get(&record.student_id), lessons.get(&record.lesson_id))
        else {
            violations.push(Violation::AttendanceReferenceMissing {
                attendance_id: record.id,
            });
            continue;
        };

        if student.class_id != lesson.class_id {
            violations.push(Violation::AttendanceClassMismatch {
                attendance_id: record.id,
                student_class_id: student.class_id,
                lesson_class_id: lesson.class_id,
            });
        }
        if record.date != lesson.start_time {
            violations.push(Violation::AttendanceDateMismatch {
                attendance_id: record.id,
                date: record.date,
                lesson_start: lesson.start_time,
            });
        }
    }

    for record in &snapshot.results {
        if !record.has_single_source() {
            violations.push(Violation::ResultSourceInvalid {
                result_id: record.id,
                exam_id: record.exam_id,
                assignment_id: record.assignment_id,
            });
        }
        if !SCORE_RANGE.contains(&record.score) {
            violations.push(Violation::ScoreOutOfRange {
                result_id: record.id,
                score: record.score,
            });
        }
    }

    violations
}
