use clap::Args;
use serde::Serialize;

use super::error::SeedError;

pub const MAX_GRADE_LEVEL: usize = 6;

pub const SUBJECT_NAMES: [&str; 10] = [
    "Mathematics",
    "Science",
    "English",
    "History",
    "Geography",
    "Physics",
    "Chemistry",
    "Biology",
    "Computer Science",
    "Art",
];

pub const DEFAULT_ADMINS: usize = 2;
pub const DEFAULT_GRADES: usize = 6;
pub const DEFAULT_SUBJECTS: usize = 10;
pub const DEFAULT_TEACHERS: usize = 15;
pub const DEFAULT_PARENTS: usize = 25;
pub const DEFAULT_STUDENTS: usize = 50;
pub const DEFAULT_LESSONS: usize = 30;
pub const DEFAULT_EXAMS: usize = 10;
pub const DEFAULT_ASSIGNMENTS: usize = 10;
pub const DEFAULT_RESULTS: usize = 20;

/// How many records of each kind a seed run creates. One class is created
/// per grade, attendance per matching lesson/student pair, and one event and
/// one announcement per class.
#[derive(Debug, Clone, PartialEq, Eq, Args, Serialize)]
pub struct SeedPlan {
    #[clap(long, env = "SEED_ADMINS", default_value_t = DEFAULT_ADMINS)]
    pub admins: usize,

    #[clap(long, env = "SEED_GRADES", default_value_t = DEFAULT_GRADES)]
    pub grades: usize,

    #[clap(long, env = "SEED_SUBJECTS", default_value_t = DEFAULT_SUBJECTS)]
    pub subjects: usize,

    #[clap(long, env = "SEED_TEACHERS", default_value_t = DEFAULT_TEACHERS)]
    pub teachers: usize,

    #[clap(long, env = "SEED_PARENTS", default_value_t = DEFAULT_PARENTS)]
    pub parents: usize,

    #[clap(long, env = "SEED_STUDENTS", default_value_t = DEFAULT_STUDENTS)]
    pub students: usize,

    #[clap(long, env = "SEED_LESSONS", default_value_t = DEFAULT_LESSONS)]
    pub lessons: usize,

    /// Exams, one for each of the first N lessons.
    #[clap(long, env = "SEED_EXAMS", default_value_t = DEFAULT_EXAMS)]
    pub exams: usize,

    /// Assignments, one for each of the first N lessons.
    #[clap(long, env = "SEED_ASSIGNMENTS", default_value_t = DEFAULT_ASSIGNMENTS)]
    pub assignments: usize,

    /// Results; the first half are exam results, the rest assignment results.
    #[clap(long, env = "SEED_RESULTS", default_value_t = DEFAULT_RESULTS)]
    pub results: usize,
}

impl Default for SeedPlan {
    fn default() -> Self {
        Self {
            admins: DEFAULT_ADMINS,
            grades: DEFAULT_GRADES,
            subjects: DEFAULT_SUBJECTS,
            teachers: DEFAULT_TEACHERS,
            parents: DEFAULT_PARENTS,
            students: DEFAULT_STUDENTS,
            lessons: DEFAULT_LESSONS,
            exams: DEFAULT_EXAMS,
            assignments: DEFAULT_ASSIGNMENTS,
            results: DEFAULT_RESULTS,
        }
    }
}

impl SeedPlan {
    pub fn validate(&self) -> Result<(), SeedError> {
        if self.grades > MAX_GRADE_LEVEL {
            return Err(SeedError::InvalidPlan(format!(
                "grades must be at most {MAX_GRADE_LEVEL}, got {}",
                self.grades
            )));
        }
        if self.subjects > SUBJECT_NAMES.len() {
            return Err(SeedError::InvalidPlan(format!(
                "subjects must be at most {}, got {}",
                SUBJECT_NAMES.len(),
                self.subjects
            )));
        }

        // One class per grade, each with its own supervisor.
        if self.teachers < self.grades {
            return Err(SeedError::InvalidPlan(format!(
                "{} classes need as many supervising teachers, got {}",
                self.grades, self.teachers
            )));
        }
        for (what, count) in [("exams", self.exams), ("assignments", self.assignments)] {
            if self.lessons < count {
                return Err(SeedError::InvalidPlan(format!(
                    "{count} {what} need as many lessons, got {}",
                    self.lessons
                )));
            }
        }

        let assignment_results = self.results - self.exam_results();
        let pools = [
            ("teachers", self.teachers, "subjects", self.subjects),
            ("teachers", self.teachers, "classes", self.grades),
            ("students", self.students, "parents", self.parents),
            ("students", self.students, "classes", self.grades),
            ("lessons", self.lessons, "subjects", self.subjects),
            ("lessons", self.lessons, "classes", self.grades),
            ("lessons", self.lessons, "teachers", self.teachers),
            ("results", self.results, "students", self.students),
            ("exam results", self.exam_results(), "exams", self.exams),
            ("assignment results", assignment_results, "assignments", self.assignments),
        ];
        for (kind, count, pool, available) in pools {
            if count > 0 && available == 0 {
                return Err(SeedError::InvalidPlan(format!(
                    "{count} {kind} need at least one of {pool}, got none"
                )));
            }
        }

        Ok(())
    }

    /// Number of results attached to exams; the remainder go to assignments.
    pub fn exam_results(&self) -> usize {
        self.results / 2
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_plan_is_valid() {
        assert!(SeedPlan::default().validate().is_ok());
    }

    #[test]
    fn too_many_grades_is_rejected() {
        let plan = SeedPlan {
            grades: 7,
            ..SeedPlan::default()
        };
        assert!(matches!(plan.validate(), Err(SeedError::InvalidPlan(_))));
    }

    #[test]
    fn too_many_subjects_is_rejected() {
        let plan = SeedPlan {
            subjects: SUBJECT_NAMES.len() + 1,
            ..SeedPlan::default()
        };
        assert!(matches!(plan.validate(), Err(SeedError::InvalidPlan(_))));
    }

    fn rejected(plan: SeedPlan) -> bool {
        matches!(plan.validate(), Err(SeedError::InvalidPlan(_)))
    }

    #[test]
    fn too_few_supervisors_is_rejected() {
        assert!(rejected(SeedPlan {
            teachers: 5,
            ..SeedPlan::default()
        }));
        assert!(
            SeedPlan {
                teachers: 6,
                ..SeedPlan::default()
            }
            .validate()
            .is_ok()
        );
    }

    #[test]
    fn exams_and_assignments_need_lessons() {
        assert!(rejected(SeedPlan {
            lessons: 9,
            ..SeedPlan::default()
        }));
        assert!(rejected(SeedPlan {
            lessons: 10,
            assignments: 11,
            ..SeedPlan::default()
        }));
    }

    #[test]
    fn empty_pools_are_rejected() {
        assert!(rejected(SeedPlan {
            parents: 0,
            ..SeedPlan::default()
        }));
        assert!(rejected(SeedPlan {
            students: 0,
            ..SeedPlan::default()
        }));
        assert!(rejected(SeedPlan {
            exams: 0,
            ..SeedPlan::default()
        }));
        assert!(rejected(SeedPlan {
            assignments: 0,
            ..SeedPlan::default()
        }));
    }

    #[test]
    fn empty_pools_are_fine_when_nothing_draws_from_them() {
        let plan = SeedPlan {
            parents: 0,
            students: 0,
            results: 0,
            ..SeedPlan::default()
        };
        assert!(plan.validate().is_ok());

        // A single result is an exam-less assignment result.
        let plan = SeedPlan {
            results: 1,
            exams: 0,
            ..SeedPlan::default()
        };
        assert!(plan.validate().is_ok());
    }

    #[test]
    fn results_split_in_half() {
        assert_eq!(SeedPlan::default().exam_results(), 10);
        let odd = SeedPlan {
            results: 5,
            ..SeedPlan::default()
        };
        assert_eq!(odd.exam_results(), 2);
    }
}
