//! Vocabulary of entity kinds and the foreign keys between them.
//!
//! The sea-orm entities under `crate::entities` define the columns; this
//! registry is the coarse view the planner works on: which kind points at
//! which other kinds.

use std::fmt;

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Admin,
    Subject,
    Teacher,
    Grade,
    Class,
    Parent,
    Student,
    Announcement,
    Event,
    TeacherClass,
    TeacherSubject,
    Lesson,
    Assignment,
    Exam,
    Attendance,
    Result,
}

impl EntityKind {
    /// Declaration order. The planner breaks ties by position in this list.
    pub const ALL: [EntityKind; 16] = [
        EntityKind::Admin,
        EntityKind::Subject,
        EntityKind::Teacher,
        EntityKind::Grade,
        EntityKind::Class,
        EntityKind::Parent,
        EntityKind::Student,
        EntityKind::Announcement,
        EntityKind::Event,
        EntityKind::TeacherClass,
        EntityKind::TeacherSubject,
        EntityKind::Lesson,
        EntityKind::Assignment,
        EntityKind::Exam,
        EntityKind::Attendance,
        EntityKind::Result,
    ];

    pub fn table_name(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Subject => "subject",
            Self::Teacher => "teacher",
            Self::Grade => "grade",
            Self::Class => "class",
            Self::Parent => "parent",
            Self::Student => "student",
            Self::Announcement => "announcement",
            Self::Event => "event",
            Self::TeacherClass => "teacher_class",
            Self::TeacherSubject => "teacher_subject",
            Self::Lesson => "lesson",
            Self::Assignment => "assignment",
            Self::Exam => "exam",
            Self::Attendance => "attendance",
            Self::Result => "result",
        }
    }

    /// Kinds this kind holds a foreign key to.
    pub fn dependencies(self) -> &'static [EntityKind] {
        use EntityKind::*;

        match self {
            Admin | Subject | Teacher | Grade | Parent => &[],
            Class => &[Grade, Teacher],
            Student => &[Parent, Grade, Class],
            Announcement => &[Class],
            Event => &[Class],
            TeacherClass => &[Teacher, Class],
            TeacherSubject => &[Teacher, Subject],
            Lesson => &[Subject, Class, Teacher],
            Assignment => &[Lesson],
            Exam => &[Lesson],
            Attendance => &[Student, Lesson],
            Result => &[Student, Exam, Assignment],
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.table_name())
    }
}
