pub mod prelude;

pub mod admin;
pub mod announcement;
pub mod assignment;
pub mod attendance;
pub mod class;
pub mod event;
pub mod exam;
pub mod grade;
pub mod lesson;
pub mod parent;
pub mod result;
pub mod sea_orm_active_enums;
pub mod student;
pub mod subject;
pub mod teacher;
pub mod teacher_class;
pub mod teacher_subject;
