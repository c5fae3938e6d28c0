pub use super::admin::Entity as Admin;
pub use super::announcement::Entity as Announcement;
pub use super::assignment::Entity as Assignment;
pub use super::attendance::Entity as Attendance;
pub use super::class::Entity as Class;
pub use super::event::Entity as Event;
pub use super::exam::Entity as Exam;
pub use super::grade::Entity as Grade;
pub use super::lesson::Entity as Lesson;
pub use super::parent::Entity as Parent;
pub use super::result::Entity as ExamResult;
pub use super::student::Entity as Student;
pub use super::subject::Entity as Subject;
pub use super::teacher::Entity as Teacher;
pub use super::teacher_class::Entity as TeacherClass;
pub use super::teacher_subject::Entity as TeacherSubject;
