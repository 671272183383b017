//! 预导入模块，方便使用

pub use super::announcements::{
    ActiveModel as AnnouncementActiveModel, Entity as Announcements, Model as AnnouncementModel,
};
pub use super::assignment_submissions::{
    ActiveModel as SubmissionActiveModel, Entity as AssignmentSubmissions,
    Model as SubmissionModel,
};
pub use super::assignments::{
    ActiveModel as AssignmentActiveModel, Entity as Assignments, Model as AssignmentModel,
};
pub use super::course_enrollments::{
    ActiveModel as EnrollmentActiveModel, Entity as CourseEnrollments, Model as EnrollmentModel,
};
pub use super::course_materials::{
    ActiveModel as MaterialActiveModel, Entity as CourseMaterials, Model as MaterialModel,
};
pub use super::courses::{ActiveModel as CourseActiveModel, Entity as Courses, Model as CourseModel};
pub use super::messages::{
    ActiveModel as MessageActiveModel, Entity as Messages, Model as MessageModel,
};
pub use super::student_progress::{
    ActiveModel as ProgressActiveModel, Entity as StudentProgress, Model as ProgressModel,
};
pub use super::users::{ActiveModel as UserActiveModel, Entity as Users, Model as UserModel};
