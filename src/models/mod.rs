pub mod announcements;
pub mod assignments;
pub mod auth;
pub mod common;
pub mod courses;
pub mod enrollments;
pub mod materials;
pub mod messages;
pub mod progress;
pub mod submissions;
pub mod system;
pub mod users;

pub use common::{ApiResponse, PaginatedResponse, PaginationInfo, PaginationQuery};

use serde::Serialize;

// 程序启动时间
#[derive(Debug, Clone, Serialize)]
pub struct AppStartTime {
    pub start_datetime: chrono::DateTime<chrono::Utc>,
}

// 业务错误码
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    Success = 0,

    // 通用错误
    BadRequest = 1000,
    Unauthorized = 1001,
    Forbidden = 1003,
    NotFound = 1004,
    Conflict = 1009,
    ValidationFailed = 1022,
    RateLimitExceeded = 1029,
    InternalServerError = 1500,

    // 认证
    AuthFailed = 2000,
    RegisterFailed = 2001,
    TokenInvalid = 2002,

    // 用户
    UserNotFound = 3000,
    UserAlreadyExists = 3001,
    UserEmailInvalid = 3002,
    UserPasswordInvalid = 3003,
    UserNameInvalid = 3004,
    UserEmailAlreadyExists = 3005,
    UserCreationFailed = 3006,
    UserUpdateFailed = 3007,
    UserDeleteFailed = 3008,
    CanNotDeleteCurrentUser = 3009,

    // 课程与选课
    CourseNotFound = 4000,
    CoursePermissionDenied = 4001,
    CourseCreationFailed = 4002,
    CourseAlreadyEnrolled = 4003,
    EnrollmentNotFound = 4004,
    CourseNotEnrolled = 4005,
    CourseNotPublished = 4006,

    // 课程资料
    MaterialNotFound = 4100,
    MaterialInvalid = 4101,

    // 作业与提交
    AssignmentNotFound = 5000,
    AssignmentInvalid = 5001,
    SubmissionNotFound = 5100,
    SubmissionAlreadyGraded = 5101,
    GradeOutOfRange = 5102,

    // 消息与公告
    MessageNotFound = 6000,
    AnnouncementNotFound = 6100,

    // 学习进度
    ProgressNotFound = 6200,
}
