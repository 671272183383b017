//! 路由层
//!
//! 课程下的子资源使用更长的前缀（`/api/v1/courses/{course_id}/...`），
//! 必须先于 `/api/v1/courses` 注册，见 [`configure_routes`]。

pub mod announcements;
pub mod assignments;
pub mod auth;
pub mod courses;
pub mod enrollments;
pub mod materials;
pub mod messages;
pub mod progress;
pub mod submissions;
pub mod system;
pub mod users;

pub use announcements::configure_announcement_routes;
pub use assignments::configure_assignment_routes;
pub use auth::configure_auth_routes;
pub use courses::configure_course_routes;
pub use enrollments::configure_enrollment_routes;
pub use materials::configure_material_routes;
pub use messages::configure_message_routes;
pub use progress::configure_progress_routes;
pub use submissions::configure_submission_routes;
pub use system::configure_system_routes;
pub use users::configure_user_routes;

use actix_web::web;

/// 按匹配优先级注册全部路由
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    configure_auth_routes(cfg);
    configure_user_routes(cfg);
    // 作业提交的前缀包含作业前缀，先注册
    configure_submission_routes(cfg);
    configure_assignment_routes(cfg);
    configure_enrollment_routes(cfg);
    configure_material_routes(cfg);
    configure_announcement_routes(cfg);
    configure_progress_routes(cfg);
    configure_course_routes(cfg);
    configure_message_routes(cfg);
    configure_system_routes(cfg);
}
