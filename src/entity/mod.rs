//! SeaORM 实体定义
//!
//! 这些实体即 LMS 的数据模型描述：表结构由 `DeriveEntityModel` 声明，
//! 唯一键、聚合列与时间戳规则由 [`schema::ModelSchema`] 声明。
//! 类型化客户端（`client` 模块）基于这两部分为每个模型提供完整的 CRUD 与聚合操作。

pub mod prelude;
pub mod schema;

pub mod announcements;
pub mod assignment_submissions;
pub mod assignments;
pub mod course_enrollments;
pub mod course_materials;
pub mod courses;
pub mod messages;
pub mod student_progress;
pub mod users;

pub use schema::ModelSchema;
