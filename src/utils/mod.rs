pub mod extractor;
pub mod jwt;
pub mod parameter_error_handler;
pub mod password;
pub mod sql;
pub mod validate;

pub use extractor::{
    SafeAnnouncementIdI64, SafeAssignmentIdI64, SafeCourseIdI64, SafeMaterialIdI64,
    SafeMessageIdI64, SafeSubmissionIdI64, SafeUserIdI64,
};
pub use parameter_error_handler::json_error_handler;
pub use parameter_error_handler::query_error_handler;
pub use sql::{LIKE_ESCAPE, escape_like_pattern};
