use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// 进度上下限
pub const PROGRESS_MIN: f64 = 0.0;
pub const PROGRESS_MAX: f64 = 100.0;

// 选课记录
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "enrollment.ts")]
pub struct CourseEnrollment {
    pub id: i64,
    pub user_id: i64,
    pub course_id: i64,
    pub progress: f64,
    pub enrolled_at: chrono::DateTime<chrono::Utc>,
    pub completed_at: Option<chrono::DateTime<chrono::Utc>>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl CourseEnrollment {
    pub fn is_completed(&self) -> bool {
        self.completed_at.is_some()
    }
}

/// 将进度限制在 0..=100，NaN 视为 0
pub fn clamp_progress(progress: f64) -> f64 {
    if progress.is_nan() {
        PROGRESS_MIN
    } else {
        progress.clamp(PROGRESS_MIN, PROGRESS_MAX)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_progress() {
        assert_eq!(clamp_progress(-5.0), 0.0);
        assert_eq!(clamp_progress(42.5), 42.5);
        assert_eq!(clamp_progress(120.0), 100.0);
        assert_eq!(clamp_progress(f64::NAN), 0.0);
    }
}
