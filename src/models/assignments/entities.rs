use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 作业实体
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "assignment.ts")]
pub struct Assignment {
    pub id: i64,
    pub course_id: i64,
    pub title: String,
    pub description: Option<String>,
    pub due_date: chrono::DateTime<chrono::Utc>,
    pub total_points: f64,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl Assignment {
    /// 给定时间是否已超过截止时间
    pub fn is_overdue_at(&self, at: chrono::DateTime<chrono::Utc>) -> bool {
        at > self.due_date
    }

    /// 分数是否在 0..=total_points 之内
    pub fn accepts_grade(&self, grade: f64) -> bool {
        grade.is_finite() && grade >= 0.0 && grade <= self.total_points
    }
}

/// 总分必须为正数
pub fn validate_total_points(total_points: f64) -> Result<(), String> {
    if total_points.is_finite() && total_points > 0.0 {
        Ok(())
    } else {
        Err(format!("总分必须为正数: {total_points}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    fn assignment(total_points: f64) -> Assignment {
        let now = Utc::now();
        Assignment {
            id: 1,
            course_id: 1,
            title: "Essay".into(),
            description: None,
            due_date: now,
            total_points,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_grade_bounds() {
        let a = assignment(50.0);
        assert!(a.accepts_grade(0.0));
        assert!(a.accepts_grade(50.0));
        assert!(!a.accepts_grade(50.5));
        assert!(!a.accepts_grade(-1.0));
        assert!(!a.accepts_grade(f64::NAN));
    }

    #[test]
    fn test_overdue() {
        let a = assignment(10.0);
        assert!(a.is_overdue_at(a.due_date + Duration::seconds(1)));
        assert!(!a.is_overdue_at(a.due_date));
    }

    #[test]
    fn test_total_points() {
        assert!(validate_total_points(100.0).is_ok());
        assert!(validate_total_points(0.0).is_err());
        assert!(validate_total_points(-3.0).is_err());
    }
}
