use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 提交状态
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Default, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "submission.ts")]
pub enum SubmissionStatus {
    #[default]
    Pending, // 未提交
    Submitted, // 按时提交
    Graded,    // 已批改
    Late,      // 逾期提交
}

impl SubmissionStatus {
    pub const PENDING: &'static str = "pending";
    pub const SUBMITTED: &'static str = "submitted";
    pub const GRADED: &'static str = "graded";
    pub const LATE: &'static str = "late";

    pub fn as_str(&self) -> &'static str {
        match self {
            SubmissionStatus::Pending => Self::PENDING,
            SubmissionStatus::Submitted => Self::SUBMITTED,
            SubmissionStatus::Graded => Self::GRADED,
            SubmissionStatus::Late => Self::LATE,
        }
    }

    /// 计入完成数的状态
    pub fn completed_statuses() -> &'static [SubmissionStatus] {
        &[
            SubmissionStatus::Submitted,
            SubmissionStatus::Late,
            SubmissionStatus::Graded,
        ]
    }

    /// 根据提交时间与截止时间决定提交状态
    pub fn for_submission(
        submitted_at: chrono::DateTime<chrono::Utc>,
        due_date: chrono::DateTime<chrono::Utc>,
    ) -> Self {
        if submitted_at > due_date {
            SubmissionStatus::Late
        } else {
            SubmissionStatus::Submitted
        }
    }
}

impl<'de> Deserialize<'de> for SubmissionStatus {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse::<SubmissionStatus>().map_err(|_| {
            serde::de::Error::custom(format!(
                "无效的提交状态: '{s}'. 支持的状态: pending, submitted, graded, late"
            ))
        })
    }
}

impl std::fmt::Display for SubmissionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for SubmissionStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            Self::PENDING => Ok(SubmissionStatus::Pending),
            Self::SUBMITTED => Ok(SubmissionStatus::Submitted),
            Self::GRADED => Ok(SubmissionStatus::Graded),
            Self::LATE => Ok(SubmissionStatus::Late),
            _ => Err(format!("Invalid submission status: {s}")),
        }
    }
}

// 作业提交
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "submission.ts")]
pub struct AssignmentSubmission {
    pub id: i64,
    pub assignment_id: i64,
    pub user_id: i64,
    pub content: Option<String>,
    pub file_url: Option<String>,
    pub status: SubmissionStatus,
    pub grade: Option<f64>,
    pub feedback: Option<String>,
    pub submitted_at: Option<chrono::DateTime<chrono::Utc>>,
    pub graded_at: Option<chrono::DateTime<chrono::Utc>>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    #[test]
    fn test_status_for_submission() {
        let due = Utc::now();
        assert_eq!(
            SubmissionStatus::for_submission(due - Duration::minutes(1), due),
            SubmissionStatus::Submitted
        );
        assert_eq!(
            SubmissionStatus::for_submission(due, due),
            SubmissionStatus::Submitted
        );
        assert_eq!(
            SubmissionStatus::for_submission(due + Duration::minutes(1), due),
            SubmissionStatus::Late
        );
    }

    #[test]
    fn test_status_roundtrip_str() {
        for status in [
            SubmissionStatus::Pending,
            SubmissionStatus::Submitted,
            SubmissionStatus::Graded,
            SubmissionStatus::Late,
        ] {
            assert_eq!(status.as_str().parse::<SubmissionStatus>().unwrap(), status);
        }
        assert!(!SubmissionStatus::completed_statuses().contains(&SubmissionStatus::Pending));
    }
}
