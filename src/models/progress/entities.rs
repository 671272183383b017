use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::models::submissions::entities::SubmissionStatus;

// 学习进度汇总
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "progress.ts")]
pub struct StudentProgress {
    pub id: i64,
    pub user_id: i64,
    pub course_id: i64,
    pub completed_assignments: i32,
    pub total_assignments: i32,
    /// 完成百分比，由两个计数推出
    pub completion_rate: f64,
    pub overall_grade: Option<f64>,
    pub last_activity: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

/// 一名学生在一门课程中的汇总结果
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProgressRollup {
    pub completed_assignments: i32,
    pub total_assignments: i32,
    pub overall_grade: Option<f64>,
}

impl ProgressRollup {
    /// 由课程作业与学生提交计算汇总
    ///
    /// `assignments` 为 (作业 ID, 总分)；`submissions` 为 (作业 ID, 状态, 分数)。
    /// 不属于本课程的提交会被忽略。
    pub fn compute(
        assignments: &[(i64, f64)],
        submissions: &[(i64, SubmissionStatus, Option<f64>)],
    ) -> Self {
        let points: HashMap<i64, f64> = assignments.iter().copied().collect();
        let completed_statuses = SubmissionStatus::completed_statuses();

        let mut completed = 0;
        let mut percents = Vec::new();
        for (assignment_id, status, grade) in submissions {
            let Some(total) = points.get(assignment_id) else {
                continue;
            };
            if completed_statuses.contains(status) {
                completed += 1;
            }
            if *status == SubmissionStatus::Graded
                && let Some(grade) = grade
                && *total > 0.0
            {
                percents.push(grade / total * 100.0);
            }
        }

        let overall_grade = if percents.is_empty() {
            None
        } else {
            Some(percents.iter().sum::<f64>() / percents.len() as f64)
        };

        Self {
            completed_assignments: completed,
            total_assignments: assignments.len() as i32,
            overall_grade,
        }
    }

    /// 选课进度百分比
    pub fn completion_rate(&self) -> f64 {
        if self.total_assignments > 0 {
            f64::from(self.completed_assignments) / f64::from(self.total_assignments) * 100.0
        } else {
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rollup_counts_and_grade() {
        let assignments = [(1, 10.0), (2, 50.0), (3, 100.0)];
        let submissions = [
            (1, SubmissionStatus::Graded, Some(5.0)),
            (2, SubmissionStatus::Graded, Some(50.0)),
            (3, SubmissionStatus::Late, None),
            (99, SubmissionStatus::Graded, Some(1.0)),
        ];
        let rollup = ProgressRollup::compute(&assignments, &submissions);
        assert_eq!(rollup.completed_assignments, 3);
        assert_eq!(rollup.total_assignments, 3);
        assert_eq!(rollup.overall_grade, Some(75.0));
        assert_eq!(rollup.completion_rate(), 100.0);
    }

    #[test]
    fn test_rollup_without_grades() {
        let rollup = ProgressRollup::compute(
            &[(1, 10.0), (2, 10.0)],
            &[(1, SubmissionStatus::Submitted, None), (2, SubmissionStatus::Pending, None)],
        );
        assert_eq!(rollup.completed_assignments, 1);
        assert_eq!(rollup.overall_grade, None);
        assert_eq!(rollup.completion_rate(), 50.0);
    }

    #[test]
    fn test_rollup_empty_course() {
        let rollup = ProgressRollup::compute(&[], &[]);
        assert_eq!(rollup.total_assignments, 0);
        assert_eq!(rollup.completion_rate(), 0.0);
    }
}
