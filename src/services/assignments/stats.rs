use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{AssignmentService, assignment_in_course};
use crate::models::assignments::responses::AssignmentStatsResponse;
use crate::models::submissions::entities::SubmissionStatus;
use crate::models::submissions::responses::StatusCount;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{current_membership, lms_error_response};

/// 已提交（含逾期与已批改）的数量
pub(crate) fn submitted_count(breakdown: &[StatusCount]) -> i64 {
    let completed = SubmissionStatus::completed_statuses();
    breakdown
        .iter()
        .filter(|row| completed.contains(&row.status))
        .map(|row| row.count)
        .sum()
}

/// 提交率百分比，保留两位小数
pub(crate) fn submission_rate(submitted: i64, total_students: i64) -> f64 {
    if total_students > 0 {
        ((submitted as f64 / total_students as f64) * 10000.0).round() / 100.0
    } else {
        0.0
    }
}

pub async fn get_assignment_stats(
    service: &AssignmentService,
    request: &HttpRequest,
    assignment_id: i64,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let membership = match current_membership(request) {
        Ok(membership) => membership,
        Err(response) => return Ok(response),
    };

    if let Err(resp) = assignment_in_course(&storage, assignment_id, membership.course.id).await {
        return Ok(resp);
    }

    let stats = async {
        let total_students = storage
            .count_course_enrollments(membership.course.id)
            .await? as i64;
        let grades = storage.get_assignment_grade_stats(assignment_id).await?;
        let status_breakdown = storage
            .get_submission_status_breakdown(assignment_id)
            .await?;
        let submitted = submitted_count(&status_breakdown);
        Ok::<_, crate::errors::LmsError>(AssignmentStatsResponse {
            assignment_id,
            total_students,
            submitted_count: submitted,
            submission_rate: submission_rate(submitted, total_students),
            grades,
            status_breakdown,
        })
    }
    .await;

    match stats {
        Ok(stats) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            stats,
            "Assignment statistics retrieved successfully",
        ))),
        Err(e) => Ok(lms_error_response(
            &e,
            ErrorCode::InternalServerError,
            "Failed to retrieve assignment statistics",
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_submitted_count_skips_pending() {
        let breakdown = vec![
            StatusCount {
                status: SubmissionStatus::Graded,
                count: 2,
            },
            StatusCount {
                status: SubmissionStatus::Late,
                count: 1,
            },
            StatusCount {
                status: SubmissionStatus::Pending,
                count: 4,
            },
        ];
        assert_eq!(submitted_count(&breakdown), 3);
    }

    #[test]
    fn test_submission_rate() {
        assert_eq!(submission_rate(0, 0), 0.0);
        assert_eq!(submission_rate(1, 3), 33.33);
        assert_eq!(submission_rate(4, 4), 100.0);
    }
}
