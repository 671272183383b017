use super::enrollments::progress_changes;
use super::{SeaOrmStorage, now};
use crate::client::{FindManyArgs, Filter, LmsTransaction, SortOrder, UniqueWhere};
use crate::entity::assignment_submissions::Column as SubmissionColumn;
use crate::entity::assignments::Column as AssignmentColumn;
use crate::entity::course_enrollments::Column as EnrollmentColumn;
use crate::entity::student_progress::{self, ActiveModel, Column};
use crate::errors::Result;
use crate::models::{
    progress::entities::{ProgressRollup, StudentProgress},
    submissions::entities::SubmissionStatus,
};
use sea_orm::Set;
use tracing::debug;

/// 在事务内重新计算一名学生在课程中的进度汇总，并同步选课进度
pub(super) async fn recompute_in(
    tx: &LmsTransaction,
    user_id: i64,
    course_id: i64,
) -> Result<student_progress::Model> {
    let assignments: Vec<(i64, f64)> = tx
        .assignment()
        .find_many(Filter::eq(AssignmentColumn::CourseId, course_id).into())
        .await?
        .into_iter()
        .map(|a| (a.id, a.total_points))
        .collect();

    let assignment_ids: Vec<i64> = assignments.iter().map(|(id, _)| *id).collect();
    let submissions: Vec<(i64, SubmissionStatus, Option<f64>)> = tx
        .assignment_submission()
        .find_many(
            Filter::eq(SubmissionColumn::UserId, user_id)
                .with(Filter::is_in(SubmissionColumn::AssignmentId, assignment_ids))
                .into(),
        )
        .await?
        .into_iter()
        .map(|s| {
            let status = s.status.parse().unwrap_or_default();
            (s.assignment_id, status, s.grade)
        })
        .collect();

    let rollup = ProgressRollup::compute(&assignments, &submissions);
    debug!(
        "进度汇总 user={} course={}: {}/{}",
        user_id, course_id, rollup.completed_assignments, rollup.total_assignments
    );

    let at = now();
    let values = ActiveModel {
        user_id: Set(user_id),
        course_id: Set(course_id),
        completed_assignments: Set(rollup.completed_assignments),
        total_assignments: Set(rollup.total_assignments),
        overall_grade: Set(rollup.overall_grade),
        last_activity: Set(at),
        ..Default::default()
    };
    let progress = tx
        .student_progress()
        .upsert(
            UniqueWhere::field(Column::UserId, user_id).and(Column::CourseId, course_id),
            values.clone(),
            values,
        )
        .await?;

    let enrollment_key = UniqueWhere::field(EnrollmentColumn::UserId, user_id)
        .and(EnrollmentColumn::CourseId, course_id);
    if let Some(enrollment) = tx
        .course_enrollment()
        .find_unique(enrollment_key.clone())
        .await?
    {
        let changes = progress_changes(&enrollment, rollup.completion_rate(), at);
        tx.course_enrollment().update(enrollment_key, changes).await?;
    }

    Ok(progress)
}

/// 重新计算课程内全部选课学生的进度
pub(super) async fn recompute_course_in(tx: &LmsTransaction, course_id: i64) -> Result<()> {
    let user_ids: Vec<i64> = tx
        .course_enrollment()
        .find_many(Filter::eq(EnrollmentColumn::CourseId, course_id).into())
        .await?
        .into_iter()
        .map(|e| e.user_id)
        .collect();

    for user_id in user_ids {
        recompute_in(tx, user_id, course_id).await?;
    }
    Ok(())
}

impl SeaOrmStorage {
    pub async fn recompute_progress_impl(
        &self,
        user_id: i64,
        course_id: i64,
    ) -> Result<StudentProgress> {
        let tx = self.client.begin().await?;
        let progress = recompute_in(&tx, user_id, course_id).await?;
        tx.commit().await?;
        Ok(progress.into_progress())
    }

    pub async fn get_progress_impl(
        &self,
        user_id: i64,
        course_id: i64,
    ) -> Result<Option<StudentProgress>> {
        let result = self
            .client
            .student_progress()
            .find_unique(UniqueWhere::field(Column::UserId, user_id).and(Column::CourseId, course_id))
            .await?;
        Ok(result.map(|m| m.into_progress()))
    }

    pub async fn list_course_progress_impl(&self, course_id: i64) -> Result<Vec<StudentProgress>> {
        let rows = self
            .client
            .student_progress()
            .find_many(
                FindManyArgs::new()
                    .filter(Filter::eq(Column::CourseId, course_id))
                    .order_by(Column::UserId, SortOrder::Asc),
            )
            .await?;
        Ok(rows.into_iter().map(|m| m.into_progress()).collect())
    }
}
