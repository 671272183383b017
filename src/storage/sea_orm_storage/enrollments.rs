use super::progress::recompute_in;
use super::{SeaOrmStorage, found, now, page_params};
use crate::client::{FindManyArgs, Filter, SortOrder, UniqueWhere};
use crate::entity::course_enrollments::{self, ActiveModel, Column, Entity as Enrollments};
use crate::entity::student_progress::{Column as ProgressColumn, Entity as Progress};
use crate::entity::users::Column as UserColumn;
use crate::errors::{LmsError, Result};
use crate::models::{
    PaginationInfo, PaginationQuery,
    enrollments::{
        entities::{CourseEnrollment, PROGRESS_MAX, clamp_progress},
        responses::{EnrollmentDetail, EnrollmentListResponse},
    },
};
use sea_orm::Set;
use std::collections::HashMap;
use tracing::info;

fn pair(user_id: i64, course_id: i64) -> UniqueWhere<Enrollments> {
    UniqueWhere::field(Column::UserId, user_id).and(Column::CourseId, course_id)
}

/// 写入进度：达到 100 时记录完成时间（已完成的保留原时间），低于 100 时清除
pub(super) fn progress_changes(
    existing: &course_enrollments::Model,
    progress: f64,
    at: i64,
) -> ActiveModel {
    let progress = clamp_progress(progress);
    let completed_at = if progress >= PROGRESS_MAX {
        Some(existing.completed_at.unwrap_or(at))
    } else {
        None
    };

    ActiveModel {
        progress: Set(progress),
        completed_at: Set(completed_at),
        ..Default::default()
    }
}

impl SeaOrmStorage {
    /// 选课并建立进度汇总
    pub async fn enroll_user_impl(&self, user_id: i64, course_id: i64) -> Result<CourseEnrollment> {
        let tx = self.client.begin().await?;

        if tx
            .course_enrollment()
            .find_unique(pair(user_id, course_id))
            .await?
            .is_some()
        {
            tx.rollback().await?;
            return Err(LmsError::conflict(format!(
                "user {user_id} is already enrolled in course {course_id}"
            )));
        }

        tx.course_enrollment()
            .create(ActiveModel {
                user_id: Set(user_id),
                course_id: Set(course_id),
                ..Default::default()
            })
            .await?;
        recompute_in(&tx, user_id, course_id).await?;

        // 重新读取，进度可能已被汇总更新
        let enrollment = tx
            .course_enrollment()
            .find_unique_or_throw(pair(user_id, course_id))
            .await?;
        tx.commit().await?;

        info!("用户 {} 选修课程 {}", user_id, course_id);
        Ok(enrollment.into_enrollment())
    }

    /// 退课，同时删除进度汇总
    pub async fn unenroll_user_impl(&self, user_id: i64, course_id: i64) -> Result<bool> {
        let tx = self.client.begin().await?;

        let removed = found(tx.course_enrollment().delete(pair(user_id, course_id)).await)?;
        if removed.is_some() {
            tx.student_progress()
                .delete_many(
                    Filter::<Progress>::eq(ProgressColumn::UserId, user_id)
                        .with(Filter::eq(ProgressColumn::CourseId, course_id)),
                )
                .await?;
        }

        tx.commit().await?;
        Ok(removed.is_some())
    }

    pub async fn get_enrollment_impl(
        &self,
        user_id: i64,
        course_id: i64,
    ) -> Result<Option<CourseEnrollment>> {
        let result = self
            .client
            .course_enrollment()
            .find_unique(pair(user_id, course_id))
            .await?;
        Ok(result.map(|m| m.into_enrollment()))
    }

    pub async fn count_course_enrollments_impl(&self, course_id: i64) -> Result<u64> {
        self.client
            .course_enrollment()
            .count(Filter::eq(Column::CourseId, course_id))
            .await
    }

    /// 分页列出课程的选课记录，附带学生信息
    pub async fn list_course_enrollments_with_pagination_impl(
        &self,
        course_id: i64,
        query: PaginationQuery,
    ) -> Result<EnrollmentListResponse> {
        let (page, size) = page_params(Some(query.page), Some(query.size));
        let filter = Filter::<Enrollments>::eq(Column::CourseId, course_id);

        let delegate = self.client.course_enrollment();
        let total = delegate.count(filter.clone()).await?;
        let enrollments = delegate
            .find_many(
                FindManyArgs::new()
                    .filter(filter)
                    .order_by(Column::EnrolledAt, SortOrder::Asc)
                    .order_by(Column::Id, SortOrder::Asc)
                    .paginate(page, size),
            )
            .await?;

        let user_ids: Vec<i64> = enrollments.iter().map(|e| e.user_id).collect();
        let mut users: HashMap<i64, _> = self
            .client
            .user()
            .find_many(Filter::is_in(UserColumn::Id, user_ids).into())
            .await?
            .into_iter()
            .map(|u| (u.id, u.into_user()))
            .collect();

        let items = enrollments
            .into_iter()
            .map(|e| EnrollmentDetail {
                user: users.remove(&e.user_id),
                enrollment: e.into_enrollment(),
            })
            .collect();

        Ok(EnrollmentListResponse {
            items,
            pagination: PaginationInfo::new(page, size, total as i64),
        })
    }

    /// 手动设置进度，超出范围的值会被截断
    pub async fn update_enrollment_progress_impl(
        &self,
        user_id: i64,
        course_id: i64,
        progress: f64,
    ) -> Result<Option<CourseEnrollment>> {
        let delegate = self.client.course_enrollment();
        let Some(existing) = delegate.find_unique(pair(user_id, course_id)).await? else {
            return Ok(None);
        };

        let changes = progress_changes(&existing, progress, now());
        let result = found(delegate.update(pair(user_id, course_id), changes).await)?;
        Ok(result.map(|m| m.into_enrollment()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn enrollment(completed_at: Option<i64>) -> course_enrollments::Model {
        course_enrollments::Model {
            id: 1,
            user_id: 1,
            course_id: 1,
            progress: 50.0,
            enrolled_at: 10,
            completed_at,
            updated_at: 10,
        }
    }

    #[test]
    fn test_progress_changes_sets_completion() {
        let changes = progress_changes(&enrollment(None), 150.0, 99);
        assert_eq!(changes.progress, Set(100.0));
        assert_eq!(changes.completed_at, Set(Some(99)));
    }

    #[test]
    fn test_progress_changes_keeps_existing_completion() {
        let changes = progress_changes(&enrollment(Some(20)), 100.0, 99);
        assert_eq!(changes.completed_at, Set(Some(20)));
    }

    #[test]
    fn test_progress_changes_clears_completion() {
        let changes = progress_changes(&enrollment(Some(20)), -3.0, 99);
        assert_eq!(changes.progress, Set(0.0));
        assert_eq!(changes.completed_at, Set(None));
    }
}
