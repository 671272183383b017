//! 提交存储操作

use std::collections::HashMap;

use super::progress::recompute_in;
use super::{SeaOrmStorage, found, now, page_params};
use crate::client::{AggregateArgs, FindManyArgs, Filter, GroupByArgs, SortOrder, UniqueWhere};
use crate::entity::assignment_submissions::{ActiveModel, Column, Entity as Submissions};
use crate::entity::users::Column as UserColumn;
use crate::errors::{LmsError, Result};
use crate::models::{
    PaginationInfo,
    submissions::{
        entities::{AssignmentSubmission, SubmissionStatus},
        requests::{GradeSubmissionRequest, SubmissionListQuery, SubmitAssignmentRequest},
        responses::{
            GradeStats, StatusCount, SubmissionCreator, SubmissionListItem,
            SubmissionListResponse,
        },
    },
};
use sea_orm::{IdenStatic, Set};
use tracing::info;

fn pair(assignment_id: i64, user_id: i64) -> UniqueWhere<Submissions> {
    UniqueWhere::field(Column::AssignmentId, assignment_id).and(Column::UserId, user_id)
}

impl SeaOrmStorage {
    /// 提交作业
    ///
    /// 同一学生对同一作业只有一条提交记录，批改前重复提交会覆盖原内容；
    /// 已批改的提交不能再修改。截止后提交的状态为 late。
    pub async fn submit_assignment_impl(
        &self,
        assignment_id: i64,
        user_id: i64,
        req: SubmitAssignmentRequest,
    ) -> Result<AssignmentSubmission> {
        let tx = self.client.begin().await?;

        let assignment = tx
            .assignment()
            .find_unique(UniqueWhere::id(assignment_id))
            .await?
            .ok_or_else(|| LmsError::not_found(format!("assignment {assignment_id}")))?
            .into_assignment();

        if let Some(existing) = tx
            .assignment_submission()
            .find_unique(pair(assignment_id, user_id))
            .await?
            && existing.status == SubmissionStatus::GRADED
        {
            tx.rollback().await?;
            return Err(LmsError::conflict(format!(
                "submission for assignment {assignment_id} has already been graded"
            )));
        }

        let submitted_at = chrono::Utc::now();
        let status = SubmissionStatus::for_submission(submitted_at, assignment.due_date);
        let values = ActiveModel {
            assignment_id: Set(assignment_id),
            user_id: Set(user_id),
            content: Set(req.content),
            file_url: Set(req.file_url),
            status: Set(status.to_string()),
            submitted_at: Set(Some(submitted_at.timestamp())),
            ..Default::default()
        };
        let submission = tx
            .assignment_submission()
            .upsert(pair(assignment_id, user_id), values.clone(), values)
            .await?;

        recompute_in(&tx, user_id, assignment.course_id).await?;
        tx.commit().await?;

        info!(
            "用户 {} 提交作业 {}，状态 {}",
            user_id, assignment_id, status
        );
        Ok(submission.into_submission())
    }

    pub async fn get_submission_impl(
        &self,
        submission_id: i64,
    ) -> Result<Option<AssignmentSubmission>> {
        let result = self
            .client
            .assignment_submission()
            .find_unique(UniqueWhere::id(submission_id))
            .await?;
        Ok(result.map(|m| m.into_submission()))
    }

    pub async fn get_user_submission_impl(
        &self,
        assignment_id: i64,
        user_id: i64,
    ) -> Result<Option<AssignmentSubmission>> {
        let result = self
            .client
            .assignment_submission()
            .find_unique(pair(assignment_id, user_id))
            .await?;
        Ok(result.map(|m| m.into_submission()))
    }

    /// 分页列出作业的提交，附带提交者信息
    pub async fn list_assignment_submissions_with_pagination_impl(
        &self,
        assignment_id: i64,
        query: SubmissionListQuery,
    ) -> Result<SubmissionListResponse> {
        let (page, size) = page_params(query.page, query.size);

        let mut filter = Filter::<Submissions>::eq(Column::AssignmentId, assignment_id);
        if let Some(status) = query.status {
            filter = filter.with(Filter::eq(Column::Status, status.as_str()));
        }

        let delegate = self.client.assignment_submission();
        let total = delegate.count(filter.clone()).await?;
        let submissions = delegate
            .find_many(
                FindManyArgs::new()
                    .filter(filter)
                    .order_by(Column::SubmittedAt, SortOrder::Desc)
                    .order_by(Column::Id, SortOrder::Desc)
                    .paginate(page, size),
            )
            .await?;

        // 批量查询提交者
        let user_ids: Vec<i64> = submissions.iter().map(|s| s.user_id).collect();
        let creators: HashMap<i64, SubmissionCreator> = self
            .client
            .user()
            .find_many(Filter::is_in(UserColumn::Id, user_ids).into())
            .await?
            .into_iter()
            .map(|u| {
                (
                    u.id,
                    SubmissionCreator {
                        id: u.id,
                        name: u.name,
                        avatar_url: u.avatar_url,
                    },
                )
            })
            .collect();

        let items = submissions
            .into_iter()
            .map(|s| SubmissionListItem {
                creator: creators.get(&s.user_id).cloned(),
                submission: s.into_submission(),
            })
            .collect();

        Ok(SubmissionListResponse {
            items,
            pagination: PaginationInfo::new(page, size, total as i64),
        })
    }

    /// 批改提交，分数须在 0 到作业总分之间
    pub async fn grade_submission_impl(
        &self,
        submission_id: i64,
        req: GradeSubmissionRequest,
    ) -> Result<Option<AssignmentSubmission>> {
        let tx = self.client.begin().await?;

        let Some(existing) = tx
            .assignment_submission()
            .find_unique(UniqueWhere::id(submission_id))
            .await?
        else {
            tx.rollback().await?;
            return Ok(None);
        };

        let assignment = tx
            .assignment()
            .find_unique_or_throw(UniqueWhere::id(existing.assignment_id))
            .await?
            .into_assignment();
        if !assignment.accepts_grade(req.grade) {
            tx.rollback().await?;
            return Err(LmsError::validation(format!(
                "grade must be between 0 and {}",
                assignment.total_points
            )));
        }

        let changes = ActiveModel {
            status: Set(SubmissionStatus::Graded.to_string()),
            grade: Set(Some(req.grade)),
            feedback: Set(req.feedback),
            graded_at: Set(Some(now())),
            ..Default::default()
        };
        let graded = tx
            .assignment_submission()
            .update(UniqueWhere::id(submission_id), changes)
            .await?;

        recompute_in(&tx, graded.user_id, assignment.course_id).await?;
        tx.commit().await?;

        Ok(Some(graded.into_submission()))
    }

    /// 已批改提交的分数统计
    pub async fn get_assignment_grade_stats_impl(&self, assignment_id: i64) -> Result<GradeStats> {
        let grade = Column::Grade.as_str();
        let stats = self
            .client
            .assignment_submission()
            .aggregate(
                AggregateArgs::new()
                    .filter(
                        Filter::eq(Column::AssignmentId, assignment_id)
                            .with(Filter::eq(Column::Status, SubmissionStatus::GRADED)),
                    )
                    .count()
                    .avg(Column::Grade)
                    .min(Column::Grade)
                    .max(Column::Grade),
            )
            .await?;

        Ok(GradeStats {
            graded_count: stats.count.unwrap_or(0) as i64,
            average: stats.avg_of(grade),
            min: stats.min_of(grade),
            max: stats.max_of(grade),
        })
    }

    /// 按状态统计提交数量
    pub async fn get_submission_status_breakdown_impl(
        &self,
        assignment_id: i64,
    ) -> Result<Vec<StatusCount>> {
        let rows = self
            .client
            .assignment_submission()
            .group_by(
                GroupByArgs::by(vec![Column::Status])
                    .filter(Filter::eq(Column::AssignmentId, assignment_id))
                    .count()
                    .order_by(Column::Status, SortOrder::Asc),
            )
            .await?;

        Ok(rows
            .iter()
            .filter_map(|row| {
                let status = row.key_str(Column::Status.as_str())?.parse().ok()?;
                Some(StatusCount {
                    status,
                    count: row.aggregates.count.unwrap_or(0) as i64,
                })
            })
            .collect())
    }
}
