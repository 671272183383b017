use super::progress::recompute_course_in;
use super::{SeaOrmStorage, found};
use crate::client::{AggregateArgs, FindManyArgs, Filter, SortOrder, UniqueWhere};
use crate::entity::assignment_submissions;
use crate::entity::assignments::{ActiveModel, Column};
use crate::errors::{LmsError, Result};
use crate::models::assignments::{
    entities::{Assignment, validate_total_points},
    requests::{CreateAssignmentRequest, UpdateAssignmentRequest},
};
use sea_orm::{IdenStatic, Set};

impl SeaOrmStorage {
    /// 创建作业并刷新课程内学生的进度
    pub async fn create_assignment_impl(
        &self,
        course_id: i64,
        req: CreateAssignmentRequest,
    ) -> Result<Assignment> {
        validate_total_points(req.total_points).map_err(LmsError::validation)?;

        let tx = self.client.begin().await?;
        let model = tx
            .assignment()
            .create(ActiveModel {
                course_id: Set(course_id),
                title: Set(req.title),
                description: Set(req.description),
                due_date: Set(req.due_date.timestamp()),
                total_points: Set(req.total_points),
                ..Default::default()
            })
            .await?;
        recompute_course_in(&tx, course_id).await?;
        tx.commit().await?;

        Ok(model.into_assignment())
    }

    pub async fn get_assignment_impl(&self, assignment_id: i64) -> Result<Option<Assignment>> {
        let result = self
            .client
            .assignment()
            .find_unique(UniqueWhere::id(assignment_id))
            .await?;
        Ok(result.map(|m| m.into_assignment()))
    }

    /// 按截止时间排序列出课程作业
    pub async fn list_course_assignments_impl(&self, course_id: i64) -> Result<Vec<Assignment>> {
        let rows = self
            .client
            .assignment()
            .find_many(
                FindManyArgs::new()
                    .filter(Filter::eq(Column::CourseId, course_id))
                    .order_by(Column::DueDate, SortOrder::Asc)
                    .order_by(Column::Id, SortOrder::Asc),
            )
            .await?;
        Ok(rows.into_iter().map(|m| m.into_assignment()).collect())
    }

    pub async fn update_assignment_impl(
        &self,
        assignment_id: i64,
        update: UpdateAssignmentRequest,
    ) -> Result<Option<Assignment>> {
        let mut changes = ActiveModel::default();
        if let Some(title) = update.title {
            changes.title = Set(title);
        }
        if let Some(description) = update.description {
            changes.description = Set(Some(description));
        }
        if let Some(due_date) = update.due_date {
            changes.due_date = Set(due_date.timestamp());
        }
        if let Some(total_points) = update.total_points {
            validate_total_points(total_points).map_err(LmsError::validation)?;
            changes.total_points = Set(total_points);
        }

        let tx = self.client.begin().await?;

        // 满分不能低于已给出的最高分
        if let Some(total_points) = update.total_points {
            let graded = tx
                .assignment_submission()
                .aggregate(
                    AggregateArgs::new()
                        .filter(
                            Filter::eq(assignment_submissions::Column::AssignmentId, assignment_id)
                                .with(Filter::is_not_null(assignment_submissions::Column::Grade)),
                        )
                        .max(assignment_submissions::Column::Grade),
                )
                .await?;
            if let Some(max_grade) = graded.max_of(assignment_submissions::Column::Grade.as_str())
                && total_points < max_grade
            {
                tx.rollback().await?;
                return Err(LmsError::validation(format!(
                    "total_points {total_points} is below an existing grade of {max_grade}"
                )));
            }
        }

        let Some(model) = found(
            tx.assignment()
                .update(UniqueWhere::id(assignment_id), changes)
                .await,
        )?
        else {
            tx.rollback().await?;
            return Ok(None);
        };
        recompute_course_in(&tx, model.course_id).await?;
        tx.commit().await?;

        Ok(Some(model.into_assignment()))
    }

    /// 删除作业，提交随外键级联删除
    pub async fn delete_assignment_impl(&self, assignment_id: i64) -> Result<bool> {
        let tx = self.client.begin().await?;
        let Some(model) = found(tx.assignment().delete(UniqueWhere::id(assignment_id)).await)?
        else {
            tx.rollback().await?;
            return Ok(false);
        };
        recompute_course_in(&tx, model.course_id).await?;
        tx.commit().await?;

        Ok(true)
    }
}
