//! 作业提交实体（作业 × 用户）

use sea_orm::entity::prelude::*;

use super::schema::{ModelSchema, stamp_pair, to_datetime};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "assignment_submissions")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub assignment_id: i64,
    pub user_id: i64,
    #[sea_orm(column_type = "Text", nullable)]
    pub content: Option<String>,
    pub file_url: Option<String>,
    pub status: String,
    #[sea_orm(column_type = "Double", nullable)]
    pub grade: Option<f64>,
    #[sea_orm(column_type = "Text", nullable)]
    pub feedback: Option<String>,
    pub submitted_at: Option<i64>,
    pub graded_at: Option<i64>,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::assignments::Entity",
        from = "Column::AssignmentId",
        to = "super::assignments::Column::Id"
    )]
    Assignment,
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::UserId",
        to = "super::users::Column::Id"
    )]
    User,
}

impl Related<super::assignments::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Assignment.def()
    }
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl ModelSchema for Entity {
    const NAME: &'static str = "AssignmentSubmission";

    fn unique_keys() -> Vec<Vec<Column>> {
        vec![vec![Column::Id], vec![Column::AssignmentId, Column::UserId]]
    }

    fn numeric_columns() -> Vec<Column> {
        vec![
            Column::Id,
            Column::AssignmentId,
            Column::UserId,
            Column::Grade,
            Column::SubmittedAt,
            Column::GradedAt,
        ]
    }

    fn stamp(model: &mut ActiveModel, now: i64, inserting: bool) {
        stamp_pair(&mut model.created_at, &mut model.updated_at, now, inserting);
    }
}

// 从数据库模型转换为业务模型
impl Model {
    pub fn into_submission(self) -> crate::models::submissions::entities::AssignmentSubmission {
        use crate::models::submissions::entities::{AssignmentSubmission, SubmissionStatus};

        AssignmentSubmission {
            id: self.id,
            assignment_id: self.assignment_id,
            user_id: self.user_id,
            content: self.content,
            file_url: self.file_url,
            status: self
                .status
                .parse::<SubmissionStatus>()
                .unwrap_or(SubmissionStatus::Pending),
            grade: self.grade,
            feedback: self.feedback,
            submitted_at: self.submitted_at.map(to_datetime),
            graded_at: self.graded_at.map(to_datetime),
            created_at: to_datetime(self.created_at),
            updated_at: to_datetime(self.updated_at),
        }
    }
}
