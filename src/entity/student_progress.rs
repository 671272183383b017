//! 学习进度汇总实体（用户 × 课程）

use sea_orm::entity::prelude::*;
use sea_orm::Set;

use super::schema::{ModelSchema, fill_if_unset, to_datetime};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "student_progress")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub user_id: i64,
    pub course_id: i64,
    pub completed_assignments: i32,
    pub total_assignments: i32,
    #[sea_orm(column_type = "Double", nullable)]
    pub overall_grade: Option<f64>,
    pub last_activity: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::UserId",
        to = "super::users::Column::Id"
    )]
    User,
    #[sea_orm(
        belongs_to = "super::courses::Entity",
        from = "Column::CourseId",
        to = "super::courses::Column::Id"
    )]
    Course,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::courses::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Course.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl ModelSchema for Entity {
    const NAME: &'static str = "StudentProgress";

    fn unique_keys() -> Vec<Vec<Column>> {
        vec![vec![Column::Id], vec![Column::UserId, Column::CourseId]]
    }

    fn numeric_columns() -> Vec<Column> {
        vec![
            Column::Id,
            Column::UserId,
            Column::CourseId,
            Column::CompletedAssignments,
            Column::TotalAssignments,
            Column::OverallGrade,
            Column::LastActivity,
        ]
    }

    fn stamp(model: &mut ActiveModel, now: i64, inserting: bool) {
        if inserting {
            fill_if_unset(&mut model.last_activity, now);
        }
        model.updated_at = Set(now);
    }
}

// 从数据库模型转换为业务模型
impl Model {
    pub fn into_progress(self) -> crate::models::progress::entities::StudentProgress {
        use crate::models::progress::entities::StudentProgress;

        let completion_rate = if self.total_assignments > 0 {
            f64::from(self.completed_assignments) / f64::from(self.total_assignments) * 100.0
        } else {
            0.0
        };

        StudentProgress {
            id: self.id,
            user_id: self.user_id,
            course_id: self.course_id,
            completed_assignments: self.completed_assignments,
            total_assignments: self.total_assignments,
            completion_rate,
            overall_grade: self.overall_grade,
            last_activity: to_datetime(self.last_activity),
            updated_at: to_datetime(self.updated_at),
        }
    }
}
