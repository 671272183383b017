//! 选课实体（用户 × 课程）

use sea_orm::entity::prelude::*;
use sea_orm::Set;

use super::schema::{ModelSchema, fill_if_unset, to_datetime};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "course_enrollments")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub user_id: i64,
    pub course_id: i64,
    #[sea_orm(column_type = "Double")]
    pub progress: f64,
    pub enrolled_at: i64,
    pub completed_at: Option<i64>,
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
    const NAME: &'static str = "CourseEnrollment";

    fn unique_keys() -> Vec<Vec<Column>> {
        vec![vec![Column::Id], vec![Column::UserId, Column::CourseId]]
    }

    fn numeric_columns() -> Vec<Column> {
        vec![
            Column::Id,
            Column::UserId,
            Column::CourseId,
            Column::Progress,
            Column::EnrolledAt,
            Column::CompletedAt,
            Column::UpdatedAt,
        ]
    }

    fn stamp(model: &mut ActiveModel, now: i64, inserting: bool) {
        if inserting {
            fill_if_unset(&mut model.enrolled_at, now);
            fill_if_unset(&mut model.progress, 0.0);
        }
        model.updated_at = Set(now);
    }
}

// 从数据库模型转换为业务模型
impl Model {
    pub fn into_enrollment(self) -> crate::models::enrollments::entities::CourseEnrollment {
        use crate::models::enrollments::entities::CourseEnrollment;

        CourseEnrollment {
            id: self.id,
            user_id: self.user_id,
            course_id: self.course_id,
            progress: self.progress,
            enrolled_at: to_datetime(self.enrolled_at),
            completed_at: self.completed_at.map(to_datetime),
            updated_at: to_datetime(self.updated_at),
        }
    }
}
