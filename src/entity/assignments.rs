//! 作业实体

use sea_orm::entity::prelude::*;

use super::schema::{ModelSchema, stamp_pair, to_datetime};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "assignments")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub course_id: i64,
    pub title: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,
    pub due_date: i64,
    #[sea_orm(column_type = "Double")]
    pub total_points: f64,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::courses::Entity",
        from = "Column::CourseId",
        to = "super::courses::Column::Id"
    )]
    Course,
    #[sea_orm(has_many = "super::assignment_submissions::Entity")]
    Submissions,
}

impl Related<super::courses::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Course.def()
    }
}

impl Related<super::assignment_submissions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Submissions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl ModelSchema for Entity {
    const NAME: &'static str = "Assignment";

    fn unique_keys() -> Vec<Vec<Column>> {
        vec![vec![Column::Id]]
    }

    fn numeric_columns() -> Vec<Column> {
        vec![
            Column::Id,
            Column::CourseId,
            Column::DueDate,
            Column::TotalPoints,
        ]
    }

    fn stamp(model: &mut ActiveModel, now: i64, inserting: bool) {
        stamp_pair(&mut model.created_at, &mut model.updated_at, now, inserting);
    }
}

// 从数据库模型转换为业务模型
impl Model {
    pub fn into_assignment(self) -> crate::models::assignments::entities::Assignment {
        use crate::models::assignments::entities::Assignment;

        Assignment {
            id: self.id,
            course_id: self.course_id,
            title: self.title,
            description: self.description,
            due_date: to_datetime(self.due_date),
            total_points: self.total_points,
            created_at: to_datetime(self.created_at),
            updated_at: to_datetime(self.updated_at),
        }
    }
}
