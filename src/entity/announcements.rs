//! 课程公告实体

use sea_orm::entity::prelude::*;

use super::schema::{ModelSchema, stamp_pair, to_datetime};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "announcements")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub course_id: i64,
    pub author_id: i64,
    pub title: String,
    #[sea_orm(column_type = "Text")]
    pub content: String,
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
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::AuthorId",
        to = "super::users::Column::Id"
    )]
    Author,
}

impl Related<super::courses::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Course.def()
    }
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Author.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl ModelSchema for Entity {
    const NAME: &'static str = "Announcement";

    fn unique_keys() -> Vec<Vec<Column>> {
        vec![vec![Column::Id]]
    }

    fn numeric_columns() -> Vec<Column> {
        vec![Column::Id, Column::CourseId, Column::AuthorId, Column::CreatedAt]
    }

    fn stamp(model: &mut ActiveModel, now: i64, inserting: bool) {
        stamp_pair(&mut model.created_at, &mut model.updated_at, now, inserting);
    }
}

// 从数据库模型转换为业务模型
impl Model {
    pub fn into_announcement(self) -> crate::models::announcements::entities::Announcement {
        use crate::models::announcements::entities::Announcement;

        Announcement {
            id: self.id,
            course_id: self.course_id,
            author_id: self.author_id,
            title: self.title,
            content: self.content,
            created_at: to_datetime(self.created_at),
            updated_at: to_datetime(self.updated_at),
        }
    }
}
