//! 课程资料实体

use sea_orm::entity::prelude::*;

use super::schema::{ModelSchema, stamp_pair, to_datetime};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "course_materials")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub course_id: i64,
    pub title: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,
    pub material_type: String,
    pub url: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub content: Option<String>,
    pub position: i32,
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
}

impl Related<super::courses::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Course.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl ModelSchema for Entity {
    const NAME: &'static str = "CourseMaterial";

    fn unique_keys() -> Vec<Vec<Column>> {
        vec![vec![Column::Id]]
    }

    fn numeric_columns() -> Vec<Column> {
        vec![Column::Id, Column::CourseId, Column::Position]
    }

    fn stamp(model: &mut ActiveModel, now: i64, inserting: bool) {
        stamp_pair(&mut model.created_at, &mut model.updated_at, now, inserting);
    }
}

// 从数据库模型转换为业务模型
impl Model {
    pub fn into_material(self) -> crate::models::materials::entities::CourseMaterial {
        use crate::models::materials::entities::{CourseMaterial, MaterialType};

        CourseMaterial {
            id: self.id,
            course_id: self.course_id,
            title: self.title,
            description: self.description,
            material_type: self
                .material_type
                .parse::<MaterialType>()
                .unwrap_or(MaterialType::Text),
            url: self.url,
            content: self.content,
            position: self.position,
            created_at: to_datetime(self.created_at),
            updated_at: to_datetime(self.updated_at),
        }
    }
}
