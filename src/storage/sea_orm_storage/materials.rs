use super::{SeaOrmStorage, found};
use crate::client::{AggregateArgs, FindManyArgs, Filter, SortOrder, UniqueWhere};
use crate::entity::course_materials::{ActiveModel, Column, Entity as Materials};
use crate::errors::{LmsError, Result};
use crate::models::materials::{
    entities::{CourseMaterial, MaterialType, validate_material},
    requests::{CreateMaterialRequest, UpdateMaterialRequest},
};
use sea_orm::{IdenStatic, Set};

impl SeaOrmStorage {
    /// 创建资料；未指定位置时排在末尾
    pub async fn create_material_impl(
        &self,
        course_id: i64,
        req: CreateMaterialRequest,
    ) -> Result<CourseMaterial> {
        validate_material(req.material_type, req.url.as_deref(), req.content.as_deref())
            .map_err(LmsError::validation)?;

        let delegate = self.client.course_material();
        let position = match req.position {
            Some(position) => position,
            None => {
                let stats = delegate
                    .aggregate(
                        AggregateArgs::<Materials>::new()
                            .filter(Filter::eq(Column::CourseId, course_id))
                            .max(Column::Position),
                    )
                    .await?;
                stats
                    .max_of(Column::Position.as_str())
                    .map_or(0, |max| max as i32 + 1)
            }
        };

        let model = ActiveModel {
            course_id: Set(course_id),
            title: Set(req.title),
            description: Set(req.description),
            material_type: Set(req.material_type.to_string()),
            url: Set(req.url),
            content: Set(req.content),
            position: Set(position),
            ..Default::default()
        };

        Ok(delegate.create(model).await?.into_material())
    }

    pub async fn get_material_impl(&self, material_id: i64) -> Result<Option<CourseMaterial>> {
        let result = self
            .client
            .course_material()
            .find_unique(UniqueWhere::id(material_id))
            .await?;
        Ok(result.map(|m| m.into_material()))
    }

    /// 按位置排序列出课程资料
    pub async fn list_course_materials_impl(&self, course_id: i64) -> Result<Vec<CourseMaterial>> {
        let rows = self
            .client
            .course_material()
            .find_many(
                FindManyArgs::new()
                    .filter(Filter::eq(Column::CourseId, course_id))
                    .order_by(Column::Position, SortOrder::Asc)
                    .order_by(Column::Id, SortOrder::Asc),
            )
            .await?;
        Ok(rows.into_iter().map(|m| m.into_material()).collect())
    }

    /// 更新资料，合并后的类型与 url / content 仍需匹配
    pub async fn update_material_impl(
        &self,
        material_id: i64,
        update: UpdateMaterialRequest,
    ) -> Result<Option<CourseMaterial>> {
        let delegate = self.client.course_material();
        let Some(existing) = delegate.find_unique(UniqueWhere::id(material_id)).await? else {
            return Ok(None);
        };

        let material_type = match update.material_type {
            Some(material_type) => material_type,
            None => existing.material_type.parse().unwrap_or(MaterialType::Text),
        };
        let url = update.url.as_deref().or(existing.url.as_deref());
        let content = update.content.as_deref().or(existing.content.as_deref());
        validate_material(material_type, url, content).map_err(LmsError::validation)?;

        let mut changes = ActiveModel::default();
        if let Some(title) = update.title {
            changes.title = Set(title);
        }
        if let Some(description) = update.description {
            changes.description = Set(Some(description));
        }
        if update.material_type.is_some() {
            changes.material_type = Set(material_type.to_string());
        }
        if let Some(url) = update.url {
            changes.url = Set(Some(url));
        }
        if let Some(content) = update.content {
            changes.content = Set(Some(content));
        }
        if let Some(position) = update.position {
            changes.position = Set(position);
        }

        let result = found(delegate.update(UniqueWhere::id(material_id), changes).await)?;
        Ok(result.map(|m| m.into_material()))
    }

    pub async fn delete_material_impl(&self, material_id: i64) -> Result<bool> {
        let result = found(
            self.client
                .course_material()
                .delete(UniqueWhere::id(material_id))
                .await,
        )?;
        Ok(result.is_some())
    }
}
