use super::{SeaOrmStorage, found};
use crate::client::{FindManyArgs, Filter, SortOrder, UniqueWhere};
use crate::entity::announcements::{ActiveModel, Column};
use crate::errors::Result;
use crate::models::announcements::{
    entities::Announcement,
    requests::{CreateAnnouncementRequest, UpdateAnnouncementRequest},
};
use sea_orm::Set;

impl SeaOrmStorage {
    pub async fn create_announcement_impl(
        &self,
        course_id: i64,
        author_id: i64,
        req: CreateAnnouncementRequest,
    ) -> Result<Announcement> {
        let model = ActiveModel {
            course_id: Set(course_id),
            author_id: Set(author_id),
            title: Set(req.title),
            content: Set(req.content),
            ..Default::default()
        };

        Ok(self.client.announcement().create(model).await?.into_announcement())
    }

    pub async fn get_announcement_impl(&self, announcement_id: i64) -> Result<Option<Announcement>> {
        let result = self
            .client
            .announcement()
            .find_unique(UniqueWhere::id(announcement_id))
            .await?;
        Ok(result.map(|m| m.into_announcement()))
    }

    /// 最新的公告在前
    pub async fn list_course_announcements_impl(&self, course_id: i64) -> Result<Vec<Announcement>> {
        let rows = self
            .client
            .announcement()
            .find_many(
                FindManyArgs::new()
                    .filter(Filter::eq(Column::CourseId, course_id))
                    .order_by(Column::CreatedAt, SortOrder::Desc)
                    .order_by(Column::Id, SortOrder::Desc),
            )
            .await?;
        Ok(rows.into_iter().map(|m| m.into_announcement()).collect())
    }

    pub async fn update_announcement_impl(
        &self,
        announcement_id: i64,
        update: UpdateAnnouncementRequest,
    ) -> Result<Option<Announcement>> {
        let mut changes = ActiveModel::default();
        if let Some(title) = update.title {
            changes.title = Set(title);
        }
        if let Some(content) = update.content {
            changes.content = Set(content);
        }

        let result = found(
            self.client
                .announcement()
                .update(UniqueWhere::id(announcement_id), changes)
                .await,
        )?;
        Ok(result.map(|m| m.into_announcement()))
    }

    pub async fn delete_announcement_impl(&self, announcement_id: i64) -> Result<bool> {
        let result = found(
            self.client
                .announcement()
                .delete(UniqueWhere::id(announcement_id))
                .await,
        )?;
        Ok(result.is_some())
    }
}
