use super::{SeaOrmStorage, found, page_params};
use crate::client::{FindManyArgs, Filter, SortOrder, UniqueWhere};
use crate::entity::users::{ActiveModel, Column, Entity as Users};
use crate::errors::Result;
use crate::models::{
    PaginationInfo,
    users::{
        entities::{User, UserRole},
        requests::{CreateUserRequest, UpdateUserRequest, UserListQuery},
        responses::UserListResponse,
    },
};
use sea_orm::Set;

impl SeaOrmStorage {
    /// 创建用户，`password` 字段应已是哈希值
    pub async fn create_user_impl(&self, req: CreateUserRequest) -> Result<User> {
        let model = ActiveModel {
            email: Set(req.email),
            password_hash: Set(req.password),
            name: Set(req.name),
            role: Set(req.role.to_string()),
            avatar_url: Set(req.avatar_url),
            bio: Set(req.bio),
            ..Default::default()
        };

        Ok(self.client.user().create(model).await?.into_user())
    }

    pub async fn get_user_by_id_impl(&self, id: i64) -> Result<Option<User>> {
        let result = self.client.user().find_unique(UniqueWhere::id(id)).await?;
        Ok(result.map(|m| m.into_user()))
    }

    pub async fn get_user_by_email_impl(&self, email: &str) -> Result<Option<User>> {
        let result = self
            .client
            .user()
            .find_unique(UniqueWhere::field(Column::Email, email))
            .await?;
        Ok(result.map(|m| m.into_user()))
    }

    /// 分页列出用户
    pub async fn list_users_with_pagination_impl(
        &self,
        query: UserListQuery,
    ) -> Result<UserListResponse> {
        let (page, size) = page_params(query.page, query.size);

        let mut filter = Filter::<Users>::all();
        if let Some(role) = query.role {
            filter = filter.with(Filter::eq(Column::Role, role.as_str()));
        }
        if let Some(search) = query.search.as_deref().map(str::trim)
            && !search.is_empty()
        {
            filter = filter.with(Filter::or(vec![
                Filter::contains(Column::Name, search),
                Filter::contains(Column::Email, search),
            ]));
        }

        let delegate = self.client.user();
        let total = delegate.count(filter.clone()).await?;
        let users = delegate
            .find_many(
                FindManyArgs::new()
                    .filter(filter)
                    .order_by(Column::CreatedAt, SortOrder::Desc)
                    .order_by(Column::Id, SortOrder::Desc)
                    .paginate(page, size),
            )
            .await?;

        Ok(UserListResponse {
            items: users.into_iter().map(|m| m.into_user()).collect(),
            pagination: PaginationInfo::new(page, size, total as i64),
        })
    }

    /// 更新用户，`password` 字段应已是哈希值
    pub async fn update_user_impl(&self, id: i64, update: UpdateUserRequest) -> Result<Option<User>> {
        let mut changes = ActiveModel::default();
        if let Some(email) = update.email {
            changes.email = Set(email);
        }
        if let Some(password) = update.password {
            changes.password_hash = Set(password);
        }
        if let Some(name) = update.name {
            changes.name = Set(name);
        }
        if let Some(role) = update.role {
            changes.role = Set(role.to_string());
        }
        if let Some(avatar_url) = update.avatar_url {
            changes.avatar_url = Set(Some(avatar_url));
        }
        if let Some(bio) = update.bio {
            changes.bio = Set(Some(bio));
        }

        let result = found(self.client.user().update(UniqueWhere::id(id), changes).await)?;
        Ok(result.map(|m| m.into_user()))
    }

    pub async fn delete_user_impl(&self, id: i64) -> Result<bool> {
        let result = found(self.client.user().delete(UniqueWhere::id(id)).await)?;
        Ok(result.is_some())
    }

    pub async fn count_users_impl(&self, role: Option<UserRole>) -> Result<u64> {
        let filter = match role {
            Some(role) => Filter::eq(Column::Role, role.as_str()),
            None => Filter::all(),
        };
        self.client.user().count(filter).await
    }
}
