use super::{SeaOrmStorage, found, page_params};
use crate::client::{FindManyArgs, Filter, SortOrder, UniqueWhere};
use crate::entity::messages::{ActiveModel, Column, Entity as Messages};
use crate::errors::Result;
use crate::models::{
    PaginationInfo, PaginationQuery,
    messages::{entities::Message, requests::SendMessageRequest, responses::MessageListResponse},
};
use sea_orm::Set;

impl SeaOrmStorage {
    pub async fn send_message_impl(&self, sender_id: i64, req: SendMessageRequest) -> Result<Message> {
        let model = ActiveModel {
            sender_id: Set(sender_id),
            receiver_id: Set(req.receiver_id),
            subject: Set(req.subject),
            content: Set(req.content),
            is_read: Set(false),
            ..Default::default()
        };

        Ok(self.client.message().create(model).await?.into_message())
    }

    pub async fn get_message_impl(&self, message_id: i64) -> Result<Option<Message>> {
        let result = self
            .client
            .message()
            .find_unique(UniqueWhere::id(message_id))
            .await?;
        Ok(result.map(|m| m.into_message()))
    }

    /// 收件箱，可只看未读
    pub async fn list_inbox_with_pagination_impl(
        &self,
        user_id: i64,
        query: PaginationQuery,
        unread_only: bool,
    ) -> Result<MessageListResponse> {
        let mut filter = Filter::eq(Column::ReceiverId, user_id);
        if unread_only {
            filter = filter.with(Filter::eq(Column::IsRead, false));
        }
        self.paginate_messages(filter, query).await
    }

    /// 发件箱
    pub async fn list_sent_with_pagination_impl(
        &self,
        user_id: i64,
        query: PaginationQuery,
    ) -> Result<MessageListResponse> {
        self.paginate_messages(Filter::eq(Column::SenderId, user_id), query)
            .await
    }

    /// 标记已读，只有收件人可以操作
    pub async fn mark_message_read_impl(&self, message_id: i64, receiver_id: i64) -> Result<bool> {
        let delegate = self.client.message();
        match delegate.find_unique(UniqueWhere::id(message_id)).await? {
            Some(message) if message.receiver_id == receiver_id => {
                if message.is_read {
                    return Ok(true);
                }
            }
            _ => return Ok(false),
        }

        let changes = ActiveModel {
            is_read: Set(true),
            ..Default::default()
        };
        let result = found(delegate.update(UniqueWhere::id(message_id), changes).await)?;
        Ok(result.is_some())
    }

    pub async fn count_unread_messages_impl(&self, user_id: i64) -> Result<u64> {
        self.client
            .message()
            .count(Filter::eq(Column::ReceiverId, user_id).with(Filter::eq(Column::IsRead, false)))
            .await
    }

    pub async fn delete_message_impl(&self, message_id: i64) -> Result<bool> {
        let result = found(self.client.message().delete(UniqueWhere::id(message_id)).await)?;
        Ok(result.is_some())
    }

    async fn paginate_messages(
        &self,
        filter: Filter<Messages>,
        query: PaginationQuery,
    ) -> Result<MessageListResponse> {
        let (page, size) = page_params(Some(query.page), Some(query.size));

        let delegate = self.client.message();
        let total = delegate.count(filter.clone()).await?;
        let messages = delegate
            .find_many(
                FindManyArgs::new()
                    .filter(filter)
                    .order_by(Column::CreatedAt, SortOrder::Desc)
                    .order_by(Column::Id, SortOrder::Desc)
                    .paginate(page, size),
            )
            .await?;

        Ok(MessageListResponse {
            items: messages.into_iter().map(|m| m.into_message()).collect(),
            pagination: PaginationInfo::new(page, size, total as i64),
        })
    }
}
