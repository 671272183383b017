//! 私信实体（发送者 → 接收者）

use sea_orm::entity::prelude::*;

use super::schema::{ModelSchema, fill_if_unset, to_datetime};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "messages")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub sender_id: i64,
    pub receiver_id: i64,
    pub subject: Option<String>,
    #[sea_orm(column_type = "Text")]
    pub content: String,
    pub is_read: bool,
    pub created_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::SenderId",
        to = "super::users::Column::Id"
    )]
    Sender,
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::ReceiverId",
        to = "super::users::Column::Id"
    )]
    Receiver,
}

impl ActiveModelBehavior for ActiveModel {}

impl ModelSchema for Entity {
    const NAME: &'static str = "Message";

    fn unique_keys() -> Vec<Vec<Column>> {
        vec![vec![Column::Id]]
    }

    fn numeric_columns() -> Vec<Column> {
        vec![Column::Id, Column::SenderId, Column::ReceiverId, Column::CreatedAt]
    }

    fn stamp(model: &mut ActiveModel, now: i64, inserting: bool) {
        if inserting {
            fill_if_unset(&mut model.created_at, now);
            fill_if_unset(&mut model.is_read, false);
        }
    }
}

// 从数据库模型转换为业务模型
impl Model {
    pub fn into_message(self) -> crate::models::messages::entities::Message {
        use crate::models::messages::entities::Message;

        Message {
            id: self.id,
            sender_id: self.sender_id,
            receiver_id: self.receiver_id,
            subject: self.subject,
            content: self.content,
            is_read: self.is_read,
            created_at: to_datetime(self.created_at),
        }
    }
}
