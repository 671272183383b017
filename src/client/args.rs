//! 查询参数：唯一选择器、排序、分页

use sea_orm::{
    ColumnTrait, Condition, EntityTrait, IdenStatic, Iterable, Order, PrimaryKeyToColumn, Value,
};
use serde::{Deserialize, Serialize};

use super::filter::Filter;
use crate::entity::ModelSchema;
use crate::errors::{LmsError, Result};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl From<SortOrder> for Order {
    fn from(order: SortOrder) -> Self {
        match order {
            SortOrder::Asc => Order::Asc,
            SortOrder::Desc => Order::Desc,
        }
    }
}

/// 唯一记录选择器
///
/// 所给字段集合必须恰好构成模型声明的某个唯一键（主键、唯一列或复合唯一键）。
#[derive(Debug, Clone)]
pub struct UniqueWhere<E: EntityTrait> {
    fields: Vec<(E::Column, Value)>,
}

impl<E: EntityTrait> UniqueWhere<E> {
    /// 按主键选择
    pub fn id<V: Into<Value>>(value: V) -> Self {
        let fields = E::PrimaryKey::iter()
            .next()
            .map(|pk| vec![(pk.into_column(), value.into())])
            .unwrap_or_default();
        Self { fields }
    }

    pub fn field<V: Into<Value>>(column: E::Column, value: V) -> Self {
        Self {
            fields: vec![(column, value.into())],
        }
    }

    /// 追加字段，组成复合唯一键
    pub fn and<V: Into<Value>>(mut self, column: E::Column, value: V) -> Self {
        self.fields.push((column, value.into()));
        self
    }

    pub fn fields(&self) -> &[(E::Column, Value)] {
        &self.fields
    }
}

impl<E: ModelSchema> UniqueWhere<E> {
    /// 校验并转换为查询条件
    pub(crate) fn into_condition(self) -> Result<Condition> {
        let mut given: Vec<&str> = self.fields.iter().map(|(c, _)| c.as_str()).collect();
        given.sort_unstable();
        let before = given.len();
        given.dedup();

        let matches_key = before == given.len()
            && E::unique_keys().iter().any(|key| {
                let mut names: Vec<&str> = key.iter().map(|c| c.as_str()).collect();
                names.sort_unstable();
                names == given
            });

        if !matches_key {
            return Err(LmsError::invalid_query(format!(
                "{}: [{}] is not a unique key",
                E::NAME,
                given.join(", ")
            )));
        }

        Ok(self
            .fields
            .into_iter()
            .fold(Condition::all(), |cond, (column, value)| {
                cond.add(column.eq(value))
            }))
    }
}

/// findMany / findFirst 的参数
#[derive(Debug, Clone)]
pub struct FindManyArgs<E: EntityTrait> {
    pub filter: Filter<E>,
    pub order_by: Vec<(E::Column, SortOrder)>,
    pub skip: Option<u64>,
    pub take: Option<u64>,
    /// 按这些列去重，保留每组首条记录
    pub distinct: Vec<E::Column>,
}

impl<E: EntityTrait> Default for FindManyArgs<E> {
    fn default() -> Self {
        Self {
            filter: Filter::all(),
            order_by: Vec::new(),
            skip: None,
            take: None,
            distinct: Vec::new(),
        }
    }
}

impl<E: EntityTrait> FindManyArgs<E> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn filter(mut self, filter: Filter<E>) -> Self {
        self.filter = filter;
        self
    }

    pub fn order_by(mut self, column: E::Column, order: SortOrder) -> Self {
        self.order_by.push((column, order));
        self
    }

    pub fn skip(mut self, skip: u64) -> Self {
        self.skip = Some(skip);
        self
    }

    pub fn take(mut self, take: u64) -> Self {
        self.take = Some(take);
        self
    }

    pub fn distinct(mut self, column: E::Column) -> Self {
        self.distinct.push(column);
        self
    }

    /// 由页码和每页数量计算 skip / take，页码从 1 开始
    ///
    /// skip 上限为 `i64::MAX`，超出范围的页码返回空页。
    pub fn paginate(self, page: i64, size: i64) -> Self {
        let page = page.max(1) as u64;
        let size = size.max(1) as u64;
        let skip = (page - 1).saturating_mul(size).min(i64::MAX as u64);
        self.skip(skip).take(size)
    }
}

impl<E: EntityTrait> From<Filter<E>> for FindManyArgs<E> {
    fn from(filter: Filter<E>) -> Self {
        Self::default().filter(filter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::{course_enrollments, users};

    #[test]
    fn test_unique_where_accepts_declared_keys() {
        assert!(
            UniqueWhere::<users::Entity>::id(1)
                .into_condition()
                .is_ok()
        );
        assert!(
            UniqueWhere::<users::Entity>::field(users::Column::Email, "a@b.c")
                .into_condition()
                .is_ok()
        );
        // 复合键字段顺序无关
        assert!(
            UniqueWhere::<course_enrollments::Entity>::field(
                course_enrollments::Column::CourseId,
                2
            )
            .and(course_enrollments::Column::UserId, 1)
            .into_condition()
            .is_ok()
        );
    }

    #[test]
    fn test_unique_where_rejects_other_fields() {
        let err = UniqueWhere::<users::Entity>::field(users::Column::Name, "Alice")
            .into_condition()
            .unwrap_err();
        assert!(matches!(err, LmsError::InvalidQuery(_)));

        // 复合键只给一半
        let err = UniqueWhere::<course_enrollments::Entity>::field(
            course_enrollments::Column::UserId,
            1,
        )
        .into_condition()
        .unwrap_err();
        assert!(matches!(err, LmsError::InvalidQuery(_)));

        // 重复字段
        let err = UniqueWhere::<users::Entity>::id(1)
            .and(users::Column::Id, 2)
            .into_condition()
            .unwrap_err();
        assert!(matches!(err, LmsError::InvalidQuery(_)));
    }

    #[test]
    fn test_paginate() {
        let args = FindManyArgs::<users::Entity>::new().paginate(3, 20);
        assert_eq!(args.skip, Some(40));
        assert_eq!(args.take, Some(20));

        let args = FindManyArgs::<users::Entity>::new().paginate(0, 0);
        assert_eq!(args.skip, Some(0));
        assert_eq!(args.take, Some(1));
    }

    #[test]
    fn test_paginate_huge_page_does_not_overflow() {
        let args = FindManyArgs::<users::Entity>::new().paginate(i64::MAX, 100);
        assert_eq!(args.skip, Some(i64::MAX as u64));
        assert_eq!(args.take, Some(100));
    }
}
