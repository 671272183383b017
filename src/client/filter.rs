//! 查询条件
//!
//! [`Filter`] 以实体自身的 `Column` 枚举作为字段选择器，支持 AND / OR / NOT 组合，
//! 最终编译为 SeaORM 的 [`Condition`]。

use sea_orm::sea_query::LikeExpr;
use sea_orm::{
    ColumnTrait, Condition, EntityTrait, Iterable, PrimaryKeyToColumn, QueryFilter, Value,
};

use crate::utils::{LIKE_ESCAPE, escape_like_pattern};

/// 单个字段上的比较
#[derive(Debug, Clone, PartialEq)]
pub enum FieldFilter {
    Equals(Value),
    Not(Value),
    In(Vec<Value>),
    NotIn(Vec<Value>),
    Lt(Value),
    Lte(Value),
    Gt(Value),
    Gte(Value),
    Contains(String),
    StartsWith(String),
    EndsWith(String),
    IsNull,
    IsNotNull,
}

#[derive(Debug, Clone)]
pub enum Filter<E: EntityTrait> {
    Field(E::Column, FieldFilter),
    And(Vec<Filter<E>>),
    Or(Vec<Filter<E>>),
    Not(Box<Filter<E>>),
}

impl<E: EntityTrait> Default for Filter<E> {
    fn default() -> Self {
        Filter::And(Vec::new())
    }
}

impl<E: EntityTrait> Filter<E> {
    /// 匹配全部记录
    pub fn all() -> Self {
        Self::default()
    }

    pub fn eq<V: Into<Value>>(column: E::Column, value: V) -> Self {
        Filter::Field(column, FieldFilter::Equals(value.into()))
    }

    pub fn ne<V: Into<Value>>(column: E::Column, value: V) -> Self {
        Filter::Field(column, FieldFilter::Not(value.into()))
    }

    pub fn is_in<V, I>(column: E::Column, values: I) -> Self
    where
        V: Into<Value>,
        I: IntoIterator<Item = V>,
    {
        Filter::Field(
            column,
            FieldFilter::In(values.into_iter().map(Into::into).collect()),
        )
    }

    pub fn not_in<V, I>(column: E::Column, values: I) -> Self
    where
        V: Into<Value>,
        I: IntoIterator<Item = V>,
    {
        Filter::Field(
            column,
            FieldFilter::NotIn(values.into_iter().map(Into::into).collect()),
        )
    }

    pub fn lt<V: Into<Value>>(column: E::Column, value: V) -> Self {
        Filter::Field(column, FieldFilter::Lt(value.into()))
    }

    pub fn lte<V: Into<Value>>(column: E::Column, value: V) -> Self {
        Filter::Field(column, FieldFilter::Lte(value.into()))
    }

    pub fn gt<V: Into<Value>>(column: E::Column, value: V) -> Self {
        Filter::Field(column, FieldFilter::Gt(value.into()))
    }

    pub fn gte<V: Into<Value>>(column: E::Column, value: V) -> Self {
        Filter::Field(column, FieldFilter::Gte(value.into()))
    }

    pub fn contains<S: Into<String>>(column: E::Column, needle: S) -> Self {
        Filter::Field(column, FieldFilter::Contains(needle.into()))
    }

    pub fn starts_with<S: Into<String>>(column: E::Column, prefix: S) -> Self {
        Filter::Field(column, FieldFilter::StartsWith(prefix.into()))
    }

    pub fn ends_with<S: Into<String>>(column: E::Column, suffix: S) -> Self {
        Filter::Field(column, FieldFilter::EndsWith(suffix.into()))
    }

    pub fn is_null(column: E::Column) -> Self {
        Filter::Field(column, FieldFilter::IsNull)
    }

    pub fn is_not_null(column: E::Column) -> Self {
        Filter::Field(column, FieldFilter::IsNotNull)
    }

    pub fn and(filters: Vec<Filter<E>>) -> Self {
        Filter::And(filters)
    }

    pub fn or(filters: Vec<Filter<E>>) -> Self {
        Filter::Or(filters)
    }

    #[allow(clippy::should_implement_trait)]
    pub fn not(filter: Filter<E>) -> Self {
        Filter::Not(Box::new(filter))
    }

    /// 与另一个条件做 AND，连续调用时展平为同一层
    pub fn with(self, other: Filter<E>) -> Self {
        match self {
            Filter::And(mut items) => {
                items.push(other);
                Filter::And(items)
            }
            single => Filter::And(vec![single, other]),
        }
    }

    /// 是否不含任何约束
    pub fn is_empty(&self) -> bool {
        matches!(self, Filter::And(items) if items.iter().all(Filter::is_empty))
    }

    /// 附加到查询上；不含约束时不生成 WHERE
    pub fn apply_to<Q: QueryFilter>(self, query: Q) -> Q {
        if self.is_empty() {
            query
        } else {
            query.filter(self.into_condition())
        }
    }

    /// 编译为 SeaORM 条件
    pub fn into_condition(self) -> Condition {
        match self {
            Filter::Field(column, filter) => field_condition::<E>(column, filter),
            Filter::And(items) => items
                .into_iter()
                .fold(Condition::all(), |cond, item| cond.add(item.into_condition())),
            Filter::Or(items) => {
                if items.is_empty() {
                    return never::<E>();
                }
                items
                    .into_iter()
                    .fold(Condition::any(), |cond, item| cond.add(item.into_condition()))
            }
            Filter::Not(inner) => inner.into_condition().not(),
        }
    }
}

/// 永假条件：主键不可能为 NULL
fn never<E: EntityTrait>() -> Condition {
    match E::PrimaryKey::iter().next() {
        Some(pk) => Condition::all().add(pk.into_column().is_null()),
        None => Condition::any(),
    }
}

fn field_condition<E: EntityTrait>(column: E::Column, filter: FieldFilter) -> Condition {
    let expr = match filter {
        FieldFilter::Equals(Value::String(None)) | FieldFilter::IsNull => column.is_null(),
        FieldFilter::Not(Value::String(None)) | FieldFilter::IsNotNull => column.is_not_null(),
        FieldFilter::Equals(value) => column.eq(value),
        FieldFilter::Not(value) => column.ne(value),
        FieldFilter::In(values) => {
            if values.is_empty() {
                return never::<E>();
            }
            column.is_in(values)
        }
        FieldFilter::NotIn(values) => {
            if values.is_empty() {
                return Condition::all();
            }
            column.is_not_in(values)
        }
        FieldFilter::Lt(value) => column.lt(value),
        FieldFilter::Lte(value) => column.lte(value),
        FieldFilter::Gt(value) => column.gt(value),
        FieldFilter::Gte(value) => column.gte(value),
        FieldFilter::Contains(needle) => column.like(like(format!(
            "%{}%",
            escape_like_pattern(&needle)
        ))),
        FieldFilter::StartsWith(prefix) => {
            column.like(like(format!("{}%", escape_like_pattern(&prefix))))
        }
        FieldFilter::EndsWith(suffix) => {
            column.like(like(format!("%{}", escape_like_pattern(&suffix))))
        }
    };
    Condition::all().add(expr)
}

fn like(pattern: String) -> LikeExpr {
    LikeExpr::new(pattern).escape(LIKE_ESCAPE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::users::{Column, Entity as Users};
    use sea_orm::{DbBackend, QueryTrait};

    fn sql(filter: Filter<Users>) -> String {
        filter
            .apply_to(Users::find())
            .build(DbBackend::Sqlite)
            .to_string()
    }

    #[test]
    fn test_empty_filter_has_no_where_clause() {
        let rendered = sql(Filter::all());
        assert!(!rendered.contains("WHERE"));
        assert!(Filter::<Users>::all().is_empty());

        let nested = sql(Filter::and(vec![Filter::all(), Filter::and(vec![])]));
        assert!(!nested.contains("WHERE"));
        assert!(sql(Filter::not(Filter::all())).contains("WHERE"));
    }

    #[test]
    fn test_and_or_not_compose() {
        let filter = Filter::or(vec![
            Filter::eq(Column::Role, "teacher"),
            Filter::and(vec![
                Filter::eq(Column::Role, "student"),
                Filter::not(Filter::contains(Column::Email, "@spam.example")),
            ]),
        ]);
        let rendered = sql(filter);
        assert!(rendered.contains("\"role\" = 'teacher'"));
        assert!(rendered.contains("OR"));
        assert!(rendered.contains("NOT"));
    }

    #[test]
    fn test_like_patterns_are_escaped() {
        let rendered = sql(Filter::contains(Column::Name, "50%_off"));
        assert!(rendered.contains("50!%!_off"));
        assert!(rendered.contains("ESCAPE"));
    }

    #[test]
    fn test_empty_or_and_in_match_nothing() {
        assert!(sql(Filter::or(vec![])).contains("IS NULL"));
        assert!(sql(Filter::is_in(Column::Id, Vec::<i64>::new())).contains("IS NULL"));
    }

    #[test]
    fn test_with_flattens() {
        let filter = Filter::<Users>::all()
            .with(Filter::eq(Column::Role, "admin"))
            .with(Filter::gt(Column::Id, 3));
        match filter {
            Filter::And(items) => assert_eq!(items.len(), 2),
            other => panic!("unexpected filter: {other:?}"),
        }
    }
}
