//! 聚合与分组查询
//!
//! 数值聚合统一转换为双精度，各数据库驱动都按 f64 解码。

use std::collections::BTreeMap;

use sea_orm::sea_query::{Alias, Expr, Func, SimpleExpr};
use sea_orm::{DbBackend, DbErr, EntityTrait, FromQueryResult, IdenStatic, QueryResult};
use serde::Serialize;
use serde_json::{Map, Value as JsonValue};

use super::args::SortOrder;
use super::filter::Filter;
use crate::entity::ModelSchema;
use crate::errors::{LmsError, Result};

pub(crate) const COUNT_ALIAS: &str = "_count";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum AggregateFn {
    Avg,
    Sum,
    Min,
    Max,
}

impl AggregateFn {
    pub(crate) fn prefix(self) -> &'static str {
        match self {
            AggregateFn::Avg => "_avg",
            AggregateFn::Sum => "_sum",
            AggregateFn::Min => "_min",
            AggregateFn::Max => "_max",
        }
    }

    pub(crate) fn expr<C: IdenStatic>(self, column: C, backend: DbBackend) -> SimpleExpr {
        let inner = Expr::col(column);
        let call = match self {
            AggregateFn::Avg => Func::avg(inner),
            AggregateFn::Sum => Func::sum(inner),
            AggregateFn::Min => Func::min(inner),
            AggregateFn::Max => Func::max(inner),
        };
        Func::cast_as(call, Alias::new(double_type(backend))).into()
    }
}

fn double_type(backend: DbBackend) -> &'static str {
    match backend {
        DbBackend::MySql => "DOUBLE",
        DbBackend::Postgres => "DOUBLE PRECISION",
        _ => "REAL",
    }
}

/// 要计算的聚合项
#[derive(Debug, Clone)]
pub struct Aggregations<E: EntityTrait> {
    pub count: bool,
    pub avg: Vec<E::Column>,
    pub sum: Vec<E::Column>,
    pub min: Vec<E::Column>,
    pub max: Vec<E::Column>,
}

impl<E: EntityTrait> Default for Aggregations<E> {
    fn default() -> Self {
        Self {
            count: false,
            avg: Vec::new(),
            sum: Vec::new(),
            min: Vec::new(),
            max: Vec::new(),
        }
    }
}

impl<E: ModelSchema> Aggregations<E> {
    pub fn is_empty(&self) -> bool {
        !self.count
            && self.avg.is_empty()
            && self.sum.is_empty()
            && self.min.is_empty()
            && self.max.is_empty()
    }

    /// 按 (函数, 列) 展开，并检查列是否允许数值聚合
    pub(crate) fn columns(&self) -> Result<Vec<(AggregateFn, E::Column)>> {
        let numeric: Vec<&'static str> =
            E::numeric_columns().iter().map(|c| c.as_str()).collect();

        let mut out = Vec::new();
        for (func, columns) in [
            (AggregateFn::Avg, &self.avg),
            (AggregateFn::Sum, &self.sum),
            (AggregateFn::Min, &self.min),
            (AggregateFn::Max, &self.max),
        ] {
            for column in columns {
                if !numeric.contains(&column.as_str()) {
                    return Err(LmsError::invalid_query(format!(
                        "{}: {} is not supported on column {}",
                        E::NAME,
                        func.prefix(),
                        column.as_str()
                    )));
                }
                out.push((func, *column));
            }
        }
        Ok(out)
    }
}

/// aggregate 参数
#[derive(Debug, Clone)]
pub struct AggregateArgs<E: EntityTrait> {
    pub filter: Filter<E>,
    pub aggregations: Aggregations<E>,
}

impl<E: EntityTrait> Default for AggregateArgs<E> {
    fn default() -> Self {
        Self {
            filter: Filter::all(),
            aggregations: Aggregations::default(),
        }
    }
}

impl<E: EntityTrait> AggregateArgs<E> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn filter(mut self, filter: Filter<E>) -> Self {
        self.filter = filter;
        self
    }

    pub fn count(mut self) -> Self {
        self.aggregations.count = true;
        self
    }

    pub fn avg(mut self, column: E::Column) -> Self {
        self.aggregations.avg.push(column);
        self
    }

    pub fn sum(mut self, column: E::Column) -> Self {
        self.aggregations.sum.push(column);
        self
    }

    pub fn min(mut self, column: E::Column) -> Self {
        self.aggregations.min.push(column);
        self
    }

    pub fn max(mut self, column: E::Column) -> Self {
        self.aggregations.max.push(column);
        self
    }
}

/// aggregate 结果，键为列名
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AggregateResult {
    #[serde(rename = "_count", skip_serializing_if = "Option::is_none")]
    pub count: Option<u64>,
    #[serde(rename = "_avg")]
    pub avg: BTreeMap<String, Option<f64>>,
    #[serde(rename = "_sum")]
    pub sum: BTreeMap<String, Option<f64>>,
    #[serde(rename = "_min")]
    pub min: BTreeMap<String, Option<f64>>,
    #[serde(rename = "_max")]
    pub max: BTreeMap<String, Option<f64>>,
}

impl AggregateResult {
    pub fn avg_of(&self, column: &str) -> Option<f64> {
        self.avg.get(column).copied().flatten()
    }

    pub fn sum_of(&self, column: &str) -> Option<f64> {
        self.sum.get(column).copied().flatten()
    }

    pub fn min_of(&self, column: &str) -> Option<f64> {
        self.min.get(column).copied().flatten()
    }

    pub fn max_of(&self, column: &str) -> Option<f64> {
        self.max.get(column).copied().flatten()
    }

    /// 按查询时的列顺序还原聚合值
    pub(crate) fn from_values<C: IdenStatic>(
        count: Option<u64>,
        values: &[Option<f64>],
        columns: &[(AggregateFn, C)],
    ) -> Self {
        let mut result = AggregateResult {
            count,
            ..Default::default()
        };
        for (index, (func, column)) in columns.iter().enumerate() {
            let value = values.get(index).copied().flatten();
            let slot = match func {
                AggregateFn::Avg => &mut result.avg,
                AggregateFn::Sum => &mut result.sum,
                AggregateFn::Min => &mut result.min,
                AggregateFn::Max => &mut result.max,
            };
            slot.insert(column.as_str().to_string(), value);
        }
        result
    }
}

/// 第 `index` 个数值聚合在查询中的别名
pub(crate) fn value_alias(index: usize) -> String {
    format!("_agg_{index}")
}

/// 聚合查询的一行
#[derive(Debug, Default)]
pub(crate) struct AggregateRow {
    pub keys: Map<String, JsonValue>,
    pub count: Option<u64>,
    pub values: Vec<Option<f64>>,
}

/// 一行结果中包含哪些列
///
/// 计算列没有声明类型，按别名逐个以具体类型解码；分组键是表中的列，整体按 JSON 解码。
#[derive(Debug, Clone, Copy)]
pub(crate) struct RowShape {
    pub keys: bool,
    pub count: bool,
    /// 数值聚合列数，别名依次为 `_agg_0..`
    pub values: usize,
}

impl RowShape {
    pub(crate) fn decode(&self, res: &QueryResult) -> std::result::Result<AggregateRow, DbErr> {
        let keys = if self.keys {
            match JsonValue::from_query_result(res, "")? {
                JsonValue::Object(map) => map,
                _ => Map::new(),
            }
        } else {
            Map::new()
        };

        let count = if self.count {
            res.try_get::<Option<i64>>("", COUNT_ALIAS)?
                .map(|c| c.max(0) as u64)
        } else {
            None
        };

        let values = (0..self.values)
            .map(|index| res.try_get::<Option<f64>>("", &value_alias(index)))
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(AggregateRow {
            keys,
            count,
            values,
        })
    }
}

/// groupBy 参数
#[derive(Debug, Clone)]
pub struct GroupByArgs<E: EntityTrait> {
    pub by: Vec<E::Column>,
    pub filter: Filter<E>,
    pub aggregations: Aggregations<E>,
    /// 只能引用 `by` 中的列
    pub order_by: Vec<(E::Column, SortOrder)>,
    pub order_by_count: Option<SortOrder>,
    pub skip: Option<u64>,
    pub take: Option<u64>,
}

impl<E: EntityTrait> GroupByArgs<E> {
    pub fn by(columns: Vec<E::Column>) -> Self {
        Self {
            by: columns,
            filter: Filter::all(),
            aggregations: Aggregations::default(),
            order_by: Vec::new(),
            order_by_count: None,
            skip: None,
            take: None,
        }
    }

    pub fn filter(mut self, filter: Filter<E>) -> Self {
        self.filter = filter;
        self
    }

    pub fn count(mut self) -> Self {
        self.aggregations.count = true;
        self
    }

    pub fn avg(mut self, column: E::Column) -> Self {
        self.aggregations.avg.push(column);
        self
    }

    pub fn sum(mut self, column: E::Column) -> Self {
        self.aggregations.sum.push(column);
        self
    }

    pub fn min(mut self, column: E::Column) -> Self {
        self.aggregations.min.push(column);
        self
    }

    pub fn max(mut self, column: E::Column) -> Self {
        self.aggregations.max.push(column);
        self
    }

    pub fn order_by(mut self, column: E::Column, order: SortOrder) -> Self {
        self.order_by.push((column, order));
        self
    }

    pub fn order_by_count(mut self, order: SortOrder) -> Self {
        self.order_by_count = Some(order);
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
}

/// groupBy 的一行：分组键加聚合值
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupByRow {
    pub keys: Map<String, JsonValue>,
    #[serde(flatten)]
    pub aggregates: AggregateResult,
}

impl GroupByRow {
    pub fn key(&self, column: &str) -> Option<&JsonValue> {
        self.keys.get(column)
    }

    pub fn key_str(&self, column: &str) -> Option<&str> {
        self.keys.get(column).and_then(JsonValue::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::{course_enrollments, users};

    #[test]
    fn test_non_numeric_column_rejected() {
        let args = AggregateArgs::<users::Entity>::new().avg(users::Column::Email);
        let err = args.aggregations.columns().unwrap_err();
        assert!(matches!(err, LmsError::InvalidQuery(_)));
    }

    #[test]
    fn test_numeric_columns_expand() {
        let args = AggregateArgs::<course_enrollments::Entity>::new()
            .count()
            .avg(course_enrollments::Column::Progress)
            .max(course_enrollments::Column::Progress);
        let columns = args.aggregations.columns().unwrap();
        assert_eq!(columns.len(), 2);
        assert_eq!(columns[0].0, AggregateFn::Avg);
        assert!(!args.aggregations.is_empty());
    }

    #[test]
    fn test_from_values_keeps_column_order() {
        let columns = vec![
            (AggregateFn::Avg, course_enrollments::Column::Progress),
            (AggregateFn::Max, course_enrollments::Column::Progress),
        ];
        let result = AggregateResult::from_values(Some(3), &[Some(50.5), None], &columns);
        assert_eq!(result.count, Some(3));
        assert_eq!(result.avg_of("progress"), Some(50.5));
        assert_eq!(result.max_of("progress"), None);
        assert!(result.max.contains_key("progress"));
        assert_eq!(value_alias(1), "_agg_1");
    }
}
