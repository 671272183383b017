//! 模型委托
//!
//! [`Delegate`] 为任意实现了 [`ModelSchema`] 的实体提供完整的 CRUD 与聚合操作，
//! 既可以运行在连接池上，也可以运行在事务内。

use std::collections::HashSet;
use std::marker::PhantomData;

use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelBehavior, ActiveModelTrait, ActiveValue, ColumnTrait, Condition, ConnectionTrait,
    EntityTrait, IdenStatic, IntoActiveModel, Iterable, JsonValue, ModelTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, QueryTrait, TransactionSession, TransactionTrait,
    Value,
};
use tracing::debug;

use super::aggregate::{
    AggregateArgs, AggregateResult, AggregateRow, COUNT_ALIAS, GroupByArgs, GroupByRow, RowShape,
    value_alias,
};
use super::args::{FindManyArgs, UniqueWhere};
use super::filter::Filter;
use super::raw;
use crate::entity::ModelSchema;
use crate::errors::{LmsError, Result};

pub struct Delegate<'c, E, C> {
    conn: &'c C,
    _entity: PhantomData<fn() -> E>,
}

fn now() -> i64 {
    chrono::Utc::now().timestamp()
}

fn not_found<E: ModelSchema>() -> LmsError {
    LmsError::record_not_found(format!("{} not found", E::NAME))
}

/// 多列取值拼成去重用的键
fn fingerprint<'a, I>(values: I) -> String
where
    I: IntoIterator<Item = &'a Value>,
{
    values
        .into_iter()
        .map(|v| format!("{v:?}"))
        .collect::<Vec<_>>()
        .join("\u{1f}")
}

impl<'c, E, C> Delegate<'c, E, C>
where
    E: ModelSchema,
    E::Model: IntoActiveModel<E::ActiveModel> + Sync,
    E::ActiveModel: ActiveModelTrait<Entity = E> + ActiveModelBehavior + Send,
    C: ConnectionTrait + TransactionTrait,
{
    pub(crate) fn new(conn: &'c C) -> Self {
        Self {
            conn,
            _entity: PhantomData,
        }
    }

    /// 按唯一键查询
    pub async fn find_unique(&self, selector: UniqueWhere<E>) -> Result<Option<E::Model>> {
        debug!(model = E::NAME, "findUnique");
        let condition = selector.into_condition()?;
        Ok(E::find().filter(condition).one(self.conn).await?)
    }

    pub async fn find_unique_or_throw(&self, selector: UniqueWhere<E>) -> Result<E::Model> {
        self.find_unique(selector)
            .await?
            .ok_or_else(not_found::<E>)
    }

    pub async fn find_first(&self, args: FindManyArgs<E>) -> Result<Option<E::Model>> {
        debug!(model = E::NAME, "findFirst");
        let args = FindManyArgs { take: Some(1), ..args };
        Ok(self.find_many(args).await?.into_iter().next())
    }

    pub async fn find_first_or_throw(&self, args: FindManyArgs<E>) -> Result<E::Model> {
        self.find_first(args).await?.ok_or_else(not_found::<E>)
    }

    pub async fn find_many(&self, args: FindManyArgs<E>) -> Result<Vec<E::Model>> {
        let FindManyArgs {
            filter,
            order_by,
            skip,
            take,
            distinct,
        } = args;
        debug!(model = E::NAME, ?skip, ?take, "findMany");

        let mut query = filter.apply_to(E::find());
        for (column, order) in order_by {
            query = query.order_by(column, order.into());
        }

        if distinct.is_empty() {
            return Ok(query.offset(skip).limit(take).all(self.conn).await?);
        }

        // 去重之后再分页，保证 skip/take 作用在去重结果上
        let rows = query.all(self.conn).await?;
        let mut seen = HashSet::new();
        Ok(rows
            .into_iter()
            .filter(|row| {
                let values: Vec<Value> = distinct.iter().map(|c| row.get(*c)).collect();
                seen.insert(fingerprint(&values))
            })
            .skip(skip.unwrap_or(0) as usize)
            .take(take.map_or(usize::MAX, |t| t as usize))
            .collect())
    }

    pub async fn create(&self, mut data: E::ActiveModel) -> Result<E::Model> {
        debug!(model = E::NAME, "create");
        E::stamp(&mut data, now(), true);
        Ok(data.insert(self.conn).await?)
    }

    /// 批量创建，返回实际写入的行数
    ///
    /// `skip_duplicates` 为 true 时，与已有记录或本批次前面记录在任一唯一键上冲突的行会被跳过。
    pub async fn create_many(
        &self,
        data: Vec<E::ActiveModel>,
        skip_duplicates: bool,
    ) -> Result<u64> {
        debug!(model = E::NAME, rows = data.len(), skip_duplicates, "createMany");
        if data.is_empty() {
            return Ok(0);
        }

        let now = now();
        let rows: Vec<E::ActiveModel> = data
            .into_iter()
            .map(|mut row| {
                E::stamp(&mut row, now, true);
                row
            })
            .collect();

        if !skip_duplicates {
            return Ok(E::insert_many(rows)
                .exec_without_returning(self.conn)
                .await?);
        }

        let txn = self.conn.begin().await?;
        let mut seen = HashSet::new();
        let mut fresh = Vec::with_capacity(rows.len());
        for row in rows {
            if !Self::is_duplicate(&txn, &row, &mut seen).await? {
                fresh.push(row);
            }
        }

        let inserted = if fresh.is_empty() {
            0
        } else {
            E::insert_many(fresh).exec_without_returning(&txn).await?
        };
        txn.commit().await?;
        Ok(inserted)
    }

    async fn is_duplicate<T: ConnectionTrait>(
        conn: &T,
        row: &E::ActiveModel,
        seen: &mut HashSet<String>,
    ) -> Result<bool> {
        for key in E::unique_keys() {
            let values: Vec<(E::Column, Value)> = key
                .iter()
                .filter_map(|column| row.get(*column).into_value().map(|v| (*column, v)))
                .collect();
            // 未赋值的键（如自增主键）交给数据库生成
            if values.len() != key.len() {
                continue;
            }

            let names: Vec<&str> = key.iter().map(|c| c.as_str()).collect();
            let marker = format!(
                "{}={}",
                names.join(","),
                fingerprint(values.iter().map(|(_, v)| v))
            );
            if !seen.insert(marker) {
                return Ok(true);
            }

            let condition = values
                .into_iter()
                .fold(Condition::all(), |cond, (column, value)| {
                    cond.add(column.eq(value))
                });
            if E::find().filter(condition).count(conn).await? > 0 {
                return Ok(true);
            }
        }
        Ok(false)
    }

    /// 按唯一键更新，只写入 `changes` 中处于 `Set` 状态的字段
    pub async fn update(
        &self,
        selector: UniqueWhere<E>,
        changes: E::ActiveModel,
    ) -> Result<E::Model> {
        debug!(model = E::NAME, "update");
        let found = self
            .find_unique(selector)
            .await?
            .ok_or_else(not_found::<E>)?;

        let mut active = found.clone().into_active_model();
        for column in E::Column::iter() {
            if let ActiveValue::Set(value) = changes.get(column) {
                active.set(column, value);
            }
        }
        E::stamp(&mut active, now(), false);

        if !active.is_changed() {
            return Ok(found);
        }
        Ok(active.update(self.conn).await?)
    }

    /// 批量更新，返回受影响的行数
    pub async fn update_many(&self, filter: Filter<E>, mut changes: E::ActiveModel) -> Result<u64> {
        debug!(model = E::NAME, "updateMany");
        E::stamp(&mut changes, now(), false);

        if !changes.is_changed() {
            return self.count(filter).await;
        }

        let result = filter
            .apply_to(E::update_many().set(changes))
            .exec(self.conn)
            .await?;
        Ok(result.rows_affected)
    }

    /// 存在则更新，否则创建；在事务内完成（嵌套时为保存点）
    pub async fn upsert(
        &self,
        selector: UniqueWhere<E>,
        create: E::ActiveModel,
        update: E::ActiveModel,
    ) -> Result<E::Model> {
        debug!(model = E::NAME, "upsert");
        let txn = self.conn.begin().await?;

        let model = {
            let scoped = Delegate::<E, _>::new(&txn);
            match scoped.find_unique(selector.clone()).await? {
                Some(_) => scoped.update(selector, update).await?,
                None => scoped.create(create).await?,
            }
        };

        txn.commit().await?;
        Ok(model)
    }

    /// 删除并返回被删除的记录
    pub async fn delete(&self, selector: UniqueWhere<E>) -> Result<E::Model> {
        debug!(model = E::NAME, "delete");
        let found = self
            .find_unique(selector)
            .await?
            .ok_or_else(not_found::<E>)?;

        let result = found.clone().into_active_model().delete(self.conn).await?;
        if result.rows_affected == 0 {
            return Err(not_found::<E>());
        }
        Ok(found)
    }

    pub async fn delete_many(&self, filter: Filter<E>) -> Result<u64> {
        debug!(model = E::NAME, "deleteMany");
        let result = filter.apply_to(E::delete_many()).exec(self.conn).await?;
        Ok(result.rows_affected)
    }

    pub async fn count(&self, filter: Filter<E>) -> Result<u64> {
        debug!(model = E::NAME, "count");
        Ok(filter.apply_to(E::find()).count(self.conn).await?)
    }

    pub async fn aggregate(&self, args: AggregateArgs<E>) -> Result<AggregateResult> {
        debug!(model = E::NAME, "aggregate");
        let AggregateArgs {
            filter,
            aggregations,
        } = args;
        if aggregations.is_empty() {
            return Err(LmsError::invalid_query(format!(
                "{}: aggregate requires at least one aggregation",
                E::NAME
            )));
        }

        let columns = aggregations.columns()?;
        let backend = self.conn.get_database_backend();

        let mut query = filter.apply_to(E::find().select_only());
        if aggregations.count {
            query = query.column_as(Expr::cust("COUNT(*)"), COUNT_ALIAS);
        }
        for (index, (func, column)) in columns.iter().enumerate() {
            query = query.column_as(func.expr(*column, backend), value_alias(index).as_str());
        }

        let shape = RowShape {
            keys: false,
            count: aggregations.count,
            values: columns.len(),
        };
        let row = match self.conn.query_one_raw(query.build(backend)).await? {
            Some(res) => shape.decode(&res)?,
            None => AggregateRow::default(),
        };
        let count = aggregations.count.then(|| row.count.unwrap_or(0));
        Ok(AggregateResult::from_values(count, &row.values, &columns))
    }

    pub async fn group_by(&self, args: GroupByArgs<E>) -> Result<Vec<GroupByRow>> {
        debug!(model = E::NAME, "groupBy");
        let GroupByArgs {
            by,
            filter,
            aggregations,
            order_by,
            order_by_count,
            skip,
            take,
        } = args;

        if by.is_empty() {
            return Err(LmsError::invalid_query(format!(
                "{}: groupBy requires at least one column",
                E::NAME
            )));
        }
        let names: Vec<&'static str> = by.iter().map(|c| c.as_str()).collect();
        if let Some((column, _)) = order_by
            .iter()
            .find(|(column, _)| !names.contains(&column.as_str()))
        {
            return Err(LmsError::invalid_query(format!(
                "{}: cannot order groups by {} which is not in `by`",
                E::NAME,
                column.as_str()
            )));
        }

        let columns = aggregations.columns()?;
        let backend = self.conn.get_database_backend();

        let mut query = filter.apply_to(E::find().select_only());
        for column in &by {
            query = query.column(*column).group_by(*column);
        }
        if aggregations.count {
            query = query.column_as(Expr::cust("COUNT(*)"), COUNT_ALIAS);
        }
        for (index, (func, column)) in columns.iter().enumerate() {
            query = query.column_as(func.expr(*column, backend), value_alias(index).as_str());
        }
        for (column, order) in order_by {
            query = query.order_by(column, order.into());
        }
        if let Some(order) = order_by_count {
            query = query.order_by(Expr::cust("COUNT(*)"), order.into());
        }

        let shape = RowShape {
            keys: true,
            count: aggregations.count,
            values: columns.len(),
        };
        let statement = query.offset(skip).limit(take).build(backend);
        let rows = self
            .conn
            .query_all_raw(statement)
            .await?
            .iter()
            .map(|res| shape.decode(res))
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(rows
            .into_iter()
            .map(|row| {
                let keys = names
                    .iter()
                    .map(|name| {
                        let value = row.keys.get(*name).cloned().unwrap_or(JsonValue::Null);
                        (name.to_string(), value)
                    })
                    .collect();
                let count = aggregations.count.then(|| row.count.unwrap_or(0));
                GroupByRow {
                    keys,
                    aggregates: AggregateResult::from_values(count, &row.values, &columns),
                }
            })
            .collect())
    }

    /// `SELECT * FROM <table> [WHERE filter]`，filter 中用 `?`/`$n` 占位
    pub async fn find_raw(&self, filter: Option<&str>, values: Vec<Value>) -> Result<Vec<JsonValue>> {
        debug!(model = E::NAME, "findRaw");
        let backend = self.conn.get_database_backend();
        let sql = raw::find_sql(backend, &raw::table_name::<E>(), filter);
        raw::query_json(self.conn, sql, values).await
    }

    /// `SELECT <select> FROM <table> [tail]`
    pub async fn aggregate_raw(
        &self,
        select: &str,
        tail: Option<&str>,
        values: Vec<Value>,
    ) -> Result<Vec<JsonValue>> {
        debug!(model = E::NAME, "aggregateRaw");
        if select.trim().is_empty() {
            return Err(LmsError::invalid_query(format!(
                "{}: aggregateRaw requires a select list",
                E::NAME
            )));
        }
        let backend = self.conn.get_database_backend();
        let sql = raw::aggregate_sql(backend, &raw::table_name::<E>(), select, tail);
        raw::query_json(self.conn, sql, values).await
    }
}
