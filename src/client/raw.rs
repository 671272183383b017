//! 原生命令透传
//!
//! 原生 SQL 不经过查询构建器，只负责拼接表名并绑定参数。

use sea_orm::{
    ConnectionTrait, DbBackend, EntityName, FromQueryResult, JsonValue, Statement, Value,
};
use serde::Serialize;

use crate::errors::Result;

/// runCommandRaw 的执行结果
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RawCommandResult {
    pub rows_affected: u64,
    pub last_insert_id: Option<u64>,
}

/// 按数据库方言引用标识符
pub(crate) fn quote_ident(backend: DbBackend, ident: &str) -> String {
    match backend {
        DbBackend::MySql => format!("`{}`", ident.replace('`', "``")),
        _ => format!("\"{}\"", ident.replace('"', "\"\"")),
    }
}

pub(crate) fn table_name<E: EntityName>() -> String {
    E::default().table_name().to_string()
}

/// `SELECT * FROM <table> [WHERE filter]`
pub(crate) fn find_sql(backend: DbBackend, table: &str, filter: Option<&str>) -> String {
    let mut sql = format!("SELECT * FROM {}", quote_ident(backend, table));
    if let Some(filter) = filter.map(str::trim).filter(|f| !f.is_empty()) {
        sql.push_str(" WHERE ");
        sql.push_str(filter);
    }
    sql
}

/// `SELECT <select> FROM <table> [tail]`
pub(crate) fn aggregate_sql(
    backend: DbBackend,
    table: &str,
    select: &str,
    tail: Option<&str>,
) -> String {
    let mut sql = format!("SELECT {} FROM {}", select.trim(), quote_ident(backend, table));
    if let Some(tail) = tail.map(str::trim).filter(|t| !t.is_empty()) {
        sql.push(' ');
        sql.push_str(tail);
    }
    sql
}

pub(crate) async fn query_json<C: ConnectionTrait>(
    conn: &C,
    sql: String,
    values: Vec<Value>,
) -> Result<Vec<JsonValue>> {
    let stmt = Statement::from_sql_and_values(conn.get_database_backend(), sql, values);
    Ok(JsonValue::find_by_statement(stmt).all(conn).await?)
}

pub(crate) async fn execute<C: ConnectionTrait>(
    conn: &C,
    sql: String,
    values: Vec<Value>,
) -> Result<RawCommandResult> {
    let backend = conn.get_database_backend();
    let stmt = Statement::from_sql_and_values(backend, sql, values);
    let result = conn.execute_raw(stmt).await?;

    // PostgreSQL 不提供 last_insert_id
    let last_insert_id = match backend {
        DbBackend::Postgres => None,
        _ => Some(result.last_insert_id()).filter(|id| *id > 0),
    };

    Ok(RawCommandResult {
        rows_affected: result.rows_affected(),
        last_insert_id,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quote_ident() {
        assert_eq!(quote_ident(DbBackend::Sqlite, "users"), "\"users\"");
        assert_eq!(quote_ident(DbBackend::MySql, "users"), "`users`");
        assert_eq!(quote_ident(DbBackend::Postgres, "a\"b"), "\"a\"\"b\"");
    }

    #[test]
    fn test_find_sql() {
        assert_eq!(
            find_sql(DbBackend::Sqlite, "users", None),
            "SELECT * FROM \"users\""
        );
        assert_eq!(
            find_sql(DbBackend::Sqlite, "users", Some("  ")),
            "SELECT * FROM \"users\""
        );
        assert_eq!(
            find_sql(DbBackend::Sqlite, "users", Some("role = ?")),
            "SELECT * FROM \"users\" WHERE role = ?"
        );
    }

    #[test]
    fn test_aggregate_sql() {
        assert_eq!(
            aggregate_sql(
                DbBackend::Postgres,
                "courses",
                "teacher_id, COUNT(*) AS n",
                Some("GROUP BY teacher_id")
            ),
            "SELECT teacher_id, COUNT(*) AS n FROM \"courses\" GROUP BY teacher_id"
        );
    }
}
