//! 类型化数据库客户端
//!
//! `LmsClient` 持有数据库连接，为每个模型提供一个 [`Delegate`]：
//!
//! ```ignore
//! let client = LmsClient::connect("sqlite::memory:", &options).await?;
//! let teachers = client
//!     .user()
//!     .find_many(FindManyArgs::new().filter(Filter::eq(users::Column::Role, "teacher")))
//!     .await?;
//! ```
//!
//! 所有委托共享同一套泛型实现，模型自身的 `Column` 枚举即字段选择器。

mod aggregate;
mod args;
mod delegate;
mod filter;
mod raw;

#[cfg(test)]
mod tests;

pub use aggregate::{AggregateArgs, AggregateResult, Aggregations, GroupByArgs, GroupByRow};
pub use args::{FindManyArgs, SortOrder, UniqueWhere};
pub use delegate::Delegate;
pub use filter::{FieldFilter, Filter};
pub use raw::RawCommandResult;

use std::str::FromStr;
use std::time::Duration;

use migration::{Migrator, MigratorTrait};
use sea_orm::{
    ConnectOptions, ConnectionTrait, Database, DatabaseConnection, DatabaseTransaction, DbBackend,
    JsonValue, TransactionTrait, Value,
};
use tracing::{debug, info};

use crate::config::DatabaseConfig;
use crate::entity::{
    announcements, assignment_submissions, assignments, course_enrollments, course_materials,
    courses, messages, student_progress, users,
};
use crate::errors::{LmsError, Result};

/// 为连接类型生成每个模型的委托访问器
macro_rules! model_delegates {
    ($conn:ident) => {
        pub fn user(&self) -> Delegate<'_, users::Entity, $conn> {
            Delegate::new(&self.conn)
        }

        pub fn course(&self) -> Delegate<'_, courses::Entity, $conn> {
            Delegate::new(&self.conn)
        }

        pub fn course_enrollment(&self) -> Delegate<'_, course_enrollments::Entity, $conn> {
            Delegate::new(&self.conn)
        }

        pub fn course_material(&self) -> Delegate<'_, course_materials::Entity, $conn> {
            Delegate::new(&self.conn)
        }

        pub fn assignment(&self) -> Delegate<'_, assignments::Entity, $conn> {
            Delegate::new(&self.conn)
        }

        pub fn assignment_submission(
            &self,
        ) -> Delegate<'_, assignment_submissions::Entity, $conn> {
            Delegate::new(&self.conn)
        }

        pub fn message(&self) -> Delegate<'_, messages::Entity, $conn> {
            Delegate::new(&self.conn)
        }

        pub fn announcement(&self) -> Delegate<'_, announcements::Entity, $conn> {
            Delegate::new(&self.conn)
        }

        pub fn student_progress(&self) -> Delegate<'_, student_progress::Entity, $conn> {
            Delegate::new(&self.conn)
        }

        /// 执行原生 SQL 命令
        pub async fn run_command_raw(
            &self,
            sql: &str,
            values: Vec<Value>,
        ) -> Result<RawCommandResult> {
            debug!("runCommandRaw: {}", sql);
            raw::execute(&self.conn, sql.to_string(), values).await
        }

        /// 执行原生 SQL 查询，每行转为 JSON 对象
        pub async fn query_raw(&self, sql: &str, values: Vec<Value>) -> Result<Vec<JsonValue>> {
            debug!("queryRaw: {}", sql);
            raw::query_json(&self.conn, sql.to_string(), values).await
        }

        pub fn backend(&self) -> DbBackend {
            self.conn.get_database_backend()
        }
    };
}

/// 数据库客户端
#[derive(Clone)]
pub struct LmsClient {
    conn: DatabaseConnection,
}

impl LmsClient {
    model_delegates!(DatabaseConnection);

    /// 连接数据库并执行迁移
    pub async fn connect(config: &DatabaseConfig) -> Result<Self> {
        let url = Self::build_database_url(&config.url)?;

        let conn = if url.starts_with("sqlite:") {
            Self::connect_sqlite(&url, config).await?
        } else {
            Self::connect_generic(&url, config).await?
        };

        let client = Self { conn };
        client.migrate().await?;

        info!("Database connected: {}", url);
        Ok(client)
    }

    /// 使用已有连接，不执行迁移
    pub fn from_connection(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn migrate(&self) -> Result<()> {
        Migrator::up(&self.conn, None)
            .await
            .map_err(|e| LmsError::database_operation(format!("数据库迁移失败: {e}")))
    }

    pub fn connection(&self) -> &DatabaseConnection {
        &self.conn
    }

    pub async fn ping(&self) -> Result<()> {
        self.conn
            .ping()
            .await
            .map_err(|e| LmsError::database_connection(e.to_string()))
    }

    /// 开启事务
    pub async fn begin(&self) -> Result<LmsTransaction> {
        Ok(LmsTransaction {
            conn: self.conn.begin().await?,
        })
    }

    pub async fn close(self) -> Result<()> {
        self.conn
            .close()
            .await
            .map_err(|e| LmsError::database_connection(e.to_string()))
    }

    /// SQLite 专用连接（WAL + pragma 优化）
    async fn connect_sqlite(url: &str, config: &DatabaseConfig) -> Result<DatabaseConnection> {
        use sea_orm::SqlxSqliteConnector;
        use sea_orm::sqlx::sqlite::{
            SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous,
        };

        let in_memory = url.contains(":memory:") || url.contains("mode=memory");

        let mut opt = SqliteConnectOptions::from_str(url)
            .map_err(|e| LmsError::database_config(format!("SQLite URL 解析失败: {e}")))?
            .create_if_missing(true)
            .foreign_keys(true)
            .busy_timeout(Duration::from_secs(5))
            .pragma("cache_size", "-64000")
            .pragma("temp_store", "memory");
        if !in_memory {
            opt = opt
                .journal_mode(SqliteJournalMode::Wal)
                .synchronous(SqliteSynchronous::Normal)
                .pragma("wal_autocheckpoint", "1000");
        }

        // 内存库每个连接各自独立，只能用单连接
        let max_connections = if in_memory { 1 } else { config.pool_size };

        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .min_connections(1)
            .test_before_acquire(true)
            .acquire_timeout(Duration::from_secs(config.timeout))
            .idle_timeout(Duration::from_secs(300))
            .connect_with(opt)
            .await
            .map_err(|e| LmsError::database_connection(format!("SQLite 连接失败: {e}")))?;

        Ok(SqlxSqliteConnector::from_sqlx_sqlite_pool(pool))
    }

    /// 通用连接（PostgreSQL、MySQL 等）
    async fn connect_generic(url: &str, config: &DatabaseConfig) -> Result<DatabaseConnection> {
        let mut opt = ConnectOptions::new(url);
        opt.max_connections(config.pool_size)
            .min_connections(1)
            .connect_timeout(Duration::from_secs(config.timeout))
            .acquire_timeout(Duration::from_secs(config.timeout))
            .idle_timeout(Duration::from_secs(600))
            .max_lifetime(Duration::from_secs(1800))
            .sqlx_logging(false)
            .sqlx_logging_level(tracing::log::LevelFilter::Debug);

        Database::connect(opt)
            .await
            .map_err(|e| LmsError::database_connection(format!("无法连接到数据库: {e}")))
    }

    /// 从 URL 推断数据库类型并规范化
    pub fn build_database_url(url: &str) -> Result<String> {
        if url.starts_with("sqlite:") {
            Ok(url.to_string())
        } else if url == ":memory:" {
            Ok("sqlite::memory:".to_string())
        } else if url.ends_with(".db") || url.ends_with(".sqlite") {
            Ok(format!("sqlite://{url}?mode=rwc"))
        } else if url.starts_with("postgres://")
            || url.starts_with("postgresql://")
            || url.starts_with("mysql://")
            || url.starts_with("mariadb://")
        {
            Ok(url.to_string())
        } else {
            Err(LmsError::database_config(format!(
                "无法从 URL 推断数据库类型: {url}. 支持: sqlite://, postgres://, mysql://, 或 .db/.sqlite 文件路径"
            )))
        }
    }
}

/// 事务客户端，提供与 [`LmsClient`] 相同的委托
pub struct LmsTransaction {
    conn: DatabaseTransaction,
}

impl LmsTransaction {
    model_delegates!(DatabaseTransaction);

    pub async fn commit(self) -> Result<()> {
        Ok(self.conn.commit().await?)
    }

    pub async fn rollback(self) -> Result<()> {
        Ok(self.conn.rollback().await?)
    }
}
