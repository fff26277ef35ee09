//! Database execution engine.
//!
//! Executes compiled queries against PostgreSQL using sqlx. The compiler
//! never touches the database; this module only substitutes its SQL text
//! and binds its parameters in placeholder order.

use chrono::{DateTime, Utc};
use sqlx::postgres::{PgArguments, PgPoolOptions, PgRow};
use sqlx::query::QueryAs;
use sqlx::{Encode, FromRow, PgPool, Postgres, Type};
use tracing::{debug, info};

use crate::column::ColumnType;

use crate::config::Config;
use crate::error::{BoilingError, BoilingResult};
use crate::query::Query;
use crate::schema::{search_release_groups_sql, ReleaseGroup};
use crate::value::Value;

/// A database connection pool.
#[derive(Clone)]
pub struct Database {
    pool: PgPool,
}

impl Database {
    /// Connect using the URL and pool size from `config`.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// let config = Config::load(None)?.with_database_url(Some(url));
    /// let db = Database::connect(&config).await?;
    /// ```
    pub async fn connect(config: &Config) -> BoilingResult<Self> {
        let url = config.require_database_url()?;
        debug!(max_connections = config.max_connections, "connecting to database");

        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .connect(url)
            .await
            .map_err(|e| BoilingError::Connection(e.to_string()))?;

        Ok(Self { pool })
    }

    /// Wrap an existing pool.
    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Get a reference to the underlying connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Search `release_groups` with a compiled filter.
    pub async fn search_release_groups(
        &self,
        query: &Query,
        offset: i64,
        limit: i64,
    ) -> BoilingResult<Vec<ReleaseGroup>> {
        let (sql, params) = search_release_groups_sql(query, offset, limit)?;
        let groups: Vec<ReleaseGroup> = self.fetch_all(&sql, &params).await?;
        info!(rows = groups.len(), offset, limit, "release group search");
        Ok(groups)
    }

    /// Run parameterized SQL and map every row to `T`.
    pub async fn fetch_all<T>(&self, sql: &str, params: &[Value]) -> BoilingResult<Vec<T>>
    where
        T: for<'r> FromRow<'r, PgRow> + Send + Unpin,
    {
        debug!(sql, params = params.len(), "executing query");
        bind_all(sqlx::query_as::<_, T>(sql), params)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| BoilingError::Execution(e.to_string()))
    }
}

/// Something positional parameters can be bound to, in order.
trait Bind<'q>: Sized {
    fn bind_param<T>(self, value: T) -> Self
    where
        T: 'q + Send + Encode<'q, Postgres> + Type<Postgres> + std::fmt::Debug;
}

impl<'q, O> Bind<'q> for QueryAs<'q, Postgres, O, PgArguments> {
    fn bind_param<T>(self, value: T) -> Self
    where
        T: 'q + Send + Encode<'q, Postgres> + Type<Postgres> + std::fmt::Debug,
    {
        self.bind(value)
    }
}

/// Bind every parameter, `$1` first.
fn bind_all<'q, B: Bind<'q>>(query: B, params: &[Value]) -> B {
    params.iter().fold(query, |query, param| bind_value(query, param))
}

/// Bind a Value to a typed SQLx query.
///
/// A typed NULL binds as `NULL` of its column's SQL type, so `"id" = $1`
/// stays an integer comparison. An untyped NULL binds as text.
fn bind_value<'q, B: Bind<'q>>(query: B, value: &Value) -> B {
    match value {
        Value::Null => query.bind_param(None::<String>),
        Value::TypedNull(column_type) => match column_type {
            ColumnType::Integer => query.bind_param(None::<i64>),
            ColumnType::Float => query.bind_param(None::<f64>),
            ColumnType::Bool => query.bind_param(None::<bool>),
            ColumnType::Text => query.bind_param(None::<String>),
            ColumnType::Timestamp => query.bind_param(None::<DateTime<Utc>>),
        },
        Value::Bool(b) => query.bind_param(*b),
        Value::Int(i) => query.bind_param(*i),
        Value::Float(f) => query.bind_param(*f),
        Value::Text(s) => query.bind_param(s.clone()),
        Value::Timestamp(t) => query.bind_param(*t),
    }
}
