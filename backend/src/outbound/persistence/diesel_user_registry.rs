//! PostgreSQL-backed `UserRegistry` and `ProgressLedger`.
//!
//! Both ports read the `users` table. The progress ledger is the
//! `in_progress` array column, appended to only when the id is absent.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel::sql_types::{Bool, Int4, Text};
use diesel_async::RunQueryDsl;
use tracing::debug;

use crate::domain::ports::{
    ProgressLedger, ProgressLedgerError, UserRegistry, UserRegistryError,
};
use crate::domain::{Principal, Username};

use super::diesel_error_mapping::{map_diesel_error, map_pool_error};
use super::pool::DbPool;
use super::schema::users;

const CONTAINS_SQL: &str = "SELECT COALESCE($2 = ANY(in_progress), FALSE) AS present \
     FROM users WHERE username = $1";

const APPEND_SQL: &str = "UPDATE users \
     SET in_progress = array_append(COALESCE(in_progress, '{}'::int4[]), $2) \
     WHERE username = $1 AND NOT (COALESCE(in_progress, '{}'::int4[]) @> ARRAY[$2])";

#[derive(QueryableByName)]
struct Membership {
    #[diesel(sql_type = Bool)]
    present: bool,
}

/// Diesel adapter over the `users` table.
#[derive(Clone)]
pub struct DieselUserRegistry {
    pool: DbPool,
}

impl DieselUserRegistry {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn registry_error(error: diesel::result::Error) -> UserRegistryError {
    map_diesel_error(error, UserRegistryError::query, UserRegistryError::connection)
}

fn ledger_error(error: diesel::result::Error) -> ProgressLedgerError {
    map_diesel_error(error, ProgressLedgerError::query, ProgressLedgerError::connection)
}

/// Task ids are stored as `int4`.
fn stored_task_id(task_id: i64) -> Option<i32> {
    i32::try_from(task_id).ok()
}

#[async_trait]
impl UserRegistry for DieselUserRegistry {
    async fn find_by_username(
        &self,
        username: &Username,
    ) -> Result<Option<Principal>, UserRegistryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, UserRegistryError::connection))?;

        let row: Option<(i32, String)> = users::table
            .filter(users::username.eq(username.as_str()))
            .select((users::id, users::username))
            .first(&mut conn)
            .await
            .optional()
            .map_err(registry_error)?;

        row.map(|(id, stored)| {
            Username::new(stored)
                .map(|name| Principal::new(id, name))
                .map_err(|err| UserRegistryError::query(format!("stored username invalid: {err}")))
        })
        .transpose()
    }
}

#[async_trait]
impl ProgressLedger for DieselUserRegistry {
    async fn contains(
        &self,
        username: &Username,
        task_id: i64,
    ) -> Result<bool, ProgressLedgerError> {
        let Some(task_id) = stored_task_id(task_id) else {
            return Ok(false);
        };
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, ProgressLedgerError::connection))?;

        let row: Option<Membership> = diesel::sql_query(CONTAINS_SQL)
            .bind::<Text, _>(username.as_str())
            .bind::<Int4, _>(task_id)
            .get_result(&mut conn)
            .await
            .optional()
            .map_err(ledger_error)?;
        Ok(row.is_some_and(|membership| membership.present))
    }

    async fn append(&self, username: &Username, task_id: i64) -> Result<(), ProgressLedgerError> {
        let stored = stored_task_id(task_id).ok_or_else(|| {
            ProgressLedgerError::query(format!("task id {task_id} does not fit the ledger"))
        })?;
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, ProgressLedgerError::connection))?;

        let updated = diesel::sql_query(APPEND_SQL)
            .bind::<Text, _>(username.as_str())
            .bind::<Int4, _>(stored)
            .execute(&mut conn)
            .await
            .map_err(ledger_error)?;
        debug!(%username, task_id, updated, "progress ledger append");
        Ok(())
    }
}
