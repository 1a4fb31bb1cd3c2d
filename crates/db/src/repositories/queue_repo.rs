//! Repository for the three construction queue tables.
//!
//! Every method takes a [`QueueKind`] selecting the table; the
//! kind-specific columns are aliased to `target` and `quantity`.

use galaxy_core::types::{DbId, Timestamp};
use sqlx::PgConnection;

use crate::models::queue::{CreateQueueItem, QueueItem, QueueKind};

fn columns(kind: QueueKind) -> String {
    format!(
        "id, planet_id, user_id, {} AS target, {} AS quantity, \
         started_at, completes_at, cost_metal, cost_crystal, cost_gas, created_at",
        kind.target_column(),
        kind.quantity_column()
    )
}

/// Provides enqueue, sweep and cancel operations for queue items.
pub struct QueueRepo;

impl QueueRepo {
    /// Insert an already validated and paid order.
    pub async fn enqueue(
        conn: &mut PgConnection,
        kind: QueueKind,
        input: &CreateQueueItem,
    ) -> Result<QueueItem, sqlx::Error> {
        let query = format!(
            "INSERT INTO {table} \
                (planet_id, user_id, {target}, {quantity}, started_at, completes_at, \
                 cost_metal, cost_crystal, cost_gas) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) \
             RETURNING {columns}",
            table = kind.table(),
            target = kind.target_column(),
            quantity = kind.quantity_column(),
            columns = columns(kind),
        );
        sqlx::query_as::<_, QueueItem>(&query)
            .bind(input.planet_id)
            .bind(input.user_id)
            .bind(&input.target)
            .bind(input.quantity)
            .bind(input.started_at)
            .bind(input.completes_at)
            .bind(input.cost.metal)
            .bind(input.cost.crystal)
            .bind(input.cost.gas)
            .fetch_one(&mut *conn)
            .await
    }

    pub async fn find_by_id(
        conn: &mut PgConnection,
        kind: QueueKind,
        id: DbId,
    ) -> Result<Option<QueueItem>, sqlx::Error> {
        let query = format!(
            "SELECT {} FROM {} WHERE id = $1",
            columns(kind),
            kind.table()
        );
        sqlx::query_as::<_, QueueItem>(&query)
            .bind(id)
            .fetch_optional(&mut *conn)
            .await
    }

    /// Items whose completion time has passed, locked for this sweep.
    pub async fn list_due(
        conn: &mut PgConnection,
        kind: QueueKind,
        now: Timestamp,
    ) -> Result<Vec<QueueItem>, sqlx::Error> {
        let query = format!(
            "SELECT {} FROM {} WHERE completes_at <= $1 \
             ORDER BY completes_at, id \
             FOR UPDATE SKIP LOCKED",
            columns(kind),
            kind.table()
        );
        sqlx::query_as::<_, QueueItem>(&query)
            .bind(now)
            .fetch_all(&mut *conn)
            .await
    }

    pub async fn list_for_planet(
        conn: &mut PgConnection,
        kind: QueueKind,
        planet_id: DbId,
    ) -> Result<Vec<QueueItem>, sqlx::Error> {
        let query = format!(
            "SELECT {} FROM {} WHERE planet_id = $1 ORDER BY completes_at, id",
            columns(kind),
            kind.table()
        );
        sqlx::query_as::<_, QueueItem>(&query)
            .bind(planet_id)
            .fetch_all(&mut *conn)
            .await
    }

    /// Delete an item. Returns `false` if it was already gone.
    pub async fn delete(
        conn: &mut PgConnection,
        kind: QueueKind,
        id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let query = format!("DELETE FROM {} WHERE id = $1", kind.table());
        let result = sqlx::query(&query).bind(id).execute(&mut *conn).await?;
        Ok(result.rows_affected() == 1)
    }

    /// Delete a not-yet-due item and return it, so its reserved cost can be
    /// refunded. `None` if the item is missing or already due.
    pub async fn take_pending(
        conn: &mut PgConnection,
        kind: QueueKind,
        id: DbId,
        now: Timestamp,
    ) -> Result<Option<QueueItem>, sqlx::Error> {
        let query = format!(
            "DELETE FROM {} WHERE id = $1 AND completes_at > $2 RETURNING {}",
            kind.table(),
            columns(kind)
        );
        sqlx::query_as::<_, QueueItem>(&query)
            .bind(id)
            .bind(now)
            .fetch_optional(&mut *conn)
            .await
    }
}
