//! Repository for the `users` table.

use galaxy_core::types::DbId;
use sqlx::{Connection, PgConnection};

use crate::models::user::User;

/// Column list for `users` queries.
const COLUMNS: &str = "id, username, points, research_in_progress, created_at, updated_at";

/// Provides CRUD operations for users.
pub struct UserRepo;

impl UserRepo {
    /// Insert a user together with its zeroed `user_research` row.
    pub async fn create(conn: &mut PgConnection, username: &str) -> Result<User, sqlx::Error> {
        let mut tx = conn.begin().await?;

        let query = format!("INSERT INTO users (username) VALUES ($1) RETURNING {COLUMNS}");
        let user = sqlx::query_as::<_, User>(&query)
            .bind(username)
            .fetch_one(&mut *tx)
            .await?;

        sqlx::query("INSERT INTO user_research (user_id) VALUES ($1)")
            .bind(user.id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(user)
    }

    pub async fn find_by_id(conn: &mut PgConnection, id: DbId) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE id = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(&mut *conn)
            .await
    }

    /// Overwrite the derived score. Returns `false` if the user is gone.
    pub async fn set_points(
        conn: &mut PgConnection,
        id: DbId,
        points: i64,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("UPDATE users SET points = $2 WHERE id = $1")
            .bind(id)
            .bind(points)
            .execute(&mut *conn)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn set_research_in_progress(
        conn: &mut PgConnection,
        id: DbId,
        in_progress: bool,
    ) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE users SET research_in_progress = $2 WHERE id = $1")
            .bind(id)
            .bind(in_progress)
            .execute(&mut *conn)
            .await?;
        Ok(())
    }
}
