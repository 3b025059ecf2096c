/**
 * Membership Oracle
 *
 * Room authorization for `group:` rooms is a relational membership lookup.
 * The broker consumes it through a trait so tests can substitute an
 * in-memory oracle and the broker never needs a live database.
 *
 * Authorization is re-checked on every subscribe rather than cached: group
 * membership changes between subscribes, and a removed member must lose room
 * access at their next subscribe attempt at the latest.
 */

use async_trait::async_trait;
use sqlx::PgPool;

/// Predicate answering group-membership questions
///
/// Absence of the group and absence of membership are indistinguishable;
/// both answer `false`.
#[async_trait]
pub trait MembershipOracle: Send + Sync {
    /// Is `user_id` currently a member of `group_id`?
    async fn is_group_member(&self, user_id: i64, group_id: i64) -> Result<bool, sqlx::Error>;
}

/// Membership oracle backed by the `group_members` table
pub struct PgMembershipOracle {
    pool: PgPool,
}

impl PgMembershipOracle {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MembershipOracle for PgMembershipOracle {
    async fn is_group_member(&self, user_id: i64, group_id: i64) -> Result<bool, sqlx::Error> {
        let row = sqlx::query("SELECT 1 FROM group_members WHERE group_id = $1 AND user_id = $2")
            .bind(group_id)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.is_some())
    }
}
