//! Read-only access to the member directory

use async_trait::async_trait;
use sqlx::{Pool, Postgres};

use crate::{error::AppResult, models::Member};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MemberDirectory: Send + Sync {
    async fn find_by_account(&self, account: i64) -> AppResult<Option<Member>>;
}

#[derive(Clone)]
pub struct MembersRepository {
    pool: Pool<Postgres>,
}

impl MembersRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MemberDirectory for MembersRepository {
    async fn find_by_account(&self, account: i64) -> AppResult<Option<Member>> {
        let member = sqlx::query_as::<_, Member>(
            "SELECT account, name FROM members WHERE account = $1",
        )
        .bind(account)
        .fetch_optional(&self.pool)
        .await?;
        Ok(member)
    }
}
