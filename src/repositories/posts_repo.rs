use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tracing::instrument;

use crate::{errors::StoreAccessError, models::posts::Post, Result};

use super::{PostStore, PostgresRepo};

#[derive(Debug, sqlx::FromRow)]
struct PostRow {
    id: i64,
    title: String,
    body: String,
    author: String,
    created_at: DateTime<Utc>,
}

impl TryFrom<PostRow> for Post {
    type Error = StoreAccessError;

    fn try_from(row: PostRow) -> core::result::Result<Self, Self::Error> {
        let id = u128::try_from(row.id)
            .map_err(|_| StoreAccessError::Decode(format!("negative post id {}", row.id)))?;
        let timestamp = row.created_at.timestamp_nanos_opt().ok_or_else(|| {
            StoreAccessError::Decode(format!("timestamp of post {id} is out of range"))
        })?;

        Ok(Post {
            id,
            title: row.title,
            body: row.body,
            author: row.author,
            timestamp: i128::from(timestamp),
        })
    }
}

impl PostgresRepo {
    pub async fn migrate(&self) -> Result<()> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }
}

#[async_trait]
impl PostStore for PostgresRepo {
    #[instrument(skip(self))]
    async fn fetch_all_posts(&self) -> core::result::Result<Vec<Post>, StoreAccessError> {
        let rows = sqlx::query_as::<_, PostRow>(
            r#"
            SELECT id, title, body, author, created_at FROM posts ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Post::try_from).collect()
    }

    #[instrument(skip(self, body))]
    async fn create_post(
        &self,
        title: &str,
        body: &str,
        author: &str,
    ) -> core::result::Result<(), StoreAccessError> {
        sqlx::query(
            r#"
            INSERT INTO posts (title, body, author)
            VALUES ($1, $2, $3)
            "#,
        )
        .bind(title)
        .bind(body)
        .bind(author)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
