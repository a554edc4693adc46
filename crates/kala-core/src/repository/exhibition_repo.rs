//! 展览仓储

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::traits::ExhibitionRepositoryTrait;
use crate::error::Result;
use crate::models::{Exhibition, ExhibitionStatus, NewExhibition};

const EXHIBITION_COLUMNS: &str = r#"
    id, artist_id, name, description, start_date, end_date, exhibition_type,
    artwork_ids, total_fee, additional_artworks, additional_artwork_fee,
    days_entitled, max_base_artworks, status, is_approved,
    voluntary_platform_fee, created_at
"#;

/// 展览仓储
pub struct ExhibitionRepository {
    pool: PgPool,
}

impl ExhibitionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ExhibitionRepositoryTrait for ExhibitionRepository {
    async fn create(&self, exhibition: &NewExhibition) -> Result<Exhibition> {
        let sql = format!(
            r#"
            INSERT INTO exhibitions (
                id, artist_id, name, description, start_date, end_date, exhibition_type,
                artwork_ids, total_fee, additional_artworks, additional_artwork_fee,
                days_entitled, max_base_artworks, status, is_approved,
                voluntary_platform_fee, created_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, FALSE, $15, $16)
            RETURNING {EXHIBITION_COLUMNS}
            "#
        );

        let created = sqlx::query_as::<_, Exhibition>(&sql)
            .bind(exhibition.id)
            .bind(&exhibition.artist_id)
            .bind(&exhibition.name)
            .bind(&exhibition.description)
            .bind(exhibition.start_date)
            .bind(exhibition.end_date)
            .bind(exhibition.exhibition_type)
            .bind(&exhibition.artwork_ids)
            .bind(exhibition.total_fee)
            .bind(exhibition.additional_artworks)
            .bind(exhibition.additional_artwork_fee)
            .bind(exhibition.days_entitled)
            .bind(exhibition.max_base_artworks)
            .bind(ExhibitionStatus::Upcoming)
            .bind(exhibition.voluntary_platform_fee)
            .bind(exhibition.created_at)
            .fetch_one(&self.pool)
            .await?;

        Ok(created)
    }

    async fn list_by_artist(&self, artist_id: &str) -> Result<Vec<Exhibition>> {
        let sql = format!(
            "SELECT {EXHIBITION_COLUMNS} FROM exhibitions WHERE artist_id = $1 ORDER BY created_at DESC"
        );
        let exhibitions = sqlx::query_as::<_, Exhibition>(&sql)
            .bind(artist_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(exhibitions)
    }

    async fn list_public(&self, status: Option<ExhibitionStatus>) -> Result<Vec<Exhibition>> {
        let sql = format!(
            r#"
            SELECT {EXHIBITION_COLUMNS}
            FROM exhibitions
            WHERE is_approved = TRUE AND ($1::varchar IS NULL OR status = $1)
            ORDER BY created_at DESC
            "#
        );
        let exhibitions = sqlx::query_as::<_, Exhibition>(&sql)
            .bind(status)
            .fetch_all(&self.pool)
            .await?;

        Ok(exhibitions)
    }

    async fn list_pending(&self) -> Result<Vec<Exhibition>> {
        let sql = format!(
            "SELECT {EXHIBITION_COLUMNS} FROM exhibitions WHERE is_approved = FALSE ORDER BY created_at ASC"
        );
        let exhibitions = sqlx::query_as::<_, Exhibition>(&sql)
            .fetch_all(&self.pool)
            .await?;

        Ok(exhibitions)
    }

    async fn approve(&self, id: Uuid) -> Result<Option<Exhibition>> {
        let sql = format!(
            r#"
            UPDATE exhibitions
            SET is_approved = TRUE, status = $2
            WHERE id = $1
            RETURNING {EXHIBITION_COLUMNS}
            "#
        );
        let approved = sqlx::query_as::<_, Exhibition>(&sql)
            .bind(id)
            .bind(ExhibitionStatus::Active)
            .fetch_optional(&self.pool)
            .await?;

        Ok(approved)
    }

    async fn delete(&self, id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM exhibitions WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
