//! 档案仓储
//!
//! 读取 profiles 表，咨询引擎对档案只读

use async_trait::async_trait;
use sqlx::PgPool;

use super::traits::ProfileRepositoryTrait;
use crate::error::Result;
use crate::models::{ArtistContact, ArtistProfile, ClassType, RequesterProfile};

const ARTIST_COLUMNS: &str = r#"
    id, role, full_name, bio, avatar, location, categories, teaching_rate,
    teaches_online, teaches_offline, is_approved, is_active, phone, email
"#;

/// 档案仓储
pub struct ProfileRepository {
    pool: PgPool,
}

impl ProfileRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProfileRepositoryTrait for ProfileRepository {
    async fn list_candidate_pool(&self, class_type: ClassType) -> Result<Vec<ArtistProfile>> {
        let sql = format!(
            r#"
            SELECT {ARTIST_COLUMNS}
            FROM profiles
            WHERE role = 'artist'
              AND is_approved = TRUE
              AND is_active = TRUE
              AND teaching_rate IS NOT NULL
              AND CASE WHEN $1 = 'online' THEN teaches_online ELSE teaches_offline END
            "#
        );

        let artists = sqlx::query_as::<_, ArtistProfile>(&sql)
            .bind(class_type.as_str())
            .fetch_all(&self.pool)
            .await?;

        Ok(artists)
    }

    async fn get_artists_by_ids(&self, ids: &[String]) -> Result<Vec<ArtistProfile>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let sql = format!("SELECT {ARTIST_COLUMNS} FROM profiles WHERE id = ANY($1)");
        let artists = sqlx::query_as::<_, ArtistProfile>(&sql)
            .bind(ids)
            .fetch_all(&self.pool)
            .await?;

        Ok(artists)
    }

    async fn get_artist_contact(&self, artist_id: &str) -> Result<Option<ArtistContact>> {
        let contact = sqlx::query_as::<_, ArtistContact>(
            r#"
            SELECT id, full_name, phone, email
            FROM profiles
            WHERE id = $1
            "#,
        )
        .bind(artist_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(contact)
    }

    async fn get_requester(&self, user_id: &str) -> Result<Option<RequesterProfile>> {
        let requester = sqlx::query_as::<_, RequesterProfile>(
            r#"
            SELECT id, full_name, email, location
            FROM profiles
            WHERE id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(requester)
    }
}
