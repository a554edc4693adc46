//! 咨询仓储
//!
//! 限频写入与联系方式揭示都依赖数据库侧的原子操作：
//! - 写入：事务内按用户加 advisory 锁，统计窗口内咨询后插入，
//!   排他约束兜底（SQLSTATE 23P01）
//! - 揭示：单条条件 UPDATE，所有前置条件写在 WHERE 中

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use sqlx::PgPool;
use tracing::debug;
use uuid::Uuid;

use super::traits::EnquiryRepositoryTrait;
use crate::error::Result;
use crate::models::{CONTACT_REVEAL_QUOTA, Enquiry, EnquiryStatus, NewEnquiry};

/// 排他约束冲突
const EXCLUSION_VIOLATION: &str = "23P01";

const ENQUIRY_COLUMNS: &str = r#"
    id, user_id, user_name, user_email, art_type, skill_level, duration,
    budget_range, class_type, user_location, status, matched_artists,
    contacts_revealed, created_at, updated_at, expires_at
"#;

/// 咨询仓储
pub struct EnquiryRepository {
    pool: PgPool,
}

impl EnquiryRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EnquiryRepositoryTrait for EnquiryRepository {
    async fn insert_unless_recent(
        &self,
        enquiry: &NewEnquiry,
        window: Duration,
    ) -> Result<Option<Enquiry>> {
        let mut tx = self.pool.begin().await?;

        // 同一用户的并发提交在此串行化，锁随事务结束释放
        sqlx::query("SELECT pg_advisory_xact_lock(hashtextextended($1, 0))")
            .bind(&enquiry.user_id)
            .execute(&mut *tx)
            .await?;

        let recent: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*)
            FROM art_class_enquiries
            WHERE user_id = $1 AND created_at > $2
            "#,
        )
        .bind(&enquiry.user_id)
        .bind(enquiry.created_at - window)
        .fetch_one(&mut *tx)
        .await?;

        if recent > 0 {
            tx.rollback().await?;
            return Ok(None);
        }

        let sql = format!(
            r#"
            INSERT INTO art_class_enquiries (
                id, user_id, user_name, user_email, art_type, skill_level, duration,
                budget_range, class_type, user_location, status, matched_artists,
                contacts_revealed, created_at, updated_at, expires_at, rate_window_ends_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, '{{}}', $13, $13, $14, $15)
            RETURNING {ENQUIRY_COLUMNS}
            "#
        );

        let inserted = sqlx::query_as::<_, Enquiry>(&sql)
            .bind(enquiry.id)
            .bind(&enquiry.user_id)
            .bind(&enquiry.user_name)
            .bind(&enquiry.user_email)
            .bind(&enquiry.art_type)
            .bind(&enquiry.skill_level)
            .bind(&enquiry.duration)
            .bind(&enquiry.budget_range)
            .bind(enquiry.class_type)
            .bind(&enquiry.user_location)
            .bind(enquiry.status)
            .bind(&enquiry.matched_artists)
            .bind(enquiry.created_at)
            .bind(enquiry.expires_at)
            .bind(enquiry.created_at + window)
            .fetch_one(&mut *tx)
            .await;

        match inserted {
            Ok(row) => {
                tx.commit().await?;
                Ok(Some(row))
            }
            Err(sqlx::Error::Database(db_err))
                if db_err.code().as_deref() == Some(EXCLUSION_VIOLATION) =>
            {
                debug!(user_id = %enquiry.user_id, "限频排他约束冲突");
                Ok(None)
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn get_owned(&self, id: Uuid, user_id: &str) -> Result<Option<Enquiry>> {
        let sql = format!(
            "SELECT {ENQUIRY_COLUMNS} FROM art_class_enquiries WHERE id = $1 AND user_id = $2"
        );
        let enquiry = sqlx::query_as::<_, Enquiry>(&sql)
            .bind(id)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(enquiry)
    }

    async fn list_by_user(&self, user_id: &str) -> Result<Vec<Enquiry>> {
        let sql = format!(
            r#"
            SELECT {ENQUIRY_COLUMNS}
            FROM art_class_enquiries
            WHERE user_id = $1
            ORDER BY created_at DESC
            "#
        );
        let enquiries = sqlx::query_as::<_, Enquiry>(&sql)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(enquiries)
    }

    async fn mark_expired(&self, id: Uuid, now: DateTime<Utc>) -> Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE art_class_enquiries
            SET status = $2, updated_at = $3
            WHERE id = $1 AND status <> $2 AND expires_at < $3
            "#,
        )
        .bind(id)
        .bind(EnquiryStatus::Expired)
        .bind(now)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn append_revealed(
        &self,
        id: Uuid,
        user_id: &str,
        artist_id: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<Enquiry>> {
        let sql = format!(
            r#"
            UPDATE art_class_enquiries
            SET contacts_revealed = array_append(contacts_revealed, $3),
                updated_at = $4
            WHERE id = $1
              AND user_id = $2
              AND status <> $5
              AND expires_at >= $4
              AND cardinality(contacts_revealed) < $6
              AND $3 = ANY(matched_artists)
              AND NOT ($3 = ANY(contacts_revealed))
            RETURNING {ENQUIRY_COLUMNS}
            "#
        );

        let updated = sqlx::query_as::<_, Enquiry>(&sql)
            .bind(id)
            .bind(user_id)
            .bind(artist_id)
            .bind(now)
            .bind(EnquiryStatus::Expired)
            .bind(CONTACT_REVEAL_QUOTA as i32)
            .fetch_optional(&self.pool)
            .await?;

        Ok(updated)
    }
}
