//! Plain parameterized SQL behind small per-entity repositories. Invoked
//! only after the gate and validation have passed.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::{PgPool, Row};

use crate::database::manager::DatabaseError;

#[derive(Debug, Clone, Serialize)]
pub struct PromptRecord {
    pub key: String,
    pub value: String,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TeamRecord {
    pub id: i64,
    pub name: String,
    pub player_count: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct WaveRecord {
    pub id: i64,
    pub team_id: i64,
    pub name: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct PlayerRecord {
    pub chat_id: i64,
    pub language: Option<String>,
    pub is_authorized: bool,
    pub archetype: Option<String>,
}

pub struct PromptRepository;

impl PromptRepository {
    pub async fn get(pool: &PgPool, key: &str) -> Result<PromptRecord, DatabaseError> {
        let row = sqlx::query("SELECT key, value, updated_at FROM prompts WHERE key = $1")
            .bind(key)
            .fetch_optional(pool)
            .await?
            .ok_or_else(|| DatabaseError::NotFound(format!("prompt '{key}'")))?;

        Ok(PromptRecord {
            key: row.get("key"),
            value: row.get("value"),
            updated_at: row.get("updated_at"),
        })
    }

    pub async fn update(pool: &PgPool, key: &str, value: &str) -> Result<PromptRecord, DatabaseError> {
        let row = sqlx::query(
            r#"
            UPDATE prompts SET value = $2, updated_at = now()
            WHERE key = $1
            RETURNING key, value, updated_at
            "#,
        )
        .bind(key)
        .bind(value)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| DatabaseError::NotFound(format!("prompt '{key}'")))?;

        Ok(PromptRecord {
            key: row.get("key"),
            value: row.get("value"),
            updated_at: row.get("updated_at"),
        })
    }
}

pub struct TeamRepository;

impl TeamRepository {
    pub async fn get(pool: &PgPool, id: i64) -> Result<TeamRecord, DatabaseError> {
        let row = sqlx::query(
            r#"
            SELECT t.id, t.name, count(p.chat_id) AS player_count
            FROM teams t
            LEFT JOIN players p ON p.team_id = t.id
            WHERE t.id = $1
            GROUP BY t.id, t.name
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| DatabaseError::NotFound(format!("team {id}")))?;

        Ok(TeamRecord {
            id: row.get("id"),
            name: row.get("name"),
            player_count: row.get("player_count"),
        })
    }
}

pub struct WaveRepository;

impl WaveRepository {
    pub async fn get(pool: &PgPool, team_id: i64, wave_id: i64) -> Result<WaveRecord, DatabaseError> {
        let row = sqlx::query(
            "SELECT id, team_id, name, created_at FROM waves WHERE team_id = $1 AND id = $2",
        )
        .bind(team_id)
        .bind(wave_id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| DatabaseError::NotFound(format!("wave {wave_id} in team {team_id}")))?;

        Ok(WaveRecord {
            id: row.get("id"),
            team_id: row.get("team_id"),
            name: row.get("name"),
            created_at: row.get("created_at"),
        })
    }

    /// `name` is optional with no default; an unnamed wave is stored as NULL.
    pub async fn create(
        pool: &PgPool,
        team_id: i64,
        name: Option<&str>,
    ) -> Result<WaveRecord, DatabaseError> {
        let row = sqlx::query(
            r#"
            INSERT INTO waves (team_id, name)
            VALUES ($1, $2)
            RETURNING id, team_id, name, created_at
            "#,
        )
        .bind(team_id)
        .bind(name)
        .fetch_one(pool)
        .await?;

        Ok(WaveRecord {
            id: row.get("id"),
            team_id: row.get("team_id"),
            name: row.get("name"),
            created_at: row.get("created_at"),
        })
    }

    pub async fn record_submission(
        pool: &PgPool,
        wave_id: i64,
        chat_id: i64,
        answer: &str,
    ) -> Result<(), DatabaseError> {
        sqlx::query(
            r#"
            INSERT INTO wave_submissions (wave_id, chat_id, answer)
            VALUES ($1, $2, $3)
            ON CONFLICT (wave_id, chat_id) DO UPDATE SET answer = $3, submitted_at = now()
            "#,
        )
        .bind(wave_id)
        .bind(chat_id)
        .bind(answer)
        .execute(pool)
        .await?;
        Ok(())
    }
}

pub struct PlayerRepository;

impl PlayerRepository {
    pub async fn find_by_chat(pool: &PgPool, chat_id: i64) -> Result<Option<PlayerRecord>, DatabaseError> {
        let row = sqlx::query(
            "SELECT chat_id, language, is_authorized, archetype FROM players WHERE chat_id = $1",
        )
        .bind(chat_id)
        .fetch_optional(pool)
        .await?;

        Ok(row.map(|row| PlayerRecord {
            chat_id: row.get("chat_id"),
            language: row.get("language"),
            is_authorized: row.get("is_authorized"),
            archetype: row.get("archetype"),
        }))
    }
}
