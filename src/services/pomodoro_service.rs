use crate::error::{Error, Result};
use crate::models::pomodoro::PomodoroSession;
use chrono::{Duration, Utc};
use sqlx::{PgPool, Row};
use uuid::Uuid;

#[derive(Debug, serde::Serialize)]
pub struct PomodoroStats {
    pub days: i64,
    pub completed_sessions: i64,
    pub completed_work_sessions: i64,
    pub focus_seconds: i64,
}

const SESSION_KINDS: [&str; 3] = ["work", "short_break", "long_break"];

#[derive(Clone)]
pub struct PomodoroService {
    pool: PgPool,
}

impl PomodoroService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn start_session(
        &self,
        user_id: Uuid,
        kind: &str,
        duration_seconds: i32,
    ) -> Result<PomodoroSession> {
        if !SESSION_KINDS.contains(&kind) {
            return Err(Error::BadRequest(format!(
                "Unknown session kind: {}",
                kind
            )));
        }

        let session = sqlx::query_as::<_, PomodoroSession>(
            r#"
            INSERT INTO pomodoro_sessions (user_id, kind, duration_seconds)
            VALUES ($1, $2, $3)
            RETURNING *
            "#,
        )
        .bind(user_id)
        .bind(kind)
        .bind(duration_seconds)
        .fetch_one(&self.pool)
        .await?;
        Ok(session)
    }

    pub async fn complete_session(
        &self,
        user_id: Uuid,
        session_id: Uuid,
    ) -> Result<PomodoroSession> {
        let session = sqlx::query_as::<_, PomodoroSession>(
            r#"
            UPDATE pomodoro_sessions
            SET completed_at = COALESCE(completed_at, $1)
            WHERE id = $2 AND user_id = $3
            RETURNING *
            "#,
        )
        .bind(Utc::now())
        .bind(session_id)
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(session)
    }

    pub async fn stats(&self, user_id: Uuid, days: i64) -> Result<PomodoroStats> {
        let since = Utc::now() - Duration::days(days.max(1));

        let row = sqlx::query(
            r#"
            SELECT
                COUNT(*) FILTER (WHERE completed_at IS NOT NULL) AS completed_sessions,
                COUNT(*) FILTER (WHERE completed_at IS NOT NULL AND kind = 'work') AS completed_work_sessions,
                COALESCE(SUM(duration_seconds) FILTER (WHERE completed_at IS NOT NULL AND kind = 'work'), 0) AS focus_seconds
            FROM pomodoro_sessions
            WHERE user_id = $1 AND started_at >= $2
            "#,
        )
        .bind(user_id)
        .bind(since)
        .fetch_one(&self.pool)
        .await?;

        Ok(PomodoroStats {
            days: days.max(1),
            completed_sessions: row.try_get("completed_sessions")?,
            completed_work_sessions: row.try_get("completed_work_sessions")?,
            focus_seconds: row.try_get("focus_seconds")?,
        })
    }
}
