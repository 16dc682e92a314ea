use crate::error::{Error, Result};
use crate::models::test::Test;
use crate::models::test_list::TestList;
use sqlx::PgPool;
use uuid::Uuid;

#[derive(Debug, serde::Serialize)]
pub struct ListWithTests {
    #[serde(flatten)]
    pub list: TestList,
    pub tests: Vec<Test>,
}

#[derive(Clone)]
pub struct ListService {
    pool: PgPool,
}

impl ListService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create_list(&self, user_id: Uuid, name: &str) -> Result<TestList> {
        let list = sqlx::query_as::<_, TestList>(
            r#"INSERT INTO test_lists (user_id, name) VALUES ($1, $2) RETURNING *"#,
        )
        .bind(user_id)
        .bind(name)
        .fetch_one(&self.pool)
        .await?;
        Ok(list)
    }

    pub async fn list_lists(&self, user_id: Uuid) -> Result<Vec<ListWithTests>> {
        let lists = sqlx::query_as::<_, TestList>(
            r#"SELECT * FROM test_lists WHERE user_id = $1 ORDER BY created_at ASC"#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        let mut out = Vec::with_capacity(lists.len());
        for list in lists {
            let tests = sqlx::query_as::<_, Test>(
                r#"
                SELECT t.* FROM tests t
                JOIN test_list_items i ON i.test_id = t.id
                WHERE i.list_id = $1
                ORDER BY i.added_at ASC
                "#,
            )
            .bind(list.id)
            .fetch_all(&self.pool)
            .await?;
            out.push(ListWithTests { list, tests });
        }
        Ok(out)
    }

    pub async fn rename_list(&self, user_id: Uuid, list_id: Uuid, name: &str) -> Result<TestList> {
        let list = sqlx::query_as::<_, TestList>(
            r#"
            UPDATE test_lists SET name = $1, updated_at = NOW()
            WHERE id = $2 AND user_id = $3
            RETURNING *
            "#,
        )
        .bind(name)
        .bind(list_id)
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(list)
    }

    pub async fn delete_list(&self, user_id: Uuid, list_id: Uuid) -> Result<bool> {
        let result = sqlx::query(r#"DELETE FROM test_lists WHERE id = $1 AND user_id = $2"#)
            .bind(list_id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn add_test(&self, user_id: Uuid, list_id: Uuid, test_id: Uuid) -> Result<()> {
        self.assert_owned(user_id, list_id).await?;

        // Re-adding an already listed test is a no-op.
        sqlx::query(
            r#"
            INSERT INTO test_list_items (list_id, test_id)
            VALUES ($1, $2)
            ON CONFLICT (list_id, test_id) DO NOTHING
            "#,
        )
        .bind(list_id)
        .bind(test_id)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    pub async fn remove_test(&self, user_id: Uuid, list_id: Uuid, test_id: Uuid) -> Result<bool> {
        self.assert_owned(user_id, list_id).await?;

        let result =
            sqlx::query(r#"DELETE FROM test_list_items WHERE list_id = $1 AND test_id = $2"#)
                .bind(list_id)
                .bind(test_id)
                .execute(&self.pool)
                .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn assert_owned(&self, user_id: Uuid, list_id: Uuid) -> Result<()> {
        let owned: Option<Uuid> =
            sqlx::query_scalar(r#"SELECT id FROM test_lists WHERE id = $1 AND user_id = $2"#)
                .bind(list_id)
                .bind(user_id)
                .fetch_optional(&self.pool)
                .await?;
        if owned.is_none() {
            return Err(Error::NotFound("List not found".to_string()));
        }
        Ok(())
    }
}
