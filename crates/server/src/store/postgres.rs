use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, postgres::PgPoolOptions};
use uuid::Uuid;

use super::{Store, StoreError, StoreResult};
use crate::models::{Action, Element, NewAction, NewElement, NewUser, User, Vote};
use crate::tally::VoteValue;

#[derive(sqlx::FromRow)]
struct ElementRow {
    id: Uuid,
    title: String,
    element_type: String,
    created_at: DateTime<Utc>,
}

#[derive(sqlx::FromRow)]
struct VoteRow {
    action_id: Uuid,
    user_id: Uuid,
    value: i16,
    cast_at: DateTime<Utc>,
}

impl TryFrom<VoteRow> for Vote {
    type Error = StoreError;

    fn try_from(row: VoteRow) -> Result<Self, Self::Error> {
        let value = VoteValue::try_from(i64::from(row.value))
            .map_err(|e| StoreError::Database(sqlx::Error::Decode(Box::new(e))))?;
        Ok(Vote {
            action_id: row.action_id,
            user_id: row.user_id,
            value,
            cast_at: row.cast_at,
        })
    }
}

pub struct PgStore {
    db: PgPool,
}

impl PgStore {
    /// Connects and brings the schema up to date.
    pub async fn connect(database_url: &str, max_connections: u32) -> StoreResult<Self> {
        let db = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await?;

        sqlx::migrate!("./migrations").run(&db).await?;
        tracing::info!("Database migrations applied");

        Ok(Self { db })
    }

    async fn exists(&self, sql: &str, id: Uuid) -> StoreResult<bool> {
        Ok(sqlx::query_scalar(sql).bind(id).fetch_one(&self.db).await?)
    }

    /// Attaches `related` ids to each row with a single extra query.
    async fn with_links(&self, rows: Vec<ElementRow>) -> StoreResult<Vec<Element>> {
        let ids: Vec<Uuid> = rows.iter().map(|r| r.id).collect();
        let links: Vec<(Uuid, Uuid)> = sqlx::query_as(
            "SELECT element_id, related_id FROM element_links
             WHERE element_id = ANY($1)
             ORDER BY created_at",
        )
        .bind(&ids)
        .fetch_all(&self.db)
        .await?;

        let mut related: HashMap<Uuid, Vec<Uuid>> = HashMap::new();
        for (element_id, related_id) in links {
            related.entry(element_id).or_default().push(related_id);
        }

        Ok(rows
            .into_iter()
            .map(|row| Element {
                related: related.remove(&row.id).unwrap_or_default(),
                id: row.id,
                title: row.title,
                element_type: row.element_type,
                created_at: row.created_at,
            })
            .collect())
    }
}

#[async_trait]
impl Store for PgStore {
    fn backend(&self) -> &'static str {
        "postgres"
    }

    async fn ping(&self) -> StoreResult<()> {
        sqlx::query("SELECT 1").execute(&self.db).await?;
        Ok(())
    }

    async fn create_user(&self, new: NewUser) -> StoreResult<User> {
        let user = sqlx::query_as(
            "INSERT INTO users (id, username, guiding_values)
             VALUES ($1, $2, $3)
             RETURNING id, username, guiding_values, created_at",
        )
        .bind(Uuid::new_v4())
        .bind(&new.username)
        .bind(&new.guiding_values)
        .fetch_one(&self.db)
        .await?;
        Ok(user)
    }

    async fn list_users(&self) -> StoreResult<Vec<User>> {
        let users = sqlx::query_as(
            "SELECT id, username, guiding_values, created_at FROM users ORDER BY created_at",
        )
        .fetch_all(&self.db)
        .await?;
        Ok(users)
    }

    async fn get_user(&self, id: Uuid) -> StoreResult<Option<User>> {
        let user = sqlx::query_as(
            "SELECT id, username, guiding_values, created_at FROM users WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await?;
        Ok(user)
    }

    async fn create_element(&self, new: NewElement) -> StoreResult<Element> {
        let row: ElementRow = sqlx::query_as(
            "INSERT INTO elements (id, title, element_type)
             VALUES ($1, $2, $3)
             RETURNING id, title, element_type, created_at",
        )
        .bind(Uuid::new_v4())
        .bind(&new.title)
        .bind(&new.element_type)
        .fetch_one(&self.db)
        .await?;

        Ok(Element {
            id: row.id,
            title: row.title,
            element_type: row.element_type,
            related: Vec::new(),
            created_at: row.created_at,
        })
    }

    async fn list_elements(&self) -> StoreResult<Vec<Element>> {
        let rows = sqlx::query_as(
            "SELECT id, title, element_type, created_at FROM elements ORDER BY created_at",
        )
        .fetch_all(&self.db)
        .await?;
        self.with_links(rows).await
    }

    async fn get_element(&self, id: Uuid) -> StoreResult<Option<Element>> {
        let row: Option<ElementRow> = sqlx::query_as(
            "SELECT id, title, element_type, created_at FROM elements WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await?;

        match row {
            Some(row) => Ok(self.with_links(vec![row]).await?.pop()),
            None => Ok(None),
        }
    }

    async fn search_elements(&self, query: &str) -> StoreResult<Vec<Element>> {
        // strpos keeps `%` and `_` in the query literal, unlike ILIKE.
        let rows = sqlx::query_as(
            "SELECT id, title, element_type, created_at FROM elements
             WHERE strpos(lower(title), lower($1)) > 0
             ORDER BY created_at",
        )
        .bind(query)
        .fetch_all(&self.db)
        .await?;
        self.with_links(rows).await
    }

    async fn element_title_exists(&self, title: &str) -> StoreResult<bool> {
        let exists = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM elements WHERE lower(title) = lower($1))",
        )
        .bind(title)
        .fetch_one(&self.db)
        .await?;
        Ok(exists)
    }

    async fn link_elements(&self, a: Uuid, b: Uuid) -> StoreResult<()> {
        let found: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM elements WHERE id = ANY($1)")
            .bind(vec![a, b])
            .fetch_one(&self.db)
            .await?;
        let expected = if a == b { 1 } else { 2 };
        if found != expected {
            return Err(StoreError::NotFound("element"));
        }

        let mut tx = self.db.begin().await?;
        for (from, to) in [(a, b), (b, a)] {
            sqlx::query(
                "INSERT INTO element_links (element_id, related_id)
                 VALUES ($1, $2)
                 ON CONFLICT DO NOTHING",
            )
            .bind(from)
            .bind(to)
            .execute(&mut *tx)
            .await?;
        }
        tx.commit().await?;
        Ok(())
    }

    async fn create_action(&self, new: NewAction) -> StoreResult<Action> {
        if !self
            .exists("SELECT EXISTS(SELECT 1 FROM users WHERE id = $1)", new.user_id)
            .await?
        {
            return Err(StoreError::NotFound("user"));
        }
        if let Some(element_id) = new.element_id {
            if !self
                .exists("SELECT EXISTS(SELECT 1 FROM elements WHERE id = $1)", element_id)
                .await?
            {
                return Err(StoreError::NotFound("element"));
            }
        }

        let action = sqlx::query_as(
            "INSERT INTO actions (id, user_id, element_id, action_type, content, linked_elements)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING id, user_id, element_id, action_type, content, linked_elements, created_at",
        )
        .bind(Uuid::new_v4())
        .bind(new.user_id)
        .bind(new.element_id)
        .bind(&new.action_type)
        .bind(&new.content)
        .bind(&new.linked_elements)
        .fetch_one(&self.db)
        .await?;
        Ok(action)
    }

    async fn list_actions(&self) -> StoreResult<Vec<Action>> {
        let actions = sqlx::query_as(
            "SELECT id, user_id, element_id, action_type, content, linked_elements, created_at
             FROM actions ORDER BY created_at",
        )
        .fetch_all(&self.db)
        .await?;
        Ok(actions)
    }

    async fn get_action(&self, id: Uuid) -> StoreResult<Option<Action>> {
        let action = sqlx::query_as(
            "SELECT id, user_id, element_id, action_type, content, linked_elements, created_at
             FROM actions WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await?;
        Ok(action)
    }

    async fn cast_vote(
        &self,
        action_id: Uuid,
        user_id: Uuid,
        value: VoteValue,
    ) -> StoreResult<Vote> {
        if !self
            .exists("SELECT EXISTS(SELECT 1 FROM actions WHERE id = $1)", action_id)
            .await?
        {
            return Err(StoreError::NotFound("action"));
        }
        if !self
            .exists("SELECT EXISTS(SELECT 1 FROM users WHERE id = $1)", user_id)
            .await?
        {
            return Err(StoreError::NotFound("user"));
        }

        // Insert or overwrite the user's ballot
        let row: VoteRow = sqlx::query_as(
            "INSERT INTO votes (action_id, user_id, value)
             VALUES ($1, $2, $3)
             ON CONFLICT (action_id, user_id)
             DO UPDATE SET value = $3, cast_at = NOW()
             RETURNING action_id, user_id, value, cast_at",
        )
        .bind(action_id)
        .bind(user_id)
        .bind(value.as_i64() as i16)
        .fetch_one(&self.db)
        .await?;

        row.try_into()
    }

    async fn votes_for(&self, action_id: Uuid) -> StoreResult<Vec<Vote>> {
        let rows: Vec<VoteRow> = sqlx::query_as(
            "SELECT action_id, user_id, value, cast_at FROM votes
             WHERE action_id = $1
             ORDER BY first_cast_at",
        )
        .bind(action_id)
        .fetch_all(&self.db)
        .await?;

        rows.into_iter().map(Vote::try_from).collect()
    }
}
