use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{Store, StoreError, StoreResult};
use crate::models::{Action, Element, NewAction, NewElement, NewUser, User, Vote};
use crate::tally::VoteValue;

#[derive(Default)]
struct Tables {
    users: Vec<User>,
    elements: Vec<Element>,
    actions: Vec<Action>,
    votes: Vec<Vote>,
}

/// Process-local store. Nothing survives a restart.
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Store for MemoryStore {
    fn backend(&self) -> &'static str {
        "memory"
    }

    async fn ping(&self) -> StoreResult<()> {
        Ok(())
    }

    async fn create_user(&self, new: NewUser) -> StoreResult<User> {
        let user = User {
            id: Uuid::new_v4(),
            username: new.username,
            guiding_values: new.guiding_values,
            created_at: Utc::now(),
        };
        self.tables.write().await.users.push(user.clone());
        Ok(user)
    }

    async fn list_users(&self) -> StoreResult<Vec<User>> {
        Ok(self.tables.read().await.users.clone())
    }

    async fn get_user(&self, id: Uuid) -> StoreResult<Option<User>> {
        let tables = self.tables.read().await;
        Ok(tables.users.iter().find(|u| u.id == id).cloned())
    }

    async fn create_element(&self, new: NewElement) -> StoreResult<Element> {
        let element = Element {
            id: Uuid::new_v4(),
            title: new.title,
            element_type: new.element_type,
            related: Vec::new(),
            created_at: Utc::now(),
        };
        self.tables.write().await.elements.push(element.clone());
        Ok(element)
    }

    async fn list_elements(&self) -> StoreResult<Vec<Element>> {
        Ok(self.tables.read().await.elements.clone())
    }

    async fn get_element(&self, id: Uuid) -> StoreResult<Option<Element>> {
        let tables = self.tables.read().await;
        Ok(tables.elements.iter().find(|e| e.id == id).cloned())
    }

    async fn search_elements(&self, query: &str) -> StoreResult<Vec<Element>> {
        let needle = query.to_lowercase();
        let tables = self.tables.read().await;
        Ok(tables
            .elements
            .iter()
            .filter(|e| e.title.to_lowercase().contains(&needle))
            .cloned()
            .collect())
    }

    async fn element_title_exists(&self, title: &str) -> StoreResult<bool> {
        let title = title.to_lowercase();
        let tables = self.tables.read().await;
        Ok(tables.elements.iter().any(|e| e.title.to_lowercase() == title))
    }

    async fn link_elements(&self, a: Uuid, b: Uuid) -> StoreResult<()> {
        let mut tables = self.tables.write().await;

        let idx_a = tables.elements.iter().position(|e| e.id == a);
        let idx_b = tables.elements.iter().position(|e| e.id == b);
        let (Some(idx_a), Some(idx_b)) = (idx_a, idx_b) else {
            return Err(StoreError::NotFound("element"));
        };

        if !tables.elements[idx_a].related.contains(&b) {
            tables.elements[idx_a].related.push(b);
        }
        if !tables.elements[idx_b].related.contains(&a) {
            tables.elements[idx_b].related.push(a);
        }
        Ok(())
    }

    async fn create_action(&self, new: NewAction) -> StoreResult<Action> {
        let mut tables = self.tables.write().await;

        if !tables.users.iter().any(|u| u.id == new.user_id) {
            return Err(StoreError::NotFound("user"));
        }
        if let Some(element_id) = new.element_id {
            if !tables.elements.iter().any(|e| e.id == element_id) {
                return Err(StoreError::NotFound("element"));
            }
        }

        let action = Action {
            id: Uuid::new_v4(),
            user_id: new.user_id,
            element_id: new.element_id,
            action_type: new.action_type,
            content: new.content,
            linked_elements: new.linked_elements,
            created_at: Utc::now(),
        };
        tables.actions.push(action.clone());
        Ok(action)
    }

    async fn list_actions(&self) -> StoreResult<Vec<Action>> {
        Ok(self.tables.read().await.actions.clone())
    }

    async fn get_action(&self, id: Uuid) -> StoreResult<Option<Action>> {
        let tables = self.tables.read().await;
        Ok(tables.actions.iter().find(|a| a.id == id).cloned())
    }

    async fn cast_vote(
        &self,
        action_id: Uuid,
        user_id: Uuid,
        value: VoteValue,
    ) -> StoreResult<Vote> {
        let mut tables = self.tables.write().await;

        if !tables.actions.iter().any(|a| a.id == action_id) {
            return Err(StoreError::NotFound("action"));
        }
        if !tables.users.iter().any(|u| u.id == user_id) {
            return Err(StoreError::NotFound("user"));
        }

        let vote = Vote {
            action_id,
            user_id,
            value,
            cast_at: Utc::now(),
        };

        // Overwrite in place so the first-cast order is preserved.
        match tables
            .votes
            .iter_mut()
            .find(|v| v.action_id == action_id && v.user_id == user_id)
        {
            Some(existing) => *existing = vote.clone(),
            None => tables.votes.push(vote.clone()),
        }
        Ok(vote)
    }

    async fn votes_for(&self, action_id: Uuid) -> StoreResult<Vec<Vote>> {
        let tables = self.tables.read().await;
        Ok(tables
            .votes
            .iter()
            .filter(|v| v.action_id == action_id)
            .cloned()
            .collect())
    }
}
