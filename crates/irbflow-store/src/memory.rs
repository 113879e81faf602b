//! In-process entity store backed by concurrent maps.
//!
//! Mutual exclusion per proposal comes from holding the dashmap entry
//! guard for the duration of the mutation closure; the closure is
//! synchronous, so the guard is never held across an await point. The
//! closure mutates a clone and the clone is committed only on success,
//! which keeps failed mutations all-or-nothing.

use std::sync::atomic::{AtomicU64, Ordering};

use dashmap::DashMap;
use chrono::Utc;

use async_trait::async_trait;

use irbflow_core::AppError;
use irbflow_core::result::AppResult;
use irbflow_core::types::pagination::{PageRequest, PageResponse};
use irbflow_core::types::{NotificationId, ProposalId, UserId};
use irbflow_entity::notification::Notification;
use irbflow_entity::proposal::Proposal;
use irbflow_entity::user::{User, UserRole};

use crate::traits::{NotificationStore, ProposalMutation, ProposalStore, UserStore};

/// In-memory implementation of all store traits.
#[derive(Debug, Default)]
pub struct MemoryStore {
    proposals: DashMap<ProposalId, Proposal>,
    users: DashMap<UserId, User>,
    notifications: DashMap<NotificationId, Notification>,
    code_sequences: DashMap<(String, i32), u64>,
    certificate_sequence: AtomicU64,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

/// Sort newest-first and cut one page out of a filtered result set.
fn paginate<T: serde::Serialize>(
    mut items: Vec<T>,
    page: &PageRequest,
    newer_first: impl Fn(&T, &T) -> std::cmp::Ordering,
) -> PageResponse<T> {
    items.sort_by(newer_first);
    let total = items.len() as u64;
    let items = items
        .into_iter()
        .skip(page.offset() as usize)
        .take(page.limit() as usize)
        .collect();
    PageResponse::new(items, page.page, page.page_size, total)
}

#[async_trait]
impl ProposalStore for MemoryStore {
    async fn insert(&self, proposal: Proposal) -> AppResult<Proposal> {
        if self.proposals.contains_key(&proposal.id) {
            return Err(AppError::storage(format!(
                "Proposal {} already exists",
                proposal.id
            )));
        }
        self.proposals.insert(proposal.id, proposal.clone());
        Ok(proposal)
    }

    async fn find_by_id(&self, id: ProposalId) -> AppResult<Option<Proposal>> {
        Ok(self.proposals.get(&id).map(|entry| entry.clone()))
    }

    async fn update(
        &self,
        id: ProposalId,
        expected_version: Option<u64>,
        mutate: ProposalMutation,
    ) -> AppResult<Proposal> {
        let mut entry = self
            .proposals
            .get_mut(&id)
            .ok_or_else(|| AppError::not_found(format!("Proposal {id} not found")))?;

        if let Some(expected) = expected_version {
            if entry.version != expected {
                return Err(AppError::conflict(format!(
                    "Proposal {id} was modified concurrently (expected version {expected}, found {})",
                    entry.version
                )));
            }
        }

        // Mutate a clone so a failing closure leaves the record untouched.
        let mut updated = entry.clone();
        mutate(&mut updated)?;
        updated.version = entry.version + 1;
        updated.updated_at = Utc::now();
        *entry = updated.clone();
        Ok(updated)
    }

    async fn find_all(&self, page: &PageRequest) -> AppResult<PageResponse<Proposal>> {
        let items: Vec<Proposal> = self.proposals.iter().map(|e| e.clone()).collect();
        Ok(paginate(items, page, |a, b| b.created_at.cmp(&a.created_at)))
    }

    async fn find_by_researcher(
        &self,
        researcher_id: UserId,
        page: &PageRequest,
    ) -> AppResult<PageResponse<Proposal>> {
        let items: Vec<Proposal> = self
            .proposals
            .iter()
            .filter(|e| e.researcher_id == researcher_id)
            .map(|e| e.clone())
            .collect();
        Ok(paginate(items, page, |a, b| b.created_at.cmp(&a.created_at)))
    }

    async fn find_by_advisor(
        &self,
        advisor_id: UserId,
        page: &PageRequest,
    ) -> AppResult<PageResponse<Proposal>> {
        let items: Vec<Proposal> = self
            .proposals
            .iter()
            .filter(|e| e.advisor_id == Some(advisor_id))
            .map(|e| e.clone())
            .collect();
        Ok(paginate(items, page, |a, b| b.created_at.cmp(&a.created_at)))
    }

    async fn find_by_reviewer(
        &self,
        reviewer_id: UserId,
        page: &PageRequest,
    ) -> AppResult<PageResponse<Proposal>> {
        let items: Vec<Proposal> = self
            .proposals
            .iter()
            .filter(|e| e.reviewers.contains(&reviewer_id))
            .map(|e| e.clone())
            .collect();
        Ok(paginate(items, page, |a, b| b.created_at.cmp(&a.created_at)))
    }

    async fn next_code_sequence(&self, faculty: &str, year: i32) -> AppResult<u64> {
        let mut entry = self
            .code_sequences
            .entry((faculty.to_string(), year))
            .or_insert(0);
        *entry += 1;
        Ok(*entry)
    }

    async fn next_certificate_sequence(&self) -> AppResult<u64> {
        Ok(self.certificate_sequence.fetch_add(1, Ordering::SeqCst) + 1)
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn insert(&self, user: User) -> AppResult<User> {
        if self.users.contains_key(&user.id) {
            return Err(AppError::storage(format!("User {} already exists", user.id)));
        }
        self.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn find_by_id(&self, id: UserId) -> AppResult<Option<User>> {
        Ok(self.users.get(&id).map(|entry| entry.clone()))
    }

    async fn update(&self, user: User) -> AppResult<User> {
        let mut entry = self
            .users
            .get_mut(&user.id)
            .ok_or_else(|| AppError::not_found(format!("User {} not found", user.id)))?;
        *entry = user.clone();
        Ok(user)
    }

    async fn find_all(&self, page: &PageRequest) -> AppResult<PageResponse<User>> {
        let items: Vec<User> = self.users.iter().map(|e| e.clone()).collect();
        Ok(paginate(items, page, |a, b| b.created_at.cmp(&a.created_at)))
    }

    async fn find_by_role(&self, role: UserRole) -> AppResult<Vec<User>> {
        Ok(self
            .users
            .iter()
            .filter(|e| e.roles.contains(&role))
            .map(|e| e.clone())
            .collect())
    }
}

#[async_trait]
impl NotificationStore for MemoryStore {
    async fn insert(&self, notification: Notification) -> AppResult<Notification> {
        self.notifications
            .insert(notification.id, notification.clone());
        Ok(notification)
    }

    async fn find_by_user(
        &self,
        user_id: UserId,
        page: &PageRequest,
    ) -> AppResult<PageResponse<Notification>> {
        let items: Vec<Notification> = self
            .notifications
            .iter()
            .filter(|e| e.user_id == user_id)
            .map(|e| e.clone())
            .collect();
        Ok(paginate(items, page, |a, b| b.created_at.cmp(&a.created_at)))
    }

    async fn count_unread(&self, user_id: UserId) -> AppResult<u64> {
        Ok(self
            .notifications
            .iter()
            .filter(|e| e.user_id == user_id && !e.is_read)
            .count() as u64)
    }

    async fn mark_read(&self, id: NotificationId, user_id: UserId) -> AppResult<()> {
        let mut entry = self
            .notifications
            .get_mut(&id)
            .ok_or_else(|| AppError::not_found(format!("Notification {id} not found")))?;
        if entry.user_id != user_id {
            return Err(AppError::not_found(format!("Notification {id} not found")));
        }
        entry.is_read = true;
        Ok(())
    }

    async fn mark_all_read(&self, user_id: UserId) -> AppResult<u64> {
        let mut flipped = 0;
        for mut entry in self.notifications.iter_mut() {
            if entry.user_id == user_id && !entry.is_read {
                entry.is_read = true;
                flipped += 1;
            }
        }
        Ok(flipped)
    }
}
