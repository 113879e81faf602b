//! Store traits — the persistence seam of the workflow engine.
//!
//! Every transition in the engine goes through [`ProposalStore::update`]:
//! the store applies the mutation closure under per-proposal mutual
//! exclusion, so check-then-act sequences (completion detection,
//! revision-count increments, certificate assignment) are race-free.
//! A mutation either commits wholly or not at all.

use async_trait::async_trait;

use irbflow_core::result::AppResult;
use irbflow_core::types::pagination::{PageRequest, PageResponse};
use irbflow_core::types::{NotificationId, ProposalId, UserId};
use irbflow_entity::notification::Notification;
use irbflow_entity::proposal::Proposal;
use irbflow_entity::user::{User, UserRole};

/// A mutation applied to a proposal inside the store's atomic scope.
///
/// The closure runs with exclusive access to the record and must not
/// block; returning an error aborts the update with no change applied.
pub type ProposalMutation = Box<dyn FnOnce(&mut Proposal) -> AppResult<()> + Send>;

/// Persistence of proposal aggregates.
#[async_trait]
pub trait ProposalStore: Send + Sync + 'static {
    /// Insert a new proposal.
    async fn insert(&self, proposal: Proposal) -> AppResult<Proposal>;

    /// Find a proposal by id.
    async fn find_by_id(&self, id: ProposalId) -> AppResult<Option<Proposal>>;

    /// Apply `mutate` to the proposal under per-proposal mutual exclusion
    /// and return the committed record.
    ///
    /// When `expected_version` is given and does not match the stored
    /// version, fails with a conflict before the closure runs. The stored
    /// version is bumped on every successful commit.
    async fn update(
        &self,
        id: ProposalId,
        expected_version: Option<u64>,
        mutate: ProposalMutation,
    ) -> AppResult<Proposal>;

    /// List all proposals, newest first.
    async fn find_all(&self, page: &PageRequest) -> AppResult<PageResponse<Proposal>>;

    /// List proposals owned by a researcher.
    async fn find_by_researcher(
        &self,
        researcher_id: UserId,
        page: &PageRequest,
    ) -> AppResult<PageResponse<Proposal>>;

    /// List proposals advised by a user.
    async fn find_by_advisor(
        &self,
        advisor_id: UserId,
        page: &PageRequest,
    ) -> AppResult<PageResponse<Proposal>>;

    /// List proposals where the user is an assigned reviewer.
    async fn find_by_reviewer(
        &self,
        reviewer_id: UserId,
        page: &PageRequest,
    ) -> AppResult<PageResponse<Proposal>>;

    /// Next per-(faculty, year) sequence number for proposal codes.
    async fn next_code_sequence(&self, faculty: &str, year: i32) -> AppResult<u64>;

    /// Next value of the monotonic certificate counter.
    async fn next_certificate_sequence(&self) -> AppResult<u64>;
}

/// Persistence of user records.
#[async_trait]
pub trait UserStore: Send + Sync + 'static {
    /// Insert a new user.
    async fn insert(&self, user: User) -> AppResult<User>;

    /// Find a user by id.
    async fn find_by_id(&self, id: UserId) -> AppResult<Option<User>>;

    /// Replace an existing user record.
    async fn update(&self, user: User) -> AppResult<User>;

    /// List all users.
    async fn find_all(&self, page: &PageRequest) -> AppResult<PageResponse<User>>;

    /// All users holding the given role.
    async fn find_by_role(&self, role: UserRole) -> AppResult<Vec<User>>;
}

/// Persistence of notification records (the notification sink).
#[async_trait]
pub trait NotificationStore: Send + Sync + 'static {
    /// Insert a notification.
    async fn insert(&self, notification: Notification) -> AppResult<Notification>;

    /// List notifications for a recipient, newest first.
    async fn find_by_user(
        &self,
        user_id: UserId,
        page: &PageRequest,
    ) -> AppResult<PageResponse<Notification>>;

    /// Count unread notifications for a recipient.
    async fn count_unread(&self, user_id: UserId) -> AppResult<u64>;

    /// Mark one notification as read; fails with not-found unless the
    /// record exists and belongs to `user_id`.
    async fn mark_read(&self, id: NotificationId, user_id: UserId) -> AppResult<()>;

    /// Mark all of a recipient's notifications as read; returns how many
    /// were flipped.
    async fn mark_all_read(&self, user_id: UserId) -> AppResult<u64>;
}
