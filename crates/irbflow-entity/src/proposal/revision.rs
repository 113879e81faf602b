//! Revision history records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An immutable record of one resubmission cycle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RevisionLog {
    /// 1-based sequence number; equals the proposal's `revision_count`
    /// at the moment of submission.
    pub sequence: u32,
    /// When the revision was submitted.
    pub submitted_at: DateTime<Utc>,
    /// Link to the revised document.
    pub file_link: String,
    /// Optional link to a response-to-reviewers note.
    pub note_link: Option<String>,
    /// Snapshot of the feedback that prompted this revision, captured at
    /// submission time so later feedback edits cannot rewrite history.
    pub feedback_snapshot: Option<String>,
}
