//! Comment retrieval and marker-note mapping.

use chrono::{DateTime, Utc};
use postroom_client::{Client, Comment, Error};
use tracing::info;

/// A review comment flattened into a marker-ready note.
#[derive(Debug, Clone, PartialEq)]
pub struct ReviewNote {
    pub text: String,
    pub author: String,
    /// Position on the media timeline, in seconds. Replies inherit their
    /// parent's position.
    pub timestamp: f64,
    pub completed: bool,
    pub inserted_at: Option<DateTime<Utc>>,
    /// Nesting depth: 0 for top-level comments, 1+ for replies.
    pub depth: usize,
}

impl ReviewNote {
    /// Frame number of this note at the given frame rate.
    pub fn frame(&self, fps: f64) -> i64 {
        (self.timestamp * fps).round() as i64
    }
}

/// Fetches an asset's comments (with replies) and flattens them in reading
/// order: each comment followed by its replies.
pub async fn pull_notes(client: &Client, asset_id: &str) -> Result<Vec<ReviewNote>, Error> {
    let comments = client.list_comments(asset_id, true).await?;
    let notes = flatten_comments(&comments);
    info!(asset = asset_id, notes = notes.len(), "comments pulled");
    Ok(notes)
}

/// Flattens a comment tree into notes, replies after their parent.
pub fn flatten_comments(comments: &[Comment]) -> Vec<ReviewNote> {
    let mut notes = Vec::new();
    for comment in comments {
        flatten(comment, 0, None, &mut notes);
    }
    notes
}

fn flatten(comment: &Comment, depth: usize, inherited: Option<f64>, notes: &mut Vec<ReviewNote>) {
    let timestamp = comment.timestamp.or(inherited).unwrap_or(0.0);
    notes.push(ReviewNote {
        text: comment.text.clone(),
        author: comment
            .owner
            .as_ref()
            .map(|o| o.name.clone())
            .unwrap_or_default(),
        timestamp,
        completed: comment.completed,
        inserted_at: comment.inserted_at,
        depth,
    });
    for reply in &comment.replies {
        flatten(reply, depth + 1, Some(timestamp), notes);
    }
}
