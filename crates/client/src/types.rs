//! Wire types for the review-service API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Asset classification used across search, upload and versioning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssetKind {
    File,
    Folder,
    VersionStack,
    /// Anything the service adds later (review links, presentations, ...).
    #[serde(other)]
    Other,
}

impl AssetKind {
    /// Query-parameter value for search type filters.
    pub fn as_query(&self) -> &'static str {
        match self {
            AssetKind::File => "file",
            AssetKind::Folder => "folder",
            AssetKind::VersionStack => "version_stack",
            AssetKind::Other => "other",
        }
    }
}

/// A project on the review service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub id: String,
    pub root_asset_id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub is_archived: bool,
    #[serde(default)]
    pub deleted_at: Option<String>,
    /// Record discriminator; the project listing can carry other record
    /// kinds alongside projects.
    #[serde(rename = "_type", default)]
    pub record_type: String,
}

/// A search or browse result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Asset {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type")]
    pub kind: AssetKind,
    #[serde(default)]
    pub parent_id: Option<String>,
    #[serde(default)]
    pub label: Option<String>,
}

/// Back-reference from a stack member to its owning version stack.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VersionStackRef {
    pub id: String,
}

/// Full asset detail record (`GET /assets/{id}`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetDetail {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type")]
    pub kind: AssetKind,
    #[serde(default)]
    pub parent_id: Option<String>,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub is_versioned: bool,
    #[serde(default)]
    pub version_stack: Option<VersionStackRef>,
    /// Legacy stack reference exposed by older service versions.
    #[serde(default)]
    pub original_asset_id: Option<String>,
}

/// Response to creating a file asset: the new id plus the storage URLs the
/// transport PUTs the payload to, in order.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct UploadTicket {
    pub id: String,
    #[serde(default)]
    pub upload_urls: Vec<String>,
}

/// Response to creating a folder.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct CreatedAsset {
    pub id: String,
}

/// A review comment on an asset, optionally with replies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    pub id: String,
    #[serde(default)]
    pub text: String,
    /// Position on the media timeline, in seconds. Replies carry none.
    #[serde(default)]
    pub timestamp: Option<f64>,
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub owner: Option<CommentOwner>,
    #[serde(default)]
    pub inserted_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub replies: Vec<Comment>,
}

/// Author of a comment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommentOwner {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
}

/// Progress notifications emitted during a single file upload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadProgress {
    /// The asset record is being created on the service.
    Preparing,
    /// Payload transfer, 0-100.
    Percent(u8),
    /// All parts stored.
    Done,
}
