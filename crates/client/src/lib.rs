//! Review-service API client.
//!
//! Async REST client for the cloud review platform the post pipeline
//! publishes to: project listing and creation, asset search, folder
//! creation, version linking, label updates, comments, and the multi-part
//! file upload presented as a single capability with progress callbacks.
//!
//! The tiered name-match policy used by every search caller lives in
//! [`matching`] so the uploader and the review helpers agree on how a
//! render name selects an existing asset.

pub mod client;
pub mod config;
pub mod matching;
pub mod types;

mod upload;

pub use client::{Client, Error};
pub use config::{ConfigError, ProjectToken, ServiceConfig};
pub use matching::best_name_match;
pub use types::{
    Asset, AssetDetail, AssetKind, Comment, CommentOwner, Project, UploadProgress,
    VersionStackRef,
};
