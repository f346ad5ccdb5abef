//! Review status vocabulary and panel label mapping.
//!
//! The service stores review state in the asset `label`; the media panel
//! shows it as a colour label. Both directions of the mapping live here so
//! the pull and push flows cannot drift apart.

use postroom_client::{Client, Error};
use serde::{Deserialize, Serialize};

/// Review state carried on an asset's label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewStatus {
    Approved,
    NeedsReview,
    InProgress,
}

impl ReviewStatus {
    /// Wire value stored in the asset label.
    pub fn as_label(&self) -> &'static str {
        match self {
            ReviewStatus::Approved => "approved",
            ReviewStatus::NeedsReview => "needs_review",
            ReviewStatus::InProgress => "in_progress",
        }
    }

    /// Parses the wire label; unknown labels are `None`.
    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "approved" => Some(ReviewStatus::Approved),
            "needs_review" => Some(ReviewStatus::NeedsReview),
            "in_progress" => Some(ReviewStatus::InProgress),
            _ => None,
        }
    }

    /// Colour label shown in the host media panel.
    pub fn panel_label(&self) -> &'static str {
        match self {
            ReviewStatus::Approved => "Approved",
            ReviewStatus::NeedsReview => "Needs Review",
            ReviewStatus::InProgress => "In Progress",
        }
    }

    /// Parses a panel colour label; unknown labels are `None`.
    pub fn from_panel_label(label: &str) -> Option<Self> {
        match label {
            "Approved" => Some(ReviewStatus::Approved),
            "Needs Review" => Some(ReviewStatus::NeedsReview),
            "In Progress" => Some(ReviewStatus::InProgress),
            _ => None,
        }
    }

    /// Panel colour swatch for this status (linear RGB).
    pub fn panel_colour(&self) -> (f64, f64, f64) {
        match self {
            ReviewStatus::Approved => {
                (0.11372549086809158, 0.26274511218070984, 0.1764705926179886)
            }
            ReviewStatus::NeedsReview => {
                (0.6000000238418579, 0.3450980484485626, 0.16470588743686676)
            }
            ReviewStatus::InProgress => {
                (0.26274511218070984, 0.40784314274787903, 0.5019607543945312)
            }
        }
    }
}

/// Reads an asset's review status; `None` when unset or unknown.
pub async fn get_status(client: &Client, asset_id: &str) -> Result<Option<ReviewStatus>, Error> {
    let detail = client.asset_detail(asset_id).await?;
    Ok(detail.label.as_deref().and_then(ReviewStatus::from_label))
}

/// Writes an asset's review status.
pub async fn set_status(client: &Client, asset_id: &str, status: ReviewStatus) -> Result<(), Error> {
    client.update_label(asset_id, status.as_label()).await
}
