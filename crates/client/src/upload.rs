//! File upload.
//!
//! The service models an upload as a short-lived multi-part contract: the
//! created file asset carries `upload_urls`, one per part, each covering an
//! equal slice of the payload. The whole exchange is presented to callers as
//! one atomic capability with progress callbacks ("preparing", 0-100,
//! "done").

use std::path::Path;

use tokio::fs::File;
use tokio::io::AsyncReadExt;
use tracing::{debug, info};

use crate::client::{Client, Error, api_error};
use crate::types::{Asset, AssetKind, UploadProgress, UploadTicket};

impl Client {
    /// Uploads `path` as a new file asset under `parent_id`.
    ///
    /// Creates the asset record, then PUTs the payload to each storage URL
    /// in order. Any failure aborts the remaining parts; the partially
    /// transferred asset is left to the service's own garbage collection.
    pub async fn upload(
        &self,
        parent_id: &str,
        path: &Path,
        on_progress: &(dyn Fn(UploadProgress) + Send + Sync),
    ) -> Result<Asset, Error> {
        on_progress(UploadProgress::Preparing);

        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .ok_or_else(|| Error::Io(std::io::Error::other("path has no file name")))?;
        let size = tokio::fs::metadata(path).await?.len();

        let ticket: UploadTicket = self
            .post_json(
                &format!("/assets/{parent_id}/children"),
                &serde_json::json!({ "name": file_name, "type": "file", "filesize": size }),
            )
            .await?;
        info!(
            name = %file_name,
            asset = %ticket.id,
            parts = ticket.upload_urls.len(),
            size,
            "upload started"
        );

        let parts = ticket.upload_urls.len() as u64;
        if parts > 0 && size > 0 {
            let part_size = size.div_ceil(parts);
            let mut file = File::open(path).await?;
            let mut sent: u64 = 0;

            for url in &ticket.upload_urls {
                let remaining = size - sent;
                if remaining == 0 {
                    break;
                }
                let chunk_len = remaining.min(part_size) as usize;
                let mut buf = vec![0u8; chunk_len];
                file.read_exact(&mut buf).await?;
                self.put_part(url, buf).await?;
                sent += chunk_len as u64;
                on_progress(UploadProgress::Percent((sent * 100 / size) as u8));
            }
        }

        on_progress(UploadProgress::Done);
        debug!(asset = %ticket.id, "upload complete");

        Ok(Asset {
            id: ticket.id,
            name: file_name,
            kind: AssetKind::File,
            parent_id: Some(parent_id.to_string()),
            label: None,
        })
    }

    async fn put_part(&self, url: &str, data: Vec<u8>) -> Result<(), Error> {
        let resp = self.http.put(url).body(data).send().await?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(api_error("PUT", url.to_string(), status.as_u16(), body));
        }
        Ok(())
    }
}
