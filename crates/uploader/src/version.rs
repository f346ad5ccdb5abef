//! Version linking with the recoverable "unprocessable" case.

use postroom_client::Error;
use tracing::{debug, warn};

use crate::retry::{RetryPolicy, with_retry};
use crate::service::AssetService;

/// Links `new_asset_id` as the next version of `stack_root_id`.
///
/// Returns `Ok(true)` on success and `Ok(false)` when the service reports
/// the target as unprocessable (422), meaning the root is itself a version
/// member or not a stackable asset. The upload already stands, so the
/// condition is a warning: not retried, never re-uploaded. Transient
/// failures are retried; every other failure propagates.
pub async fn link_version(
    service: &dyn AssetService,
    retry: &RetryPolicy,
    stack_root_id: &str,
    new_asset_id: &str,
) -> Result<bool, Error> {
    match with_retry(retry, || service.link_version(stack_root_id, new_asset_id)).await {
        Ok(()) => {
            debug!(root = stack_root_id, next = new_asset_id, "linked next version");
            Ok(true)
        }
        Err(e) if e.is_unprocessable() => {
            warn!(
                root = stack_root_id,
                next = new_asset_id,
                "target not stackable, keeping upload unlinked"
            );
            Ok(false)
        }
        Err(e) => Err(e),
    }
}
