//! Version-stack root normalization.

use postroom_client::AssetKind;
use tracing::warn;

use crate::service::AssetService;

/// Resolves any asset id to the id of its owning version-stack root.
///
/// Linking a version against a non-root stack member is rejected by the
/// service, so matches are normalized before linking. Best-effort: a fetch
/// failure returns the input unchanged, preserving the un-normalized
/// behavior instead of blocking the upload. Idempotent.
pub async fn resolve_stack_root(service: &dyn AssetService, asset_id: &str) -> String {
    let detail = match service.asset_detail(asset_id).await {
        Ok(detail) => detail,
        Err(e) => {
            warn!(asset = asset_id, error = %e, "stack root lookup failed, using asset as-is");
            return asset_id.to_string();
        }
    };

    // Already an un-versioned stack root.
    if detail.kind == AssetKind::VersionStack && !detail.is_versioned {
        return asset_id.to_string();
    }
    if let Some(stack) = detail.version_stack {
        return stack.id;
    }
    // Older service versions expose the root through this field instead.
    if let Some(original) = detail.original_asset_id {
        return original;
    }
    asset_id.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{MockService, detail};
    use postroom_client::VersionStackRef;

    #[tokio::test]
    async fn stack_root_resolves_to_itself() {
        let mock = MockService::new();
        mock.add_detail(detail("stack-1", AssetKind::VersionStack));

        assert_eq!(resolve_stack_root(&mock, "stack-1").await, "stack-1");
    }

    #[tokio::test]
    async fn member_resolves_to_stack_reference() {
        let mock = MockService::new();
        let mut member = detail("member-1", AssetKind::File);
        member.is_versioned = true;
        member.version_stack = Some(VersionStackRef { id: "stack-1".into() });
        mock.add_detail(member);
        mock.add_detail(detail("stack-1", AssetKind::VersionStack));

        assert_eq!(resolve_stack_root(&mock, "member-1").await, "stack-1");
    }

    #[tokio::test]
    async fn legacy_original_asset_id_is_used() {
        let mock = MockService::new();
        let mut member = detail("member-1", AssetKind::File);
        member.original_asset_id = Some("orig-1".into());
        mock.add_detail(member);

        assert_eq!(resolve_stack_root(&mock, "member-1").await, "orig-1");
    }

    #[tokio::test]
    async fn plain_file_resolves_to_itself() {
        let mock = MockService::new();
        mock.add_detail(detail("file-1", AssetKind::File));

        assert_eq!(resolve_stack_root(&mock, "file-1").await, "file-1");
    }

    #[tokio::test]
    async fn fetch_failure_fails_open() {
        let mock = MockService::new();
        assert_eq!(resolve_stack_root(&mock, "ghost-1").await, "ghost-1");
    }

    #[tokio::test]
    async fn resolution_is_idempotent() {
        let mock = MockService::new();
        let mut member = detail("member-1", AssetKind::File);
        member.is_versioned = true;
        member.version_stack = Some(VersionStackRef { id: "stack-1".into() });
        mock.add_detail(member);
        mock.add_detail(detail("stack-1", AssetKind::VersionStack));

        let once = resolve_stack_root(&mock, "member-1").await;
        let twice = resolve_stack_root(&mock, &once).await;
        assert_eq!(once, twice);
    }
}
