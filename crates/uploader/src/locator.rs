//! Asset lookup with the tiered name-match policy.

use postroom_client::{Asset, AssetKind, Error, best_name_match};
use tracing::debug;

use crate::retry::{RetryPolicy, with_retry};
use crate::service::AssetService;

/// Searches `project_id` for the asset best matching `query`.
///
/// Issues one search call (retried on transient failures) and applies the
/// exact / case-insensitive / substring preference order. Returns `Ok(None)`
/// when nothing matches; service failures propagate so the caller can pick
/// a fallback.
pub async fn find_asset(
    service: &dyn AssetService,
    retry: &RetryPolicy,
    project_id: &str,
    query: &str,
    kind: Option<AssetKind>,
) -> Result<Option<Asset>, Error> {
    let results = with_retry(retry, || service.search_assets(project_id, query, kind)).await?;
    let found = best_name_match(&results, query, kind).cloned();
    match &found {
        Some(asset) => debug!(query, asset = %asset.id, kind = ?asset.kind, "search matched"),
        None => debug!(query, results = results.len(), "no asset matched"),
    }
    Ok(found)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{MockService, file_asset};

    #[tokio::test]
    async fn returns_best_match() {
        let mock = MockService::new();
        mock.add_search_result("shotA_010", file_asset("a1", "shotA_010_v2", "f1"));
        mock.add_search_result("shotA_010", file_asset("a2", "shotA_010", "f1"));

        let found = find_asset(&mock, &RetryPolicy::immediate(), "p1", "shotA_010", None)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.id, "a2");
    }

    #[tokio::test]
    async fn no_results_is_none_not_error() {
        let mock = MockService::new();
        let found = find_asset(&mock, &RetryPolicy::immediate(), "p1", "missing", None)
            .await
            .unwrap();
        assert!(found.is_none());
    }

    #[tokio::test]
    async fn transient_search_failure_is_retried() {
        let mock = MockService::new();
        mock.fail_searches(1);
        mock.add_search_result("shotA_010", file_asset("a1", "shotA_010", "f1"));

        let found = find_asset(&mock, &RetryPolicy::immediate(), "p1", "shotA_010", None)
            .await
            .unwrap();
        assert_eq!(found.unwrap().id, "a1");
        assert_eq!(mock.count_calls("search:"), 2);
    }

    #[tokio::test]
    async fn exhausted_retries_propagate_error() {
        let mock = MockService::new();
        mock.fail_searches(99);

        let err = find_asset(&mock, &RetryPolicy::immediate(), "p1", "shotA_010", None)
            .await
            .unwrap_err();
        assert_eq!(err.status(), Some(503));
        assert_eq!(mock.count_calls("search:"), 3);
    }
}
