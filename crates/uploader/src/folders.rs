//! Project and well-known folder resolution.

use postroom_client::{AssetKind, Error, Project};
use tracing::{info, warn};

use crate::locator;
use crate::retry::{RetryPolicy, with_retry};
use crate::service::AssetService;

/// Destination for conform renders that match nothing.
pub const CONFORMS_FOLDER: &str = "CONFORMS";
/// Destination for shot renders that match nothing.
pub const SHOTS_FOLDER: &str = "SHOTS";

/// Finds the project by exact name, creating it (plus its well-known
/// subfolders) when absent.
///
/// Lookup is case-sensitive and skips archived or deleted projects.
/// Subfolder creation after a project create is best-effort: a failure is
/// logged and the other folder is still attempted.
pub async fn get_or_create_project(
    service: &dyn AssetService,
    retry: &RetryPolicy,
    name: &str,
) -> Result<Project, Error> {
    let projects = with_retry(retry, || service.list_projects()).await?;
    if let Some(found) = projects
        .into_iter()
        .find(|p| p.name == name && !p.is_archived && p.deleted_at.is_none())
    {
        info!(name, project = %found.id, "found project");
        return Ok(found);
    }

    info!(name, "project not found, creating");
    let project = with_retry(retry, || service.create_project(name)).await?;
    for folder in [CONFORMS_FOLDER, SHOTS_FOLDER] {
        if let Err(e) =
            with_retry(retry, || service.create_folder(&project.root_asset_id, folder)).await
        {
            warn!(folder, error = %e, "could not create well-known folder");
        }
    }
    Ok(project)
}

/// Finds a folder by name in the project, creating it under the project
/// root when absent.
///
/// No id is cached across calls; callers thread the returned value through
/// their own batch context instead of sharing folder state between
/// unrelated call chains.
pub async fn get_or_create_folder(
    service: &dyn AssetService,
    retry: &RetryPolicy,
    project: &Project,
    name: &str,
) -> Result<String, Error> {
    if let Some(found) =
        locator::find_asset(service, retry, &project.id, name, Some(AssetKind::Folder)).await?
    {
        return Ok(found.id);
    }
    with_retry(retry, || service.create_folder(&project.root_asset_id, name)).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{MockService, project};

    #[tokio::test]
    async fn existing_project_is_returned() {
        let mock = MockService::with_project("JOB_A");
        let found = get_or_create_project(&mock, &RetryPolicy::immediate(), "JOB_A")
            .await
            .unwrap();
        assert_eq!(found.id, "p1");
        assert_eq!(mock.count_calls("create_project"), 0);
    }

    #[tokio::test]
    async fn archived_and_deleted_projects_are_skipped() {
        let mock = MockService::new();
        {
            let mut state = mock.state.lock().unwrap();
            let mut archived = project("p1", "r1", "JOB_A");
            archived.is_archived = true;
            let mut deleted = project("p2", "r2", "JOB_A");
            deleted.deleted_at = Some("2024-01-01T00:00:00Z".into());
            state.projects.push(archived);
            state.projects.push(deleted);
            state.projects.push(project("p3", "r3", "JOB_A"));
        }

        let found = get_or_create_project(&mock, &RetryPolicy::immediate(), "JOB_A")
            .await
            .unwrap();
        assert_eq!(found.id, "p3");
    }

    #[tokio::test]
    async fn missing_project_is_created_with_both_folders() {
        let mock = MockService::new();
        let created = get_or_create_project(&mock, &RetryPolicy::immediate(), "JOB_NEW")
            .await
            .unwrap();

        assert_eq!(created.name, "JOB_NEW");
        assert_eq!(mock.count_calls("create_project:JOB_NEW"), 1);
        assert_eq!(mock.count_calls("create_folder:CONFORMS"), 1);
        assert_eq!(mock.count_calls("create_folder:SHOTS"), 1);
    }

    #[tokio::test]
    async fn one_subfolder_failure_does_not_block_the_other() {
        let mock = MockService::new();
        mock.fail_create_folder(CONFORMS_FOLDER);

        let created = get_or_create_project(&mock, &RetryPolicy::immediate(), "JOB_NEW")
            .await
            .unwrap();

        assert_eq!(created.name, "JOB_NEW");
        assert_eq!(mock.count_calls("create_folder:CONFORMS"), 1);
        assert_eq!(mock.count_calls("create_folder:SHOTS"), 1);
    }

    #[tokio::test]
    async fn create_project_failure_propagates() {
        let mock = MockService::new();
        mock.fail_create_project(403);

        let err = get_or_create_project(&mock, &RetryPolicy::immediate(), "JOB_NEW")
            .await
            .unwrap_err();
        assert_eq!(err.status(), Some(403));
    }

    #[tokio::test]
    async fn folder_is_found_before_being_created() {
        let mock = MockService::with_project("JOB_A");
        let target = project("p1", "root-1", "JOB_A");

        let first = get_or_create_folder(&mock, &RetryPolicy::immediate(), &target, "CONFORMS")
            .await
            .unwrap();
        let second = get_or_create_folder(&mock, &RetryPolicy::immediate(), &target, "CONFORMS")
            .await
            .unwrap();

        // Second call finds the folder the first call created.
        assert_eq!(first, second);
        assert_eq!(mock.count_calls("create_folder:CONFORMS"), 1);
        assert_eq!(mock.count_calls("search:CONFORMS:folder"), 2);
    }
}
