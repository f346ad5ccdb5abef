//! Service seam for the upload pipeline.
//!
//! The pipeline talks to the review service through this object-safe trait
//! so tests can pin search ordering and inject failures with a mock
//! backend. The blanket implementation delegates to the real
//! [`postroom_client::Client`].

use std::future::Future;
use std::path::Path;
use std::pin::Pin;

use postroom_client::{
    Asset, AssetDetail, AssetKind, Client, Error, Project, UploadProgress,
};

/// Boxed future returned by [`AssetService`] methods.
pub type ServiceFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, Error>> + Send + 'a>>;

/// Progress callback handed to [`AssetService::upload`].
pub type ProgressFn<'a> = &'a (dyn Fn(UploadProgress) + Send + Sync);

/// The review-service operations the pipeline depends on.
pub trait AssetService: Send + Sync {
    /// Lists the team's projects (archived/deleted already excluded).
    fn list_projects(&self) -> ServiceFuture<'_, Vec<Project>>;

    /// Creates a project.
    fn create_project<'a>(&'a self, name: &'a str) -> ServiceFuture<'a, Project>;

    /// Searches a project's assets by name fragment.
    fn search_assets<'a>(
        &'a self,
        project_id: &'a str,
        query: &'a str,
        kind: Option<AssetKind>,
    ) -> ServiceFuture<'a, Vec<Asset>>;

    /// Fetches an asset's full detail record.
    fn asset_detail<'a>(&'a self, asset_id: &'a str) -> ServiceFuture<'a, AssetDetail>;

    /// Creates a folder under `parent_id`, returning the new folder id.
    fn create_folder<'a>(&'a self, parent_id: &'a str, name: &'a str)
    -> ServiceFuture<'a, String>;

    /// Uploads a local file as a new asset under `parent_id`.
    fn upload<'a>(
        &'a self,
        parent_id: &'a str,
        path: &'a Path,
        on_progress: ProgressFn<'a>,
    ) -> ServiceFuture<'a, Asset>;

    /// Links `next_asset_id` as the next version of `asset_id`.
    fn link_version<'a>(
        &'a self,
        asset_id: &'a str,
        next_asset_id: &'a str,
    ) -> ServiceFuture<'a, ()>;
}

impl AssetService for Client {
    fn list_projects(&self) -> ServiceFuture<'_, Vec<Project>> {
        Box::pin(Client::list_projects(self))
    }

    fn create_project<'a>(&'a self, name: &'a str) -> ServiceFuture<'a, Project> {
        Box::pin(Client::create_project(self, name))
    }

    fn search_assets<'a>(
        &'a self,
        project_id: &'a str,
        query: &'a str,
        kind: Option<AssetKind>,
    ) -> ServiceFuture<'a, Vec<Asset>> {
        Box::pin(Client::search_assets(self, project_id, query, kind))
    }

    fn asset_detail<'a>(&'a self, asset_id: &'a str) -> ServiceFuture<'a, AssetDetail> {
        Box::pin(Client::asset_detail(self, asset_id))
    }

    fn create_folder<'a>(
        &'a self,
        parent_id: &'a str,
        name: &'a str,
    ) -> ServiceFuture<'a, String> {
        Box::pin(Client::create_folder(self, parent_id, name))
    }

    fn upload<'a>(
        &'a self,
        parent_id: &'a str,
        path: &'a Path,
        on_progress: ProgressFn<'a>,
    ) -> ServiceFuture<'a, Asset> {
        Box::pin(Client::upload(self, parent_id, path, on_progress))
    }

    fn link_version<'a>(
        &'a self,
        asset_id: &'a str,
        next_asset_id: &'a str,
    ) -> ServiceFuture<'a, ()> {
        Box::pin(Client::link_version(self, asset_id, next_asset_id))
    }
}
