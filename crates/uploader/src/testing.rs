//! Shared mock service for pipeline tests.
//!
//! Search ordering, failure injection and call recording all go through
//! here so tests pin behavior against a deterministic backend instead of
//! the live service's unspecified result order.

use std::collections::{HashMap, VecDeque};
use std::path::Path;
use std::sync::Mutex;

use postroom_client::{Asset, AssetDetail, AssetKind, Error, Project, UploadProgress};

use crate::service::{AssetService, ProgressFn, ServiceFuture};

/// Constructs an `Error::Api` with the given status, the only error kind
/// mocks need to synthesize (503 stands in for transient failures).
pub(crate) fn api_error(status: u16) -> Error {
    Error::Api {
        method: "GET",
        url: "mock://service".into(),
        status,
        body: String::new(),
    }
}

pub(crate) fn project(id: &str, root: &str, name: &str) -> Project {
    Project {
        id: id.into(),
        root_asset_id: root.into(),
        name: name.into(),
        is_archived: false,
        deleted_at: None,
        record_type: "project".into(),
    }
}

pub(crate) fn file_asset(id: &str, name: &str, parent_id: &str) -> Asset {
    Asset {
        id: id.into(),
        name: name.into(),
        kind: AssetKind::File,
        parent_id: Some(parent_id.into()),
        label: None,
    }
}

pub(crate) fn stack_asset(id: &str, name: &str) -> Asset {
    Asset {
        id: id.into(),
        name: name.into(),
        kind: AssetKind::VersionStack,
        parent_id: Some("root-1".into()),
        label: None,
    }
}

pub(crate) fn detail(id: &str, kind: AssetKind) -> AssetDetail {
    AssetDetail {
        id: id.into(),
        name: id.into(),
        kind,
        parent_id: None,
        label: None,
        is_versioned: false,
        version_stack: None,
        original_asset_id: None,
    }
}

#[derive(Default)]
pub(crate) struct MockState {
    pub projects: Vec<Project>,
    /// Results keyed by query; folders created at runtime register here
    /// under their own name so later lookups find them.
    pub search: HashMap<String, Vec<Asset>>,
    pub details: HashMap<String, AssetDetail>,
    /// File name -> remaining transient upload failures.
    pub upload_failures: HashMap<String, u32>,
    /// Statuses returned by successive link calls; empty = success.
    pub link_errors: VecDeque<u16>,
    /// Remaining transient search failures (any query).
    pub search_failures: u32,
    pub create_project_error: Option<u16>,
    /// Folder names whose creation fails hard.
    pub create_folder_errors: Vec<String>,
    pub calls: Vec<String>,
    next_id: u32,
}

#[derive(Default)]
pub(crate) struct MockService {
    pub state: Mutex<MockState>,
}

impl MockService {
    pub fn new() -> Self {
        Self::default()
    }

    /// A mock seeded with one active project `name` (id `p1`, root `root-1`).
    pub fn with_project(name: &str) -> Self {
        let mock = Self::new();
        mock.state
            .lock()
            .unwrap()
            .projects
            .push(project("p1", "root-1", name));
        mock
    }

    pub fn add_search_result(&self, query: &str, asset: Asset) {
        self.state
            .lock()
            .unwrap()
            .search
            .entry(query.into())
            .or_default()
            .push(asset);
    }

    pub fn add_detail(&self, record: AssetDetail) {
        self.state
            .lock()
            .unwrap()
            .details
            .insert(record.id.clone(), record);
    }

    pub fn fail_uploads(&self, file_name: &str, times: u32) {
        self.state
            .lock()
            .unwrap()
            .upload_failures
            .insert(file_name.into(), times);
    }

    pub fn fail_searches(&self, times: u32) {
        self.state.lock().unwrap().search_failures = times;
    }

    pub fn queue_link_error(&self, status: u16) {
        self.state.lock().unwrap().link_errors.push_back(status);
    }

    pub fn fail_create_project(&self, status: u16) {
        self.state.lock().unwrap().create_project_error = Some(status);
    }

    pub fn fail_create_folder(&self, name: &str) {
        self.state
            .lock()
            .unwrap()
            .create_folder_errors
            .push(name.into());
    }

    pub fn calls(&self) -> Vec<String> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn count_calls(&self, prefix: &str) -> usize {
        self.calls().iter().filter(|c| c.starts_with(prefix)).count()
    }
}

impl AssetService for MockService {
    fn list_projects(&self) -> ServiceFuture<'_, Vec<Project>> {
        let result = {
            let mut s = self.state.lock().unwrap();
            s.calls.push("list_projects".into());
            Ok(s.projects.clone())
        };
        Box::pin(async move { result })
    }

    fn create_project<'a>(&'a self, name: &'a str) -> ServiceFuture<'a, Project> {
        let result = {
            let mut s = self.state.lock().unwrap();
            s.calls.push(format!("create_project:{name}"));
            match s.create_project_error {
                Some(status) => Err(api_error(status)),
                None => Ok(project("p-new", "root-new", name)),
            }
        };
        Box::pin(async move { result })
    }

    fn search_assets<'a>(
        &'a self,
        _project_id: &'a str,
        query: &'a str,
        kind: Option<AssetKind>,
    ) -> ServiceFuture<'a, Vec<Asset>> {
        let result = {
            let mut s = self.state.lock().unwrap();
            let kind_tag = kind.map(|k| k.as_query()).unwrap_or("any");
            s.calls.push(format!("search:{query}:{kind_tag}"));
            if s.search_failures > 0 {
                s.search_failures -= 1;
                Err(api_error(503))
            } else {
                let mut results = s.search.get(query).cloned().unwrap_or_default();
                if let Some(kind) = kind {
                    results.retain(|a| a.kind == kind);
                }
                Ok(results)
            }
        };
        Box::pin(async move { result })
    }

    fn asset_detail<'a>(&'a self, asset_id: &'a str) -> ServiceFuture<'a, AssetDetail> {
        let result = {
            let mut s = self.state.lock().unwrap();
            s.calls.push(format!("detail:{asset_id}"));
            s.details.get(asset_id).cloned().ok_or_else(|| api_error(404))
        };
        Box::pin(async move { result })
    }

    fn create_folder<'a>(
        &'a self,
        parent_id: &'a str,
        name: &'a str,
    ) -> ServiceFuture<'a, String> {
        let result = {
            let mut s = self.state.lock().unwrap();
            s.calls.push(format!("create_folder:{name}"));
            if s.create_folder_errors.iter().any(|n| n == name) {
                Err(api_error(403))
            } else {
                s.next_id += 1;
                let id = format!("folder-{}", s.next_id);
                let folder = Asset {
                    id: id.clone(),
                    name: name.into(),
                    kind: AssetKind::Folder,
                    parent_id: Some(parent_id.into()),
                    label: None,
                };
                s.search.entry(name.into()).or_default().push(folder);
                Ok(id)
            }
        };
        Box::pin(async move { result })
    }

    fn upload<'a>(
        &'a self,
        parent_id: &'a str,
        path: &'a Path,
        on_progress: ProgressFn<'a>,
    ) -> ServiceFuture<'a, Asset> {
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let result = {
            let mut s = self.state.lock().unwrap();
            s.calls.push(format!("upload:{parent_id}:{file_name}"));
            let remaining = s.upload_failures.get(&file_name).copied().unwrap_or(0);
            if remaining > 0 {
                s.upload_failures.insert(file_name.clone(), remaining - 1);
                Err(api_error(503))
            } else {
                s.next_id += 1;
                Ok(Asset {
                    id: format!("new-{}", s.next_id),
                    name: file_name,
                    kind: AssetKind::File,
                    parent_id: Some(parent_id.into()),
                    label: None,
                })
            }
        };
        if result.is_ok() {
            on_progress(UploadProgress::Preparing);
            on_progress(UploadProgress::Percent(100));
            on_progress(UploadProgress::Done);
        }
        Box::pin(async move { result })
    }

    fn link_version<'a>(
        &'a self,
        asset_id: &'a str,
        next_asset_id: &'a str,
    ) -> ServiceFuture<'a, ()> {
        let result = {
            let mut s = self.state.lock().unwrap();
            s.calls.push(format!("link:{asset_id}:{next_asset_id}"));
            match s.link_errors.pop_front() {
                Some(status) => Err(api_error(status)),
                None => Ok(()),
            }
        };
        Box::pin(async move { result })
    }
}
