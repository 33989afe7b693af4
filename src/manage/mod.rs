//! Media library management requests
//!
//! Each function validates its arguments and maps one operation onto an
//! [`ApiRequest`] against the management API base URL. Nothing here talks to
//! the network; the client hands the requests to its transport.

pub mod types;

use serde::Serialize;
use serde_json::json;

use crate::error::{ImageKitError, Result};
use crate::transport::{ApiRequest, Method};

pub use types::{
    BulkDeleteResponse, BulkJobResponse, BulkJobStatus, FileObject, PurgeCacheResponse,
    PurgeCacheStatus, TagsResponse, UploadResponse,
};

/// Filters for the list and search API
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListFilesOptions {
    pub path: Option<String>,
    /// `all`, `image` or `non-image`
    pub file_type: Option<String>,
    pub tags: Vec<String>,
    pub include_folder: Option<bool>,
    pub name: Option<String>,
    pub limit: Option<u32>,
    pub skip: Option<u32>,
    /// Lucene-like query, e.g. `createdAt > "7d"`
    pub search_query: Option<String>,
    pub sort: Option<String>,
    /// `file`, `file-version`, `folder` or `all`
    pub kind: Option<String>,
}

impl ListFilesOptions {
    fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(path) = &self.path {
            pairs.push(("path", path.clone()));
        }
        if let Some(file_type) = &self.file_type {
            pairs.push(("fileType", file_type.clone()));
        }
        if !self.tags.is_empty() {
            pairs.push(("tags", self.tags.join(",")));
        }
        if let Some(include_folder) = self.include_folder {
            pairs.push(("includeFolder", include_folder.to_string()));
        }
        if let Some(name) = &self.name {
            pairs.push(("name", name.clone()));
        }
        if let Some(limit) = self.limit {
            pairs.push(("limit", limit.to_string()));
        }
        if let Some(skip) = self.skip {
            pairs.push(("skip", skip.to_string()));
        }
        if let Some(query) = &self.search_query {
            pairs.push(("searchQuery", query.clone()));
        }
        if let Some(sort) = &self.sort {
            pairs.push(("sort", sort.clone()));
        }
        if let Some(kind) = &self.kind {
            pairs.push(("type", kind.clone()));
        }
        pairs
    }
}

/// Mutable file attributes
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateFileDetails {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    /// `x,y,width,height`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_coordinates: Option<String>,
}

impl UpdateFileDetails {
    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = Some(tags.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_custom_coordinates(mut self, coordinates: impl Into<String>) -> Self {
        self.custom_coordinates = Some(coordinates.into());
        self
    }
}

fn require<'a>(value: &'a str, name: &str) -> Result<&'a str> {
    if value.trim().is_empty() {
        return Err(ImageKitError::usage(format!("Missing {} parameter", name)));
    }
    Ok(value)
}

fn require_list(values: &[String], name: &str) -> Result<()> {
    if values.is_empty() || values.iter().any(|v| v.trim().is_empty()) {
        return Err(ImageKitError::usage(format!(
            "{} must be a non-empty list of non-empty strings",
            name
        )));
    }
    Ok(())
}

fn endpoint(base: &str, path: &str) -> String {
    format!("{}{}", base.trim_end_matches('/'), path)
}

fn segment(value: &str) -> String {
    urlencoding::encode(value).into_owned()
}

pub fn list_files(base: &str, options: &ListFilesOptions) -> Result<ApiRequest> {
    let url = url::Url::parse_with_params(&endpoint(base, "/files"), options.query_pairs())
        .map_err(|e| ImageKitError::configuration(format!("Invalid API base URL: {}", e)))?;
    Ok(ApiRequest::new(Method::Get, url.as_str().trim_end_matches('?')))
}

pub fn get_file_details(base: &str, file_id: &str) -> Result<ApiRequest> {
    let file_id = require(file_id, "fileId")?;
    Ok(ApiRequest::new(
        Method::Get,
        endpoint(base, &format!("/files/{}/details", segment(file_id))),
    ))
}

pub fn get_file_metadata(base: &str, file_id: &str) -> Result<ApiRequest> {
    let file_id = require(file_id, "fileId")?;
    Ok(ApiRequest::new(
        Method::Get,
        endpoint(base, &format!("/files/{}/metadata", segment(file_id))),
    ))
}

pub fn update_file_details(
    base: &str,
    file_id: &str,
    update: &UpdateFileDetails,
) -> Result<ApiRequest> {
    let file_id = require(file_id, "fileId")?;
    Ok(ApiRequest::new(
        Method::Patch,
        endpoint(base, &format!("/files/{}/details", segment(file_id))),
    )
    .with_json(serde_json::to_value(update)?))
}

pub fn bulk_add_tags(base: &str, file_ids: &[String], tags: &[String]) -> Result<ApiRequest> {
    tags_request(base, "/files/addTags", file_ids, tags)
}

pub fn bulk_remove_tags(base: &str, file_ids: &[String], tags: &[String]) -> Result<ApiRequest> {
    tags_request(base, "/files/removeTags", file_ids, tags)
}

fn tags_request(base: &str, path: &str, file_ids: &[String], tags: &[String]) -> Result<ApiRequest> {
    require_list(file_ids, "fileIds")?;
    require_list(tags, "tags")?;
    Ok(ApiRequest::new(Method::Post, endpoint(base, path))
        .with_json(json!({ "fileIds": file_ids, "tags": tags })))
}

pub fn delete_file(base: &str, file_id: &str) -> Result<ApiRequest> {
    let file_id = require(file_id, "fileId")?;
    Ok(ApiRequest::new(
        Method::Delete,
        endpoint(base, &format!("/files/{}", segment(file_id))),
    ))
}

pub fn purge_cache(base: &str, url: &str) -> Result<ApiRequest> {
    let url = require(url, "url")?;
    Ok(ApiRequest::new(Method::Post, endpoint(base, "/files/purge"))
        .with_json(json!({ "url": url })))
}

pub fn get_purge_cache_status(base: &str, request_id: &str) -> Result<ApiRequest> {
    let request_id = require(request_id, "requestId")?;
    Ok(ApiRequest::new(
        Method::Get,
        endpoint(base, &format!("/files/purge/{}", segment(request_id))),
    ))
}

pub fn bulk_delete_files(base: &str, file_ids: &[String]) -> Result<ApiRequest> {
    require_list(file_ids, "fileIds")?;
    Ok(
        ApiRequest::new(Method::Post, endpoint(base, "/files/batch/deleteByFileIds"))
            .with_json(json!({ "fileIds": file_ids })),
    )
}

pub fn copy_file(base: &str, source_file_path: &str, destination_path: &str) -> Result<ApiRequest> {
    transfer_request(base, "/files/copy", "sourceFilePath", source_file_path, destination_path)
}

pub fn move_file(base: &str, source_file_path: &str, destination_path: &str) -> Result<ApiRequest> {
    transfer_request(base, "/files/move", "sourceFilePath", source_file_path, destination_path)
}

pub fn copy_folder(
    base: &str,
    source_folder_path: &str,
    destination_path: &str,
) -> Result<ApiRequest> {
    transfer_request(
        base,
        "/bulkJobs/copyFolder",
        "sourceFolderPath",
        source_folder_path,
        destination_path,
    )
}

pub fn move_folder(
    base: &str,
    source_folder_path: &str,
    destination_path: &str,
) -> Result<ApiRequest> {
    transfer_request(
        base,
        "/bulkJobs/moveFolder",
        "sourceFolderPath",
        source_folder_path,
        destination_path,
    )
}

fn transfer_request(
    base: &str,
    path: &str,
    source_field: &str,
    source: &str,
    destination: &str,
) -> Result<ApiRequest> {
    let source = require(source, source_field)?;
    let destination = require(destination, "destinationPath")?;
    let mut body = serde_json::Map::new();
    body.insert(source_field.to_string(), json!(source));
    body.insert("destinationPath".to_string(), json!(destination));
    Ok(ApiRequest::new(Method::Post, endpoint(base, path)).with_json(body.into()))
}

/// An empty `parent_folder_path` creates the folder at the library root
pub fn create_folder(base: &str, folder_name: &str, parent_folder_path: &str) -> Result<ApiRequest> {
    let folder_name = require(folder_name, "folderName")?;
    let parent = if parent_folder_path.is_empty() {
        "/"
    } else {
        parent_folder_path
    };
    Ok(ApiRequest::new(Method::Post, endpoint(base, "/folder/"))
        .with_json(json!({ "folderName": folder_name, "parentFolderPath": parent })))
}

pub fn delete_folder(base: &str, folder_path: &str) -> Result<ApiRequest> {
    let folder_path = require(folder_path, "folderPath")?;
    Ok(ApiRequest::new(Method::Delete, endpoint(base, "/folder/"))
        .with_json(json!({ "folderPath": folder_path })))
}

pub fn get_bulk_job_status(base: &str, job_id: &str) -> Result<ApiRequest> {
    let job_id = require(job_id, "jobId")?;
    Ok(ApiRequest::new(
        Method::Get,
        endpoint(base, &format!("/bulkJobs/{}", segment(job_id))),
    ))
}
