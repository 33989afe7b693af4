// Response bodies of the management and upload APIs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A file or folder in the media library
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileObject {
    #[serde(default)]
    pub file_id: String,
    /// `file` or `folder`
    #[serde(rename = "type", default)]
    pub kind: String,
    pub name: String,
    #[serde(default)]
    pub file_path: String,
    #[serde(default)]
    pub tags: Option<Vec<String>>,
    #[serde(default)]
    pub is_private_file: bool,
    #[serde(default)]
    pub custom_coordinates: Option<String>,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub thumbnail: Option<String>,
    /// `image` or `non-image`
    #[serde(default)]
    pub file_type: String,
    #[serde(default)]
    pub mime: Option<String>,
    #[serde(default)]
    pub width: Option<u32>,
    #[serde(default)]
    pub height: Option<u32>,
    #[serde(default)]
    pub size: Option<u64>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl FileObject {
    pub fn is_folder(&self) -> bool {
        self.kind == "folder"
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    pub file_id: String,
    pub name: String,
    pub url: String,
    #[serde(default)]
    pub thumbnail_url: Option<String>,
    #[serde(default)]
    pub file_path: String,
    #[serde(default)]
    pub height: Option<u32>,
    #[serde(default)]
    pub width: Option<u32>,
    #[serde(default)]
    pub size: Option<u64>,
    #[serde(default)]
    pub file_type: Option<String>,
    #[serde(default)]
    pub tags: Option<Vec<String>>,
    #[serde(default)]
    pub is_private_file: Option<bool>,
    #[serde(default)]
    pub custom_coordinates: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PurgeCacheResponse {
    pub request_id: String,
}

/// `Pending` or `Completed`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PurgeCacheStatus {
    pub status: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkDeleteResponse {
    pub successfully_deleted_file_ids: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TagsResponse {
    pub successfully_updated_file_ids: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkJobResponse {
    pub job_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkJobStatus {
    pub job_id: String,
    /// `COPY_FOLDER` or `MOVE_FOLDER`
    #[serde(rename = "type")]
    pub kind: String,
    /// `Pending` or `Completed`
    pub status: String,
}
