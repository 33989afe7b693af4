// ImageKit client - entry point tying configuration, URL building, signing and
// the remote API operations together.

use std::fmt;
use std::sync::Arc;

use base64::{engine::general_purpose::STANDARD, Engine};
use serde::de::DeserializeOwned;
use serde_json::Value as JsonValue;
use tracing::{debug, warn};

use crate::config::ClientOptions;
use crate::constants::{DEFAULT_API_BASE_URL, DEFAULT_UPLOAD_URL};
use crate::error::{ImageKitError, Result};
use crate::invocation::Pending;
use crate::manage::{
    self, BulkDeleteResponse, BulkJobResponse, BulkJobStatus, FileObject, ListFilesOptions,
    PurgeCacheResponse, PurgeCacheStatus, TagsResponse, UpdateFileDetails, UploadResponse,
};
use crate::phash;
use crate::signature::{self, AuthenticationParameters};
use crate::transport::{ApiRequest, ApiResponse, ReqwestTransport, ResponseMeta, Transport};
use crate::upload::{self, UploadOptions};
use crate::url_builder::{self, UrlOptions};

struct Inner {
    options: ClientOptions,
    transport: Arc<dyn Transport>,
    api_base_url: String,
    upload_url: String,
}

/// Client for one ImageKit account
///
/// Cheap to clone; clones share options and transport.
#[derive(Clone)]
pub struct ImageKit {
    inner: Arc<Inner>,
}

impl fmt::Debug for ImageKit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImageKit")
            .field("options", &self.inner.options)
            .field("api_base_url", &self.inner.api_base_url)
            .field("upload_url", &self.inner.upload_url)
            .finish_non_exhaustive()
    }
}

impl ImageKit {
    /// Create a client using the bundled `reqwest` transport
    ///
    /// # Errors
    ///
    /// `ImageKitError::Configuration` naming the first missing mandatory
    /// option.
    pub fn new(options: ClientOptions) -> Result<Self> {
        options.validate()?;
        let transport = ReqwestTransport::new()?;
        Self::with_transport(options, Arc::new(transport))
    }

    pub fn with_transport(options: ClientOptions, transport: Arc<dyn Transport>) -> Result<Self> {
        options.validate()?;
        Ok(Self {
            inner: Arc::new(Inner {
                options,
                transport,
                api_base_url: DEFAULT_API_BASE_URL.to_string(),
                upload_url: DEFAULT_UPLOAD_URL.to_string(),
            }),
        })
    }

    /// Point the management and upload APIs at other hosts
    pub fn with_api_urls(self, api_base_url: impl Into<String>, upload_url: impl Into<String>) -> Self {
        Self {
            inner: Arc::new(Inner {
                options: self.inner.options.clone(),
                transport: self.inner.transport.clone(),
                api_base_url: api_base_url.into(),
                upload_url: upload_url.into(),
            }),
        }
    }

    pub fn options(&self) -> &ClientOptions {
        &self.inner.options
    }

    // =========================================================================
    // Synchronous helpers
    // =========================================================================

    pub fn url(&self, options: &UrlOptions) -> Result<String> {
        url_builder::build_url(options, &self.inner.options)
    }

    pub fn get_authentication_parameters(
        &self,
        token: Option<&str>,
        expire: Option<i64>,
    ) -> Result<AuthenticationParameters> {
        signature::get_authentication_parameters(token, expire, &self.inner.options.private_key)
    }

    pub fn phash_distance(&self, first: &str, second: &str) -> Result<u32> {
        phash::phash_distance(first, second)
    }

    // =========================================================================
    // Upload
    // =========================================================================

    pub fn upload(&self, options: UploadOptions) -> Pending<UploadResponse> {
        self.call(upload::upload_request(&self.inner.upload_url, &options))
    }

    // =========================================================================
    // Files
    // =========================================================================

    pub fn list_files(&self, options: ListFilesOptions) -> Pending<Vec<FileObject>> {
        self.call(manage::list_files(&self.inner.api_base_url, &options))
    }

    pub fn get_file_details(&self, file_id: &str) -> Pending<FileObject> {
        self.call(manage::get_file_details(&self.inner.api_base_url, file_id))
    }

    /// Like [`get_file_details`](Self::get_file_details), also resolving the
    /// response status and headers
    pub fn get_file_details_with_meta(&self, file_id: &str) -> Pending<(FileObject, ResponseMeta)> {
        self.dispatch(manage::get_file_details(&self.inner.api_base_url, file_id))
            .and_then(|response| Ok((decode(response.body)?, response.meta)))
    }

    /// Embedded image metadata (EXIF, dimensions, pHash) as returned by the service
    pub fn get_file_metadata(&self, file_id: &str) -> Pending<JsonValue> {
        self.call(manage::get_file_metadata(&self.inner.api_base_url, file_id))
    }

    pub fn update_file_details(
        &self,
        file_id: &str,
        update: UpdateFileDetails,
    ) -> Pending<FileObject> {
        self.call(manage::update_file_details(
            &self.inner.api_base_url,
            file_id,
            &update,
        ))
    }

    pub fn bulk_add_tags(&self, file_ids: Vec<String>, tags: Vec<String>) -> Pending<TagsResponse> {
        self.call(manage::bulk_add_tags(
            &self.inner.api_base_url,
            &file_ids,
            &tags,
        ))
    }

    pub fn bulk_remove_tags(
        &self,
        file_ids: Vec<String>,
        tags: Vec<String>,
    ) -> Pending<TagsResponse> {
        self.call(manage::bulk_remove_tags(
            &self.inner.api_base_url,
            &file_ids,
            &tags,
        ))
    }

    pub fn delete_file(&self, file_id: &str) -> Pending<()> {
        self.call_unit(manage::delete_file(&self.inner.api_base_url, file_id))
    }

    pub fn bulk_delete_files(&self, file_ids: Vec<String>) -> Pending<BulkDeleteResponse> {
        self.call(manage::bulk_delete_files(&self.inner.api_base_url, &file_ids))
    }

    pub fn copy_file(&self, source_file_path: &str, destination_path: &str) -> Pending<()> {
        self.call_unit(manage::copy_file(
            &self.inner.api_base_url,
            source_file_path,
            destination_path,
        ))
    }

    pub fn move_file(&self, source_file_path: &str, destination_path: &str) -> Pending<()> {
        self.call_unit(manage::move_file(
            &self.inner.api_base_url,
            source_file_path,
            destination_path,
        ))
    }

    // =========================================================================
    // Cache
    // =========================================================================

    pub fn purge_cache(&self, url: &str) -> Pending<PurgeCacheResponse> {
        self.call(manage::purge_cache(&self.inner.api_base_url, url))
    }

    pub fn get_purge_cache_status(&self, request_id: &str) -> Pending<PurgeCacheStatus> {
        self.call(manage::get_purge_cache_status(
            &self.inner.api_base_url,
            request_id,
        ))
    }

    // =========================================================================
    // Folders
    // =========================================================================

    pub fn create_folder(&self, folder_name: &str, parent_folder_path: &str) -> Pending<()> {
        self.call_unit(manage::create_folder(
            &self.inner.api_base_url,
            folder_name,
            parent_folder_path,
        ))
    }

    pub fn delete_folder(&self, folder_path: &str) -> Pending<()> {
        self.call_unit(manage::delete_folder(&self.inner.api_base_url, folder_path))
    }

    pub fn copy_folder(
        &self,
        source_folder_path: &str,
        destination_path: &str,
    ) -> Pending<BulkJobResponse> {
        self.call(manage::copy_folder(
            &self.inner.api_base_url,
            source_folder_path,
            destination_path,
        ))
    }

    pub fn move_folder(
        &self,
        source_folder_path: &str,
        destination_path: &str,
    ) -> Pending<BulkJobResponse> {
        self.call(manage::move_folder(
            &self.inner.api_base_url,
            source_folder_path,
            destination_path,
        ))
    }

    pub fn get_bulk_job_status(&self, job_id: &str) -> Pending<BulkJobStatus> {
        self.call(manage::get_bulk_job_status(&self.inner.api_base_url, job_id))
    }

    // =========================================================================
    // Dispatch
    // =========================================================================

    fn call<T>(&self, request: Result<ApiRequest>) -> Pending<T>
    where
        T: DeserializeOwned + Send + 'static,
    {
        self.dispatch(request)
            .and_then(|response| decode(response.body))
    }

    fn call_unit(&self, request: Result<ApiRequest>) -> Pending<()> {
        self.dispatch(request).and_then(|_| Ok(()))
    }

    /// Argument errors are held back until the operation is driven so they
    /// reach the caller through the same channel as remote failures.
    fn dispatch(&self, request: Result<ApiRequest>) -> Pending<ApiResponse> {
        let inner = self.inner.clone();
        Pending::new(async move {
            let mut request = request?;
            request.headers.push((
                "Authorization".to_string(),
                basic_auth(&inner.options.private_key),
            ));

            debug!(method = %request.method, url = %request.url, "Dispatching API request");
            let response = inner.transport.perform(request).await?;
            check_status(response)
        })
    }
}

fn basic_auth(private_key: &str) -> String {
    format!("Basic {}", STANDARD.encode(format!("{}:", private_key)))
}

fn check_status(response: ApiResponse) -> Result<ApiResponse> {
    if response.meta.is_success() {
        return Ok(response);
    }

    let status = response.meta.status;
    let message = response
        .body
        .get("message")
        .and_then(JsonValue::as_str)
        .map(str::to_string)
        .or_else(|| response.body.as_str().map(str::to_string))
        .unwrap_or_else(|| format!("Request failed with status {}", status));
    let help = response
        .body
        .get("help")
        .and_then(JsonValue::as_str)
        .map(str::to_string);

    warn!(status = status, message = %message, "API request failed");
    Err(ImageKitError::Remote {
        status,
        message,
        help,
    })
}

fn decode<T: DeserializeOwned>(body: JsonValue) -> Result<T> {
    Ok(serde_json::from_value(body)?)
}
