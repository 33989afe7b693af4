//! Upload requests
//!
//! An upload is a multipart form posted to the upload endpoint. The file may
//! be raw bytes, a base64 string or a remote URL the service fetches itself.

use crate::error::{ImageKitError, Result};
use crate::transport::{ApiRequest, FormField, Method};

/// File content of an upload
#[derive(Clone, PartialEq, Eq)]
pub enum UploadFile {
    Bytes(Vec<u8>),
    Base64(String),
    Url(String),
}

impl UploadFile {
    fn is_empty(&self) -> bool {
        match self {
            UploadFile::Bytes(bytes) => bytes.is_empty(),
            UploadFile::Base64(text) | UploadFile::Url(text) => text.trim().is_empty(),
        }
    }
}

impl std::fmt::Debug for UploadFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UploadFile::Bytes(bytes) => write!(f, "Bytes({} bytes)", bytes.len()),
            UploadFile::Base64(text) => write!(f, "Base64({} chars)", text.len()),
            UploadFile::Url(url) => f.debug_tuple("Url").field(url).finish(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadOptions {
    pub file: UploadFile,
    pub file_name: String,
    pub use_unique_file_name: Option<bool>,
    pub tags: Vec<String>,
    pub folder: Option<String>,
    pub is_private_file: Option<bool>,
    pub custom_coordinates: Option<String>,
    /// Extra fields to include in the response, e.g. `tags`, `customCoordinates`
    pub response_fields: Vec<String>,
}

impl UploadOptions {
    pub fn new(file: UploadFile, file_name: impl Into<String>) -> Self {
        Self {
            file,
            file_name: file_name.into(),
            use_unique_file_name: None,
            tags: Vec::new(),
            folder: None,
            is_private_file: None,
            custom_coordinates: None,
            response_fields: Vec::new(),
        }
    }

    pub fn with_folder(mut self, folder: impl Into<String>) -> Self {
        self.folder = Some(folder.into());
        self
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    pub fn private(mut self, is_private: bool) -> Self {
        self.is_private_file = Some(is_private);
        self
    }

    pub fn unique_file_name(mut self, unique: bool) -> Self {
        self.use_unique_file_name = Some(unique);
        self
    }
}

/// Build the multipart upload request
///
/// # Errors
///
/// `ImageKitError::Usage` when the file content or the file name is missing.
pub fn upload_request(upload_url: &str, options: &UploadOptions) -> Result<ApiRequest> {
    if options.file.is_empty() {
        return Err(ImageKitError::usage("Missing file parameter for upload"));
    }
    if options.file_name.trim().is_empty() {
        return Err(ImageKitError::usage("Missing fileName parameter for upload"));
    }

    let mut fields = vec![match &options.file {
        UploadFile::Bytes(bytes) => FormField::File {
            name: "file".to_string(),
            file_name: options.file_name.clone(),
            bytes: bytes.clone(),
        },
        UploadFile::Base64(text) | UploadFile::Url(text) => FormField::text("file", text.as_str()),
    }];
    fields.push(FormField::text("fileName", options.file_name.as_str()));

    if let Some(unique) = options.use_unique_file_name {
        fields.push(FormField::text("useUniqueFileName", unique.to_string()));
    }
    if !options.tags.is_empty() {
        fields.push(FormField::text("tags", options.tags.join(",")));
    }
    if let Some(folder) = &options.folder {
        fields.push(FormField::text("folder", folder.as_str()));
    }
    if let Some(private) = options.is_private_file {
        fields.push(FormField::text("isPrivateFile", private.to_string()));
    }
    if let Some(coordinates) = &options.custom_coordinates {
        fields.push(FormField::text("customCoordinates", coordinates.as_str()));
    }
    if !options.response_fields.is_empty() {
        fields.push(FormField::text(
            "responseFields",
            options.response_fields.join(","),
        ));
    }

    Ok(ApiRequest::new(Method::Post, upload_url).with_form(fields))
}
