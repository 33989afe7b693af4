// Client operation tests against an in-memory transport

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::{json, Value};
use tokio::sync::oneshot;

use imagekit::manage::{ListFilesOptions, UpdateFileDetails};
use imagekit::transport::{ApiRequest, ApiResponse, Method, RequestBody, Transport};
use imagekit::upload::{UploadFile, UploadOptions};
use imagekit::{ClientOptions, ImageKit, ImageKitError, Result};

/// Records every request and answers with queued responses (200 `{}` once empty)
#[derive(Default)]
struct RecordingTransport {
    requests: Mutex<Vec<ApiRequest>>,
    responses: Mutex<VecDeque<ApiResponse>>,
}

impl RecordingTransport {
    fn respond(&self, status: u16, body: Value) {
        self.responses
            .lock()
            .unwrap()
            .push_back(ApiResponse::new(status, body));
    }

    fn last(&self) -> ApiRequest {
        self.requests
            .lock()
            .unwrap()
            .last()
            .cloned()
            .expect("no request recorded")
    }

    fn count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl Transport for RecordingTransport {
    async fn perform(&self, request: ApiRequest) -> Result<ApiResponse> {
        self.requests.lock().unwrap().push(request);
        Ok(self
            .responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| ApiResponse::new(200, json!({}))))
    }
}

fn setup() -> (ImageKit, Arc<RecordingTransport>) {
    let transport = Arc::new(RecordingTransport::default());
    let options = ClientOptions::new(
        "public_key_test",
        "private_key_test",
        "https://ik.imagekit.io/test_url_endpoint",
    );
    let client = ImageKit::with_transport(options, transport.clone()).unwrap();
    (client, transport)
}

fn file_json(id: &str) -> Value {
    json!({
        "type": "file",
        "fileId": id,
        "name": "a.jpg",
        "filePath": "/a.jpg",
        "url": "https://ik.imagekit.io/test_url_endpoint/a.jpg",
        "fileType": "image"
    })
}

fn ids(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

#[tokio::test]
async fn test_get_file_details() {
    let (client, transport) = setup();
    transport.respond(200, file_json("f1"));

    let file = client.get_file_details("f1").await.unwrap();
    assert_eq!(file.file_id, "f1");

    let request = transport.last();
    assert_eq!(request.method, Method::Get);
    assert_eq!(request.url, "https://api.imagekit.io/v1/files/f1/details");
    assert!(request.header("Authorization").unwrap().starts_with("Basic "));
}

#[tokio::test]
async fn test_get_file_details_with_meta_resolves_tuple() {
    let (client, transport) = setup();
    transport.respond(200, file_json("f1"));

    let (file, meta) = client.get_file_details_with_meta("f1").await.unwrap();
    assert_eq!(file.name, "a.jpg");
    assert_eq!(meta.status, 200);
}

#[tokio::test]
async fn test_list_files() {
    let (client, transport) = setup();
    transport.respond(200, json!([file_json("f1"), file_json("f2")]));

    let options = ListFilesOptions {
        path: Some("/products".to_string()),
        skip: Some(10),
        ..Default::default()
    };
    let files = client.list_files(options).await.unwrap();
    assert_eq!(files.len(), 2);
    assert_eq!(
        transport.last().url,
        "https://api.imagekit.io/v1/files?path=%2Fproducts&skip=10"
    );
}

#[tokio::test]
async fn test_remote_error_rejects() {
    let (client, transport) = setup();
    transport.respond(
        404,
        json!({ "message": "The requested file does not exist.", "help": "" }),
    );

    let err = client.get_file_metadata("missing").await.unwrap_err();
    assert_eq!(err.status(), Some(404));
    assert!(err.to_string().contains("does not exist"));
}

#[tokio::test]
async fn test_missing_argument_is_async_usage_error() {
    let (client, transport) = setup();

    let pending = client.get_purge_cache_status("");
    let err = pending.await.unwrap_err();
    assert!(matches!(err, ImageKitError::Usage(_)));
    assert_eq!(transport.count(), 0);

    let err = client.bulk_add_tags(Vec::new(), ids(&["t"])).await.unwrap_err();
    assert!(matches!(err, ImageKitError::Usage(_)));
    assert_eq!(transport.count(), 0);
}

#[tokio::test]
async fn test_callback_mode() {
    let (client, transport) = setup();
    transport.respond(200, json!({ "requestId": "req-1" }));

    let (tx, rx) = oneshot::channel();
    client
        .purge_cache("https://ik.imagekit.io/test_url_endpoint/a.jpg")
        .on_complete(move |result| {
            let _ = tx.send(result);
        })
        .unwrap();

    let response = rx.await.unwrap().unwrap();
    assert_eq!(response.request_id, "req-1");
    assert_eq!(
        transport.last().body,
        RequestBody::Json(json!({ "url": "https://ik.imagekit.io/test_url_endpoint/a.jpg" }))
    );
}

#[tokio::test]
async fn test_callback_mode_delivers_errors() {
    let (client, transport) = setup();
    transport.respond(500, json!({ "message": "Internal error" }));

    let (tx, rx) = oneshot::channel();
    client
        .delete_file("f1")
        .on_complete(move |result| {
            let _ = tx.send(result);
        })
        .unwrap();

    let err = rx.await.unwrap().unwrap_err();
    assert_eq!(err.status(), Some(500));
}

#[test]
fn test_callback_mode_without_runtime() {
    let (client, transport) = setup();
    let result = client.delete_file("f1").on_complete(|_| {
        panic!("callback must not run");
    });
    assert!(matches!(result, Err(ImageKitError::Usage(_))));
    assert_eq!(transport.count(), 0);
}

#[tokio::test]
async fn test_update_file_details() {
    let (client, transport) = setup();
    transport.respond(200, file_json("f1"));

    let update = UpdateFileDetails::default().with_custom_coordinates("10,10,100,100");
    client.update_file_details("f1", update).await.unwrap();

    let request = transport.last();
    assert_eq!(request.method, Method::Patch);
    assert_eq!(
        request.body,
        RequestBody::Json(json!({ "customCoordinates": "10,10,100,100" }))
    );
}

#[tokio::test]
async fn test_bulk_operations() {
    let (client, transport) = setup();
    transport.respond(200, json!({ "successfullyDeletedFileIds": ["f1", "f2"] }));
    transport.respond(200, json!({ "successfullyUpdatedFileIds": ["f1"] }));

    let deleted = client.bulk_delete_files(ids(&["f1", "f2"])).await.unwrap();
    assert_eq!(deleted.successfully_deleted_file_ids, ids(&["f1", "f2"]));
    assert_eq!(
        transport.last().url,
        "https://api.imagekit.io/v1/files/batch/deleteByFileIds"
    );

    let tagged = client
        .bulk_add_tags(ids(&["f1"]), ids(&["summer"]))
        .await
        .unwrap();
    assert_eq!(tagged.successfully_updated_file_ids, ids(&["f1"]));
    assert_eq!(transport.last().url, "https://api.imagekit.io/v1/files/addTags");
}

#[tokio::test]
async fn test_file_and_folder_moves() {
    let (client, transport) = setup();

    client.copy_file("/a.jpg", "/backup/").await.unwrap();
    assert_eq!(transport.last().url, "https://api.imagekit.io/v1/files/copy");

    client.move_file("/a.jpg", "/archive/").await.unwrap();
    assert_eq!(transport.last().url, "https://api.imagekit.io/v1/files/move");

    client.create_folder("products", "/").await.unwrap();
    assert_eq!(transport.last().method, Method::Post);

    client.delete_folder("/products").await.unwrap();
    let request = transport.last();
    assert_eq!(request.method, Method::Delete);
    assert_eq!(request.url, "https://api.imagekit.io/v1/folder/");
}

#[tokio::test]
async fn test_bulk_jobs() {
    let (client, transport) = setup();
    transport.respond(200, json!({ "jobId": "job-1" }));
    transport.respond(
        200,
        json!({ "jobId": "job-1", "type": "MOVE_FOLDER", "status": "Pending" }),
    );

    let job = client.move_folder("/a", "/b").await.unwrap();
    assert_eq!(job.job_id, "job-1");
    assert_eq!(transport.last().url, "https://api.imagekit.io/v1/bulkJobs/moveFolder");

    let status = client.get_bulk_job_status(&job.job_id).await.unwrap();
    assert_eq!(status.status, "Pending");
    assert_eq!(transport.last().url, "https://api.imagekit.io/v1/bulkJobs/job-1");
}

#[tokio::test]
async fn test_upload() {
    let (client, transport) = setup();
    transport.respond(
        200,
        json!({
            "fileId": "up-1",
            "name": "logo.png",
            "url": "https://ik.imagekit.io/test_url_endpoint/logo.png",
            "filePath": "/logo.png"
        }),
    );

    let options = UploadOptions::new(UploadFile::Bytes(b"png".to_vec()), "logo.png");
    let uploaded = client.upload(options).await.unwrap();
    assert_eq!(uploaded.file_id, "up-1");

    let request = transport.last();
    assert_eq!(request.url, "https://upload.imagekit.io/api/v1/files/upload");
    assert!(matches!(request.body, RequestBody::Multipart(_)));
}

#[tokio::test]
async fn test_unexpected_body_is_decode_error() {
    let (client, transport) = setup();
    transport.respond(200, json!({ "unexpected": true }));

    let err = client.get_purge_cache_status("req-1").await.unwrap_err();
    assert!(matches!(err, ImageKitError::Decode(_)));
}

#[test]
fn test_authentication_parameters_through_client() {
    let (client, _) = setup();
    let params = client
        .get_authentication_parameters(Some("your_token"), Some(1582269249))
        .unwrap();
    assert_eq!(params.signature, "e71bcd6031016b060d349d212e23e85c791decdd");
}

#[test]
fn test_phash_distance_through_client() {
    let (client, _) = setup();
    assert_eq!(
        client
            .phash_distance("2d5ad3936d2e015b", "2d6ed293db36a4fb")
            .unwrap(),
        17
    );
}
