// URL building through the client

use std::sync::Arc;

use imagekit::transport::{ApiRequest, ApiResponse, Transport};
use imagekit::url_builder::build_url_at;
use imagekit::{
    ClientOptions, ImageKit, ImageKitError, Overlay, Result, TransformationChain,
    TransformationPosition, TransformationStep, UrlOptions,
};

const ENDPOINT: &str = "https://ik.imagekit.io/test_url_endpoint";

struct UnusedTransport;

#[async_trait::async_trait]
impl Transport for UnusedTransport {
    async fn perform(&self, _request: ApiRequest) -> Result<ApiResponse> {
        panic!("URL building must not touch the network");
    }
}

fn client() -> ImageKit {
    let options = ClientOptions::new("public_key_test", "private_key_test", ENDPOINT);
    ImageKit::with_transport(options, Arc::new(UnusedTransport)).unwrap()
}

#[test]
fn test_chained_transformation_in_path() {
    let chain = TransformationChain::new()
        .then(TransformationStep::new().height(300).width(400))
        .then(TransformationStep::new().set("rotation", 90));
    let url = client()
        .url(&UrlOptions::for_path("/test_path.jpg").with_transformation(chain))
        .unwrap();
    assert_eq!(url, format!("{}/tr:h-300,w-400:rt-90/test_path.jpg", ENDPOINT));
}

#[test]
fn test_overlay_path_is_escaped() {
    let step = TransformationStep::new()
        .width(400)
        .overlay(Overlay::image("/logos/brand.png"));
    let url = client()
        .url(&UrlOptions::for_path("a.jpg").with_transformation(step))
        .unwrap();
    assert_eq!(
        url,
        format!("{}/tr:w-400,l-image,i-logos@@brand.png,l-end/a.jpg", ENDPOINT)
    );
}

#[test]
fn test_per_url_endpoint_override() {
    let url = client()
        .url(
            &UrlOptions::for_path("a.jpg")
                .with_url_endpoint("https://images.example.com/assets/")
                .with_transformation(TransformationStep::new().width(10)),
        )
        .unwrap();
    assert_eq!(url, "https://images.example.com/assets/tr:w-10/a.jpg");
}

#[test]
fn test_query_position_on_client() {
    let options = ClientOptions::new("public_key_test", "private_key_test", ENDPOINT)
        .with_transformation_position(TransformationPosition::Query);
    let client = ImageKit::with_transport(options, Arc::new(UnusedTransport)).unwrap();

    let url = client
        .url(&UrlOptions::for_path("a.jpg").with_transformation(TransformationStep::new().width(10)))
        .unwrap();
    assert_eq!(url, format!("{}/a.jpg?tr=w-10", ENDPOINT));
}

#[test]
fn test_signed_url_with_fixed_clock() {
    let client = client();
    let options = UrlOptions::for_path("test-signed-url.png")
        .with_transformation(TransformationStep::new().width(100))
        .signed(Some(100));

    let url = build_url_at(&options, client.options(), 1650000000).unwrap();
    assert!(url.ends_with("?ik-t=1650000100&ik-s=dfac20ca5986a3fb4626fa405aa9c22108284863"));
}

#[test]
fn test_missing_path_and_src() {
    let err = client().url(&UrlOptions::default()).unwrap_err();
    assert!(matches!(err, ImageKitError::Configuration(_)));
}

#[test]
fn test_uppercase_endpoint_signs_like_canonical() {
    let options = UrlOptions::for_path("test-signed-url.png")
        .with_transformation(TransformationStep::new().width(100))
        .signed(Some(100));
    let canonical = build_url_at(&options, client().options(), 1650000000).unwrap();

    let shouting = ClientOptions::new(
        "public_key_test",
        "private_key_test",
        "https://IK.IMAGEKIT.IO:443/test_url_endpoint/",
    );
    let shouting = ImageKit::with_transport(shouting, Arc::new(UnusedTransport)).unwrap();
    let url = build_url_at(&options, shouting.options(), 1650000000).unwrap();
    assert_eq!(url, canonical);
}

#[test]
fn test_query_values_containing_separators_sign_differently() {
    let joined = UrlOptions::for_path("a.png")
        .with_query_parameter("x", "a&y=b")
        .signed(None);
    let split = UrlOptions::for_path("a.png")
        .with_query_parameter("x", "a")
        .with_query_parameter("y", "b")
        .signed(None);

    let joined = client().url(&joined).unwrap();
    let split = client().url(&split).unwrap();
    let signature = |url: &str| url.rsplit("ik-s=").next().map(str::to_string);
    assert_ne!(signature(&joined), signature(&split));
}

#[test]
fn test_unrepresentable_expiry_is_rejected() {
    let client = client();
    for seconds in [i64::MAX, -30] {
        let options = UrlOptions::for_path("a.png").signed(Some(seconds));
        let err = build_url_at(&options, client.options(), 1650000000).unwrap_err();
        assert!(matches!(err, ImageKitError::Configuration(_)), "seconds {}", seconds);
    }
}

#[test]
fn test_builder_owned_query_parameters_are_rejected() {
    let err = client()
        .url(&UrlOptions::for_path("a.png").with_query_parameter("ik-s", "forged"))
        .unwrap_err();
    assert!(matches!(err, ImageKitError::Configuration(_)));
}
