// Configuration loading tests

use std::io::Write;

use imagekit::{ClientOptions, ImageKitError, TransformationPosition};
use tempfile::NamedTempFile;

#[test]
fn test_from_file() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(
        file,
        r#"
publicKey: "public_key_test"
privateKey: "private_key_test"
urlEndpoint: "https://ik.imagekit.io/test_url_endpoint"
transformationPosition: query
"#
    )
    .unwrap();

    let options = ClientOptions::from_file(file.path()).unwrap();
    assert_eq!(options.public_key, "public_key_test");
    assert_eq!(options.transformation_position, TransformationPosition::Query);
}

#[test]
fn test_from_file_with_env_substitution() {
    std::env::set_var("IMAGEKIT_CONFIG_TEST_PRIVATE_KEY", "private_from_env");

    let mut file = NamedTempFile::new().unwrap();
    writeln!(
        file,
        r#"
publicKey: "public_key_test"
privateKey: "${{IMAGEKIT_CONFIG_TEST_PRIVATE_KEY}}"
urlEndpoint: "https://ik.imagekit.io/test_url_endpoint"
"#
    )
    .unwrap();

    let options = ClientOptions::from_file(file.path()).unwrap();
    assert_eq!(options.private_key, "private_from_env");
    assert_eq!(options.transformation_position, TransformationPosition::Path);

    std::env::remove_var("IMAGEKIT_CONFIG_TEST_PRIVATE_KEY");
}

#[test]
fn test_from_file_missing_field() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(
        file,
        r#"
publicKey: "public_key_test"
privateKey: ""
urlEndpoint: "https://ik.imagekit.io/test_url_endpoint"
"#
    )
    .unwrap();

    let err = ClientOptions::from_file(file.path()).unwrap_err();
    assert!(matches!(err, ImageKitError::Configuration(ref m) if m.contains("privateKey")));
}

#[test]
fn test_from_missing_file() {
    let err = ClientOptions::from_file("/nonexistent/imagekit.yaml").unwrap_err();
    assert!(matches!(err, ImageKitError::Configuration(_)));
}

#[test]
fn test_debug_redacts_private_key() {
    let options = ClientOptions::new("pk", "very-secret", "https://ik.imagekit.io/x");
    let rendered = format!("{:?}", options);
    assert!(!rendered.contains("very-secret"));
    assert!(rendered.contains("pk"));
}
