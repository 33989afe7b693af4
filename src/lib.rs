// ImageKit client library
//
// Synchronous core: transformation compiler, URL builder, request signing.
// Asynchronous surface: upload and media library management, each returning a
// `Pending` that can be awaited or completed through a callback.

pub mod client;
pub mod config;
pub mod constants;
pub mod error;
pub mod invocation;
pub mod logging;
pub mod manage;
pub mod phash;
pub mod signature;
pub mod transformation;
pub mod transport;
pub mod upload;
pub mod url_builder;

pub use client::ImageKit;
pub use config::{ClientOptions, TransformationPosition};
pub use error::{ImageKitError, Result};
pub use invocation::Pending;
pub use signature::AuthenticationParameters;
pub use transformation::{
    LayerKind, Overlay, TransformValue, TransformationChain, TransformationStep,
};
pub use url_builder::UrlOptions;
