// Constants module - centralized default values and wire names
//
// Every value here is part of the remote service's contract; change them only
// when the service changes.

// =============================================================================
// Remote API endpoints
// =============================================================================

/// Base URL of the media management API
pub const DEFAULT_API_BASE_URL: &str = "https://api.imagekit.io/v1";

/// Upload endpoint
pub const DEFAULT_UPLOAD_URL: &str = "https://upload.imagekit.io/api/v1/files/upload";

/// Default HTTP timeout for the bundled transport in seconds
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 60;

// =============================================================================
// Transformation grammar
// =============================================================================

/// Reserved path segment prefix and query parameter name for transformations
pub const TRANSFORMATION_PARAMETER: &str = "tr";

/// Separates chained transformation steps
pub const CHAIN_DELIMITER: char = ':';

/// Separates options within one step
pub const OPTION_DELIMITER: char = ',';

/// Separates a directive code from its value
pub const KEY_VALUE_DELIMITER: char = '-';

/// Keys starting with this marker bypass the lookup table
pub const RAW_KEY_PREFIX: &str = "raw:";

/// Key whose value is a pre-compiled fragment emitted verbatim
pub const RAW_FRAGMENT_KEY: &str = "raw";

/// Maximum overlay nesting accepted by the compiler
pub const MAX_LAYER_DEPTH: usize = 8;

// =============================================================================
// Signing
// =============================================================================

/// Query parameter carrying the signed URL expiry
pub const SIGNED_URL_EXPIRY_PARAMETER: &str = "ik-t";

/// Query parameter carrying the signed URL signature
pub const SIGNED_URL_SIGNATURE_PARAMETER: &str = "ik-s";

/// Expiry the service treats as "never expires"
pub const DEFAULT_URL_EXPIRY_TIMESTAMP: i64 = 9_999_999_999;

/// Default validity window of upload authentication parameters (30 minutes)
pub const DEFAULT_AUTH_EXPIRY_SECONDS: i64 = 60 * 30;
