// Configuration module

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use crate::error::{ImageKitError, Result};

/// Where the compiled transformation string is placed in a built URL
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransformationPosition {
    /// `<endpoint>/tr:<transformation>/<path>`
    #[default]
    Path,
    /// `<endpoint>/<path>?tr=<transformation>`
    Query,
}

impl TransformationPosition {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Path => "path",
            Self::Query => "query",
        }
    }
}

impl fmt::Display for TransformationPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransformationPosition {
    type Err = ImageKitError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "path" => Ok(Self::Path),
            "query" => Ok(Self::Query),
            _ => Err(ImageKitError::configuration(format!(
                "Invalid transformationPosition '{}': expected 'path' or 'query'",
                s
            ))),
        }
    }
}

/// Client-wide options, fixed once the client is constructed
#[derive(Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ClientOptions {
    pub public_key: String,
    pub private_key: String,
    pub url_endpoint: String,
    #[serde(default)]
    pub transformation_position: TransformationPosition,
}

// Keep the private key out of logs and panic messages.
impl fmt::Debug for ClientOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientOptions")
            .field("public_key", &self.public_key)
            .field("private_key", &"<redacted>")
            .field("url_endpoint", &self.url_endpoint)
            .field("transformation_position", &self.transformation_position)
            .finish()
    }
}

impl ClientOptions {
    pub fn new(
        public_key: impl Into<String>,
        private_key: impl Into<String>,
        url_endpoint: impl Into<String>,
    ) -> Self {
        Self {
            public_key: public_key.into(),
            private_key: private_key.into(),
            url_endpoint: url_endpoint.into(),
            transformation_position: TransformationPosition::default(),
        }
    }

    pub fn with_transformation_position(mut self, position: TransformationPosition) -> Self {
        self.transformation_position = position;
        self
    }

    /// Check that every mandatory field is present
    ///
    /// The error names the first missing field.
    pub fn validate(&self) -> Result<()> {
        if self.public_key.trim().is_empty() {
            return Err(ImageKitError::configuration(
                "Missing publicKey during ImageKit initialization",
            ));
        }
        if self.private_key.trim().is_empty() {
            return Err(ImageKitError::configuration(
                "Missing privateKey during ImageKit initialization",
            ));
        }
        if self.url_endpoint.trim().is_empty() {
            return Err(ImageKitError::configuration(
                "Missing urlEndpoint during ImageKit initialization",
            ));
        }
        Ok(())
    }

    pub fn from_yaml_with_env(yaml: &str) -> Result<Self> {
        // Replace ${VAR_NAME} with environment variable values
        let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}")
            .map_err(|e| ImageKitError::configuration(e.to_string()))?;

        let mut missing = None;
        let substituted = re.replace_all(yaml, |caps: &regex::Captures| {
            let var_name = &caps[1];
            match std::env::var(var_name) {
                Ok(value) => value,
                Err(_) => {
                    missing.get_or_insert_with(|| var_name.to_string());
                    String::new()
                }
            }
        });

        if let Some(var_name) = missing {
            return Err(ImageKitError::configuration(format!(
                "Environment variable '{}' is referenced but not set",
                var_name
            )));
        }

        let options: ClientOptions = serde_yaml::from_str(&substituted)
            .map_err(|e| ImageKitError::configuration(format!("Invalid configuration: {}", e)))?;
        options.validate()?;
        Ok(options)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let yaml = std::fs::read_to_string(path).map_err(|e| {
            ImageKitError::configuration(format!("Failed to read config file: {}", e))
        })?;
        Self::from_yaml_with_env(&yaml)
    }

    /// Read options from `IMAGEKIT_PUBLIC_KEY`, `IMAGEKIT_PRIVATE_KEY`,
    /// `IMAGEKIT_URL_ENDPOINT` and the optional `IMAGEKIT_TRANSFORMATION_POSITION`
    pub fn from_env() -> Result<Self> {
        let var = |name: &str| std::env::var(name).unwrap_or_default();

        let transformation_position = match std::env::var("IMAGEKIT_TRANSFORMATION_POSITION") {
            Ok(value) if !value.is_empty() => value.parse()?,
            _ => TransformationPosition::default(),
        };

        let options = Self {
            public_key: var("IMAGEKIT_PUBLIC_KEY"),
            private_key: var("IMAGEKIT_PRIVATE_KEY"),
            url_endpoint: var("IMAGEKIT_URL_ENDPOINT"),
            transformation_position,
        };
        options.validate()?;
        Ok(options)
    }
}
