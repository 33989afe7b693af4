// Perceptual hash distance
//
// The service reports a 64-bit perceptual hash per image as a hex string.
// The Hamming distance between two hashes measures visual similarity; 0 means
// the images are considered identical.

use crate::error::{ImageKitError, Result};

const MAX_PHASH_HEX_LEN: usize = 16;

/// Hamming distance between two hex-encoded perceptual hashes
///
/// # Errors
///
/// `ImageKitError::Usage` when a hash is empty, is not hex, is longer than 64
/// bits, or when the two hashes differ in length.
pub fn phash_distance(first: &str, second: &str) -> Result<u32> {
    if first.is_empty() || second.is_empty() {
        return Err(ImageKitError::usage("Missing pHash value"));
    }

    let a = parse_phash(first)?;
    let b = parse_phash(second)?;

    if first.len() != second.len() {
        return Err(ImageKitError::usage("Unequal pHash string length"));
    }

    Ok((a ^ b).count_ones())
}

fn parse_phash(value: &str) -> Result<u64> {
    if value.len() > MAX_PHASH_HEX_LEN || !value.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(ImageKitError::usage(format!("Invalid pHash value '{}'", value)));
    }
    u64::from_str_radix(value, 16)
        .map_err(|_| ImageKitError::usage(format!("Invalid pHash value '{}'", value)))
}
