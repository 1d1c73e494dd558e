//! Hex digests used to fingerprint payloads before they are sent.

use md5::{Digest, Md5};
use sha1::Sha1;

/// Lowercase hex MD5 digest of `data`.
///
/// ```
/// assert_eq!(
///     tenbot::utils::hash::digest_md5("foobar"),
///     "3858f62230ac3c915f300c664312c63f"
/// );
/// ```
#[must_use]
pub fn digest_md5(data: impl AsRef<[u8]>) -> String {
    hex::encode(Md5::digest(data.as_ref()))
}

/// Lowercase hex SHA-1 digest of `data`.
#[must_use]
pub fn digest_sha1(data: impl AsRef<[u8]>) -> String {
    hex::encode(Sha1::digest(data.as_ref()))
}
