use tracing::error;

use crate::utils::hash::digest_sha1;

/// Callback signature: SHA-1 over the lexicographically sorted
/// `token`, `timestamp`, `nonce` and `payload`, concatenated.
#[must_use]
pub fn compute_signature(token: &str, timestamp: &str, nonce: &str, payload: &str) -> String {
    let mut parts = [token, timestamp, nonce, payload];
    parts.sort_unstable();
    digest_sha1(parts.concat())
}

pub fn verify_signature(
    token: &str,
    timestamp: &str,
    nonce: &str,
    payload: &str,
    signature: &str,
) -> bool {
    let computed_signature = compute_signature(token, timestamp, nonce, payload);

    if computed_signature == signature {
        true
    } else {
        error!(
            "Signature verification failed. Computed: '{}', Received: '{}'",
            computed_signature, signature
        );
        false
    }
}
