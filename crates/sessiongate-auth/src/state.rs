//! Anti-forgery state generation for the authorization-code flow.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use rand::TryRngCore;
use rand::rngs::OsRng;

/// State token length in bytes before encoding.
const STATE_BYTES: usize = 32;

/// Mints the opaque anti-forgery state binding one login redirect to its
/// callback.
///
/// Normally 32 bytes from the OS entropy source, URL-safe encoded. If the
/// entropy source fails the function falls back to a timestamp-derived value
/// so logins keep working, but that value is predictable — the warning marks
/// the login attempt as running in degraded-security mode.
pub fn generate_state() -> String {
    let mut bytes = [0u8; STATE_BYTES];
    match OsRng.try_fill_bytes(&mut bytes) {
        Ok(()) => URL_SAFE_NO_PAD.encode(bytes),
        Err(e) => {
            tracing::warn!(
                error = %e,
                "OS entropy source unavailable, issuing timestamp-derived anti-forgery state \
                 (degraded security)"
            );
            let fallback = format!("state_{}", chrono::Utc::now().timestamp_nanos_opt().unwrap_or_default());
            URL_SAFE_NO_PAD.encode(fallback.as_bytes())
        }
    }
}
