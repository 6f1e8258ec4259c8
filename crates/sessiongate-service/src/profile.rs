//! Profile resolution from verified identity claims.

use serde_json::Value;

use sessiongate_core::types::UserProfile;

/// Display name used when no name-bearing claim is present.
const UNKNOWN_NAME: &str = "Unknown";
/// Email placeholder used when the provider supplied none.
const NO_EMAIL: &str = "No email";

/// Resolves a display profile from ID-token claims.
///
/// Display name preference: `name`, then `given_name` + `family_name` (either
/// half alone is used as-is), then `preferred_username`, then `"Unknown"`.
/// Email falls back to `"No email"`. Empty strings count as absent.
pub fn extract_profile(claims: &serde_json::Map<String, Value>) -> UserProfile {
    let username = claim_str(claims, "preferred_username").unwrap_or_default();

    let display_name = claim_str(claims, "name")
        .or_else(|| composed_name(claims))
        .or_else(|| claim_str(claims, "preferred_username"))
        .unwrap_or_else(|| UNKNOWN_NAME.to_string());

    let email = claim_str(claims, "email").unwrap_or_else(|| NO_EMAIL.to_string());

    UserProfile {
        display_name,
        username,
        email,
    }
}

/// Non-empty string claim, or `None`.
fn claim_str(claims: &serde_json::Map<String, Value>, key: &str) -> Option<String> {
    claims
        .get(key)
        .and_then(|v| v.as_str())
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// `given_name` and `family_name` joined with a space, whichever are present.
fn composed_name(claims: &serde_json::Map<String, Value>) -> Option<String> {
    let given = claim_str(claims, "given_name");
    let family = claim_str(claims, "family_name");
    match (given, family) {
        (Some(given), Some(family)) => Some(format!("{given} {family}")),
        (Some(given), None) => Some(given),
        (None, Some(family)) => Some(family),
        (None, None) => None,
    }
}
