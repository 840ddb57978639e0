//! Custom serde helpers shared across request DTOs.

use serde::{Deserialize, Deserializer};

/// Deserialize a credits value that clients may send as a number or a
/// numeric string. Unparsable input becomes `None` so the caller can apply
/// the default instead of rejecting the request.
pub fn lenient_credits<'de, D>(deserializer: D) -> Result<Option<i32>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Int(i64),
        Text(String),
        Other(serde_json::Value),
    }

    Ok(match Option::<Raw>::deserialize(deserializer)? {
        Some(Raw::Int(n)) => i32::try_from(n).ok(),
        Some(Raw::Text(s)) => s.trim().parse::<i32>().ok(),
        Some(Raw::Other(_)) | None => None,
    })
}
