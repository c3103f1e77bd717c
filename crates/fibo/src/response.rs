//! Parsing helpers for FIBO API response bodies.

use serde_json::Value;

/// Job state reported by a status endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollStatus {
    Completed,
    Failed,
    Pending,
    Unknown,
}

/// Classify a raw status string, case-insensitively.
pub fn classify_status(status: &str) -> PollStatus {
    match status.trim().to_ascii_lowercase().as_str() {
        "completed" | "succeeded" | "ready" | "done" | "success" | "finished" => {
            PollStatus::Completed
        }
        "failed" | "error" => PollStatus::Failed,
        "processing" | "pending" | "in_progress" | "queued" => PollStatus::Pending,
        _ => PollStatus::Unknown,
    }
}

/// Find the generated image URL in a response body.
///
/// Checked in order: `result.image_url`, `image_url`, `images[0].url`,
/// and `images[0]` as a bare string.
pub fn extract_image_url(data: &Value) -> Option<&str> {
    if let Some(url) = data
        .get("result")
        .and_then(|r| r.get("image_url"))
        .and_then(Value::as_str)
    {
        return Some(url);
    }

    if let Some(url) = data.get("image_url").and_then(Value::as_str) {
        return Some(url);
    }

    let first = data.get("images")?.as_array()?.first()?;
    match first {
        Value::String(url) => Some(url),
        Value::Object(obj) => obj.get("url").and_then(Value::as_str),
        _ => None,
    }
}

/// The `status_url` of an asynchronous job, if the response carries one.
pub fn status_url(data: &Value) -> Option<&str> {
    data.get("status_url").and_then(Value::as_str)
}
