//! Payload validation for the posts routes
//!
//! Three schemas guard the mutating routes:
//! - create: `id`, `title`, `body`, `userId` all required, no other keys
//! - replace: `title`, `body`, `userId` all required
//! - patch: `title`, `body`, `userId` optional and nullable
//!
//! Validation never stops at the first problem. Every violation is
//! collected, in schema field order, so the caller sees the whole list.
//! No coercion happens: `"5"` is not a number and `5` is not a string.

use serde_json::{Map, Value};

use super::model::{Post, PostUpdate};

/// Ordered, human-readable violation messages.
pub type Violations = Vec<String>;

const CREATE_FIELDS: [&str; 4] = ["id", "title", "body", "userId"];

/// Fields accepted by the replace and patch routes.
///
/// A replace payload always carries all three.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostPatch {
    pub title: Option<String>,
    pub body: Option<String>,
    pub user_id: Option<u64>,
}

impl PostPatch {
    /// Addresses the patch at the post with `id`.
    pub fn into_update(self, id: u64) -> PostUpdate {
        PostUpdate {
            id,
            title: self.title,
            body: self.body,
            user_id: self.user_id,
        }
    }
}

/// Validates a create payload into a full post.
pub fn validate_create(payload: &Value) -> Result<Post, Violations> {
    let obj = as_object(payload)?;
    let mut violations = Vec::new();

    let id = required_positive_int(obj, "id", &mut violations);
    let title = required_string(obj, "title", &mut violations);
    let body = required_string(obj, "body", &mut violations);
    let user_id = required_positive_int(obj, "userId", &mut violations);

    let unknown: Vec<&str> = obj
        .keys()
        .map(String::as_str)
        .filter(|key| !CREATE_FIELDS.contains(key))
        .collect();
    if !unknown.is_empty() {
        violations.push(format!(
            "this field has unspecified keys: {}",
            unknown.join(", ")
        ));
    }

    match (id, title, body, user_id) {
        (Some(id), Some(title), Some(body), Some(user_id)) if violations.is_empty() => {
            Ok(Post::new(id, title, body, user_id))
        }
        _ => Err(violations),
    }
}

/// Validates a full replacement payload. Any `id` in the body is ignored;
/// the route supplies it.
pub fn validate_replace(payload: &Value) -> Result<PostPatch, Violations> {
    let obj = as_object(payload)?;
    let mut violations = Vec::new();

    let title = required_string(obj, "title", &mut violations);
    let body = required_string(obj, "body", &mut violations);
    let user_id = required_positive_int(obj, "userId", &mut violations);

    if !violations.is_empty() {
        return Err(violations);
    }
    Ok(PostPatch {
        title,
        body,
        user_id,
    })
}

/// Validates a partial update. Absent and `null` fields are left unset.
pub fn validate_patch(payload: &Value) -> Result<PostPatch, Violations> {
    let obj = as_object(payload)?;
    let mut violations = Vec::new();

    let title = optional_string(obj, "title", &mut violations);
    let body = optional_string(obj, "body", &mut violations);
    let user_id = optional_positive_int(obj, "userId", &mut violations);

    if !violations.is_empty() {
        return Err(violations);
    }
    Ok(PostPatch {
        title,
        body,
        user_id,
    })
}

fn as_object(payload: &Value) -> Result<&Map<String, Value>, Violations> {
    payload
        .as_object()
        .ok_or_else(|| vec!["this must be a `object` type".to_string()])
}

/// Returns the field if it is present and not `null`.
fn present<'a>(obj: &'a Map<String, Value>, field: &str) -> Option<&'a Value> {
    obj.get(field).filter(|v| !v.is_null())
}

fn required_string(
    obj: &Map<String, Value>,
    field: &str,
    violations: &mut Violations,
) -> Option<String> {
    match present(obj, field) {
        None => {
            violations.push(required(field));
            None
        }
        Some(Value::String(s)) if s.is_empty() => {
            violations.push(required(field));
            None
        }
        Some(value) => check_string(field, value, violations),
    }
}

fn optional_string(
    obj: &Map<String, Value>,
    field: &str,
    violations: &mut Violations,
) -> Option<String> {
    match present(obj, field) {
        None => None,
        Some(Value::String(s)) if s.is_empty() => {
            violations.push(format!("{} cannot be empty", field));
            None
        }
        Some(value) => check_string(field, value, violations),
    }
}

fn required_positive_int(
    obj: &Map<String, Value>,
    field: &str,
    violations: &mut Violations,
) -> Option<u64> {
    match present(obj, field) {
        None => {
            violations.push(required(field));
            None
        }
        Some(value) => check_positive_int(field, value, violations),
    }
}

fn optional_positive_int(
    obj: &Map<String, Value>,
    field: &str,
    violations: &mut Violations,
) -> Option<u64> {
    present(obj, field).and_then(|value| check_positive_int(field, value, violations))
}

fn check_string(field: &str, value: &Value, violations: &mut Violations) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        _ => {
            violations.push(type_mismatch(field, "string"));
            None
        }
    }
}

/// Integer and positivity are separate checks, so `-1.5` reports both.
fn check_positive_int(field: &str, value: &Value, violations: &mut Violations) -> Option<u64> {
    let Value::Number(n) = value else {
        violations.push(type_mismatch(field, "number"));
        return None;
    };

    if let Some(v) = n.as_u64() {
        if v == 0 {
            violations.push(not_positive(field));
            return None;
        }
        return Some(v);
    }
    if n.as_i64().is_some() {
        // Only negative values fail as_u64 but pass as_i64.
        violations.push(not_positive(field));
        return None;
    }

    let f = n.as_f64().unwrap_or(f64::NAN);
    let integral = f.fract() == 0.0;
    // `u64::MAX as f64` rounds up to 2^64, the first value out of range.
    let in_range = f < u64::MAX as f64;
    if !integral {
        violations.push(format!("{} must be an integer", field));
    }
    if f <= 0.0 {
        violations.push(not_positive(field));
    } else if integral && !in_range {
        violations.push(too_large(field));
    }
    if integral && in_range && f > 0.0 {
        Some(f as u64)
    } else {
        None
    }
}

fn required(field: &str) -> String {
    format!("{} is a required field", field)
}

fn not_positive(field: &str) -> String {
    format!("{} must be a positive number", field)
}

fn too_large(field: &str) -> String {
    format!("{} must be less than or equal to {}", field, u64::MAX)
}

fn type_mismatch(field: &str, expected: &str) -> String {
    format!("{} must be a `{}` type", field, expected)
}
