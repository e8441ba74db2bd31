use crate::error::AppError;
use chrono::{DateTime, Utc};

pub const MAX_SHORT_TEXT: usize = 255;
pub const MAX_LONG_TEXT: usize = 10_000;

pub fn require_text(field: &str, value: &str, max_len: usize) -> Result<(), AppError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AppError::Validation(format!("{} is required", field)));
    }
    if trimmed.chars().count() > max_len {
        return Err(AppError::Validation(format!("{} must be at most {} characters", field, max_len)));
    }
    Ok(())
}

pub fn optional_text(field: &str, value: Option<&str>, max_len: usize) -> Result<(), AppError> {
    match value {
        Some(v) if v.chars().count() > max_len => {
            Err(AppError::Validation(format!("{} must be at most {} characters", field, max_len)))
        }
        _ => Ok(()),
    }
}

pub fn require_price(field: &str, value: f64) -> Result<(), AppError> {
    if !value.is_finite() || value < 0.0 {
        return Err(AppError::Validation(format!("{} must be a non-negative number", field)));
    }
    Ok(())
}

pub fn require_ordered(
    start_field: &str,
    start: DateTime<Utc>,
    end_field: &str,
    end: Option<DateTime<Utc>>,
) -> Result<(), AppError> {
    if let Some(end) = end
        && end < start {
        return Err(AppError::Validation(format!("{} must not be before {}", end_field, start_field)));
    }
    Ok(())
}

/// Lower-cases and trims an email; returns `None` if it is not plausibly an
/// address (one `@`, non-empty local part, dotted domain, no whitespace).
pub fn normalize_email(raw: &str) -> Option<String> {
    let email = raw.trim().to_lowercase();
    if email.is_empty() || email.len() > 254 || email.chars().any(char::is_whitespace) {
        return None;
    }

    let (local, domain) = email.split_once('@')?;
    if local.is_empty() || domain.contains('@') {
        return None;
    }
    if !domain.contains('.') || domain.starts_with('.') || domain.ends_with('.') {
        return None;
    }
    Some(email)
}

/// Builds a case-insensitive substring pattern for `LIKE ... ESCAPE '\'`.
pub fn like_pattern(search: &str) -> String {
    let mut escaped = String::with_capacity(search.len() + 2);
    escaped.push('%');
    for c in search.trim().to_lowercase().chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    escaped
}
