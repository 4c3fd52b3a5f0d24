// Field rules mirroring the column constraints in migrations/.

use thiserror::Error;

pub const MAX_TITLE_LEN: usize = 200;
pub const MAX_DESCRIPTION_LEN: usize = 2000;
pub const MAX_TAG_NAME_LEN: usize = 50;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field}: {reason}")]
pub struct ValidationError {
    pub field: &'static str,
    pub reason: String,
}

impl ValidationError {
    pub fn new(field: &'static str, reason: impl Into<String>) -> Self {
        Self { field, reason: reason.into() }
    }
}

pub fn title(value: &str) -> Result<(), ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::new("title", "is required"));
    }
    if trimmed.chars().count() > MAX_TITLE_LEN {
        return Err(ValidationError::new(
            "title",
            format!("must be at most {MAX_TITLE_LEN} characters"),
        ));
    }
    Ok(())
}

pub fn description(value: Option<&str>) -> Result<(), ValidationError> {
    match value {
        Some(text) if text.chars().count() > MAX_DESCRIPTION_LEN => Err(ValidationError::new(
            "description",
            format!("must be at most {MAX_DESCRIPTION_LEN} characters"),
        )),
        _ => Ok(()),
    }
}

pub fn tag_name(value: &str) -> Result<(), ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::new("name", "is required"));
    }
    if trimmed.chars().count() > MAX_TAG_NAME_LEN {
        return Err(ValidationError::new(
            "name",
            format!("must be at most {MAX_TAG_NAME_LEN} characters"),
        ));
    }
    Ok(())
}

/// Accepts `#rgb` and `#rrggbb`.
pub fn hex_color(value: &str) -> Result<(), ValidationError> {
    let digits = value
        .strip_prefix('#')
        .ok_or_else(|| ValidationError::new("color", "must start with '#'"))?;
    let valid_len = digits.len() == 3 || digits.len() == 6;
    if !valid_len || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(ValidationError::new("color", "must be a 3 or 6 digit hex color"));
    }
    Ok(())
}

pub fn credentials(username: &str, password: &str) -> Result<(), ValidationError> {
    if username.trim().is_empty() {
        return Err(ValidationError::new("username", "is required"));
    }
    if password.is_empty() {
        return Err(ValidationError::new("password", "is required"));
    }
    Ok(())
}
