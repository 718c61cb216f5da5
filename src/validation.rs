//! Field validation shared by entity inputs.

use crate::error::AppError;
use regex::Regex;

/// Required text: trimmed value must be non-empty and at most `max` characters.
pub fn required_text(field: &str, value: &str, max: usize) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::Validation(format!("{} is required", field)));
    }
    max_length(field, value, max)
}

pub fn max_length(field: &str, value: &str, max: usize) -> Result<(), AppError> {
    if value.chars().count() > max {
        return Err(AppError::Validation(format!(
            "{} must be at most {} characters",
            field, max
        )));
    }
    Ok(())
}

pub fn minimum(field: &str, value: i32, min: i32) -> Result<(), AppError> {
    if value < min {
        return Err(AppError::Validation(format!(
            "{} must be at least {}",
            field, min
        )));
    }
    Ok(())
}

/// Foreign keys and ids are positive.
pub fn reference(field: &str, id: i32) -> Result<(), AppError> {
    minimum(field, id, 1)
}

pub fn pattern(field: &str, value: &str, pattern: &str) -> Result<(), AppError> {
    let re = Regex::new(pattern)
        .map_err(|_| AppError::Validation(format!("invalid pattern for {}", field)))?;
    if !re.is_match(value) {
        return Err(AppError::Validation(format!(
            "{} does not match required pattern",
            field
        )));
    }
    Ok(())
}

pub fn email(field: &str, value: &str) -> Result<(), AppError> {
    let Some((local, domain)) = value.split_once('@') else {
        return Err(AppError::Validation(format!("{} must be a valid email", field)));
    };
    if local.is_empty() || domain.is_empty() || value.len() < 3 {
        return Err(AppError::Validation(format!("{} must be a valid email", field)));
    }
    Ok(())
}
