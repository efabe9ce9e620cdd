use crate::domain::model::PlotMode;
use crate::utils::error::{MultiplesError, Result};

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.is_empty() {
        return Err(MultiplesError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path cannot be empty".to_string(),
        });
    }

    if path.contains('\0') {
        return Err(MultiplesError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path contains null bytes".to_string(),
        });
    }

    Ok(())
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(MultiplesError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value cannot be empty or whitespace-only".to_string(),
        });
    }
    Ok(())
}

pub fn validate_range<T: PartialOrd + std::fmt::Display + Copy>(
    field_name: &str,
    value: T,
    min: T,
    max: T,
) -> Result<()> {
    if value < min || value > max {
        return Err(MultiplesError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be between {} and {}", min, max),
        });
    }
    Ok(())
}

/// Parses plot mode names, rejecting unknown ones and empty lists.
pub fn validate_plot_modes(field_name: &str, names: &[String]) -> Result<Vec<PlotMode>> {
    if names.is_empty() {
        return Err(MultiplesError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: String::new(),
            reason: "At least one plot mode is required".to_string(),
        });
    }

    let mut modes = Vec::with_capacity(names.len());
    for name in names {
        let mode = name.parse::<PlotMode>().map_err(|reason| {
            MultiplesError::InvalidConfigValueError {
                field: field_name.to_string(),
                value: name.clone(),
                reason,
            }
        })?;
        if !modes.contains(&mode) {
            modes.push(mode);
        }
    }
    Ok(modes)
}
