use crate::config::Config;
use crate::error::{AppError, Result};

const MIN_IMAGE_SIDE: u32 = 100;

/// Validate a config and surface every problem at once.
pub fn validate_config(config: &Config) -> Result<()> {
    let mut issues = Vec::new();

    validate_ph(config, &mut issues);
    validate_display(config, &mut issues);
    validate_export(config, &mut issues);
    validate_labels(config, &mut issues);

    if issues.is_empty() {
        Ok(())
    } else {
        Err(AppError::message(format!(
            "config invalid:\n  - {}",
            issues.join("\n  - ")
        )))
    }
}

fn validate_ph(config: &Config, issues: &mut Vec<String>) {
    let ph = &config.ph;
    if !ph.min.is_finite() || !ph.max.is_finite() {
        issues.push("ph.min and ph.max must be finite numbers".to_string());
    } else if ph.min >= ph.max {
        issues.push(format!(
            "ph.min ({}) must be lower than ph.max ({})",
            ph.min, ph.max
        ));
    }
    if !ph.step.is_finite() || ph.step <= 0.0 {
        issues.push(format!("ph.step must be positive, got {}", ph.step));
    }
}

fn validate_display(config: &Config, issues: &mut Vec<String>) {
    if config.browser.page_size == 0 {
        issues.push("browser.page_size must be at least 1".to_string());
    }
    if config.display.refresh_per_second == 0 {
        issues.push("display.refresh_per_second must be at least 1".to_string());
    }
}

fn validate_export(config: &Config, issues: &mut Vec<String>) {
    let export = &config.export;
    if export.image_width < MIN_IMAGE_SIDE || export.image_height < MIN_IMAGE_SIDE {
        issues.push(format!(
            "export image must be at least {MIN_IMAGE_SIDE}x{MIN_IMAGE_SIDE} pixels"
        ));
    }
    if export.image_name.trim().is_empty() {
        issues.push("export.image_name must not be empty".to_string());
    }
    if export.workbook_name.trim().is_empty() {
        issues.push("export.workbook_name must not be empty".to_string());
    }
}

fn validate_labels(config: &Config, issues: &mut Vec<String>) {
    if config.labels.acid.trim().is_empty() || config.labels.base.trim().is_empty() {
        issues.push("labels.acid and labels.base must not be empty".to_string());
    }
}
