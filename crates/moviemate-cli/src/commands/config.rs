use super::prompts;
use crate::output::Output;
use color_eyre::Result;
use comfy_table::{Attribute, Cell, Color, Table};
use moviemate_config::{Config, API_KEY_ENV};
use owo_colors::OwoColorize;
use serde_json::json;
use std::path::Path;

/// Show the effective configuration. The API key is masked unless `full` is set.
pub fn show_config(config: &Config, config_file: &Path, full: bool, output: &Output) -> Result<()> {
    let key_display = if config.omdb.api_key.is_empty() {
        "(not set)".to_string()
    } else if full {
        config.omdb.api_key.clone()
    } else {
        mask_secret(&config.omdb.api_key)
    };
    let data_dir = config
        .storage
        .data_dir
        .as_ref()
        .map(|d| d.display().to_string())
        .unwrap_or_else(|| "(default)".to_string());

    if !output.is_human() {
        output.json(&json!({
            "configFile": config_file.display().to_string(),
            "exists": config_file.exists(),
            "omdb": {
                "apiKey": key_display,
                "baseUrl": config.omdb.base_url,
                "timeoutSeconds": config.omdb.timeout_seconds,
            },
            "storage": { "dataDir": data_dir },
            "display": { "defaultTitle": config.display.default_title },
        }));
        return Ok(());
    }

    if !config_file.exists() {
        output.warn(format!("Configuration file not found at: {}", config_file.display()));
        output.info("Run 'moviemate config init' to create one. Defaults are shown below.");
    }

    let mut table = Table::new();
    table.set_header(vec![
        Cell::new("Config File").add_attribute(Attribute::Bold),
        Cell::new(config_file.display().to_string()),
    ]);
    table.add_row(vec![Cell::new("OMDb API key").fg(Color::Cyan), Cell::new(key_display)]);
    table.add_row(vec![Cell::new("OMDb URL").fg(Color::Cyan), Cell::new(&config.omdb.base_url)]);
    table.add_row(vec![
        Cell::new("Timeout").fg(Color::Cyan),
        Cell::new(format!("{}s", config.omdb.timeout_seconds)),
    ]);
    table.add_row(vec![Cell::new("Data directory").fg(Color::Cyan), Cell::new(data_dir)]);
    table.add_row(vec![
        Cell::new("Default title").fg(Color::Cyan),
        Cell::new(&config.display.default_title),
    ]);
    table.load_preset(comfy_table::presets::UTF8_FULL);
    table.apply_modifier(comfy_table::modifiers::UTF8_ROUND_CORNERS);
    output.info(table.to_string());

    if let Err(e) = config.validate() {
        output.warn(e.to_string());
    }
    Ok(())
}

/// Write a config file, prompting for the API key when none was given.
pub fn init_config(
    mut config: Config,
    config_file: &Path,
    api_key: Option<String>,
    output: &Output,
) -> Result<()> {
    if config_file.exists()
        && !prompts::prompt_yes_no(
            &format!("{} already exists. Overwrite?", config_file.display()),
            false,
        )?
    {
        output.info("Left the existing configuration untouched");
        return Ok(());
    }

    let api_key = match api_key {
        Some(key) => key,
        None => {
            output.info(format!(
                "Get a free key at {} (or set {} instead)",
                "https://www.omdbapi.com/apikey.aspx".underline(),
                API_KEY_ENV
            ));
            let current = (!config.omdb.api_key.is_empty()).then_some(config.omdb.api_key.as_str());
            prompts::prompt_string("OMDb API key", current)?
        }
    };
    config.omdb.api_key = api_key.trim().to_string();

    config
        .validate()
        .map_err(|e| color_eyre::eyre::eyre!("Configuration not saved: {}", e))?;
    config
        .save_to_file(config_file)
        .map_err(|e| color_eyre::eyre::eyre!("Failed to save config to {}: {}", config_file.display(), e))?;

    output.success(format!("Configuration saved to {}", config_file.display()));
    Ok(())
}

fn mask_secret(secret: &str) -> String {
    let visible: String = secret.chars().take(2).collect();
    format!("{}{}", visible, "*".repeat(secret.chars().count().saturating_sub(2)))
}
