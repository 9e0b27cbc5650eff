use crate::output::Output;
use color_eyre::Result;
use dialoguer::{Confirm, Input};

/// Read one line at the shell prompt. Empty lines are allowed; they are key presses.
pub fn read_line(prompt: &str) -> Result<String> {
    Input::<String>::new()
        .with_prompt(prompt)
        .allow_empty(true)
        .interact_text()
        .map_err(|e| color_eyre::eyre::eyre!("Failed to read input: {}", e))
}

/// Prompt for a string value with optional default
pub fn prompt_string(prompt: &str, default: Option<&str>) -> Result<String> {
    let mut input_builder = Input::<String>::new()
        .with_prompt(prompt)
        .allow_empty(true);

    if let Some(default_value) = default {
        input_builder = input_builder.default(default_value.to_string());
    }

    input_builder.interact_text().map_err(|e| color_eyre::eyre::eyre!("Failed to read input: {}", e))
}

pub fn prompt_yes_no(prompt: &str, default: bool) -> Result<bool> {
    Confirm::new()
        .with_prompt(prompt)
        .default(default)
        .interact()
        .map_err(|e| color_eyre::eyre::eyre!("Failed to read confirmation: {}", e))
}

/// Parse a rating typed by the user. Ratings run from 1 to 10.
pub fn parse_rating(input: &str) -> Option<u8> {
    input
        .trim()
        .parse::<u8>()
        .ok()
        .filter(|rating| (1..=10).contains(rating))
}

/// Ask for a rating until a valid one is entered
pub fn prompt_rating(output: &Output) -> Result<u8> {
    loop {
        let input_str = Input::<String>::new()
            .with_prompt("Your rating (1-10)")
            .interact_text()
            .map_err(|e| color_eyre::eyre::eyre!("Failed to read input: {}", e))?;

        match parse_rating(&input_str) {
            Some(rating) => return Ok(rating),
            None => output.error("Invalid rating. Please enter a number from 1 to 10."),
        }
    }
}
