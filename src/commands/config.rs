//! Config subcommands handler

use anyhow::{bail, Context, Result};
use std::fs;
use std::io::{self, BufRead, Write};

use ytloop::config::{migrate_config, MigrateResult};
use ytloop::theme::Theme;
use ytloop::{current_theme, Config};

/// Show the effective configuration as TOML, defaults included.
#[cfg(not(tarpaulin_include))]
pub fn handle_show() -> Result<()> {
    let config = Config::load()?;
    let toml_str = toml::to_string_pretty(&config)?;
    let theme = current_theme();
    println!(
        "{}",
        theme.secondary_text(&format!("# {}", Config::config_path()?.display()))
    );
    println!("{}", theme.primary_text(&toml_str));
    Ok(())
}

/// Open the configuration file in `$EDITOR` (defaults to `vi`).
///
/// A default file is written first if none exists, and the result is
/// parsed afterwards so mistakes show up immediately.
#[cfg(not(tarpaulin_include))]
pub fn handle_edit() -> Result<()> {
    let config_path = Config::config_path()?;
    let theme = current_theme();

    if !config_path.exists() {
        Config::default().save()?;
    }

    let editor = std::env::var("EDITOR")
        .ok()
        .filter(|e| !e.trim().is_empty())
        .unwrap_or_else(|| "vi".to_string());

    println!(
        "{}",
        theme.primary_text(&format!(
            "Opening {} with {}",
            config_path.display(),
            editor
        ))
    );

    let status = std::process::Command::new(&editor)
        .arg(&config_path)
        .status()
        .with_context(|| format!("Failed to open editor '{}'", editor))?;
    if !status.success() {
        bail!("{} exited with {}", editor, status);
    }

    Config::load()?;
    println!("{}", theme.success_text("Config is valid."));
    Ok(())
}

/// Add missing fields to the config file after confirmation.
#[cfg(not(tarpaulin_include))]
pub fn handle_migrate() -> Result<()> {
    let theme = current_theme();
    let config_path = Config::config_path()?;
    let file_exists = config_path.exists();

    let content = if file_exists {
        fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read config file: {:?}", config_path))?
    } else {
        String::new()
    };

    let result = migrate_config(&content)?;
    if !result.has_changes() {
        println!("{}", theme.primary_text("Config is already up to date."));
        return Ok(());
    }

    println!("{}", theme.primary_text(&migration_summary(&result, file_exists)));
    println!();
    for line in preview_lines(&result, !file_exists, &theme) {
        println!("{}", line);
    }
    println!();

    let question = if file_exists {
        format!("Apply these changes to {}?", config_path.display())
    } else {
        format!("Create {}?", config_path.display())
    };
    if !prompt_confirmation(&question, &theme)? {
        println!("{}", theme.primary_text("No changes made."));
        return Ok(());
    }

    if let Some(parent) = config_path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create config directory: {:?}", parent))?;
    }
    fs::write(&config_path, &result.content)
        .with_context(|| format!("Failed to write config file: {:?}", config_path))?;

    let done = if file_exists {
        "Config updated successfully."
    } else {
        "Config file created successfully."
    };
    println!("{}", theme.success_text(done));
    Ok(())
}

/// One line describing what the migration adds.
fn migration_summary(result: &MigrateResult, file_exists: bool) -> String {
    if !file_exists {
        return "Config file does not exist. Will create with default settings.".to_string();
    }
    let fields = result.added_fields.len();
    match result.sections_added.len() {
        0 => format!("Found {} missing field(s):", fields),
        sections => format!(
            "Found {} missing field(s) in {} new section(s):",
            fields, sections
        ),
    }
}

/// Diff-style preview of the migrated document.
///
/// Added lines get a `+` prefix; a section header is shown once before the
/// first addition in it. For a new file every non-blank line is an addition.
fn preview_lines(result: &MigrateResult, is_new_file: bool, theme: &Theme) -> Vec<String> {
    let mut lines = Vec::new();
    let mut section = String::new();
    let mut pending_header: Option<&str> = None;

    for line in result.content.lines() {
        let trimmed = line.trim();

        if trimmed.starts_with('[') && trimmed.ends_with(']') {
            section = trimmed[1..trimmed.len() - 1].to_string();
            pending_header = Some(line);
            continue;
        }

        let added = if let Some(eq) = trimmed.find('=') {
            let key = trimmed[..eq].trim();
            is_new_file || result.added_fields.contains(&format!("{}.{}", section, key))
        } else {
            is_new_file && !trimmed.is_empty()
        };
        if !added {
            continue;
        }

        if let Some(header) = pending_header.take() {
            let new_section = is_new_file || result.sections_added.contains(&section);
            if new_section {
                lines.push(theme.success_text(&format!("+ {}", header)));
            } else {
                lines.push(format!("  {}", header));
            }
        }
        lines.push(theme.success_text(&format!("+ {}", line)));
    }
    lines
}

/// Prompt user for yes/no confirmation.
///
/// Returns true if user confirms (y/yes), false otherwise.
/// If stdin is not a TTY (non-interactive), returns false.
fn prompt_confirmation(message: &str, theme: &Theme) -> Result<bool> {
    if !atty::is(atty::Stream::Stdin) {
        println!(
            "{}",
            theme.secondary_text("Non-interactive mode: run `ytloop config migrate` in a terminal to apply")
        );
        return Ok(false);
    }

    print!("{} [y/N] ", theme.primary_text(message));
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().lock().read_line(&mut input)?;

    let response = input.trim().to_lowercase();
    Ok(response == "y" || response == "yes")
}
