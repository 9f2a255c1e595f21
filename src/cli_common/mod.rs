//! Общий модуль для CLI
//!
//! Инициализация логирования, цветной вывод сообщений и форматирование
//! результатов команд `resys`.

use anyhow::{Context, Result};
use colored::Colorize;
use std::path::Path;
use tracing_subscriber::EnvFilter;

pub mod args;
pub mod output;

pub use args::{CommonArgs, ConfigArgs};
pub use output::{OutputFormat, OutputWriter};

/// Инициализирует систему логирования; `RUST_LOG` дополняет уровень по умолчанию
pub fn init_logging(verbose: bool) -> Result<()> {
    let level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    init_logging_with_level(level)
}

/// Инициализирует логирование с явным уровнем (`--quiet` даёт ERROR)
pub fn init_logging_with_level(level: tracing::Level) -> Result<()> {
    let filter = EnvFilter::from_default_env().add_directive(level.into());

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    Ok(())
}

/// Выводит заголовок CLI
pub fn print_header(name: &str, version: &str, description: &str) {
    println!(
        "{} {} - {}",
        "🔧".blue(),
        name.bold().blue(),
        version.dimmed()
    );
    println!("{}\n", description.dimmed());
}

pub fn print_success(message: &str) {
    println!("{} {}", "✅".green(), message.green());
}

pub fn print_warning(message: &str) {
    println!("{} {}", "⚠️".yellow(), message.yellow());
}

pub fn print_error(message: &str) {
    eprintln!("{} {}", "❌".red(), message.red());
}

pub fn print_info(message: &str) {
    println!("{} {}", "ℹ️".blue(), message);
}

/// Проверяет существование файла или директории
pub fn validate_path(path: &Path, description: &str) -> Result<()> {
    if !path.exists() {
        return Err(anyhow::anyhow!(
            "{} does not exist: {}",
            description,
            path.display()
        ));
    }
    Ok(())
}

/// Создает директорию если она не существует
pub fn ensure_dir_exists(path: &Path) -> Result<()> {
    if !path.exists() {
        std::fs::create_dir_all(path)
            .with_context(|| format!("Failed to create directory: {}", path.display()))?;
    }
    Ok(())
}

/// Форматирует продолжительность в миллисекундах
pub fn format_millis(millis: u128) -> String {
    if millis < 1000 {
        format!("{}ms", millis)
    } else if millis < 60_000 {
        format!("{}.{:03}s", millis / 1000, millis % 1000)
    } else {
        format!("{}m {}s", millis / 60_000, (millis % 60_000) / 1000)
    }
}
