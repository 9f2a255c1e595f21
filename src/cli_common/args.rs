//! Общие аргументы командной строки

use clap::Args;
use std::path::PathBuf;

use super::output::OutputFormat;

/// Флаги, общие для всех команд
#[derive(Args, Debug, Clone)]
pub struct CommonArgs {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format (text, json)
    #[arg(short = 'f', long, global = true, default_value = "text")]
    pub format: OutputFormat,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

/// Источник конфигурации
#[derive(Args, Debug, Clone)]
pub struct ConfigArgs {
    /// Path to resys.toml or resys.yaml
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Base directory for default paths when no config file is given
    #[arg(long, global = true)]
    pub base_dir: Option<PathBuf>,
}

impl CommonArgs {
    /// Определяет уровень логирования на основе флагов
    pub fn log_level(&self) -> tracing::Level {
        if self.quiet {
            tracing::Level::ERROR
        } else if self.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }

    pub fn should_print(&self) -> bool {
        !self.quiet
    }
}

impl ConfigArgs {
    /// Проверяет существование файла конфигурации
    pub fn validate(&self) -> Result<(), String> {
        match &self.config {
            Some(path) if !path.is_file() => Err(format!(
                "Configuration file does not exist: {}",
                path.display()
            )),
            _ => Ok(()),
        }
    }
}
