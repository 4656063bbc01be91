//! CLI module for appcontainer.
//!
//! Subcommands:
//! - `plan`: Print the construction order of the application sources
//! - `inspect`: Build the container and list its components

mod inspect;
mod plan;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::Config;

/// appcontainer - application component container
#[derive(Parser)]
#[command(name = "appcontainer")]
#[command(about = "Build the application component container and report on it")]
#[command(version)]
pub struct App {
    /// Run in verbose mode
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Config file to use instead of the user and project files
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Print the order in which components would be produced
    Plan,

    /// Build the container and list every component
    Inspect {
        /// Only show the component registered under this key
        #[arg(long)]
        key: Option<String>,
    },
}

impl App {
    /// Run the CLI application.
    pub fn run(self) -> color_eyre::Result<()> {
        match self.command {
            Command::Plan => self.run_plan(),
            Command::Inspect { ref key } => self.run_inspect(key.as_deref()),
        }
    }

    fn load_config(&self) -> color_eyre::Result<Config> {
        let config = match &self.config {
            Some(path) => Config::load_from(path)?,
            None => Config::load()?,
        };
        tracing::debug!(
            "Loaded configuration ({} configured source priorities)",
            config.container.priorities.len()
        );
        Ok(config)
    }
}
