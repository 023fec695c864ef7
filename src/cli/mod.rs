// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
pub mod catalogue;
pub mod inspect;

use anyhow::Result;
use clap::{Parser, Subcommand};

/// Fabstir Damage Node CLI
#[derive(Parser, Debug)]
#[command(name = "fabstir-damage-cli")]
#[command(version = crate::version::VERSION_NUMBER)]
#[command(about = "Offline vehicle damage inspection tools", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Detect damage on a single photo
    Detect(inspect::DetectArgs),

    /// Compare pickup and return photos for new damage
    Compare(inspect::CompareArgs),

    /// List the damage classes the model knows, by category
    Classes,

    /// Print the repair cost matrix
    Costs,
}

/// Execute CLI command
pub async fn execute(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Detect(args) => inspect::detect(args).await,
        Commands::Compare(args) => inspect::compare(args).await,
        Commands::Classes => {
            print!("{}", catalogue::format_classes());
            Ok(())
        }
        Commands::Costs => {
            print!("{}", catalogue::format_costs());
            Ok(())
        }
    }
}
