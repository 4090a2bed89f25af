// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! HopGraph CLI entry point

use clap::Parser;
use colored::Colorize;

mod cli;
use cli::{Cli, Commands};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let log_level = if cli.verbose {
        log::LevelFilter::Debug
    } else if let Some(level) = cli.log_level {
        level.to_level_filter()
    } else {
        // Default to Warn (can still be overridden by RUST_LOG env var)
        log::LevelFilter::Warn
    };

    env_logger::Builder::from_default_env()
        .filter_level(log_level)
        .init();

    match cli.command {
        Commands::Version => {
            println!("{} {}", "HopGraph".bold().green(), hopgraph::VERSION);
            println!("nGQL traversal engine");
            Ok(())
        }

        Commands::Query {
            query,
            format,
            explain,
        } => cli::handle_query(cli.data, cli.config, query, format, explain),

        Commands::Console => cli::handle_console(cli.data, cli.config),
    }
}
