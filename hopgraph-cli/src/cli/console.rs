// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! CLI command handlers for HopGraph

use colored::Colorize;
use rustyline::{error::ReadlineError, CompletionType, Config, EditMode, Editor};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use super::commands::OutputFormat;
use super::output::ResultFormatter;
use hopgraph::{EngineConfig, InMemoryGraph, MemoryCatalog, QueryCoordinator};

const HISTORY_PATH: &str = ".hopgraph/.ngql_history.txt";

/// Build a coordinator from the CLI's dataset and config flags
///
/// Without a dataset the coordinator runs over an empty graph, which still
/// serves `YIELD` and set-operation queries.
pub fn load_coordinator(
    data: Option<&Path>,
    config: Option<&Path>,
) -> Result<QueryCoordinator, Box<dyn std::error::Error>> {
    let config = match config {
        Some(path) => EngineConfig::from_json_file(path)?,
        None => EngineConfig::default(),
    };

    let coordinator = match data {
        Some(path) => {
            if !path.exists() {
                return Err(format!("Dataset not found at {:?}", path).into());
            }
            QueryCoordinator::from_json_file(path, config)?
        }
        None => QueryCoordinator::new(
            Arc::new(MemoryCatalog::default()),
            Arc::new(InMemoryGraph::new()),
            config,
        )?,
    };
    Ok(coordinator)
}

/// Handle the query command (one-off query execution)
pub fn handle_query(
    data: Option<PathBuf>,
    config: Option<PathBuf>,
    query: String,
    format: OutputFormat,
    explain: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let coordinator = load_coordinator(data.as_deref(), config.as_deref())?;

    if explain {
        match coordinator.explain(&query) {
            Ok(plan) => {
                print!("{}", plan);
                return Ok(());
            }
            Err(e) => {
                eprintln!("{}", format!("Error: {}", e).red());
                return Err(e.into());
            }
        }
    }

    match coordinator.process_query(&query) {
        Ok(result) => {
            println!("{}", ResultFormatter::format(&result, format));
            Ok(())
        }
        Err(e) => {
            eprintln!("{}", format!("Error: {}", e).red());
            Err(e.into())
        }
    }
}

/// Handle the console command
pub fn handle_console(
    data: Option<PathBuf>,
    config: Option<PathBuf>,
) -> Result<(), Box<dyn std::error::Error>> {
    let coordinator = load_coordinator(data.as_deref(), config.as_deref())?;

    println!("{} {}", "HopGraph".bold().green(), hopgraph::VERSION);
    println!("Type 'help' for commands, 'exit' or 'quit' to exit");
    println!("Multi-line queries supported - use ';' to terminate\n");
    if let Some(path) = &data {
        println!("{}", format!("Dataset: {}", path.display()).cyan());
    }

    let rl_config = Config::builder()
        .edit_mode(EditMode::Emacs)
        .history_ignore_space(true)
        .completion_type(CompletionType::List)
        .auto_add_history(false)
        .build();

    let mut rl = Editor::<(), _>::with_config(rl_config)?;

    if let Some(parent) = Path::new(HISTORY_PATH).parent() {
        std::fs::create_dir_all(parent)?;
    }
    let _ = rl.load_history(HISTORY_PATH);

    let mut query_buffer = String::new();
    let mut explain_next = false;

    loop {
        let prompt = if query_buffer.is_empty() {
            format!("{}> ", "ngql".cyan())
        } else {
            format!("{}> ", "....".cyan())
        };

        let line = match rl.readline(&prompt) {
            Ok(line) => line,
            Err(ReadlineError::Interrupted) => {
                if !query_buffer.is_empty() {
                    query_buffer.clear();
                    println!("{}", "\nQuery buffer cleared".yellow());
                }
                continue;
            }
            Err(ReadlineError::Eof) => {
                println!("{}", "Goodbye!".green());
                break;
            }
            Err(err) => {
                eprintln!("{}", format!("Error: {:?}", err).red());
                break;
            }
        };

        let trimmed = line.trim();

        if query_buffer.is_empty() {
            match trimmed.to_lowercase().as_str() {
                "exit" | "quit" => {
                    println!("{}", "Goodbye!".green());
                    break;
                }
                "help" => {
                    print_help();
                    continue;
                }
                "clear" => {
                    print!("\x1B[2J\x1B[1;1H");
                    continue;
                }
                "explain" => {
                    explain_next = true;
                    println!("{}", "Next query will be explained, not executed".yellow());
                    continue;
                }
                "" => continue,
                _ => {}
            }
        }

        query_buffer.push_str(&line);
        query_buffer.push('\n');

        if !trimmed.ends_with(';') {
            continue;
        }

        let query = query_buffer.trim().to_string();
        rl.add_history_entry(&query)?;
        query_buffer.clear();

        if explain_next {
            explain_next = false;
            match coordinator.explain(&query) {
                Ok(plan) => print!("{}", plan),
                Err(e) => eprintln!("{}", format!("Error: {}", e).red()),
            }
            continue;
        }

        match coordinator.process_query(&query) {
            Ok(result) => println!("{}", ResultFormatter::format(&result, OutputFormat::Table)),
            Err(e) => eprintln!("{}", format!("Error: {}", e).red()),
        }
    }

    let _ = rl.save_history(HISTORY_PATH);

    Ok(())
}

/// Print help message
fn print_help() {
    println!("{}", "Available commands:".bold().green());
    println!("  {}  - Show this help message", "help".cyan());
    println!("  {}  - Exit the console", "exit/quit".cyan());
    println!("  {}  - Clear the screen", "clear".cyan());
    println!("  {}  - Show the plan of the next query", "explain".cyan());
    println!("\n{}", "Query syntax:".bold().green());
    println!("  Multi-line queries are supported");
    println!("  Terminate input with semicolon (;)");
    println!("\n{}", "Examples:".bold().green());
    println!("  {}", "GO FROM \"Tim Duncan\" OVER like;".yellow());
    println!(
        "  {}",
        "GO FROM \"Tony Parker\" OVER like YIELD like._dst AS id | GO FROM $-.id OVER serve;"
            .yellow()
    );
    println!(
        "  {}",
        "FIND SHORTEST PATH FROM \"Tim Duncan\" TO \"LaMarcus Aldridge\" OVER like;".yellow()
    );
    println!(
        "  {}",
        "$a = GO FROM \"Tim Duncan\" OVER like YIELD like._dst AS id; GO FROM $a.id OVER like;"
            .yellow()
    );
}
