//! matrixd — Matrix Service daemon and command-line evaluator
//!
//! Commands:
//!   matrixd serve  — start the HTTP server
//!   matrixd eval   — run one operation on a JSON request body
//!   matrixd config — print the effective configuration

use matrix_service::{http, MatrixService, Operation, ServerConfig};
use std::env;
use std::io::Read;
use std::process::ExitCode;

fn print_usage() {
    let operations: Vec<&str> = Operation::ALL.iter().map(|op| op.endpoint()).collect();
    println!(
        r#"
Matrix Service — dense linear algebra over HTTP

Usage: matrixd <command> [options]

Commands:
  serve  [addr] [--config <file>]            Start the HTTP server
  eval   <operation> <file|-> [--config <file>]  Run one operation on a JSON body
  config [--config <file>]                   Print the effective configuration

Operations:
  {}

Examples:
  matrixd serve 0.0.0.0:5000
  matrixd eval sumar_matrices request.json
  echo '{{"matriz": [[2, 0], [0, 3]]}}' | matrixd eval calcular_determinante -
"#,
        operations.join("\n  ")
    );
}

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        print_usage();
        return ExitCode::SUCCESS;
    }

    let (positional, config_path) = split_config_flag(&args[2..]);
    let config = match load_config(config_path.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("  Failed to load configuration: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let outcome = match args[1].as_str() {
        "serve" => cmd_serve(&positional, config).await,
        "eval" => cmd_eval(&positional, config),
        "config" => cmd_config(config),
        "help" | "--help" | "-h" => {
            print_usage();
            Ok(())
        }
        other => {
            eprintln!("Unknown command: {}", other);
            print_usage();
            return ExitCode::FAILURE;
        }
    };

    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("  Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

/// Separate `--config <file>` from the positional arguments
fn split_config_flag(args: &[String]) -> (Vec<String>, Option<String>) {
    let mut positional = Vec::new();
    let mut config = None;
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        if arg == "--config" {
            config = iter.next().cloned();
        } else {
            positional.push(arg.clone());
        }
    }
    (positional, config)
}

fn load_config(path: Option<&str>) -> Result<ServerConfig, Box<dyn std::error::Error>> {
    let config = match path {
        Some(path) => ServerConfig::load(path)?,
        None => ServerConfig::default(),
    };
    Ok(config.with_env_overrides())
}

async fn cmd_serve(
    args: &[String],
    mut config: ServerConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(addr) = args.first() {
        config.bind_addr = addr.clone();
    }
    config.validate()?;
    http::serve(config).await
}

fn cmd_eval(args: &[String], config: ServerConfig) -> Result<(), Box<dyn std::error::Error>> {
    if args.len() < 2 {
        return Err("usage: matrixd eval <operation> <file|->".into());
    }
    let operation = Operation::from_endpoint(&args[0])
        .ok_or_else(|| format!("unknown operation '{}'", args[0]))?;

    let body = if args[1] == "-" {
        let mut buf = Vec::new();
        std::io::stdin().read_to_end(&mut buf)?;
        buf
    } else {
        std::fs::read(&args[1])?
    };

    let service = MatrixService::new(config.service);
    match service.execute_json(operation, &body) {
        Ok(result) => {
            println!("{}", serde_json::to_string_pretty(&result)?);
            Ok(())
        }
        Err(e) => {
            let body = http::ErrorBody::from(&e);
            println!("{}", serde_json::to_string_pretty(&body)?);
            Err(e.into())
        }
    }
}

fn cmd_config(config: ServerConfig) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string_pretty(&config)?);
    Ok(())
}
