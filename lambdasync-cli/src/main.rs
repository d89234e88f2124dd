// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! lambdasync CLI
//!
//! Command-line interface for deploying and configuring one AWS Lambda
//! function from a project directory.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod commands;

/// lambdasync - Deploy and configure a single AWS Lambda function
#[derive(Parser)]
#[command(name = "lambdasync")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Project directory holding the function source and lambdasync.json
    #[arg(short, long, default_value = ".")]
    pub dir: PathBuf,

    /// Project configuration file (defaults to lambdasync.yaml in the project directory)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Write the project settings file
    Init {
        /// AWS profile from ~/.aws/credentials
        #[arg(short, long)]
        profile: Option<String>,

        /// Lambda function name
        #[arg(short, long)]
        name: Option<String>,

        /// AWS region
        #[arg(short, long)]
        region: Option<String>,

        /// Execution role ARN used when the function is created
        #[arg(long)]
        role: Option<String>,
    },

    /// Package the project and create or update the function
    Deploy,

    /// Show the function configuration, or change it with key=value pairs
    Config {
        /// description=..., memory=..., timeout=...
        args: Vec<String>,
    },

    /// Call a provider operation directly
    Call {
        /// Operation as service.method, e.g. lambda.getFunctionConfiguration
        call: String,

        /// Parameters as Key=value; values naming a setting are replaced by it
        args: Vec<String>,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt().with_env_filter(log_level).init();

    // Dispatch to command handlers
    let result = match cli.command {
        Commands::Init {
            profile,
            name,
            region,
            role,
        } => commands::init::execute(&cli.dir, profile, name, region, role).await,
        Commands::Deploy => commands::deploy::execute(&cli.dir, cli.config.as_deref()).await,
        Commands::Config { args } => commands::config::execute(&cli.dir, &args).await,
        Commands::Call { call, args } => commands::call::execute(&cli.dir, &call, &args).await,
    };

    if let Err(e) = result {
        eprintln!("✗ {}", e);
        std::process::exit(1);
    }
}
