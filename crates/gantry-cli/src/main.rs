//! Gantry - MCP Docker build pipeline
//!
//! Usage:
//!   gantry analyze      # Scan servers.json, write the build plan
//!   gantry build        # Build local servers inside the image
//!   gantry endpoints    # List proxy SSE endpoints
//!   gantry prepare      # Write the clean runtime configuration

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use gantry_core::commands::{
    AnalyzeCommand, BuildCommand, BuildReport, EndpointsCommand, PrepareCommand, PrepareReport,
    ServerBuildOutcome,
};
use gantry_core::config::paths::{
    APP_ROOT, BUILD_PLAN_OUTPUT, BUILD_PLAN_RUNTIME, CLEAN_CONFIG, RUNTIME_CONFIG, SERVERS_CONFIG,
    SSE_PORT,
};
use gantry_core::requirements::CheckOutcome;

#[derive(Parser)]
#[command(name = "gantry")]
#[command(about = "MCP Docker build pipeline", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze the multi-server configuration and write the build plan
    Analyze {
        /// Multi-server configuration file
        #[arg(long, default_value = SERVERS_CONFIG)]
        config: PathBuf,

        /// Where the build plan is written
        #[arg(long, default_value = BUILD_PLAN_OUTPUT)]
        output: PathBuf,

        /// Build context root the server directories resolve against
        #[arg(long, default_value = ".")]
        context_root: PathBuf,
    },

    /// Build local servers inside the image from the build plan
    Build {
        /// Build plan written by the analyze phase
        #[arg(long, default_value = BUILD_PLAN_RUNTIME)]
        plan: PathBuf,

        /// Root the plan's server directories resolve against
        #[arg(long, default_value = APP_ROOT)]
        app_root: PathBuf,
    },

    /// List the SSE endpoints the proxy serves
    Endpoints {
        /// Multi-server configuration file
        #[arg(long, default_value = SERVERS_CONFIG)]
        config: PathBuf,

        /// Proxy port the URLs point at
        #[arg(long, default_value_t = SSE_PORT)]
        port: u16,
    },

    /// Check requirements, run pre-run commands, write the clean configuration
    Prepare {
        /// Multi-server configuration file
        #[arg(long, default_value = RUNTIME_CONFIG)]
        config: PathBuf,

        /// Where the clean configuration is written
        #[arg(long, default_value = CLEAN_CONFIG)]
        output: PathBuf,
    },
}

fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "gantry=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    run_cli(cli.command)
}

fn run_cli(command: Commands) -> Result<()> {
    match command {
        Commands::Analyze {
            config,
            output,
            context_root,
        } => run_analyze(config, output, context_root),
        Commands::Build { plan, app_root } => run_build(plan, app_root),
        Commands::Endpoints { config, port } => run_endpoints(config, port),
        Commands::Prepare { config, output } => run_prepare(config, output),
    }
}

fn run_analyze(config: PathBuf, output: PathBuf, context_root: PathBuf) -> Result<()> {
    println!("Analyzing MCP server configuration for Docker build...");

    let command = AnalyzeCommand::new(config, output, context_root);
    let report = command.execute()?;

    for server in &report.plan.local_servers {
        println!(
            "Found local server: {} at {} (file: {})",
            server.name, server.path, server.file_path
        );
    }
    for warning in &report.warnings {
        println!("⚠ {}", warning);
    }

    println!();
    println!("Found {} local server(s)", report.plan.local_servers.len());
    println!(
        "Generated {} copy instruction(s)",
        report.plan.copy_instructions.len()
    );
    println!(
        "Generated {} build instruction(s)",
        report.plan.build_instructions.len()
    );
    println!("Build info written to {}", command.output_path().display());

    Ok(())
}

fn run_build(plan: PathBuf, app_root: PathBuf) -> Result<()> {
    println!("Building local MCP servers dynamically...");

    let command = BuildCommand::new(plan, app_root);
    let report = command.execute()?;
    print_build_report(&report);

    Ok(())
}

fn print_build_report(report: &BuildReport) {
    if !report.plan_found {
        println!("No build info found, skipping local server builds");
        return;
    }

    println!("Found {} local server(s) to process", report.servers.len());
    for result in &report.servers {
        println!();
        println!(
            "Processing server: {} at {}",
            result.name,
            result.server_dir.display()
        );
        match &result.outcome {
            ServerBuildOutcome::NoManifest => {
                println!("No package.json found for {}, skipping", result.name);
            }
            ServerBuildOutcome::Installed => {
                println!("No build script found for {}, skipping build", result.name);
            }
            ServerBuildOutcome::Built { output_found: true } => {
                println!("Build successful for {}", result.name);
            }
            ServerBuildOutcome::Built {
                output_found: false,
            } => {
                println!("No build directory found for {}", result.name);
            }
        }
    }

    println!();
    println!("✅ All local MCP servers processed successfully");
}

fn run_endpoints(config: PathBuf, port: u16) -> Result<()> {
    let report = EndpointsCommand::new(config, port).execute();

    if let Some(reason) = &report.fallback_reason {
        eprintln!("Error: {}", reason);
    }

    println!("Available servers:");
    for endpoint in &report.endpoints {
        println!("- {}: {}", endpoint.display_name, endpoint.url);
    }

    Ok(())
}

fn run_prepare(config: PathBuf, output: PathBuf) -> Result<()> {
    println!("Processing MCP server configuration...");

    let report = PrepareCommand::new(config, output).execute()?;
    print_prepare_report(&report);

    Ok(())
}

fn print_prepare_report(report: &PrepareReport) {
    for check in &report.requirements {
        match &check.outcome {
            CheckOutcome::Verified { detail } => {
                println!(
                    "✓ Requirement {} satisfied: {}",
                    check.requirement.name, detail
                );
            }
            CheckOutcome::Unverified => {
                println!("• Requirement {} not verified (no probe)", check.requirement.name);
            }
        }
    }
    if !report.commands_run.is_empty() {
        println!("Ran {} pre-run command(s)", report.commands_run.len());
    }

    println!();
    println!("✓ Configuration processing completed");
    println!(
        "✓ Clean configuration written to {}",
        report.output_path.display()
    );
    println!("✓ Ready for mcp-proxy");
}
