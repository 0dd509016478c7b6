// ABOUTME: Command-line interface definition using clap derive macros.
// ABOUTME: Defines all subcommands and their arguments.

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "arangodeploy")]
#[command(about = "Inspect and verify plan-driven ArangoDB deployments")]
#[command(version)]
pub struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Only print final results
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Print results as JSON lines
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create arangodeploy.yml and a starter deployment resource
    Init {
        /// Deployment name (defaults to the directory name)
        #[arg(short, long)]
        name: Option<String>,

        /// Deployment mode: Cluster, Single or ResilientSingle
        #[arg(short, long, default_value = "Cluster")]
        mode: String,

        /// Overwrite existing files
        #[arg(long)]
        force: bool,
    },

    /// Show members and the pending plan
    Status,

    /// Validate the stored plan
    Check,

    /// Wait until the live deployment is healthy for its mode
    Verify {
        /// Seconds to wait (overrides verify.ready_timeout)
        #[arg(short, long)]
        timeout: Option<u64>,
    },
}
