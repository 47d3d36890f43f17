use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use tracing_subscriber::EnvFilter;

mod cli;
mod config;
mod detect;
mod render;
mod variables;

#[derive(Parser)]
#[command(name = "promptvars", version)]
#[command(about = "Extract, preview, and convert variables in prompt text", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the variables referenced in a prompt file
    Vars {
        /// Prompt file to scan
        path: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Render a preview with defaults or bound values substituted
    Render {
        /// Prompt file to render
        path: String,

        /// Bind a variable (repeatable)
        #[arg(short, long = "set", value_name = "NAME=VALUE")]
        set: Vec<String>,

        /// Path to config file (defaults to ./promptvars.toml or ~/.config/promptvars/config.toml)
        #[arg(long)]
        config: Option<String>,
    },

    /// Report placeholder-like text written in unsupported syntaxes
    Detect {
        /// Prompt file to check
        path: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,

        /// Path to config file
        #[arg(long)]
        config: Option<String>,
    },

    /// Rewrite unsupported placeholder syntaxes into ${...} form
    Convert {
        /// Prompt file to convert
        path: String,

        /// Rewrite the file in place instead of printing the result
        #[arg(long)]
        write: bool,

        /// Path to config file
        #[arg(long)]
        config: Option<String>,
    },

    /// Generate shell completions
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
}

fn main() -> Result<()> {
    // Logs go to stderr so piped render output stays clean
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Vars { path, json } => cli::vars::run(&path, json)?,
        Commands::Render { path, set, config } => cli::render::run(&path, &set, config)?,
        Commands::Detect { path, json, config } => cli::detect::run(&path, json, config)?,
        Commands::Convert {
            path,
            write,
            config,
        } => cli::convert::run(&path, write, config)?,
        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            clap_complete::generate(shell, &mut cmd, name, &mut std::io::stdout());
        }
    }

    Ok(())
}
