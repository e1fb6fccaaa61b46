//! Project Hub CLI
//!
//! Builds and serves the localized sitemap and robots.txt of a project hub.
//!
//! This is the binary entry point. The library functionality is in `lib.rs`.

use clap::Parser;
use color_eyre::eyre::Result;

/// Command-line interface for Project Hub.
#[derive(Parser)]
#[command(
    name = "projecthub",
    version,
    about = "Localized sitemaps for a project hub"
)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "projecthub.toml")]
    config: std::path::PathBuf,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

/// Available CLI commands.
#[derive(clap::Subcommand)]
enum Commands {
    /// Write sitemap.xml and robots.txt
    Build {
        /// Output directory (defaults to build.output_dir)
        #[arg(short, long)]
        output: Option<std::path::PathBuf>,
        /// Override site origin (e.g., https://example.com)
        #[arg(long)]
        base_url: Option<String>,
        /// Skip GitHub lookups
        #[arg(long)]
        offline: bool,
    },
    /// Serve the documents over HTTP
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value_t = 4321)]
        port: u16,
        /// Skip GitHub lookups
        #[arg(long)]
        offline: bool,
    },
    /// Validate configuration and content
    Check {
        /// Treat warnings as errors
        #[arg(long)]
        strict: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    projecthub::init_tracing(cli.verbose);

    match cli.command {
        Commands::Build {
            output,
            base_url,
            offline,
        } => {
            projecthub::cmd::build::run(
                &cli.config,
                output.as_deref(),
                base_url.as_deref(),
                offline,
            )
            .await?;
        }
        Commands::Serve { port, offline } => {
            projecthub::cmd::serve::run(&cli.config, port, offline).await?;
        }
        Commands::Check { strict } => {
            projecthub::cmd::check::run(&cli.config, strict)?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::*;

    #[test]
    fn test_cli_build_command_parsing() {
        let args = ["projecthub", "build", "--output", "dist"];
        let cli = Cli::parse_from(args);

        assert_eq!(cli.config, std::path::PathBuf::from("projecthub.toml"));
        assert_eq!(cli.verbose, 0);

        match cli.command {
            Commands::Build {
                output,
                base_url,
                offline,
            } => {
                assert_eq!(output, Some(std::path::PathBuf::from("dist")));
                assert!(base_url.is_none());
                assert!(!offline);
            }
            _ => panic!("Expected Build command"),
        }
    }

    #[test]
    fn test_cli_build_with_overrides() {
        let args = [
            "projecthub",
            "build",
            "--base-url",
            "https://preview.example.com",
            "--offline",
        ];
        let cli = Cli::parse_from(args);

        match cli.command {
            Commands::Build {
                output,
                base_url,
                offline,
            } => {
                assert!(output.is_none());
                assert_eq!(base_url.as_deref(), Some("https://preview.example.com"));
                assert!(offline);
            }
            _ => panic!("Expected Build command"),
        }
    }

    #[test]
    fn test_cli_serve_command_parsing() {
        let args = ["projecthub", "serve"];
        let cli = Cli::parse_from(args);

        match cli.command {
            Commands::Serve { port, offline } => {
                assert_eq!(port, 4321);
                assert!(!offline);
            }
            _ => panic!("Expected Serve command"),
        }
    }

    #[test]
    fn test_cli_serve_with_port() {
        let args = ["projecthub", "serve", "-p", "8080", "--offline"];
        let cli = Cli::parse_from(args);

        match cli.command {
            Commands::Serve { port, offline } => {
                assert_eq!(port, 8080);
                assert!(offline);
            }
            _ => panic!("Expected Serve command"),
        }
    }

    #[test]
    fn test_cli_check_command_parsing() {
        let args = ["projecthub", "check", "--strict"];
        let cli = Cli::parse_from(args);

        match cli.command {
            Commands::Check { strict } => {
                assert!(strict);
            }
            _ => panic!("Expected Check command"),
        }
    }

    #[test]
    fn test_cli_verbose_and_config() {
        let args = ["projecthub", "-vv", "-c", "site.toml", "check"];
        let cli = Cli::parse_from(args);

        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.config, std::path::PathBuf::from("site.toml"));
    }
}
