use anyhow::Result;
use clap::{Parser, Subcommand};
use scaffold::commands::validators;
use scaffold::config::{Config, ProgressMode, resolve_config_path};
use scaffold::git::CancelToken;
use scaffold::metrics::TracingMetrics;
use scaffold::{FetchError, commands::*, constants};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "scaffold")]
#[command(about = "Fetch project templates with all their submodules at a chosen ref")]
#[command(version)]
struct Cli {
    /// Configuration file path (defaults to $SCAFFOLD_CONFIG, then scaffold.yaml)
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Clone a repository at a ref, including nested submodules
    Fetch {
        /// Repository URL
        url: String,

        /// Branch, tag or commit to check out
        #[arg(short, long = "ref", default_value_t = constants::git::DEFAULT_REF.to_string())]
        reference: String,

        /// Target directory (defaults to the repository name)
        #[arg(short, long)]
        dir: Option<String>,

        /// Show git's own output instead of progress rows
        #[arg(short, long)]
        verbose: bool,

        /// Progress display
        #[arg(long, value_enum)]
        progress: Option<ProgressMode>,
    },

    /// Create a project from a configured template
    New {
        /// Template name
        template: String,

        /// Target directory (defaults to the template repository name)
        dir: Option<String>,

        /// Override the template's ref
        #[arg(short, long = "ref")]
        reference: Option<String>,

        /// Show git's own output instead of progress rows
        #[arg(short, long)]
        verbose: bool,

        /// Progress display
        #[arg(long, value_enum)]
        progress: Option<ProgressMode>,
    },

    /// List configured templates
    Templates {
        /// Output in JSON format for machine consumption
        #[arg(long)]
        json: bool,
    },

    /// Add a template to the configuration file
    Add {
        /// Template name
        name: String,

        /// Repository URL
        url: String,

        /// Ref fetched by default
        #[arg(short, long = "ref")]
        reference: Option<String>,

        /// Short description shown by `templates`
        #[arg(short, long)]
        description: Option<String>,
    },

    /// Write the bundled configuration to a file
    Init {
        /// Output file name
        #[arg(short, long, default_value_t = constants::config::DEFAULT_CONFIG_FILE.to_string())]
        output: String,

        /// Overwrite existing file if it exists
        #[arg(long)]
        overwrite: bool,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Err(error) = run(cli).await {
        let code = match error.downcast_ref::<FetchError>() {
            Some(fetch_error) if fetch_error.is_cancelled() => {
                eprintln!("cancelled");
                130
            }
            _ => {
                eprintln!("Error: {error:#}");
                1
            }
        };
        std::process::exit(code);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let Some(command) = cli.command else {
        anyhow::bail!("No command provided. Use --help for usage information.");
    };
    let config_path = resolve_config_path(cli.config.as_deref());

    match command {
        Commands::Fetch {
            url,
            reference,
            dir,
            verbose,
            progress,
        } => {
            validators::validate_repository_url(&url)?;
            validators::validate_reference(&reference)?;
            validators::validate_target_directory(&dir)?;

            let config = Config::load_or_default(&config_path)?;
            let context = fetch_context(config, verbose, progress);
            FetchCommand {
                url,
                reference,
                dir,
            }
            .execute(&context)
            .await?;
        }
        Commands::New {
            template,
            dir,
            reference,
            verbose,
            progress,
        } => {
            validators::validate_template_name(&template)?;
            validators::validate_target_directory(&dir)?;
            if let Some(reference) = &reference {
                validators::validate_reference(reference)?;
            }

            let config = Config::load_or_default(&config_path)?;
            let context = fetch_context(config, verbose, progress);
            NewCommand {
                template,
                dir,
                reference,
            }
            .execute(&context)
            .await?;
        }
        Commands::Templates { json } => {
            let config = Config::load_or_default(&config_path)?;
            ListTemplatesCommand { json }
                .execute(&CommandContext::new(config))
                .await?;
        }
        Commands::Add {
            name,
            url,
            reference,
            description,
        } => {
            validators::validate_template_name(&name)?;
            validators::validate_repository_url(&url)?;
            if let Some(reference) = &reference {
                validators::validate_reference(reference)?;
            }

            let config = Config::load_or_default(&config_path)?;
            AddTemplateCommand {
                name,
                url,
                reference,
                description,
                config_path,
            }
            .execute(&CommandContext::new(config))
            .await?;
        }
        Commands::Init { output, overwrite } => {
            // Init doesn't need config since it creates one
            InitCommand { output, overwrite }
                .execute(&CommandContext::new(Config::bundled()))
                .await?;
        }
    }

    Ok(())
}

/// Context for commands that fetch: CLI overrides, metrics and Ctrl-C
fn fetch_context(config: Config, verbose: bool, progress: Option<ProgressMode>) -> CommandContext {
    let settings = config.settings.with_overrides(verbose, progress);
    let cancel = CancelToken::new();

    let on_interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            on_interrupt.cancel();
        }
    });

    CommandContext::new(config)
        .with_settings(settings)
        .with_cancel(cancel)
        .with_metrics(Arc::new(TracingMetrics))
}
