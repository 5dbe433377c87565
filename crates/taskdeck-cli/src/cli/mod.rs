//! CLI entry and dispatch.

use anyhow::{Context, Result};
use clap::Parser;
use taskdeck_core::api::ApiClient;
use taskdeck_core::config;
use taskdeck_core::logging;
use taskdeck_core::session::Session;

mod commands;

#[derive(Parser)]
#[command(name = "taskdeck")]
#[command(version)]
#[command(about = "Manage your tasks from the terminal")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Base URL of the task service (overrides TASKDECK_API_URL and config)
    #[arg(long, global = true, value_name = "URL")]
    api_url: Option<String>,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Create an account
    Register {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Log in and store the session token
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Email a one-time passcode for a password reset
    ForgotPassword {
        #[arg(long)]
        email: String,
    },
    /// Reset the password with the emailed passcode
    VerifyOtp {
        #[arg(long)]
        email: String,
        #[arg(long)]
        otp: String,
        #[arg(long = "new-password")]
        new_password: String,
    },
    /// Clear the stored session token
    Logout,

    /// Manage tasks
    Tasks {
        #[command(subcommand)]
        command: TaskCommands,
    },
    /// Manage configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(clap::Subcommand)]
enum TaskCommands {
    /// Lists all tasks
    List,
    /// Adds a task
    Add {
        #[arg(long)]
        title: String,
        #[arg(long)]
        description: String,
    },
    /// Edits a task; omitted fields keep their current value
    Edit {
        #[arg(value_name = "TASK_ID")]
        id: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        description: Option<String>,
    },
    /// Deletes a task
    Delete {
        #[arg(value_name = "TASK_ID")]
        id: String,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

#[derive(clap::Subcommand)]
enum ConfigCommands {
    /// Show the path to the config file
    Path,
    /// Initialize a default config file (if not present)
    Init,
    /// Persist the API base URL in the config file
    SetApiUrl {
        #[arg(value_name = "URL")]
        url: String,
    },
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();

    // Config commands must work even when the config file is broken.
    if let Commands::Config { command } = &cli.command {
        return config_command(command);
    }

    let config = config::Config::load().context("load config")?;

    let _log_guard = match logging::init(&config) {
        Ok(guard) => Some(guard),
        Err(e) => {
            eprintln!("Warning: logging disabled: {e:#}");
            None
        }
    };

    // one tokio runtime for everything
    let rt = tokio::runtime::Runtime::new().context("create tokio runtime")?;

    rt.block_on(async move { dispatch(cli, &config).await })
}

async fn dispatch(cli: Cli, config: &config::Config) -> Result<()> {
    let Cli { command, api_url } = cli;

    let session = Session::from_default_store();
    let client = || -> Result<ApiClient> {
        let client = ApiClient::from_config(config, api_url.as_deref())?;
        tracing::debug!(base_url = client.base_url(), "api client ready");
        Ok(client)
    };

    match command {
        Commands::Register {
            name,
            email,
            password,
        } => commands::auth::register(&client()?, &session, &name, &email, &password).await,
        Commands::Login { email, password } => {
            commands::auth::login(&client()?, &session, &email, &password).await
        }
        Commands::ForgotPassword { email } => commands::auth::forgot_password(&client()?, &email).await,
        Commands::VerifyOtp {
            email,
            otp,
            new_password,
        } => commands::auth::verify_otp(&client()?, &email, &otp, &new_password).await,

        Commands::Tasks { command } => match command {
            TaskCommands::List => commands::tasks::list(client()?, session).await,
            TaskCommands::Add { title, description } => {
                commands::tasks::add(client()?, session, &title, &description).await
            }
            TaskCommands::Edit {
                id,
                title,
                description,
            } => {
                commands::tasks::edit(
                    client()?,
                    session,
                    &id,
                    title.as_deref(),
                    description.as_deref(),
                )
                .await
            }
            TaskCommands::Delete { id, yes } => {
                commands::tasks::delete(client()?, session, &id, yes).await
            }
        },

        Commands::Logout => commands::auth::logout(&session),
        Commands::Config { command } => config_command(&command),
    }
}

fn config_command(command: &ConfigCommands) -> Result<()> {
    match command {
        ConfigCommands::Path => {
            commands::config::path();
            Ok(())
        }
        ConfigCommands::Init => commands::config::init(),
        ConfigCommands::SetApiUrl { url } => commands::config::set_api_url(url),
    }
}
