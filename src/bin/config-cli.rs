use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use serde::Serialize;

use config_client::client::{
    ApiClient, ApiResponse, ApplicationService, Configuration, ConfigurationService,
    HeartbeatService,
};
use config_client::config::{load_settings, ClientSettings, ObservabilityConfig};
use config_client::lifecycle::{bootstrap, connect};
use config_client::observability::logging;
use config_client::security::SecretCipher;

#[derive(Parser)]
#[command(name = "config-cli")]
#[command(about = "Command-line client for the Configuration API", long_about = None)]
struct Cli {
    /// Settings file
    #[arg(short, long, default_value = "config-client.toml")]
    settings: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check that the API is reachable and report clock skew
    Heartbeat,
    /// Manage applications
    Applications {
        #[command(subcommand)]
        command: ApplicationCommands,
    },
    /// Manage configuration entries
    Configurations {
        #[command(subcommand)]
        command: ConfigurationCommands,
    },
    /// Read one value through the cache
    Value {
        key: String,
        /// Defaults to the application named in the settings
        #[arg(short, long)]
        application: Option<String>,
    },
    /// Run the startup load and print the snapshot
    Snapshot,
    /// Encrypt a certificate password for the settings file
    EncryptPassword { plaintext: String },
    /// Generate a new base64 encryption key
    GenerateKey,
}

#[derive(Subcommand)]
enum ApplicationCommands {
    List,
    Get { id: i32 },
    ByName { name: String },
    Delete { id: i32 },
}

#[derive(Subcommand)]
enum ConfigurationCommands {
    List,
    Get { id: i32 },
    ForApp { name: String },
    Insert {
        #[arg(long)]
        application_id: i32,
        #[arg(long)]
        key: String,
        #[arg(long)]
        value: String,
    },
    Delete { id: i32 },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Commands::EncryptPassword { plaintext } => {
            logging::init(&ObservabilityConfig::default());
            let cipher = SecretCipher::from_env()?;
            println!("{}", cipher.encrypt(&plaintext)?);
        }
        Commands::GenerateKey => {
            println!("{}", SecretCipher::generate_key());
        }
        Commands::Heartbeat => {
            let api = open(&cli.settings)?;
            let heartbeat = HeartbeatService::new(api);
            let skew = heartbeat.clock_skew().await?;
            println!("Server reachable, clock skew {} ms", skew.num_milliseconds());
        }
        Commands::Applications { command } => {
            let api = open(&cli.settings)?;
            let service = ApplicationService::new(api);
            match command {
                ApplicationCommands::List => print_response(service.get_all().await?)?,
                ApplicationCommands::Get { id } => print_response(service.get_by_id(id).await?)?,
                ApplicationCommands::ByName { name } => {
                    print_response(service.get_by_name(&name).await?)?
                }
                ApplicationCommands::Delete { id } => print_response(service.delete(id).await?)?,
            }
        }
        Commands::Configurations { command } => {
            let api = open(&cli.settings)?;
            let service = ConfigurationService::new(api);
            match command {
                ConfigurationCommands::List => print_response(service.get_all().await?)?,
                ConfigurationCommands::Get { id } => {
                    print_response(service.get_by_id(id).await?)?
                }
                ConfigurationCommands::ForApp { name } => {
                    print_response(service.get_by_application_name(&name).await?)?
                }
                ConfigurationCommands::Insert {
                    application_id,
                    key,
                    value,
                } => {
                    let configuration = Configuration::new(application_id, key, value);
                    configuration.validate()?;
                    print_response(service.insert(&configuration).await?)?
                }
                ConfigurationCommands::Delete { id } => {
                    print_response(service.delete(id).await?)?
                }
            }
        }
        Commands::Value { key, application } => {
            let settings = load(&cli.settings)?;
            let started = bootstrap(&settings).await?;
            let application = application.unwrap_or_else(|| started.application_name.clone());
            let values = started.into_values();
            match values.get_value(&application, &key).await? {
                Some(value) => println!("{}", value),
                None => {
                    eprintln!("Key '{}' not found for application '{}'", key, application);
                    std::process::exit(1);
                }
            }
        }
        Commands::Snapshot => {
            let settings = load(&cli.settings)?;
            let started = bootstrap(&settings).await?;
            let sorted: BTreeMap<String, String> = started.snapshot.into_map().into_iter().collect();
            println!("{}", serde_json::to_string_pretty(&sorted)?);
        }
    }

    Ok(())
}

fn load(path: &Path) -> Result<ClientSettings, Box<dyn std::error::Error>> {
    let settings = load_settings(path)?;
    logging::init(&settings.observability);
    Ok(settings)
}

fn open(path: &Path) -> Result<ApiClient, Box<dyn std::error::Error>> {
    let settings = load(path)?;
    let cipher = SecretCipher::from_env()?;
    Ok(connect(&settings, &cipher)?)
}

fn print_response<T: Serialize>(res: ApiResponse<T>) -> Result<(), Box<dyn std::error::Error>> {
    if !res.is_success {
        eprintln!("Error: Configuration API returned status {}", res.status);
        if let Some(error) = res.error {
            eprintln!("Reason: {}", error.reason);
            if !error.content.is_empty() {
                eprintln!("Response: {}", error.content);
            }
        }
        return Ok(());
    }

    match res.content {
        Some(content) => println!("{}", serde_json::to_string_pretty(&content)?),
        None => println!("(empty response, status {})", res.status),
    }
    Ok(())
}
