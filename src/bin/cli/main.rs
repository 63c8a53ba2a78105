use std::{path::PathBuf, sync::Arc, time::Duration};

use anyhow::{bail, Context, Result};
use bunny_storage_adapter::{
    adapters::outbound::{
        settings::InMemorySettingsStore,
        storage::{BunnyClient, BunnyStorageProvider, StorageEndpoints, CONNECTION_TEST_KEY},
    },
    domain::{
        models::{ProviderSettings, UploadRequest, UploadSource, WriteProbe},
        value_objects::ObjectKey,
    },
    ports::storage::StorageProvider,
};
use clap::{Parser, Subcommand};
use tracing_subscriber::{filter::LevelFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "bunny-offload-cli")]
#[command(about = "CLI for working with a Bunny.net storage zone", long_about = None)]
struct Cli {
    /// Storage zone name
    #[arg(short, long, env = "BUNNY_STORAGE_ZONE", default_value = "")]
    zone: String,

    /// Storage zone password / API key
    #[arg(long, env = "BUNNY_API_KEY", default_value = "", hide_env_values = true)]
    api_key: String,

    /// Storage region (empty for the default region)
    #[arg(long, env = "BUNNY_REGION", default_value = "")]
    region: String,

    /// Pull zone URL used for public object URLs
    #[arg(long, env = "BUNNY_CDN_URL", default_value = "")]
    cdn_url: String,

    /// Custom CNAME used when no pull zone URL is set
    #[arg(long, env = "BUNNY_CUSTOM_CNAME", default_value = "")]
    custom_cname: String,

    /// Serve object URLs from the generic delivery domain
    #[arg(
        long,
        env = "BUNNY_ENABLE_DELIVERY_DOMAIN",
        default_value = "false",
        action = clap::ArgAction::Set,
        value_parser = clap::builder::BoolishValueParser::new()
    )]
    enable_delivery_domain: bool,

    /// Generic delivery domain, used when neither CDN URL nor CNAME is set
    #[arg(long, env = "BUNNY_DELIVERY_DOMAIN", default_value = "")]
    delivery_domain: String,

    /// Storage API host, without region
    #[arg(long, env = "BUNNY_STORAGE_HOST", default_value = "storage.bunnycdn.com")]
    storage_host: String,

    /// HTTP request timeout in seconds
    #[arg(long, env = "BUNNY_TIMEOUT_SECS", default_value = "30")]
    timeout_secs: u64,

    /// Log level
    #[arg(long, env = "LOG_LEVEL", default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Check that the zone, or an object in it, exists
    Exists {
        /// Object key; checks the zone when omitted
        key: Option<String>,
    },

    /// Print the region of the zone
    Location,

    /// Print the public URL of an object
    Url {
        /// Object key
        key: String,
        /// Cache-busting timestamp
        #[arg(short, long)]
        timestamp: Option<u64>,
    },

    /// List objects under a prefix
    List {
        /// Prefix to list
        #[arg(short, long, default_value = "")]
        prefix: String,
    },

    /// Upload a local file
    Put {
        /// Object key
        key: String,
        /// File path to upload
        file: PathBuf,
        /// Content type to store with the object
        #[arg(short, long)]
        content_type: Option<String>,
    },

    /// Download an object
    Get {
        /// Object key
        key: String,
        /// Output file path; stdout when omitted
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Delete an object
    Delete {
        /// Object key
        key: String,
    },

    /// Write and remove a probe object
    CanWrite {
        /// Probe key
        #[arg(default_value = CONNECTION_TEST_KEY)]
        key: String,
    },

    /// Purge the whole CDN cache of the delivery domain
    Purge,
}

impl Cli {
    fn settings(&self) -> ProviderSettings {
        ProviderSettings {
            storage_zone: self.zone.clone(),
            api_key: self.api_key.clone(),
            region: self.region.clone(),
            cdn_url: self.cdn_url.clone(),
            custom_cname: self.custom_cname.clone(),
            delivery_domain_enabled: self.enable_delivery_domain,
            delivery_domain: self.delivery_domain.clone(),
        }
    }

    fn provider(&self) -> BunnyStorageProvider {
        let endpoints = StorageEndpoints {
            storage_host: self.storage_host.clone(),
            ..Default::default()
        };
        let client = BunnyClient::new(endpoints, Duration::from_secs(self.timeout_secs));

        BunnyStorageProvider::new(client, Arc::new(InMemorySettingsStore::new(self.settings())))
    }

    fn init_logging(&self) -> Result<()> {
        let level = self
            .log_level
            .parse::<LevelFilter>()
            .unwrap_or(LevelFilter::WARN);

        tracing_subscriber::registry()
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .with(level)
            .try_init()
            .context("Failed to initialize logging")?;

        Ok(())
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    cli.init_logging()?;

    let provider = cli.provider();
    let zone = cli.zone.as_str();

    match &cli.command {
        Commands::Exists { key: None } => {
            let exists = provider.bucket_exists(zone).await?;
            println!("{}", exists);
        }
        Commands::Exists { key: Some(key) } => {
            let key = ObjectKey::new(key)?;
            let exists = provider.object_exists(zone, key.as_str()).await?;
            println!("{}", exists);
        }
        Commands::Location => {
            let region = provider.bucket_location(zone).await?;
            println!("{}", region);
        }
        Commands::Url { key, timestamp } => {
            let key = ObjectKey::new(key)?;
            println!("{}", provider.object_url(zone, key.as_str(), *timestamp));
        }
        Commands::List { prefix } => {
            for entry in provider.list_objects(zone, prefix).await? {
                let name = entry.object_name.as_deref().unwrap_or_default();
                if entry.is_directory {
                    println!("{}/", name);
                } else {
                    println!("{}\t{}", name, entry.length.unwrap_or_default());
                }
            }
        }
        Commands::Put {
            key,
            file,
            content_type,
        } => {
            let key = ObjectKey::new(key)?;
            let request = UploadRequest::builder()
                .zone(zone)
                .key(key.as_str())
                .source(UploadSource::File(file.clone()))
                .maybe_content_type(content_type.clone())
                .build();

            provider.upload_object(request).await?;
            println!("{}", provider.object_url(zone, key.as_str(), None));
        }
        Commands::Get { key, output } => {
            let key = ObjectKey::new(key)?;
            let body = provider.get_object(zone, key.as_str()).await?;

            match output {
                Some(path) => tokio::fs::write(path, &body)
                    .await
                    .with_context(|| format!("Failed to write {}", path.display()))?,
                None => {
                    use std::io::Write;
                    std::io::stdout().write_all(&body)?;
                }
            }
        }
        Commands::Delete { key } => {
            let key = ObjectKey::new(key)?;
            provider.delete_object(zone, key.as_str()).await?;
        }
        Commands::CanWrite { key } => {
            match provider.can_write(zone, key, b"bunny write probe").await {
                WriteProbe::Writable => println!("writable"),
                WriteProbe::Failed(message) => bail!("Write probe failed: {}", message),
            }
        }
        Commands::Purge => {
            provider.purge_all().await?;
            println!("purged");
        }
    }

    Ok(())
}
