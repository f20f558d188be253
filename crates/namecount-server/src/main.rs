use anyhow::{Context, Result};
use clap::Parser;
use namecount_config::RuntimeConfig;
use std::path::PathBuf;

/// HTTP server greeting names and counting occurrences in object storage
#[derive(Parser)]
#[command(name = "namecount")]
#[command(version)]
#[command(about = "HTTP server greeting names and counting occurrences in object storage", long_about = None)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// HTTP listen port (overrides config file)
    #[arg(short, long, value_name = "PORT")]
    port: Option<u16>,

    /// Directory for the counter document (filesystem backend only)
    #[arg(short, long, value_name = "DIR")]
    data_dir: Option<PathBuf>,

    /// Log level: trace, debug, info, warn, error
    #[arg(short = 'v', long, value_name = "LEVEL")]
    log_level: Option<String>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("Failed to build tokio runtime")?
        .block_on(async_main(cli))
}

async fn async_main(cli: Cli) -> Result<()> {
    // Step 1: Load base configuration
    let mut config = if let Some(config_path) = &cli.config {
        RuntimeConfig::load_from_path(config_path)
            .with_context(|| format!("Failed to load config from {}", config_path.display()))?
    } else {
        RuntimeConfig::load_or_default().context("Failed to load configuration")?
    };

    // Step 2: Apply CLI overrides (highest priority)
    apply_cli_overrides(&mut config, &cli)?;

    // Step 3: Validate configuration early (creates directories, tests write permissions)
    validate_config(&config)?;

    // Step 4: Run server with resolved config
    namecount_server::run_with_config(config).await
}

fn apply_cli_overrides(config: &mut RuntimeConfig, cli: &Cli) -> Result<()> {
    use namecount_config::{ServerConfig, StoreBackend};

    if let Some(port) = cli.port {
        let server = config.server.get_or_insert_with(ServerConfig::default);
        server.listen_addr = format!("0.0.0.0:{}", port);
    }

    if let Some(data_dir) = &cli.data_dir {
        if config.store.backend != StoreBackend::Fs {
            anyhow::bail!(
                "--data-dir flag only works with filesystem backend, but backend is '{}'.\n\
                Either remove --data-dir flag or set backend to 'fs' in config file.",
                config.store.backend
            );
        }

        let fs_config = config.store.fs.get_or_insert_with(Default::default);
        fs_config.path = data_dir.to_string_lossy().to_string();
    }

    if let Some(level) = &cli.log_level {
        let server = config.server.get_or_insert_with(ServerConfig::default);
        server.log_level = level.clone();
    }

    Ok(())
}

fn validate_config(config: &RuntimeConfig) -> Result<()> {
    use namecount_config::StoreBackend;
    use std::fs;

    // Validate filesystem data directory if using fs backend
    if config.store.backend == StoreBackend::Fs {
        let fs_config = config
            .store
            .fs
            .as_ref()
            .ok_or_else(|| anyhow::anyhow!("filesystem backend requires store.fs configuration"))?;

        let data_path = PathBuf::from(&fs_config.path);

        if !data_path.exists() {
            fs::create_dir_all(&data_path)
                .with_context(|| format!("Failed to create data directory: {}", fs_config.path))?;
        }

        let test_file = data_path.join(".namecount-write-test");
        fs::write(&test_file, b"test").with_context(|| {
            format!(
                "Data directory '{}' is not writable. Check permissions.",
                fs_config.path
            )
        })?;
        fs::remove_file(&test_file).context("Failed to remove test file")?;
    }

    config
        .server
        .as_ref()
        .ok_or_else(|| anyhow::anyhow!("server configuration required"))?;

    Ok(())
}
