use anyhow::Context;
use bookshelf::{
    cli::{
        init::{self, InitConfig, InitResult},
        output::Output,
        Cli, Commands,
    },
    create_app,
    db::seed::seed_demo_data,
    utils::toml_config::{BookshelfConfig, LogFormat},
    AppState, AuthService, LibraryStore,
};
use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> ExitCode {
    // A missing .env is fine; the variables may come from the environment
    dotenvy::dotenv().ok();

    let cli = Cli::parse_args();
    let output = Output::new(!cli.no_color);

    let result = match cli.command {
        Some(Commands::Init { path, force }) => {
            return match init::run(InitConfig { path, force }, &output) {
                InitResult::Success => ExitCode::SUCCESS,
                InitResult::AlreadyExists | InitResult::Error(_) => ExitCode::FAILURE,
            };
        }
        Some(Commands::Config { validate }) => show_config(&cli.config, validate, &output),
        Some(Commands::Serve { host, port }) => serve(&cli.config, cli.verbose, host, port).await,
        None => serve(&cli.config, cli.verbose, None, None).await,
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            output.error(&format!("{:#}", e));
            ExitCode::FAILURE
        }
    }
}

async fn serve(
    config_path: &Path,
    verbose: bool,
    host: Option<String>,
    port: Option<u16>,
) -> anyhow::Result<()> {
    let mut config = BookshelfConfig::load(config_path)
        .with_context(|| format!("Failed to load {}", config_path.display()))?;
    if let Some(host) = host {
        config.server.host = host;
    }
    if let Some(port) = port {
        config.server.port = port;
    }

    init_tracing(&config, verbose);

    let secret = config.jwt_secret()?;
    let auth_service = Arc::new(AuthService::from_config(&config.auth, &secret)?);

    let store = LibraryStore::open(&config.database.url)
        .await
        .with_context(|| format!("Failed to open database at {}", config.database.url))?;
    tracing::info!(url = %config.database.url, "database ready");

    if config.database.seed_demo_data {
        seed_demo_data(&store, &auth_service)
            .await
            .context("Failed to seed demo data")?;
    }

    let addr = config.bind_address();
    tracing::info!(
        policy = ?config.policy.book_ownership,
        token_lifetime_minutes = auth_service.token_lifetime().num_minutes(),
        "starting server"
    );

    let state = AppState::new(Arc::new(config), Arc::new(store), auth_service);
    let app = create_app(state);

    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    tracing::info!("listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    tracing::info!("server stopped");
    Ok(())
}

fn show_config(config_path: &Path, validate: bool, output: &Output) -> anyhow::Result<()> {
    let content = std::fs::read_to_string(config_path)
        .with_context(|| format!("Failed to read {}", config_path.display()))?;
    let config = BookshelfConfig::parse(&content)?;

    output.table(
        "Configuration",
        &[
            ("file", config_path.display().to_string()),
            ("listen", config.bind_address()),
            ("database", config.database.url.clone()),
            ("seed demo data", config.database.seed_demo_data.to_string()),
            ("issuer", config.auth.issuer.clone()),
            ("audience", config.auth.audience.clone()),
            (
                "token lifetime",
                format!("{} minutes", config.auth.token_lifetime_minutes),
            ),
            ("secret env", config.auth.jwt_secret_env.clone()),
            ("book ownership", format!("{:?}", config.policy.book_ownership)),
        ],
    );

    if validate {
        config.validate()?;
        output.success("Configuration is valid");
    }

    Ok(())
}

/// `RUST_LOG` wins over the configured level; `--verbose` forces debug.
fn init_tracing(config: &BookshelfConfig, verbose: bool) {
    let default_level = if verbose {
        "debug"
    } else {
        config.server.log_level.as_str()
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "bookshelf={lvl},bookshelf_server={lvl},tower_http={lvl}",
            lvl = default_level
        ))
    });

    let registry = tracing_subscriber::registry().with(filter);
    match config.server.log_format {
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json())
            .init(),
        LogFormat::Text => registry.with(tracing_subscriber::fmt::layer()).init(),
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown signal received");
}
