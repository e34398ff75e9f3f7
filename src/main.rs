use seasonal_color::{AppError, Configuration, ServerBuilder};
use tokio_util::sync::CancellationToken;
use tracing::{Level, error, info};

fn init_logging(level: Level) {
    tracing_subscriber::fmt().with_max_level(level).init();
}

#[tokio::main]
async fn main() -> Result<(), AppError> {
    let configuration = Configuration::load()?;
    init_logging(configuration.log_level()?);
    info!("Uploads are stored in {}", configuration.upload_dir.display());

    let cancel_token = CancellationToken::new();
    let server = ServerBuilder::new(configuration)
        .cancel_token(cancel_token.clone())
        .build()
        .await?;

    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to listen for shutdown signal: {}", e);
            return;
        }
        cancel_token.cancel();
    });

    server.start().await
}
