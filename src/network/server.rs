use std::{net::SocketAddr, path::PathBuf};

use axum::Router;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::{
    analysis::create_analysis_pipeline,
    config::Configuration,
    error::AppError,
    http::{AppState, create_router},
    storage::UploadStore,
};

pub struct Server {
    listener: TcpListener,
    router: Router,
    cancel_token: CancellationToken,
}

impl Server {
    pub fn local_addr(&self) -> Result<SocketAddr, AppError> {
        self.listener
            .local_addr()
            .map_err(|e| AppError::BindError(e, "local address".to_string()))
    }

    /// Serves until the cancel token fires, then lets in-flight requests finish.
    pub async fn start(self) -> Result<(), AppError> {
        info!("Server running on {}", self.local_addr()?);
        let cancel_token = self.cancel_token;
        axum::serve(self.listener, self.router)
            .with_graceful_shutdown(async move {
                cancel_token.cancelled().await;
                info!("Shutting down server");
            })
            .await
            .map_err(AppError::ServeError)
    }
}

pub struct ServerBuilder {
    configuration: Configuration,
    cancel_token: Option<CancellationToken>,
}

impl ServerBuilder {
    pub fn new(configuration: Configuration) -> Self {
        Self {
            configuration,
            cancel_token: None,
        }
    }

    // Sets the listen host, this will override the configuration.
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.configuration.host = host.into();
        self
    }

    // Sets the listen port, this will override the configuration.
    pub fn port(mut self, port: u16) -> Self {
        self.configuration.port = port;
        self
    }

    // Sets where uploads are written, this will override the configuration.
    pub fn upload_dir(mut self, upload_dir: impl Into<PathBuf>) -> Self {
        self.configuration.upload_dir = upload_dir.into();
        self
    }

    pub fn cancel_token(mut self, cancel_token: CancellationToken) -> Self {
        self.cancel_token = Some(cancel_token);
        self
    }

    pub async fn build(self) -> Result<Server, AppError> {
        let configuration = self.configuration;
        configuration.validate()?;

        let store = UploadStore::open(&configuration.upload_dir).await?;
        let state = AppState::new(store, create_analysis_pipeline(&configuration));
        let router = create_router(state, &configuration);

        let address = configuration.bind_address();
        let listener = TcpListener::bind(&address)
            .await
            .map_err(|e| AppError::BindError(e, address.clone()))?;

        Ok(Server {
            listener,
            router,
            cancel_token: self.cancel_token.unwrap_or_default(),
        })
    }
}
