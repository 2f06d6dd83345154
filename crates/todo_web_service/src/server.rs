use std::net::SocketAddr;

use actix_cors::Cors;
use actix_web::{dev::Server, dev::ServerHandle, http::header, web, App, HttpServer};
use todo_core::{StoreResult, TodoStore};
use tracing::{error, info};

use crate::config::{ServerConfig, StorageBackend};
use crate::controllers::{system_controller, todo_controller};
use crate::error::AppError;
use crate::middleware::RequestTrace;

pub struct AppState {
    pub store: TodoStore,
}

impl AppState {
    pub fn new(store: TodoStore) -> Self {
        Self { store }
    }
}

/// Opens the storage selected by `config`. Must complete before the HTTP
/// server is built so handlers never see an uninitialised store.
pub async fn build_store(config: &ServerConfig) -> StoreResult<TodoStore> {
    match config.storage {
        StorageBackend::Memory => {
            info!("Using in-memory todo storage");
            Ok(TodoStore::in_memory())
        }
        StorageBackend::Sqlite => {
            info!("Using sqlite todo storage at {}", config.db_path.display());
            TodoStore::sqlite(&config.db_path).await
        }
    }
}

fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .error_handler(|err, _req| AppError::BadRequest(err.to_string()).into())
}

pub fn app_config(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config())
        .service(web::scope("/api").configure(todo_controller::config))
        .configure(system_controller::config);
}

pub fn build_cors(allowed_origins: &[String]) -> Cors {
    let cors = Cors::default()
        .allowed_methods(vec!["GET", "POST", "PUT", "DELETE", "OPTIONS"])
        .allowed_headers(vec![
            header::ORIGIN,
            header::CONTENT_TYPE,
            header::ACCEPT,
            header::AUTHORIZATION,
        ])
        .max_age(3600);

    if allowed_origins.iter().any(|origin| origin == "*") {
        return cors.allow_any_origin();
    }
    allowed_origins
        .iter()
        .fold(cors, |cors, origin| cors.allowed_origin(origin))
}

fn build_server(
    config: &ServerConfig,
    store: TodoStore,
) -> Result<(Server, Vec<SocketAddr>), String> {
    let app_state = web::Data::new(AppState::new(store));
    let allowed_origins = config.allowed_origins.clone();

    let server = HttpServer::new(move || {
        App::new()
            .app_data(app_state.clone())
            .wrap(build_cors(&allowed_origins))
            .wrap(RequestTrace)
            .configure(app_config)
    })
    .workers(config.workers.max(1))
    .bind(config.bind_address())
    .map_err(|e| format!("Failed to bind server: {e}"))?;

    let addrs = server.addrs();
    Ok((server.run(), addrs))
}

/// Serves until the process is stopped.
pub async fn run(config: ServerConfig, store: TodoStore) -> Result<(), String> {
    let (server, _) = build_server(&config, store)?;

    info!("Starting todo service on http://{}", config.bind_address());

    if let Err(e) = server.await {
        error!("Web server error: {}", e);
        return Err(format!("Web server error: {e}"));
    }

    Ok(())
}

/// Handle for embedding the service in a host process that needs to start and
/// stop it on demand.
pub struct WebService {
    config: ServerConfig,
    server_handle: Option<ServerHandle>,
    join_handle: Option<tokio::task::JoinHandle<()>>,
    local_addrs: Vec<SocketAddr>,
}

impl WebService {
    pub fn new(config: ServerConfig) -> Self {
        Self {
            config,
            server_handle: None,
            join_handle: None,
            local_addrs: Vec::new(),
        }
    }

    pub async fn start(&mut self, store: TodoStore) -> Result<(), String> {
        if self.join_handle.is_some() {
            return Err("Web service is already running".to_string());
        }

        let (server, addrs) = build_server(&self.config, store)?;
        let server_handle = server.handle();

        let join_handle = tokio::spawn(async move {
            if let Err(e) = server.await {
                error!("Web server error: {}", e);
            }
        });

        self.server_handle = Some(server_handle);
        self.join_handle = Some(join_handle);
        self.local_addrs = addrs;

        info!("Web service started on {:?}", self.local_addrs);
        Ok(())
    }

    pub async fn stop(&mut self) -> Result<(), String> {
        if let Some(server_handle) = self.server_handle.take() {
            server_handle.stop(true).await;
        }

        if let Some(handle) = self.join_handle.take() {
            if let Err(e) = handle.await {
                error!("Error waiting for server shutdown: {}", e);
                return Err(format!("Error waiting for server shutdown: {e}"));
            }
        }

        self.local_addrs.clear();
        info!("Web service stopped");
        Ok(())
    }

    pub fn is_running(&self) -> bool {
        self.join_handle.is_some()
    }

    /// Addresses the running server is bound to; empty when stopped.
    pub fn local_addrs(&self) -> &[SocketAddr] {
        &self.local_addrs
    }
}

impl Drop for WebService {
    fn drop(&mut self) {
        if let Some(server_handle) = self.server_handle.take() {
            // The stop command is sent eagerly; the returned future only waits.
            drop(server_handle.stop(false));
        }
    }
}
