use std::{net::SocketAddr, sync::Arc};

use axum::Router;
use configs::{AppConfig, MailProvider, RepositoryBackend, ServerConfig};
use migration::MigratorTrait;
use service::city_info::repo::{CitiesDataStore, InMemoryRepositoryFactory, SeaOrmRepositoryFactory};
use service::city_info::RepositoryFactory;
use service::mail::{CloudMailService, LocalMailService, MailService};
use tower_http::cors::CorsLayer;
use tracing::info;

use crate::errors::StartupError;
use crate::routes;
use crate::state::AppState;

fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

fn bind_addr(server: &ServerConfig) -> Result<SocketAddr, StartupError> {
    format!("{}:{}", server.host, server.port)
        .parse()
        .map_err(|e| StartupError::InvalidConfig(format!("server address {}:{}: {e}", server.host, server.port)))
}

async fn build_repositories(cfg: &AppConfig) -> anyhow::Result<Arc<dyn RepositoryFactory>> {
    match cfg.repository.backend {
        RepositoryBackend::Memory => {
            info!(backend = "memory", "using seeded in-memory city store");
            Ok(Arc::new(InMemoryRepositoryFactory::new(Arc::new(CitiesDataStore::seeded()))))
        }
        RepositoryBackend::Database => {
            let db = models::db::connect(&cfg.database).await?;
            if cfg.database.run_migrations {
                migration::Migrator::up(&db, None).await?;
                info!("database migrations applied");
            }
            info!(backend = "database", "using database city store");
            Ok(Arc::new(SeaOrmRepositoryFactory::new(db)))
        }
    }
}

fn build_mail(cfg: &AppConfig) -> Arc<dyn MailService> {
    let mail = &cfg.mail;
    match mail.effective_provider() {
        MailProvider::Local => Arc::new(LocalMailService::new(&mail.from_address, &mail.to_address)),
        MailProvider::Cloud => Arc::new(CloudMailService::new(&mail.from_address, &mail.to_address)),
    }
}

/// Wire repositories and mail sink according to the configuration.
pub async fn build_state(cfg: &AppConfig) -> anyhow::Result<AppState> {
    let repositories = build_repositories(cfg).await?;
    Ok(AppState::new(repositories, build_mail(cfg)))
}

/// Build the app from `cfg` and serve it until the listener fails.
pub async fn run(cfg: AppConfig) -> Result<(), StartupError> {
    let state = build_state(&cfg).await?;
    let app: Router = routes::build_router(state, build_cors());

    let addr = bind_addr(&cfg.server)?;
    info!(%addr, "starting server");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bind_addr_rejects_unparseable_host() {
        let server = ServerConfig { host: "not a host".into(), port: 8080, worker_threads: None };
        assert!(matches!(bind_addr(&server), Err(StartupError::InvalidConfig(_))));
        let server = ServerConfig { host: "0.0.0.0".into(), port: 9000, worker_threads: None };
        assert_eq!(bind_addr(&server).unwrap().port(), 9000);
    }

    #[tokio::test]
    async fn run_reports_bad_address_as_invalid_config() {
        let mut cfg = configs::from_toml_str("").unwrap();
        cfg.server.host = "not a host".into();
        assert!(matches!(run(cfg).await, Err(StartupError::InvalidConfig(_))));
    }

    #[tokio::test]
    async fn run_reports_taken_port_as_io_error() {
        let taken = tokio::net::TcpListener::bind(("127.0.0.1", 0)).await.unwrap();
        let mut cfg = configs::from_toml_str("").unwrap();
        cfg.server.port = taken.local_addr().unwrap().port();
        assert!(matches!(run(cfg).await, Err(StartupError::Io(_))));
    }

    #[tokio::test]
    async fn database_backend_migrates_sqlite_on_startup() {
        let cfg = configs::from_toml_str(
            r#"
            [repository]
            backend = "database"

            [database]
            url = "sqlite::memory:"
            max_connections = 1
            min_connections = 1
            "#,
        )
        .unwrap();
        let state = build_state(&cfg).await.unwrap();
        assert_eq!(state.cities.list().await.unwrap().len(), 3);
    }
}
