use crate::configuration::Settings;
use crate::routes::{health_check, leaderboard, register, update_user};
use actix_web::dev::Server;
use actix_web::{App, HttpServer, web};
use multi_solve::sources::SourceConfig;
use multi_solve::store::JsonMetricsStore;
use std::net::TcpListener;
use std::sync::Arc;
use tracing_actix_web::TracingLogger;

/// How the update route performs its passes; shared app state.
#[derive(Clone)]
pub struct UpdateSettings {
    pub sources: SourceConfig,
    pub ema_period: u32,
}

pub struct Application {
    port: u16,
    server: Server,
}

impl Application {
    pub async fn build(configuration: &Settings) -> Result<Self, anyhow::Error> {
        let listener = TcpListener::bind(format!(
            "{}:{}",
            configuration.application.host, configuration.application.port
        ))?;
        let port = listener.local_addr()?.port();

        let store = Arc::new(JsonMetricsStore::new(&configuration.store.data_dir)?);
        let update_settings = UpdateSettings {
            sources: configuration.sources.clone(),
            ema_period: configuration.ranking.ema_period,
        };

        let server = run(listener, store, update_settings)?;
        Ok(Self { port, server })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub async fn run_until_stopped(self) -> Result<(), std::io::Error> {
        self.server.await
    }
}

pub fn run(
    listener: TcpListener,
    store: Arc<JsonMetricsStore>,
    update_settings: UpdateSettings,
) -> Result<Server, std::io::Error> {
    let store = web::Data::from(store);
    let update_settings = web::Data::new(update_settings);
    let server = HttpServer::new(move || {
        App::new()
            .wrap(TracingLogger::default())
            .route("/health_check", web::get().to(health_check))
            .route("/leaderboard", web::get().to(leaderboard))
            .route("/register", web::post().to(register))
            .route("/update", web::post().to(update_user))
            .app_data(store.clone())
            .app_data(update_settings.clone())
    })
    .listen(listener)?
    .run();
    Ok(server)
}
