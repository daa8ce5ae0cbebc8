use crate::configuration::{Configuration, DatabaseConfigs};
use crate::forms::RegistrationForm;
use crate::routes::{health_check, user_routes};
use actix_web::dev::Server;
use actix_web::{App, HttpServer, web};
use anyhow::Context;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use std::net::TcpListener;
use tracing_actix_web::TracingLogger;

pub struct Application {
    port: u16,
    server: Server,
}

impl Application {
    pub async fn build(config: Configuration) -> Result<Self, anyhow::Error> {
        let connection_pool = get_connection_pool(&config.database);

        // Loaded once; handlers share it read-only for the lifetime of the process.
        let registration_form = RegistrationForm::new(config.password_policy)
            .context("Invalid registration form declaration")?;

        let address = format!("{}:{}", config.application.host, config.application.port);
        let listener = TcpListener::bind(address)
            .with_context(|| "Failed to bind TCP listener for application")?;
        let port = listener
            .local_addr()
            .with_context(|| "Failed to read local address of TCP listener")?
            .port();
        let server = run(listener, connection_pool, registration_form)
            .context("Failed to run Actix web server")?;

        tracing::info!(port, "Application started");
        Ok(Self { port, server })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub async fn run_until_stopped(self) -> Result<(), anyhow::Error> {
        self.server.await.context("Server stopped with an error")
    }
}

pub fn get_connection_pool(config: &DatabaseConfigs) -> PgPool {
    PgPoolOptions::new().connect_lazy_with(config.connect_options())
}

fn run(
    tcp_listener: TcpListener,
    db_pool: PgPool,
    registration_form: RegistrationForm,
) -> Result<Server, anyhow::Error> {
    let db_pool = web::Data::new(db_pool);
    let registration_form = web::Data::new(registration_form);

    let server = HttpServer::new(move || {
        App::new()
            .wrap(TracingLogger::default())
            .configure(configure_routes)
            .app_data(db_pool.clone())
            .app_data(registration_form.clone())
    })
    .listen(tcp_listener)
    .with_context(|| "Failed to bind Actix server to TCP listener")?
    .run();

    Ok(server)
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/health_check", web::get().to(health_check))
        .service(web::scope("/v1").service(web::scope("/user").configure(user_routes)));
}
