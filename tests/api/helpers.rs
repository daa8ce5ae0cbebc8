use accounts::configuration::{self, DatabaseConfigs};
use accounts::domain::CustomUser;
use accounts::startup::{self, Application};
use accounts::telemetry;
use reqwest::Response;
use secrecy::Secret;
use sqlx::{Connection, Executor, PgConnection, PgPool};
use std::sync::OnceLock;
use uuid::Uuid;

#[derive(Debug)]
pub struct TestUser {
    pub email: String,
    pub full_name: String,
    pub password: String,
}

impl TestUser {
    pub fn generate() -> Self {
        Self {
            email: format!("{}@example.com", Uuid::new_v4()),
            full_name: "Test User".to_string(),
            password: Uuid::new_v4().to_string(),
        }
    }

    pub fn form(&self) -> Vec<(&'static str, String)> {
        vec![
            ("email", self.email.clone()),
            ("full_name", self.full_name.clone()),
            ("password1", self.password.clone()),
            ("password2", self.password.clone()),
        ]
    }
}

pub struct TestApp {
    pub address: String,
    pub db_pool: PgPool,
    pub api_client: reqwest::Client,
}

static TRACING: OnceLock<()> = OnceLock::new();

pub fn init_tracing() {
    TRACING.get_or_init(|| {
        let default_filter_level = "info".to_string();
        let subscriber_name = "test".to_string();

        let result = if std::env::var("TEST_LOG").is_ok() {
            telemetry::init_subscriber(telemetry::get_subscriber(
                subscriber_name,
                default_filter_level,
                std::io::stdout,
            ))
        } else {
            telemetry::init_subscriber(telemetry::get_subscriber(
                subscriber_name,
                default_filter_level,
                std::io::sink,
            ))
        };
        result.expect("Failed to initialise tracing");
    });
}

pub async fn spawn_app() -> TestApp {
    init_tracing();

    let configuration = {
        let mut c = configuration::get_config().expect("Failed to read configuration.");
        c.database.database_name = Uuid::new_v4().to_string();
        c.application.port = 0;
        c
    };

    configure_database(&configuration.database).await;

    let application = Application::build(configuration.clone())
        .await
        .expect("Failed to build application.");
    let application_port = application.port();
    let _ = tokio::spawn(application.run_until_stopped());

    TestApp {
        address: format!("http://127.0.0.1:{}", application_port),
        db_pool: startup::get_connection_pool(&configuration.database),
        api_client: reqwest::Client::new(),
    }
}

async fn configure_database(config: &DatabaseConfigs) -> PgPool {
    let maintenance_settings = DatabaseConfigs {
        database_name: "postgres".to_string(),
        username: "postgres".to_string(),
        password: Secret::new("password".to_string()),
        ..config.clone()
    };

    let mut connection = PgConnection::connect_with(&maintenance_settings.connect_options())
        .await
        .expect("Failed to connect to Postgres");

    connection
        .execute(format!(r#"CREATE DATABASE "{}";"#, config.database_name).as_str())
        .await
        .expect("Failed to create database.");

    let connection_pool = PgPool::connect_with(config.connect_options())
        .await
        .expect("Failed to connect to Postgres.");

    sqlx::migrate!("./migrations")
        .run(&connection_pool)
        .await
        .expect("Failed to migrate the database");

    connection_pool
}

impl TestApp {
    pub async fn get_registration_fields(&self) -> Response {
        self.send_get("v1/user/register").await
    }

    pub async fn register<T: serde::Serialize + ?Sized>(&self, form: &T) -> Response {
        self.api_client
            .post(format!("{}/v1/user/register", self.address))
            .form(form)
            .send()
            .await
            .expect("POST request failed")
    }

    pub async fn send_get(&self, endpoint: &str) -> Response {
        self.api_client
            .get(format!("{}/{}", self.address, endpoint))
            .send()
            .await
            .expect("GET request failed")
    }

    pub async fn count_users(&self) -> i64 {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users")
            .fetch_one(&self.db_pool)
            .await
            .expect("Failed to count users.")
    }

    pub async fn stored_user(&self, email: &str) -> Option<CustomUser> {
        sqlx::query_as::<_, CustomUser>(
            r#"
            SELECT id, email, full_name, is_active, is_staff, date_joined, last_login
            FROM users
            WHERE lower(email) = lower($1)
            "#,
        )
        .bind(email)
        .fetch_optional(&self.db_pool)
        .await
        .expect("Failed to fetch the stored user.")
    }

    pub async fn stored_password_hash(&self, user_id: Uuid) -> String {
        sqlx::query_scalar::<_, String>("SELECT password FROM users WHERE id = $1")
            .bind(user_id)
            .fetch_one(&self.db_pool)
            .await
            .expect("Failed to fetch the stored password hash.")
    }
}
