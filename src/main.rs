use accounts::configuration;
use accounts::startup::Application;
use accounts::telemetry;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    let subscriber = telemetry::get_subscriber("accounts".into(), "info".into(), std::io::stdout);
    telemetry::init_subscriber(subscriber)?;

    let config = configuration::get_config()?;
    let application = Application::build(config).await?;
    application.run_until_stopped().await
}
