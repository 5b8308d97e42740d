use codetrack_api::configuration::get_configuration;
use codetrack_api::startup::Application;
use codetrack_api::telemetry::{get_subscriber, init_subscriber};

#[actix_web::main]
async fn main() -> Result<(), anyhow::Error> {
    // Set up tracing telemetry.
    let subscriber = get_subscriber("codetrack-api".into(), "info".into(), std::io::stdout);
    init_subscriber(subscriber);

    // Get config settings and start the web app.
    let configuration = get_configuration().expect("Failed to read configuration.");
    let application = Application::build(&configuration).await?;
    tracing::info!("Listening on port {}", application.port());
    application.run_until_stopped().await?;
    Ok(())
}
