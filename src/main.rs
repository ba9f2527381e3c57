use std::process::exit;

use userdesk::config::Settings;
use userdesk::middleware::telemetry;
use userdesk::repository;
use userdesk::startup::Application;

/// Start the application after loading settings, telemetry, and the database.
#[actix_web::main]
async fn main() -> Result<(), anyhow::Error> {
    init_exit_handler()?;

    let settings = Settings::new()?;
    telemetry::init_tracer(&settings)?;
    let repo = repository::implementation(&settings.database_url)?;
    let application = Application::build(settings, repo)?;

    application.run_until_stopped().await?;

    Ok(())
}

// actix-web will handle signals to exit, but doesn't offer a hook to customize it.
fn init_exit_handler() -> Result<(), ctrlc::Error> {
    ctrlc::set_handler(move || {
        // Ensure all spans have been reported.
        opentelemetry::global::shutdown_tracer_provider();

        exit(0);
    })
}
