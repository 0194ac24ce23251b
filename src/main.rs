use eventsite::startup;
use tracing::info;

#[tokio::main]
async fn main() -> miette::Result<()> {
    // Initialize logging
    startup::init_logging()?;

    info!("Starting event sync");

    // Configuration problems stop the run before any request
    let config = startup::load_config()?;

    startup::run_sync(config).await?;
    Ok(())
}
