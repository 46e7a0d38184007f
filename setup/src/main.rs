use anyhow::Result;

use recitation_configuration::{load_config, setup_logging};
use recitation_setup::build_and_run;

#[tokio::main]
async fn main() -> Result<()> {
    let config = load_config()?;
    setup_logging(&config.logging);
    tracing::info!(
        host = %config.server.host,
        port = config.server.port,
        "starting recitation scoring service"
    );
    build_and_run(config).await
}
