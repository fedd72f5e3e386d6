//! `--check`: headless connection test.

use color_eyre::eyre::eyre;
use color_eyre::Result;

use crate::client::RagClient;
use crate::startup::config::ClientConfig;
use crate::startup::health::check_backend;

/// Run the connection test and print the result.
pub async fn handle_check_command(config: &ClientConfig) -> Result<()> {
    let client = RagClient::with_reqwest(config);
    let report = check_backend(&client).await;
    if report.is_ok() {
        println!("{}", report.message());
        Ok(())
    } else {
        Err(eyre!(report.message()))
    }
}
