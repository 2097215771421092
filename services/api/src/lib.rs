mod cli;
mod demo;
mod infra;
mod routes;
mod server;
mod sync;

use gov_issuance::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
