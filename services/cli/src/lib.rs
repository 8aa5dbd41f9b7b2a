mod cli;
mod demo;
mod infra;
mod inventory;

use bto_core::error::AppError;

pub fn run() -> Result<(), AppError> {
    cli::run()
}
