use std::process::ExitCode;

use httpstat::error::AppError;

fn main() -> ExitCode {
    match httpstat::run(std::env::args_os()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(AppError::Clap { source }) => source.exit(),
        Err(err) => {
            eprintln!("Error: {}", err);
            ExitCode::FAILURE
        }
    }
}
