mod monitor;

use std::ffi::OsString;

use clap::error::ErrorKind;
use clap::{CommandFactory, FromArgMatches};

use crate::args::MonitorArgs;
use crate::config::{apply_config, load_config};
use crate::error::{AppError, AppResult, ValidationError};

/// Parses arguments, merges the config file, and runs the monitor until the
/// tick count is reached or a shutdown signal arrives.
///
/// # Errors
///
/// Returns clap errors for invalid usage (including `--help`/`--version`,
/// which clap reports as errors), configuration errors, and output failures.
pub fn run<I, T>(raw_args: I) -> AppResult<()>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let args = parse_args(raw_args)?;

    crate::system::logger::init_logging(args.verbose, args.no_color);

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    runtime.block_on(monitor::run_monitor(args))
}

pub(crate) fn parse_args<I, T>(raw_args: I) -> AppResult<MonitorArgs>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let matches = MonitorArgs::command().try_get_matches_from(raw_args)?;
    let mut args = MonitorArgs::from_arg_matches(&matches)?;

    if let Some(config) = load_config(args.config.as_deref())? {
        apply_config(&mut args, &matches, &config)?;
    }

    if args.url.is_none() {
        return Err(MonitorArgs::command()
            .error(
                ErrorKind::MissingRequiredArgument,
                "a URL is required (pass it as an argument or set `url` in the config file)",
            )
            .into());
    }
    if args.foreign_only && !args.external {
        return Err(AppError::validation(
            ValidationError::ForeignOnlyRequiresExternal,
        ));
    }

    Ok(args)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_url_is_a_usage_error() -> Result<(), String> {
        match parse_args(["httpstat", "-c", "1"]) {
            Err(AppError::Clap { source })
                if source.kind() == ErrorKind::MissingRequiredArgument =>
            {
                Ok(())
            }
            other => Err(format!("Expected missing URL error, got {:?}", other)),
        }
    }

    #[test]
    fn unreadable_config_is_fatal() -> Result<(), String> {
        match parse_args(["httpstat", "--config", "/nonexistent/none.toml", "localhost"]) {
            Err(AppError::Config(_)) => Ok(()),
            other => Err(format!("Expected config read error, got {:?}", other)),
        }
    }

    #[test]
    fn foreign_only_requires_external() -> Result<(), String> {
        let dir = tempfile::tempdir().map_err(|err| format!("tempdir failed: {}", err))?;
        let config = dir.path().join("httpstat.toml");
        std::fs::write(&config, "timeout = 2\n").map_err(|err| format!("write failed: {}", err))?;
        let config = config.to_string_lossy().into_owned();

        match parse_args(["httpstat", "--config", &config, "--foreign-only", "localhost"]) {
            Err(AppError::Validation(ValidationError::ForeignOnlyRequiresExternal)) => {}
            other => return Err(format!("Expected ForeignOnlyRequiresExternal, got {:?}", other)),
        }
        let args = parse_args(["httpstat", "--config", &config, "-e", "--foreign-only", "localhost"])
            .map_err(|err| err.to_string())?;
        if !args.foreign_only || args.request_timeout.as_secs() != 2 {
            return Err(format!("Unexpected args: {:?}", args));
        }
        Ok(())
    }

    #[test]
    fn help_is_reported_as_clap_display_help() -> Result<(), String> {
        match parse_args(["httpstat", "--help"]) {
            Err(AppError::Clap { source }) if source.kind() == ErrorKind::DisplayHelp => Ok(()),
            other => Err(format!("Expected DisplayHelp, got {:?}", other)),
        }
    }
}
