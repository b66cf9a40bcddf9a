use clap::Parser;

use crate::error::{AppError, AppResult};

use super::MonitorArgs;

pub(crate) fn parse_test_args<I, T>(args: I) -> AppResult<MonitorArgs>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    MonitorArgs::try_parse_from(args).map_err(AppError::from)
}
