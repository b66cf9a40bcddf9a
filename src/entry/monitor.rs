use std::io::{self, IsTerminal};

use tracing::info;

use crate::args::MonitorArgs;
use crate::error::AppResult;
use crate::probe::{RunOutcome, Sampler};
use crate::report::{ReportOptions, Reporter};
use crate::system::shutdown_handlers::{setup_signal_shutdown_handler, shutdown_channel};

pub(super) async fn run_monitor(args: MonitorArgs) -> AppResult<()> {
    let sampler = Sampler::new(&args)?;
    info!(
        "Sampling {} every {}ms",
        sampler.target(),
        args.interval.as_millis()
    );

    let (shutdown_tx, _) = shutdown_channel();
    let signal_handle = setup_signal_shutdown_handler(&shutdown_tx);

    let stdout = io::stdout();
    let options = ReportOptions::from_args(&args, stdout.is_terminal());
    let mut reporter = Reporter::new(stdout.lock(), options);

    let outcome = sampler
        .run(&shutdown_tx, |tick| reporter.report(tick))
        .await;
    signal_handle.abort();

    match outcome? {
        RunOutcome::Completed { ticks } => info!("Finished after {} ticks", ticks),
        RunOutcome::Interrupted { ticks } => info!("Interrupted after {} ticks", ticks),
    }

    if args.summary {
        reporter.write_summary()?;
    }
    Ok(())
}
