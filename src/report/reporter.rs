use std::io::Write;

use serde_json::{Value, json};
use tracing::debug;

use super::format::{
    SECS_WIDTH, SIZE_WIDTH, TIME_WIDTH, format_clock, format_opt_secs, format_secs, header_line,
    status_cell, target_cell, window_cells,
};
use crate::args::{MonitorArgs, OutputFormat};
use crate::error::AppResult;
use crate::metrics::{ResourceKind, Sample, SampleStatus, StatsBook, TargetSummary, Tick};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportOptions {
    pub format: OutputFormat,
    pub color: bool,
    pub num_datapoints: usize,
}

impl ReportOptions {
    /// Colour is used only for text output on a terminal without `--no-color`.
    #[must_use]
    pub fn from_args(args: &MonitorArgs, is_terminal: bool) -> Self {
        Self {
            format: args.output_format,
            color: is_terminal && !args.no_color && args.output_format == OutputFormat::Text,
            num_datapoints: args.num_datapoints.get(),
        }
    }
}

/// Writes one row per sample and keeps the rolling statistics shown in the
/// text columns and in the final summary.
#[derive(Debug)]
pub struct Reporter<W: Write> {
    out: W,
    options: ReportOptions,
    stats: StatsBook,
    header_written: bool,
}

impl<W: Write> Reporter<W> {
    #[must_use]
    pub fn new(out: W, options: ReportOptions) -> Self {
        Self {
            out,
            options,
            stats: StatsBook::new(options.num_datapoints),
            header_written: false,
        }
    }

    /// Writes the page row followed by one row per sub-resource, then
    /// flushes.
    ///
    /// # Errors
    ///
    /// Returns an error when the output cannot be written.
    pub fn report(&mut self, tick: &Tick) -> AppResult<()> {
        match self.options.format {
            OutputFormat::Text => {
                if !self.header_written {
                    writeln!(self.out, "{}", header_line())?;
                    self.header_written = true;
                }
                self.write_text_row(&tick.page, None)?;
                for resource in &tick.resources {
                    self.write_text_row(&resource.sample, Some(resource.kind))?;
                }
            }
            OutputFormat::Jsonl => {
                self.write_json_row(tick.index, &tick.page, None)?;
                for resource in &tick.resources {
                    self.write_json_row(
                        tick.index,
                        &resource.sample,
                        Some((resource.kind, resource.parent.as_str())),
                    )?;
                }
            }
        }
        self.out.flush()?;
        Ok(())
    }

    fn write_text_row(&mut self, sample: &Sample, kind: Option<ResourceKind>) -> AppResult<()> {
        let window = self.stats.record(sample);
        let timing = sample.timing;
        write!(
            self.out,
            "{:<tw$} {} {:>w$} {:>w$} {:>w$} {:>zw$} {} {}",
            format_clock(&sample.timestamp),
            status_cell(&sample.status, self.options.color),
            format_secs(timing.total),
            format_opt_secs(timing.connect),
            format_opt_secs(timing.ttfb),
            sample.size,
            window_cells(window.as_ref()),
            target_cell(sample.url.as_str(), kind),
            tw = TIME_WIDTH,
            w = SECS_WIDTH,
            zw = SIZE_WIDTH,
        )?;
        if let Some(message) = sample.status.error_message() {
            write!(self.out, " ({})", message)?;
        }
        writeln!(self.out)?;
        Ok(())
    }

    fn write_json_row(
        &mut self,
        tick: u64,
        sample: &Sample,
        resource: Option<(ResourceKind, &str)>,
    ) -> AppResult<()> {
        self.stats.record(sample);
        let status = match &sample.status {
            SampleStatus::Http(code) => json!(code),
            SampleStatus::Timeout | SampleStatus::Error(_) => json!(sample.status.label()),
        };
        let timing = sample.timing;
        let line = json!({
            "timestamp": sample.timestamp.to_rfc3339(),
            "tick": tick,
            "kind": resource.map_or("page", |(kind, _)| kind.as_str()),
            "url": sample.url.as_str(),
            "parent": resource.map(|(_, parent)| parent),
            "status": status,
            "error": sample.status.error_message(),
            "resolve_s": timing.resolve.map(|value| value.as_secs_f64()),
            "connect_s": timing.connect.map(|value| value.as_secs_f64()),
            "ttfb_s": timing.ttfb.map(|value| value.as_secs_f64()),
            "total_s": timing.total.as_secs_f64(),
            "size": sample.size,
        });
        self.write_json_line(&line)
    }

    fn write_json_line(&mut self, line: &Value) -> AppResult<()> {
        serde_json::to_writer(&mut self.out, line)?;
        writeln!(self.out)?;
        Ok(())
    }

    /// Writes the per-target summary table (or one JSON object per target).
    ///
    /// # Errors
    ///
    /// Returns an error when the output cannot be written.
    pub fn write_summary(&mut self) -> AppResult<()> {
        let summaries = self.stats.summaries();
        debug!("Writing summary for {} targets", summaries.len());
        match self.options.format {
            OutputFormat::Text => self.write_text_summary(&summaries)?,
            OutputFormat::Jsonl => {
                for summary in &summaries {
                    let line = summary_json(summary);
                    self.write_json_line(&line)?;
                }
            }
        }
        self.out.flush()?;
        Ok(())
    }

    fn write_text_summary(&mut self, summaries: &[TargetSummary]) -> AppResult<()> {
        writeln!(self.out)?;
        writeln!(
            self.out,
            "{:>7} {:>7} {:>w$} {:>w$} {:>w$} {:>w$} {:>w$} {:>w$} url",
            "samples",
            "errors",
            "min",
            "avg",
            "p50",
            "p90",
            "p99",
            "max",
            w = SECS_WIDTH,
        )?;
        for summary in summaries {
            let cells = summary.window.map_or_else(
                || vec!["-".to_owned(); 6],
                |window| {
                    vec![
                        format_secs(window.min),
                        format_secs(window.avg),
                        format_secs(summary.p50),
                        format_secs(summary.p90),
                        format_secs(summary.p99),
                        format_secs(window.max),
                    ]
                },
            );
            write!(self.out, "{:>7} {:>7}", summary.samples, summary.errors)?;
            for cell in &cells {
                write!(self.out, " {:>w$}", cell, w = SECS_WIDTH)?;
            }
            writeln!(self.out, " {}", summary.url)?;
        }
        Ok(())
    }

    #[must_use]
    pub fn into_inner(self) -> W {
        self.out
    }
}

fn summary_json(summary: &TargetSummary) -> Value {
    let window = summary.window;
    let has_data = window.is_some();
    json!({
        "kind": "summary",
        "url": summary.url,
        "samples": summary.samples,
        "errors": summary.errors,
        "min_s": window.map(|stats| stats.min.as_secs_f64()),
        "avg_s": window.map(|stats| stats.avg.as_secs_f64()),
        "p50_s": has_data.then(|| summary.p50.as_secs_f64()),
        "p90_s": has_data.then(|| summary.p90.as_secs_f64()),
        "p99_s": has_data.then(|| summary.p99.as_secs_f64()),
        "max_s": window.map(|stats| stats.max.as_secs_f64()),
        "stddev_s": window.map(|stats| stats.stddev.as_secs_f64()),
    })
}
