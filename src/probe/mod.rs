//! Timed HTTP fetches and the polling loop that drives them.
mod client;
mod fetch;
mod sampler;
mod settings;

#[cfg(test)]
mod test_support;

pub use client::{build_client, normalize_target};
pub use sampler::{RunOutcome, Sampler};
pub use settings::ProbeSettings;
