//! Time-inhomogeneous Markov chain model of daily traffic congestion.

#[cfg(feature = "api")]
pub mod api;
pub mod chain;
pub mod config;
pub mod io;
pub mod report;
/// Period schedule, trajectory engine, summaries, and sampling.
pub mod sim;
#[cfg(feature = "tui")]
pub mod tui;
