//! Three-state traffic chain: states, probability vectors, transition
//! matrices and their stationary distributions.

/// Error taxonomy shared by chain and simulation operations.
pub mod error;
pub mod matrix;
pub mod state;
pub mod stationary;

pub use error::MarkovError;
pub use matrix::{ROW_TOLERANCE, RawMatrix, TransitionMatrix};
pub use state::{NUM_STATES, ProbVector, STOCHASTIC_TOLERANCE, TrafficState};
pub use stationary::{closed_classes, steady_state, steady_state_power};
