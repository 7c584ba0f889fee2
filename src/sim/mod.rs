/// Step-by-step propagation of the state distribution.
pub mod engine;
/// Time-of-day periods and their step schedule.
pub mod period;
pub mod sampler;
pub mod summary;
pub mod types;

pub use engine::{advance, simulate, simulate_with_axis};
pub use period::{Period, PeriodMatrices, PeriodSchedule, ScheduleSegment};
pub use summary::RunSummary;
pub use types::{StepRecord, TimeAxis, Trajectory, TrajectoryPoint};
