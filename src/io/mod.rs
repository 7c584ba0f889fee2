/// CSV export of trajectories and steady states.
pub mod export;
