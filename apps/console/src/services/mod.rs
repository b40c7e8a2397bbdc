pub mod refresh;
pub mod schedule;
