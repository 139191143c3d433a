//! Carbon intensity forecast aggregation and charting

pub mod api;
pub mod chart;
pub mod intensity;
pub mod mode;
pub mod output;
pub mod status;
