pub mod aggregate;
pub mod analyze;
pub mod chart;
pub mod classifier;
pub mod cli;
pub mod config;
pub mod constants;
pub mod error;
pub mod http;
pub mod logging;
pub mod lookup;
pub mod model;
pub mod news;
pub mod resolver;
pub mod workflow;
