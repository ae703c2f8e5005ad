pub mod cli;
pub mod config;
pub mod gateway;
pub mod pipeline;
pub mod questions;
pub mod report;
pub mod source;
pub mod util;
