pub mod challenge;
pub mod config;
pub mod logging;
pub mod pose;
pub mod replay;
pub mod scoring;
