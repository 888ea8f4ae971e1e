pub mod config;
pub mod iot;
pub mod labels;
