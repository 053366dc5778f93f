pub mod config;
pub mod constants;
pub mod error;
pub mod logging;
pub mod pipeline;
pub mod rankings;
pub mod registrations;
pub mod table;
pub mod types;
