pub mod cli;
pub mod config;
pub mod constants;
pub mod controller;
pub mod error;
pub mod liveness;
pub mod locate;
pub mod log;
pub mod plot;
pub mod record;
pub mod runs;
pub mod stats;
pub mod style;
pub mod tail;
pub mod terminal;
pub mod watch;
