pub mod args;
pub mod core;
pub mod dns;
pub mod error;
pub mod logging;
pub mod output;
pub mod utils;
