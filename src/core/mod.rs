pub mod config;
pub mod logging;
pub mod session;
pub mod template;
pub mod utils;
