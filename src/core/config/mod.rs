pub mod data;
pub mod io;


pub use data::{Config, DEFAULT_ENDPOINT};
pub use io::ConfigError;
