pub mod utils;

pub use utils::logging::{init_logging, LoggingOptions, ACCESS_LOG_TARGET};
