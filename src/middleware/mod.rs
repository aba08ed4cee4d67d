mod error_handler;

pub use error_handler::{endpoint_not_found, handle_panic, log_errors};
