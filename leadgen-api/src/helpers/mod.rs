pub mod backend;
pub mod error_format;
pub mod http_error;
