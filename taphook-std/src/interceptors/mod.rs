//! Standard interceptors.

pub mod logging;

pub use logging::LoggingInterceptor;
