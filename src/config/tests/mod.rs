//! Unit tests for configuration loading and precedence.
//!
//! Tests are organised into modules by functional area:
//! - `helpers`: Shared test utilities
//! - `precedence`: Layer precedence tests
//! - `field_resolution`: Token, capacity, URL, and bind address resolution
//! - `env_loading`: Loading through the real environment and CLI parser
//! - `validation`: Configuration consistency validation tests

mod helpers;
