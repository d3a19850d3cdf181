//! Utility functions for code generation, validation, and request handling.
//!
//! - [`code_generator`] - Random short code generation
//! - [`url_validator`] - URL and alias validation
//! - [`db_error`] - Classification of database constraint violations
//! - [`request_meta`] - Client and origin extractors

pub mod code_generator;
pub mod db_error;
pub mod request_meta;
pub mod url_validator;
