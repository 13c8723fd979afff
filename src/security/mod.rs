//! Security utilities and validation functions.
//!
//! This module provides validation for the names that become directories
//! in the local artifact tree and for destination roots.

pub mod path_validator;

pub use path_validator::{validate_output_path, validate_path_component};
