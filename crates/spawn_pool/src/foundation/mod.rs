//! Foundation module - Core utilities and types
//!
//! This module provides fundamental utilities used throughout the crate:
//! - Math types for placing spawned objects
//! - Handle types for pools and host objects
//! - Logging utilities

pub mod math;
pub mod collections;
pub mod logging;
