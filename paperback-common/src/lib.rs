//! # Paperback Common Library
//!
//! Shared code for the paperback storefront services including:
//! - Database pool initialization and relational schema
//! - Row models for every dataset table
//! - Configuration loading
//! - Common error types

pub mod config;
pub mod db;
pub mod error;

pub use error::{Error, Result};
