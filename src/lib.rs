//! assertj-migrate - rewrites JUnit assertions in Java test sources into
//! AssertJ fluent assertions.
//!
//! This library provides the core functionality, including:
//! - Configuration file parsing and cascade discovery
//! - Test file selection by path pattern
//! - The ordered rewrite rule table and the call scanner it is built on
//! - Per-file conversion with atomic replacement
//!
//! # Example
//!
//! ```no_run
//! use assertj_migrate::config::load_settings;
//! use assertj_migrate::convert::convert_file;
//! use assertj_migrate::select::{compile_pattern, select_files};
//!
//! let cwd = std::env::current_dir().unwrap();
//! let settings = load_settings(&cwd).unwrap();
//! let pattern = compile_pattern(&settings.effective_pattern(None)).unwrap();
//! let rewriter = settings.rewriter();
//!
//! for path in select_files(&cwd, &pattern).unwrap() {
//!     let outcome = convert_file(&path, &rewriter, settings.dry_run).unwrap();
//!     if outcome.is_converted() {
//!         println!("converted {}", outcome.path().display());
//!     }
//! }
//! ```

pub mod config;
pub mod convert;
pub mod error;
pub mod rules;
pub mod select;

pub use error::{MigrateError, Result};
