//! The rewrite engine for assertj-migrate.
//!
//! This module handles:
//! - Locating JUnit assertion calls and splitting their arguments
//! - The ordered rule table, grouped into assertion families
//! - Applying the table to file text, whole-file or line by line

pub mod family;
pub mod matcher;
pub mod rewriter;

pub use family::{
	CallRule, Dialect, Family, IMPORT_REMINDER, ImportRule, MessageSlot, RewriteRule, RuleSet,
	Shape, apply_family,
};
pub use matcher::{CallSite, find_calls, split_arguments};
pub use rewriter::{MatchMode, Rewriter, Transformation};
