//! Mutation testing campaigns for JavaScript and TypeScript projects.
//!
//! A campaign has two phases. [`planner::plan`] parses each target file,
//! runs every [`operators::Catalog`] guard over its syntax tree and writes one
//! [`planner::MutationPlan`] per match. [`executor::Executor`] then applies the
//! plans one at a time to the file on disk, runs the test suite through a
//! [`runner::TestHarness`], logs every killed mutant and puts the original
//! source back.

pub mod config;
pub mod error;
pub mod executor;
pub mod mutants;
pub mod operators;
pub mod output;
pub mod planner;
pub mod report;
pub mod runner;
pub mod safety;
pub mod state;
pub mod syntax;

pub use error::{MutationError, Result};

/// Grammar used to parse a source file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialect {
    JavaScript,
    TypeScript,
    Tsx,
}

pub fn detect_dialect(path: &std::path::Path) -> Option<Dialect> {
    match path.extension()?.to_str()? {
        "js" | "mjs" | "cjs" => Some(Dialect::JavaScript),
        "ts" | "mts" | "cts" => Some(Dialect::TypeScript),
        "tsx" | "jsx" => Some(Dialect::Tsx),
        _ => None,
    }
}
