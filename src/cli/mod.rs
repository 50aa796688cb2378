//! CLI support for atomsel
//!
//! Each subcommand is a plain function over an options struct, so other
//! tools can run selections programmatically without going through clap.

mod check;
mod convert;
mod docs;
mod run;

pub use check::{execute_check, CheckOptions, CheckResult};
pub use convert::{atoms_from_json, indices_to_json, selection_to_json};
pub use docs::{get_doc_topic, get_docs_overview, DocTopic};
pub use run::{execute_select, SelectOptions};

use std::io;

use crate::{CompileError, EvalError};

/// Errors that can occur during CLI operations
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Expression did not compile; `rendered` points at the offending text
    #[error("{rendered}")]
    Compile {
        rendered: String,
        #[source]
        source: CompileError,
    },

    #[error("Evaluation error: {0}")]
    Eval(#[from] EvalError),

    #[error("Invalid atom JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("No input provided. Use --input or pipe an atom JSON array to stdin.")]
    NoInput,

    #[error("Unknown documentation topic: '{0}'\nRun 'atomsel docs' to see available topics.")]
    UnknownTopic(String),
}

impl CliError {
    pub fn compile(source: CompileError, expression: &str) -> Self {
        CliError::Compile {
            rendered: source.render(expression),
            source,
        }
    }
}
