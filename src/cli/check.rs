//! Validate selection expressions without touching atoms

use super::CliError;
use crate::compile;

/// Options for the check command
#[derive(Debug, Clone, Default)]
pub struct CheckOptions {
    /// The selection expression to compile
    pub expression: String,
    /// Include the disassembled program in the result
    pub show_program: bool,
}

/// Result of a successful check
#[derive(Debug, Clone, PartialEq)]
pub struct CheckResult {
    /// Number of instructions in the compiled program
    pub instructions: usize,
    /// Disassembly, when requested
    pub listing: Option<String>,
}

/// Compile the expression and report its size
pub fn execute_check(options: &CheckOptions) -> Result<CheckResult, CliError> {
    let program =
        compile(&options.expression).map_err(|e| CliError::compile(e, &options.expression))?;

    Ok(CheckResult {
        instructions: program.len(),
        listing: options.show_program.then(|| program.to_string()),
    })
}
