//! Run selections against JSON atom collections

use log::info;

use super::{atoms_from_json, indices_to_json, selection_to_json, CliError};
use crate::Selector;

/// Options for the select command
#[derive(Debug, Clone, Default)]
pub struct SelectOptions {
    /// The selection expression
    pub expression: String,
    /// JSON array of atoms
    pub input: Option<String>,
    /// Report positions instead of atom records
    pub indices: bool,
}

/// Compile the expression, then apply it to the input atoms.
///
/// The expression is compiled before the input is parsed, so a bad
/// expression is reported even when the input is also bad.
pub fn execute_select(options: &SelectOptions) -> Result<serde_json::Value, CliError> {
    let selector = Selector::new(&options.expression)
        .map_err(|e| CliError::compile(e, &options.expression))?;

    let json = options.input.as_ref().ok_or(CliError::NoInput)?;
    let atoms = atoms_from_json(json)?;

    if options.indices {
        let indices = selector.select_indices(&atoms)?;
        info!("{} of {} atoms selected", indices.len(), atoms.len());
        Ok(indices_to_json(&indices))
    } else {
        let selected = selector.select(&atoms)?;
        info!("{} of {} atoms selected", selected.len(), atoms.len());
        selection_to_json(&selected)
    }
}
