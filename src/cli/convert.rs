//! JSON <-> atom conversion utilities

use crate::{load_atoms, Atom};

use super::CliError;

/// Parse a JSON array of atoms, numbering `index` by position
pub fn atoms_from_json(json: &str) -> Result<Vec<Atom>, CliError> {
    Ok(load_atoms(json.as_bytes())?)
}

/// Convert selected atoms to a JSON array
pub fn selection_to_json(atoms: &[&Atom]) -> Result<serde_json::Value, CliError> {
    Ok(serde_json::to_value(atoms)?)
}

/// Convert selected positions to a JSON array of integers
pub fn indices_to_json(indices: &[usize]) -> serde_json::Value {
    serde_json::Value::Array(indices.iter().map(|&i| i.into()).collect())
}
