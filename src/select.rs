//! Applying compiled selections to atom collections.
//!
//! Compilation happens once, before any atom is looked at, so a bad
//! expression never yields a partial selection. Results keep the order of
//! the input collection.

use log::debug;

use crate::{
    atom::AtomRecord,
    compiler,
    error::{CompileError, EvalError, SelectError},
    evaluator::Evaluator,
    program::Program,
};

/// A compiled selection that can be applied to any number of collections,
/// e.g. every frame of a trajectory.
///
/// `Selector` is `Send + Sync`; share it by reference across threads and
/// each call builds its own evaluator.
///
/// # Examples
///
/// ```
/// use atomsel::{Atom, Selector};
///
/// let atoms = vec![
///     Atom::new(1, "N").with_residue("GLY", 1),
///     Atom::new(2, "CA").with_residue("GLY", 1),
///     Atom::new(3, "H1").with_residue("GLY", 1),
/// ];
///
/// let selector = Selector::new("backbone").unwrap();
/// assert_eq!(selector.select_indices(&atoms).unwrap(), vec![0, 1]);
/// ```
#[derive(Debug, Clone)]
pub struct Selector {
    program: Program,
}

impl Selector {
    pub fn new(expression: &str) -> Result<Self, CompileError> {
        Ok(Selector {
            program: compiler::compile(expression)?,
        })
    }

    pub fn program(&self) -> &Program {
        &self.program
    }

    pub fn expression(&self) -> &str {
        self.program.source()
    }

    /// Verdict for a single atom.
    pub fn matches<A>(&self, atom: &A) -> Result<bool, EvalError>
    where
        A: AtomRecord + ?Sized,
    {
        Evaluator::new(&self.program).evaluate(atom)
    }

    /// References to the matching atoms, in input order.
    pub fn select<'a, A: AtomRecord>(&self, atoms: &'a [A]) -> Result<Vec<&'a A>, EvalError> {
        if self.program.accepts_all() {
            return Ok(atoms.iter().collect());
        }

        let mut evaluator = Evaluator::new(&self.program);
        let mut selected = Vec::new();
        for atom in atoms {
            if evaluator.evaluate(atom)? {
                selected.push(atom);
            }
        }

        debug!(
            "selected {} of {} atoms with {:?}",
            selected.len(),
            atoms.len(),
            self.expression()
        );
        Ok(selected)
    }

    /// Positions of the matching atoms, strictly increasing.
    pub fn select_indices<A: AtomRecord>(&self, atoms: &[A]) -> Result<Vec<usize>, EvalError> {
        if self.program.accepts_all() {
            return Ok((0..atoms.len()).collect());
        }

        let mut evaluator = Evaluator::new(&self.program);
        let mut indices = Vec::new();
        for (i, atom) in atoms.iter().enumerate() {
            if evaluator.evaluate(atom)? {
                indices.push(i);
            }
        }
        Ok(indices)
    }

    /// Owned copies of the matching atoms, in input order.
    pub fn select_cloned<A>(&self, atoms: &[A]) -> Result<Vec<A>, EvalError>
    where
        A: AtomRecord + Clone,
    {
        Ok(self.select(atoms)?.into_iter().cloned().collect())
    }
}

/// Compile `expression` and return references to the atoms it matches.
///
/// # Examples
///
/// ```
/// use atomsel::{select, Atom};
///
/// let atoms = vec![
///     Atom::new(1, "CA").with_residue("ALA", 1),
///     Atom::new(2, "CB").with_residue("ALA", 1),
///     Atom::new(3, "CA").with_residue("GLY", 2),
/// ];
///
/// let picked = select(&atoms, "name == 'CA' && resid == 1").unwrap();
/// assert_eq!(picked, vec![&atoms[0]]);
/// ```
pub fn select<'a, A: AtomRecord>(atoms: &'a [A], expression: &str) -> Result<Vec<&'a A>, SelectError> {
    let selector = Selector::new(expression)?;
    Ok(selector.select(atoms)?)
}

/// Compile `expression` and return the positions of the atoms it matches.
pub fn select_indices<A: AtomRecord>(atoms: &[A], expression: &str) -> Result<Vec<usize>, SelectError> {
    let selector = Selector::new(expression)?;
    Ok(selector.select_indices(atoms)?)
}
