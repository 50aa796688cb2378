//! Atom records and the closed field vocabulary of the selection language.
//!
//! The selection engine never inspects atoms directly. It asks for one
//! [`Field`] at a time through the [`AtomRecord`] trait, so any structural
//! model representation can be selected from by implementing a single
//! `match`. [`Atom`] is the record type shipped with the crate.

use std::io::Read;

use serde::{Deserialize, Serialize};

use crate::value::{Value, ValueKind};

/// Atom names that make up a protein backbone.
pub const BACKBONE_ATOMS: &[&str] = &["N", "CA", "C", "O"];

/// Masses below this are treated as hydrogen.
const HYDROGEN_MASS_CUTOFF: f64 = 1.1;

/// Every identifier the compiler recognizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    // String fields
    Name,
    Resname,
    Segid,
    Chainid,
    // Integer fields, read as numbers
    Resid,
    Id,
    Index,
    // Floating-point fields
    Mass,
    Charge,
    X,
    Y,
    Z,
    Occupancy,
    Bfactor,
    // Derived predicates
    Hydrogen,
    Heavy,
    Backbone,
}

impl Field {
    pub const ALL: [Field; 17] = [
        Field::Name,
        Field::Resname,
        Field::Segid,
        Field::Chainid,
        Field::Resid,
        Field::Id,
        Field::Index,
        Field::Mass,
        Field::Charge,
        Field::X,
        Field::Y,
        Field::Z,
        Field::Occupancy,
        Field::Bfactor,
        Field::Hydrogen,
        Field::Heavy,
        Field::Backbone,
    ];

    /// Resolve an identifier. Names are case-sensitive.
    pub fn from_name(name: &str) -> Option<Field> {
        Field::ALL.iter().copied().find(|f| f.name() == name)
    }

    pub fn name(self) -> &'static str {
        match self {
            Field::Name => "name",
            Field::Resname => "resname",
            Field::Segid => "segid",
            Field::Chainid => "chainid",
            Field::Resid => "resid",
            Field::Id => "id",
            Field::Index => "index",
            Field::Mass => "mass",
            Field::Charge => "charge",
            Field::X => "x",
            Field::Y => "y",
            Field::Z => "z",
            Field::Occupancy => "occupancy",
            Field::Bfactor => "bfactor",
            Field::Hydrogen => "hydrogen",
            Field::Heavy => "heavy",
            Field::Backbone => "backbone",
        }
    }

    pub fn kind(self) -> ValueKind {
        match self {
            Field::Name | Field::Resname | Field::Segid | Field::Chainid => ValueKind::Text,
            Field::Hydrogen | Field::Heavy | Field::Backbone => ValueKind::Boolean,
            _ => ValueKind::Number,
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Field::Name => "atom name",
            Field::Resname => "residue name",
            Field::Segid => "segment identifier",
            Field::Chainid => "chain identifier",
            Field::Resid => "residue number",
            Field::Id => "atom serial number",
            Field::Index => "position of the atom in its collection",
            Field::Mass => "atomic mass",
            Field::Charge => "partial charge",
            Field::X => "x coordinate",
            Field::Y => "y coordinate",
            Field::Z => "z coordinate",
            Field::Occupancy => "occupancy",
            Field::Bfactor => "temperature factor",
            Field::Hydrogen => "atom is a hydrogen",
            Field::Heavy => "atom is not a hydrogen",
            Field::Backbone => "atom is one of N, CA, C, O",
        }
    }
}

/// Read access to an atom's fields by identifier.
///
/// Implementations must answer in constant time; this is called from the
/// innermost evaluation loop. The returned value must have the kind given
/// by [`Field::kind`].
pub trait AtomRecord {
    fn field(&self, field: Field) -> Value<'_>;
}

/// Hydrogen test shared by record implementations.
///
/// A positive mass decides on its own; without one, the first letter of the
/// name (skipping leading digits, as in `1HB`) must be `H`.
pub fn is_hydrogen(name: &str, mass: f64) -> bool {
    if mass > 0.0 {
        return mass < HYDROGEN_MASS_CUTOFF;
    }
    name.chars().find(|c| c.is_ascii_alphabetic()) == Some('H')
}

pub fn is_backbone(name: &str) -> bool {
    BACKBONE_ATOMS.contains(&name)
}

/// A single atom of a structural model.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Atom {
    pub id: i64,
    pub index: usize,
    pub name: String,
    pub resname: String,
    pub resid: i64,
    pub segid: String,
    pub chainid: String,
    pub mass: f64,
    pub charge: f64,
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub occupancy: f64,
    pub bfactor: f64,
}

impl Atom {
    pub fn new(id: i64, name: impl Into<String>) -> Self {
        Atom {
            id,
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_residue(mut self, resname: impl Into<String>, resid: i64) -> Self {
        self.resname = resname.into();
        self.resid = resid;
        self
    }

    pub fn with_segid(mut self, segid: impl Into<String>) -> Self {
        self.segid = segid.into();
        self
    }

    pub fn with_chainid(mut self, chainid: impl Into<String>) -> Self {
        self.chainid = chainid.into();
        self
    }

    pub fn with_index(mut self, index: usize) -> Self {
        self.index = index;
        self
    }

    pub fn with_mass(mut self, mass: f64) -> Self {
        self.mass = mass;
        self
    }

    pub fn with_charge(mut self, charge: f64) -> Self {
        self.charge = charge;
        self
    }

    pub fn with_coords(mut self, x: f64, y: f64, z: f64) -> Self {
        self.x = x;
        self.y = y;
        self.z = z;
        self
    }

    pub fn with_occupancy(mut self, occupancy: f64, bfactor: f64) -> Self {
        self.occupancy = occupancy;
        self.bfactor = bfactor;
        self
    }
}

impl AtomRecord for Atom {
    fn field(&self, field: Field) -> Value<'_> {
        match field {
            Field::Name => Value::Text(&self.name),
            Field::Resname => Value::Text(&self.resname),
            Field::Segid => Value::Text(&self.segid),
            Field::Chainid => Value::Text(&self.chainid),
            Field::Resid => Value::Number(self.resid as f64),
            Field::Id => Value::Number(self.id as f64),
            Field::Index => Value::Number(self.index as f64),
            Field::Mass => Value::Number(self.mass),
            Field::Charge => Value::Number(self.charge),
            Field::X => Value::Number(self.x),
            Field::Y => Value::Number(self.y),
            Field::Z => Value::Number(self.z),
            Field::Occupancy => Value::Number(self.occupancy),
            Field::Bfactor => Value::Number(self.bfactor),
            Field::Hydrogen => Value::Boolean(is_hydrogen(&self.name, self.mass)),
            Field::Heavy => Value::Boolean(!is_hydrogen(&self.name, self.mass)),
            Field::Backbone => Value::Boolean(is_backbone(&self.name)),
        }
    }
}

/// Read a JSON array of atoms.
///
/// Each atom's `index` is set to its position in the array, whatever the
/// document says.
pub fn load_atoms<R: Read>(reader: R) -> Result<Vec<Atom>, serde_json::Error> {
    let mut atoms: Vec<Atom> = serde_json::from_reader(reader)?;
    for (i, atom) in atoms.iter_mut().enumerate() {
        atom.index = i;
    }
    Ok(atoms)
}
