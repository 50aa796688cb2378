//! Reference text for the atomsel CLI

use super::CliError;
use crate::Field;

/// Available documentation topics
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocTopic {
    Syntax,
    Operators,
    Fields,
}

impl DocTopic {
    /// Parse topic name from string
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "syntax" | "grammar" => Some(Self::Syntax),
            "operators" | "ops" => Some(Self::Operators),
            "fields" | "field" | "keywords" => Some(Self::Fields),
            _ => None,
        }
    }
}

/// Get the docs overview (topic listing)
pub fn get_docs_overview() -> &'static str {
    r#"ATOMSEL DOCUMENTATION

A selection is one boolean expression evaluated against every atom of a
model. Atoms for which it is true are kept, in their original order.

TOPICS

  syntax            Literals, identifiers, grouping and precedence
  operators         Comparison, pattern matching and logical operators
  fields            The atom fields and predicates an expression can use

QUICK REFERENCE

  all                               Every atom
  name == 'CA'                      Alpha carbons
  resid >= 10 && resid <= 20        A residue range
  name =~ "^(C|O|N|CA)$"            Regular expression search
  !hydrogen && segid != "WAT"       Negation and combination

Run 'atomsel docs <topic>' for detailed documentation.
"#
}

/// Get documentation for a specific topic
pub fn get_doc_topic(name: &str) -> Result<String, CliError> {
    match DocTopic::parse(name) {
        Some(DocTopic::Syntax) => Ok(SYNTAX_DOC.to_string()),
        Some(DocTopic::Operators) => Ok(OPERATORS_DOC.to_string()),
        Some(DocTopic::Fields) => Ok(fields_doc()),
        None => Err(CliError::UnknownTopic(name.to_string())),
    }
}

fn fields_doc() -> String {
    let mut doc = String::from("FIELDS\n\n");
    for field in Field::ALL {
        doc.push_str(&format!(
            "  {:<12} {:<9} {}\n",
            field.name(),
            field.kind().name(),
            field.description()
        ));
    }
    doc.push_str("\nField names are case-sensitive. Any other identifier is an error.\n");
    doc
}

const SYNTAX_DOC: &str = r#"SYNTAX

LITERALS
  Strings use single or double quotes, with no escape sequences:
    'CA'   "HEME"   "^H[0-9]*$"
  Numbers are decimal, with optional sign, fraction and exponent:
    12   -0.5   1.5e-3

IDENTIFIERS
  Field names and predicates (see 'atomsel docs fields'). The keyword
  'all' is true for every atom.

PRECEDENCE (tightest first)
  !                         prefix negation
  == != < <= > >= =~ !~     comparison and matching
  &&                        logical and
  ||                        logical or

  Parentheses group. '!' binds tighter than comparisons, so write
  !(name == 'CA') rather than !name == 'CA'.

  Chains of && or || may be any length. Parentheses, '!' and chained
  comparisons may nest at most 256 levels deep.
"#;

const OPERATORS_DOC: &str = r#"OPERATORS

COMPARISON
  ==  !=        Numbers are equal within 1e-10; strings compare exactly;
                booleans compare with each other
  <  <=  >  >=  Numbers numerically, strings lexicographically

PATTERN MATCHING
  field =~ "re"   True when the regular expression matches anywhere in
                  the string. Anchor with ^ and $ for whole-field matches.
  field !~ "re"   True when it matches nowhere.
  Patterns are checked when the selection is compiled.

LOGICAL
  a && b   Both true; b is skipped when a is false
  a || b   Either true; b is skipped when a is true
  !a       Negation

TYPES
  Operands must agree: comparing a number field with a string is an
  error before any atom is read.
"#;
