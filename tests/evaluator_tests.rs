// tests/evaluator_tests.rs

use atomsel::evaluator::compare;
use atomsel::{compile, evaluate, Atom, CmpOp, EvalError, Evaluator, Value, NUMERIC_EPSILON};

fn eval(expression: &str, atom: &Atom) -> bool {
    let program = compile(expression).unwrap();
    evaluate(&program, atom).unwrap()
}

fn alpha_carbon() -> Atom {
    Atom::new(2, "CA")
        .with_residue("ALA", 12)
        .with_segid("PROT")
        .with_chainid("A")
        .with_mass(12.011)
        .with_charge(0.07)
        .with_coords(1.5, -2.25, 10.0)
        .with_occupancy(1.0, 15.5)
        .with_index(1)
}

fn water_hydrogen() -> Atom {
    Atom::new(900, "H1")
        .with_residue("WAT", 300)
        .with_segid("WAT")
        .with_mass(1.008)
        .with_charge(0.417)
}

// ============================================================================
// Field access
// ============================================================================

#[test]
fn test_string_fields() {
    let atom = alpha_carbon();
    assert!(eval("name == 'CA'", &atom));
    assert!(eval("resname == \"ALA\"", &atom));
    assert!(eval("segid == 'PROT'", &atom));
    assert!(eval("chainid == 'A'", &atom));
    assert!(!eval("name == 'ca'", &atom));
}

#[test]
fn test_numeric_fields() {
    let atom = alpha_carbon();
    assert!(eval("resid == 12", &atom));
    assert!(eval("id == 2", &atom));
    assert!(eval("index == 1", &atom));
    assert!(eval("mass > 12 && mass < 12.1", &atom));
    assert!(eval("charge == 0.07", &atom));
    assert!(eval("x == 1.5 && y == -2.25 && z == 1e1", &atom));
    assert!(eval("occupancy == 1 && bfactor >= 15.5", &atom));
}

#[test]
fn test_integer_fields_compare_as_numbers() {
    let atom = alpha_carbon();
    assert!(eval("resid == 12.0", &atom));
    assert!(eval("resid > 11.5", &atom));
    assert!(!eval("resid < 12", &atom));
}

// ============================================================================
// Numeric equality tolerance
// ============================================================================

#[test]
fn test_equality_within_tolerance() {
    let atom = Atom::new(1, "X").with_charge(1e-17);
    assert!(eval("charge == 0", &atom));
    assert!(!eval("charge != 0", &atom));

    let atom = Atom::new(1, "X").with_charge(0.01);
    assert!(!eval("charge == 0", &atom));
    assert!(eval("charge != 0", &atom));
}

#[test]
fn test_tolerance_boundary() {
    let half = NUMERIC_EPSILON / 2.0;
    let atom = Atom::new(1, "X").with_coords(0.1 + half, 0.0, 0.0);
    assert!(eval("x == 0.1", &atom));

    let atom = Atom::new(1, "X").with_coords(0.1 + NUMERIC_EPSILON * 10.0, 0.0, 0.0);
    assert!(!eval("x == 0.1", &atom));
}

#[test]
fn test_ordering_is_exact() {
    // Ordering does not use the tolerance
    let atom = Atom::new(1, "X").with_charge(1e-17);
    assert!(eval("charge > 0", &atom));
    assert!(!eval("charge <= 0", &atom));
}

#[test]
fn test_literal_only_comparisons() {
    let atom = Atom::default();
    assert!(eval("3 < 4", &atom));
    assert!(eval("-1 < +1", &atom));
    assert!(eval("'b' > 'a'", &atom));
    assert!(eval("2 == 2.00000000001", &atom));
}

// ============================================================================
// Strings
// ============================================================================

#[test]
fn test_string_ordering_is_lexicographic() {
    let atom = alpha_carbon();
    assert!(eval("resname < 'ARG'", &atom));
    assert!(eval("resname >= 'ALA'", &atom));
    assert!(!eval("resname > 'B'", &atom));
    // Byte order: uppercase sorts before lowercase
    assert!(eval("name < 'ca'", &atom));
}

#[test]
fn test_empty_strings() {
    let atom = Atom::new(1, "CA");
    assert!(eval("segid == ''", &atom));
    assert!(eval("segid =~ '^$'", &atom));
    assert!(eval("name =~ ''", &atom));
}

// ============================================================================
// Pattern matching
// ============================================================================

#[test]
fn test_regex_match_is_a_search() {
    let atom = alpha_carbon();
    assert!(eval("name =~ 'A'", &atom));
    assert!(eval("resname =~ 'L'", &atom));
    assert!(!eval("name =~ '^A'", &atom));
}

#[test]
fn test_anchored_alternation() {
    let pattern = r#"name =~ "^(C|O|N|CA)$""#;
    assert!(eval(pattern, &Atom::new(1, "CA")));
    assert!(eval(pattern, &Atom::new(2, "N")));
    assert!(!eval(pattern, &Atom::new(3, "CB")));
    assert!(!eval(pattern, &Atom::new(4, "HA")));
}

#[test]
fn test_negated_match() {
    let atom = water_hydrogen();
    assert!(eval("resname !~ 'ALA|GLY'", &atom));
    assert!(!eval("resname !~ 'WAT'", &atom));
}

#[test]
fn test_pattern_text_is_not_unescaped() {
    let atom = Atom::new(1, "H12");
    assert!(eval(r"name =~ '^H\d+$'", &atom));
    assert!(!eval(r"name =~ '^H\d$'", &atom));
}

// ============================================================================
// Booleans and derived predicates
// ============================================================================

#[test]
fn test_hydrogen_by_mass() {
    assert!(eval("hydrogen", &water_hydrogen()));
    assert!(!eval("hydrogen", &alpha_carbon()));
    // Mercury has an H name but a heavy mass
    assert!(!eval("hydrogen", &Atom::new(1, "HG").with_mass(200.59)));
}

#[test]
fn test_hydrogen_by_name_without_mass() {
    assert!(eval("hydrogen", &Atom::new(1, "HB2")));
    assert!(eval("hydrogen", &Atom::new(1, "2HB")));
    assert!(!eval("hydrogen", &Atom::new(1, "CB")));
}

#[test]
fn test_heavy_is_complement_of_hydrogen() {
    for atom in [alpha_carbon(), water_hydrogen(), Atom::new(1, "HG1")] {
        assert_eq!(eval("heavy", &atom), !eval("hydrogen", &atom));
    }
}

#[test]
fn test_backbone() {
    for name in ["N", "CA", "C", "O"] {
        assert!(eval("backbone", &Atom::new(1, name)), "{}", name);
    }
    for name in ["CB", "OXT", "H", "ca"] {
        assert!(!eval("backbone", &Atom::new(1, name)), "{}", name);
    }
}

#[test]
fn test_boolean_equality() {
    let atom = alpha_carbon();
    assert!(eval("backbone == heavy", &atom));
    assert!(eval("backbone != hydrogen", &atom));
    assert!(eval("(name == 'CA') == backbone", &atom));
}

#[test]
fn test_negation() {
    let atom = alpha_carbon();
    assert!(eval("!hydrogen", &atom));
    assert!(eval("!!heavy", &atom));
    assert!(eval("!(name == 'CB')", &atom));
    assert!(eval("!(resid < 10 || resid > 20)", &atom));
}

// ============================================================================
// Logical operators
// ============================================================================

#[test]
fn test_truth_tables() {
    let atom = alpha_carbon();
    // backbone is true, hydrogen is false
    let test_cases = vec![
        ("backbone && backbone", true),
        ("backbone && hydrogen", false),
        ("hydrogen && backbone", false),
        ("hydrogen && hydrogen", false),
        ("backbone || backbone", true),
        ("backbone || hydrogen", true),
        ("hydrogen || backbone", true),
        ("hydrogen || hydrogen", false),
    ];

    for (input, expected) in test_cases {
        assert_eq!(eval(input, &atom), expected, "Failed for input: {}", input);
    }
}

#[test]
fn test_mixed_precedence() {
    let atom = alpha_carbon();
    // and before or: hydrogen || (backbone && resid == 12)
    assert!(eval("hydrogen || backbone && resid == 12", &atom));
    // grouping changes the result
    assert!(!eval("(backbone || hydrogen) && resid == 13", &atom));
    assert!(eval("backbone || hydrogen && resid == 13", &atom));
}

#[test]
fn test_all_is_true_for_any_atom() {
    assert!(eval("all", &Atom::default()));
    assert!(eval("all", &water_hydrogen()));
    assert!(!eval("!all", &alpha_carbon()));
}

// ============================================================================
// Evaluator reuse
// ============================================================================

#[test]
fn test_evaluator_reuse_is_idempotent() {
    let atoms = vec![alpha_carbon(), water_hydrogen(), alpha_carbon()];
    let program = compile("heavy && (name =~ '^C' || resid >= 100)").unwrap();
    let mut evaluator = Evaluator::new(&program);

    let first: Vec<bool> = atoms.iter().map(|a| evaluator.evaluate(a).unwrap()).collect();
    let second: Vec<bool> = atoms.iter().map(|a| evaluator.evaluate(a).unwrap()).collect();

    assert_eq!(first, vec![true, false, true]);
    assert_eq!(first, second);
}

#[test]
fn test_evaluator_outlives_frames() {
    let program = compile("name =~ '^C' && x > 0").unwrap();
    let mut evaluator = Evaluator::new(&program);

    let mut counts = Vec::new();
    for frame in 0..3 {
        // Each frame's atoms are dropped before the next one is built.
        let atoms: Vec<Atom> = (0..4)
            .map(|i| {
                let name = if i % 2 == 0 { "CA" } else { "N" };
                Atom::new(i, name).with_coords((frame - i) as f64, 0.0, 0.0)
            })
            .collect();
        let matched = atoms
            .iter()
            .filter(|a| evaluator.evaluate(*a).unwrap())
            .count();
        counts.push(matched);
    }

    assert_eq!(counts, vec![0, 1, 1]);
}

#[test]
fn test_evaluator_exposes_program() {
    let program = compile("backbone").unwrap();
    let evaluator = Evaluator::new(&program);
    assert_eq!(evaluator.program().source(), "backbone");
}

// ============================================================================
// compare()
// ============================================================================

#[test]
fn test_compare_rejects_mixed_kinds() {
    let err = compare(CmpOp::Equal, Value::Number(1.0), Value::Text("1")).unwrap_err();
    assert!(matches!(err, EvalError::TypeMismatch(_)));

    let err = compare(CmpOp::LessThan, Value::Boolean(true), Value::Boolean(false)).unwrap_err();
    assert!(matches!(err, EvalError::TypeMismatch(_)));
}

#[test]
fn test_compare_booleans() {
    assert!(compare(CmpOp::Equal, Value::Boolean(true), Value::Boolean(true)).unwrap());
    assert!(compare(CmpOp::NotEqual, Value::Boolean(true), Value::Boolean(false)).unwrap());
    assert!(!compare(CmpOp::NotEqual, Value::Boolean(false), Value::Boolean(false)).unwrap());
}
