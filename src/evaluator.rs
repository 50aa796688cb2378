use crate::{
    ast::CmpOp,
    atom::AtomRecord,
    error::EvalError,
    program::{Instruction, Program},
    value::Value,
};

/// Absolute tolerance for `==` and `!=` between numbers.
///
/// Two numbers are equal when `|a - b| <= NUMERIC_EPSILON`. The value is a
/// practical choice: small enough to separate any two charges or
/// coordinates that differ meaningfully, large enough to absorb the
/// rounding left by reading a literal like `0.1` or a field stored in
/// single precision and widened.
pub const NUMERIC_EPSILON: f64 = 1e-10;

/// Stack machine that runs one compiled program against atoms.
///
/// The operand stack's allocation is kept between calls and reused for every
/// atom. Atoms only need to live for the call that evaluates them, so one
/// evaluator can serve successive trajectory frames. Evaluators are cheap;
/// make one per thread when sharing a program.
pub struct Evaluator<'p> {
    program: &'p Program,
    spare: Vec<Value<'static>>,
}

impl<'p> Evaluator<'p> {
    pub fn new(program: &'p Program) -> Self {
        Evaluator {
            program,
            spare: Vec::with_capacity(program.max_stack_depth()),
        }
    }

    pub fn program(&self) -> &'p Program {
        self.program
    }

    /// Run the program with `atom` as its context and return the verdict.
    ///
    /// # Examples
    ///
    /// ```
    /// use atomsel::{compile, Atom, Evaluator};
    ///
    /// let program = compile("name == 'CA' && resid == 1").unwrap();
    /// let mut evaluator = Evaluator::new(&program);
    ///
    /// let ca = Atom::new(1, "CA").with_residue("ALA", 1);
    /// let cb = Atom::new(2, "CB").with_residue("ALA", 1);
    /// assert!(evaluator.evaluate(&ca).unwrap());
    /// assert!(!evaluator.evaluate(&cb).unwrap());
    /// ```
    pub fn evaluate<A>(&mut self, atom: &A) -> Result<bool, EvalError>
    where
        A: AtomRecord + ?Sized,
    {
        let mut stack = recycle(std::mem::take(&mut self.spare));
        let verdict = run(self.program, atom, &mut stack);
        self.spare = recycle(stack);
        verdict
    }
}

/// Hand an emptied stack's allocation to values of another lifetime.
fn recycle<'a, 'b>(mut stack: Vec<Value<'a>>) -> Vec<Value<'b>> {
    stack.clear();
    stack.into_iter().map(|_| Value::Boolean(false)).collect()
}

fn run<'a, A>(
    program: &'a Program,
    atom: &'a A,
    stack: &mut Vec<Value<'a>>,
) -> Result<bool, EvalError>
where
    A: AtomRecord + ?Sized,
{
    let instructions = program.instructions();
    let max_depth = program.max_stack_depth();

    let push = |stack: &mut Vec<Value<'a>>, value: Value<'a>, pc: usize| {
        if stack.len() >= max_depth {
            return Err(EvalError::StackOverflow { pc, max_depth });
        }
        stack.push(value);
        Ok(())
    };

    let mut pc = 0;
    while pc < instructions.len() {
        match &instructions[pc] {
            Instruction::PushField(field) => push(stack, atom.field(*field), pc)?,
            Instruction::PushConst(literal) => push(stack, literal.as_value(), pc)?,
            Instruction::Compare(op) => {
                let right = pop(stack, pc)?;
                let left = pop(stack, pc)?;
                let result = compare(*op, left, right)?;
                stack.push(Value::Boolean(result));
            }
            Instruction::RegexMatch { pattern, negate } => {
                let subject = pop(stack, pc)?;
                let text = subject.as_text().ok_or_else(|| {
                    EvalError::TypeMismatch(format!(
                        "pattern match needs a string, found a {}",
                        subject.kind()
                    ))
                })?;
                let regex = program
                    .patterns()
                    .get(*pattern)
                    .ok_or(EvalError::MissingPattern {
                        pc,
                        pattern: *pattern,
                    })?;
                stack.push(Value::Boolean(regex.is_match(text) != *negate));
            }
            Instruction::ShortCircuit { op, target } => {
                let left = stack.last().ok_or(EvalError::StackUnderflow { pc })?;
                if expect_bool(*left)? == op.deciding_value() {
                    pc = *target;
                    continue;
                }
            }
            Instruction::And => {
                let right = pop_bool(stack, pc)?;
                let left = pop_bool(stack, pc)?;
                stack.push(Value::Boolean(left && right));
            }
            Instruction::Or => {
                let right = pop_bool(stack, pc)?;
                let left = pop_bool(stack, pc)?;
                stack.push(Value::Boolean(left || right));
            }
            Instruction::Not => {
                let operand = pop_bool(stack, pc)?;
                stack.push(Value::Boolean(!operand));
            }
            Instruction::AcceptAll => push(stack, Value::Boolean(true), pc)?,
        }
        pc += 1;
    }

    match stack.as_slice() {
        [Value::Boolean(verdict)] => Ok(*verdict),
        rest => Err(EvalError::InvalidFinalState { depth: rest.len() }),
    }
}

fn pop<'a>(stack: &mut Vec<Value<'a>>, pc: usize) -> Result<Value<'a>, EvalError> {
    stack.pop().ok_or(EvalError::StackUnderflow { pc })
}

fn pop_bool(stack: &mut Vec<Value<'_>>, pc: usize) -> Result<bool, EvalError> {
    let value = pop(stack, pc)?;
    expect_bool(value)
}

fn expect_bool(value: Value<'_>) -> Result<bool, EvalError> {
    value.as_bool().ok_or_else(|| {
        EvalError::TypeMismatch(format!("expected a boolean, found a {}", value.kind()))
    })
}

fn numbers_equal(a: f64, b: f64) -> bool {
    (a - b).abs() <= NUMERIC_EPSILON
}

/// Apply a relational operator under the coercion rules: numbers compare
/// numerically (with [`NUMERIC_EPSILON`] for equality), strings byte-wise,
/// booleans only for (in)equality.
pub fn compare(op: CmpOp, left: Value<'_>, right: Value<'_>) -> Result<bool, EvalError> {
    match (left, right) {
        (Value::Number(a), Value::Number(b)) => Ok(match op {
            CmpOp::Equal => numbers_equal(a, b),
            CmpOp::NotEqual => !numbers_equal(a, b),
            CmpOp::LessThan => a < b,
            CmpOp::GreaterThan => a > b,
            CmpOp::LessEqual => a <= b,
            CmpOp::GreaterEqual => a >= b,
        }),
        (Value::Text(a), Value::Text(b)) => Ok(match op {
            CmpOp::Equal => a == b,
            CmpOp::NotEqual => a != b,
            CmpOp::LessThan => a < b,
            CmpOp::GreaterThan => a > b,
            CmpOp::LessEqual => a <= b,
            CmpOp::GreaterEqual => a >= b,
        }),
        (Value::Boolean(a), Value::Boolean(b)) if !op.is_ordering() => {
            Ok((a == b) == (op == CmpOp::Equal))
        }
        (left, right) => Err(EvalError::TypeMismatch(format!(
            "cannot compare a {} with a {} using '{}'",
            left.kind(),
            right.kind(),
            op
        ))),
    }
}

/// Evaluate `program` against a single atom.
pub fn evaluate<A>(program: &Program, atom: &A) -> Result<bool, EvalError>
where
    A: AtomRecord + ?Sized,
{
    Evaluator::new(program).evaluate(atom)
}
