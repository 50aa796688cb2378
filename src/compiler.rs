use log::debug;
use regex::Regex;

use crate::{
    ast::{CmpOp, Expr, LogicOp},
    atom::Field,
    error::CompileError,
    parser,
    program::{Instruction, Program},
    value::{Literal, ValueKind},
};

/// Type-checks an expression tree and flattens it into stack-machine code.
///
/// Every sub-expression has a static type, so mismatches between fields and
/// literals are reported here rather than once per atom.
#[derive(Default)]
pub struct Compiler {
    instructions: Vec<Instruction>,
    patterns: Vec<Regex>,
    depth: usize,
    max_depth: usize,
}

impl Compiler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Compile a parsed expression. `source` is kept on the program for
    /// diagnostics.
    pub fn compile(mut self, expr: &Expr, source: &str) -> Result<Program, CompileError> {
        let kind = self.compile_expr(expr)?;
        if kind != ValueKind::Boolean {
            return Err(CompileError::TypeMismatch {
                offset: 0,
                message: format!("a selection must be a boolean expression, found a {}", kind),
            });
        }

        Ok(Program::new(
            source.to_string(),
            self.instructions,
            self.patterns,
            self.max_depth,
        ))
    }

    fn emit(&mut self, instruction: Instruction) -> usize {
        self.instructions.push(instruction);
        self.instructions.len() - 1
    }

    fn push(&mut self) {
        self.depth += 1;
        self.max_depth = self.max_depth.max(self.depth);
    }

    fn pop(&mut self) {
        self.depth -= 1;
    }

    fn compile_expr(&mut self, expr: &Expr) -> Result<ValueKind, CompileError> {
        match expr {
            Expr::All => {
                self.emit(Instruction::AcceptAll);
                self.push();
                Ok(ValueKind::Boolean)
            }
            Expr::Field { name, offset } => {
                let field = Field::from_name(name).ok_or_else(|| CompileError::UnknownField {
                    name: name.clone(),
                    offset: *offset,
                })?;
                self.emit(Instruction::PushField(field));
                self.push();
                Ok(field.kind())
            }
            Expr::Number(n) => Ok(self.push_literal(Literal::Number(*n))),
            Expr::Text(s) => Ok(self.push_literal(Literal::Text(s.as_str().into()))),
            Expr::Not { operand, offset } => {
                let kind = self.compile_expr(operand)?;
                if kind != ValueKind::Boolean {
                    return Err(CompileError::TypeMismatch {
                        offset: *offset,
                        message: format!("'!' needs a boolean operand, found a {}", kind),
                    });
                }
                self.emit(Instruction::Not);
                Ok(ValueKind::Boolean)
            }
            Expr::Compare {
                op,
                left,
                right,
                offset,
            } => {
                let left_kind = self.compile_expr(left)?;
                let right_kind = self.compile_expr(right)?;
                check_comparison(*op, left_kind, right_kind, *offset)?;
                self.emit(Instruction::Compare(*op));
                self.pop();
                Ok(ValueKind::Boolean)
            }
            Expr::Match {
                subject,
                pattern,
                negate,
                offset,
                pattern_offset,
            } => {
                let kind = self.compile_expr(subject)?;
                if kind != ValueKind::Text {
                    let op = if *negate { "!~" } else { "=~" };
                    return Err(CompileError::TypeMismatch {
                        offset: *offset,
                        message: format!("'{}' needs a string on its left, found a {}", op, kind),
                    });
                }
                let regex = Regex::new(pattern).map_err(|source| CompileError::Pattern {
                    pattern: pattern.clone(),
                    offset: *pattern_offset,
                    source,
                })?;
                let index = self.patterns.len();
                self.patterns.push(regex);
                self.emit(Instruction::RegexMatch {
                    pattern: index,
                    negate: *negate,
                });
                Ok(ValueKind::Boolean)
            }
            Expr::Logical {
                op,
                operands,
                offsets,
            } => {
                // Every short-circuit jumps past the last combinator, leaving
                // the deciding value as the result.
                let mut jumps = Vec::with_capacity(offsets.len());
                for (i, operand) in operands.iter().enumerate() {
                    let blame = offsets.get(i.saturating_sub(1)).copied().unwrap_or(0);
                    if i > 0 {
                        jumps.push(self.emit(Instruction::ShortCircuit {
                            op: *op,
                            target: 0,
                        }));
                    }
                    self.compile_logical_operand(*op, operand, blame)?;
                    if i > 0 {
                        self.emit(match op {
                            LogicOp::And => Instruction::And,
                            LogicOp::Or => Instruction::Or,
                        });
                        self.pop();
                    }
                }

                let target = self.instructions.len();
                for jump in jumps {
                    self.instructions[jump] = Instruction::ShortCircuit { op: *op, target };
                }
                Ok(ValueKind::Boolean)
            }
        }
    }

    fn push_literal(&mut self, literal: Literal) -> ValueKind {
        let kind = literal.kind();
        self.emit(Instruction::PushConst(literal));
        self.push();
        kind
    }

    fn compile_logical_operand(
        &mut self,
        op: LogicOp,
        operand: &Expr,
        offset: usize,
    ) -> Result<(), CompileError> {
        let kind = self.compile_expr(operand)?;
        if kind != ValueKind::Boolean {
            return Err(CompileError::TypeMismatch {
                offset,
                message: format!("'{}' needs boolean operands, found a {}", op, kind),
            });
        }
        Ok(())
    }
}

fn check_comparison(
    op: CmpOp,
    left: ValueKind,
    right: ValueKind,
    offset: usize,
) -> Result<(), CompileError> {
    match (left, right) {
        (ValueKind::Number, ValueKind::Number) | (ValueKind::Text, ValueKind::Text) => Ok(()),
        (ValueKind::Boolean, ValueKind::Boolean) if !op.is_ordering() => Ok(()),
        (ValueKind::Boolean, ValueKind::Boolean) => Err(CompileError::TypeMismatch {
            offset,
            message: format!("booleans cannot be ordered with '{}'", op),
        }),
        _ => Err(CompileError::TypeMismatch {
            offset,
            message: format!("cannot compare a {} with a {} using '{}'", left, right, op),
        }),
    }
}

/// Lex, parse and compile an expression.
///
/// # Examples
///
/// ```
/// use atomsel::compile;
///
/// let program = compile("name == 'CA' && resid <= 10").unwrap();
/// assert_eq!(program.max_stack_depth(), 3);
///
/// let all = compile("all").unwrap();
/// assert!(all.accepts_all());
/// ```
pub fn compile(input: &str) -> Result<Program, CompileError> {
    let expr = parser::parse(input)?;
    let program = Compiler::new().compile(&expr, input)?;
    debug!(
        "compiled selection {:?} into {} instructions (stack depth {})",
        input,
        program.len(),
        program.max_stack_depth()
    );
    Ok(program)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_circuit_targets_follow_the_combinator() {
        let program = compile("hydrogen || backbone").unwrap();
        assert_eq!(
            program.instructions(),
            &[
                Instruction::PushField(Field::Hydrogen),
                Instruction::ShortCircuit {
                    op: LogicOp::Or,
                    target: 4
                },
                Instruction::PushField(Field::Backbone),
                Instruction::Or,
            ]
        );
    }

    #[test]
    fn chain_jumps_past_the_last_combinator() {
        let program = compile("hydrogen || backbone || heavy").unwrap();
        let jump = Instruction::ShortCircuit {
            op: LogicOp::Or,
            target: 7,
        };
        assert_eq!(
            program.instructions(),
            &[
                Instruction::PushField(Field::Hydrogen),
                jump.clone(),
                Instruction::PushField(Field::Backbone),
                Instruction::Or,
                jump,
                Instruction::PushField(Field::Heavy),
                Instruction::Or,
            ]
        );
        assert_eq!(program.max_stack_depth(), 2);
    }

    #[test]
    fn depth_is_tracked_through_nesting() {
        // name, 'CA', then resid and 1 on top of the first verdict
        let program = compile("name == 'CA' && resid == 1").unwrap();
        assert_eq!(program.max_stack_depth(), 3);

        let program = compile("!hydrogen").unwrap();
        assert_eq!(program.max_stack_depth(), 1);
    }
}
