// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Code generation.
//!
//! Lowers a [`SyntaxTree`] to a stack machine program wrapped in a
//! [`CompiledFunction`]. Every expression leaves exactly one value on the
//! stack.
//!
//! | Expression | Lowering |
//! |------------|----------|
//! | literal | `push value` (`true`/`false` as `1`/`0`) |
//! | identifier | `push 0` |
//! | `a op b` | `a; b; binary op` |
//! | `-a`, `not a` | `a; unary op` (`+a` is just `a`) |
//! | `if c then b else e` | `c; jump_if_false E; b; jump END; E: e; END:` |
//! | `if c then b` | as above with `push 0` for the else arm |
//! | `let x = a` | `a; dup; store slot` |
//! | block | each expression, with `pop` between them; `push 0` if empty |
//!
//! Parameterized `let` and method invocation have no lowering and produce
//! [`CodegenError::Unsupported`]. Generation works on trees with parse
//! errors as long as no [`Expression::Missing`] node is reached.
//!
//! ```
//! use expreval_core::codegen::Generator;
//! use expreval_core::source_analysis::{DiagnosticsBag, parse_expression};
//!
//! let mut diagnostics = DiagnosticsBag::new();
//! let tree = parse_expression("(2 + 3) * 2", &mut diagnostics);
//! let function = Generator::generate(&tree, tree.root()).unwrap();
//! assert_eq!(function.call(), 10.0);
//! ```

mod function;
mod instruction;

pub use function::CompiledFunction;
pub use instruction::Instruction;

use crate::ast::{ExprId, Expression, SyntaxTree, UnaryOperator, from_bool, integer_value, real_value};
use crate::source_analysis::Span;

/// Why a tree could not be lowered.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CodegenError {
    #[error("{construct} cannot be compiled ({span})")]
    Unsupported { construct: &'static str, span: Span },

    #[error("cannot compile an incomplete expression ({span})")]
    MissingExpression { span: Span },

    #[error("jump label {0} was never placed")]
    UnresolvedLabel(usize),

    #[error("instruction {pc} jumps to {target}, which is not a later instruction")]
    InvalidJump { pc: usize, target: usize },

    #[error("instruction {pc} stores to unknown local slot {slot}")]
    InvalidSlot { pc: usize, slot: usize },

    #[error("instruction {pc} pops from an empty stack")]
    StackUnderflow { pc: usize },

    #[error("stack depth at instruction {pc} is {found}, expected {expected}")]
    Unbalanced {
        pc: usize,
        expected: usize,
        found: usize,
    },
}

/// A forward jump target, resolved once generation finishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Label(usize);

/// Single-use lowering state for one tree.
pub struct Generator<'t> {
    tree: &'t SyntaxTree,
    instructions: Vec<Instruction>,
    /// Instruction index for each placed label.
    labels: Vec<Option<usize>>,
    /// Jumps waiting for their label to be resolved.
    fixups: Vec<(usize, Label)>,
    locals: usize,
}

impl<'t> Generator<'t> {
    /// Lowers the expression `root` of `tree` into a verified function.
    ///
    /// # Errors
    ///
    /// Returns [`CodegenError::Unsupported`] or
    /// [`CodegenError::MissingExpression`] for constructs without a
    /// lowering; the remaining variants indicate a generator defect.
    pub fn generate(tree: &'t SyntaxTree, root: ExprId) -> Result<CompiledFunction, CodegenError> {
        let mut generator = Self {
            tree,
            instructions: Vec::new(),
            labels: Vec::new(),
            fixups: Vec::new(),
            locals: 0,
        };
        generator.expression(root)?;
        let function = generator.finish()?;
        tracing::debug!(
            instructions = function.instructions().len(),
            locals = function.locals(),
            max_stack = function.max_stack(),
            "code generation finished"
        );
        Ok(function)
    }

    fn finish(mut self) -> Result<CompiledFunction, CodegenError> {
        for (pc, label) in std::mem::take(&mut self.fixups) {
            let target = self
                .labels
                .get(label.0)
                .copied()
                .flatten()
                .ok_or(CodegenError::UnresolvedLabel(label.0))?;
            if let Some(instruction) = self.instructions.get_mut(pc) {
                *instruction = match *instruction {
                    Instruction::Jump(_) => Instruction::Jump(target),
                    Instruction::JumpIfFalse(_) => Instruction::JumpIfFalse(target),
                    other => other,
                };
            }
        }
        CompiledFunction::new(self.instructions, self.locals)
    }

    // ========================================================================
    // Emission
    // ========================================================================

    fn emit(&mut self, instruction: Instruction) {
        tracing::trace!(pc = self.instructions.len(), %instruction, "emit");
        self.instructions.push(instruction);
    }

    fn new_label(&mut self) -> Label {
        self.labels.push(None);
        Label(self.labels.len() - 1)
    }

    fn place(&mut self, label: Label) {
        self.labels[label.0] = Some(self.instructions.len());
    }

    /// Emits a jump whose target is patched in [`Self::finish`].
    fn jump(&mut self, jump: fn(usize) -> Instruction, label: Label) {
        self.fixups.push((self.instructions.len(), label));
        self.emit(jump(label.0));
    }

    fn expression(&mut self, id: ExprId) -> Result<(), CodegenError> {
        stacker::maybe_grow(32 * 1024, 256 * 1024, || self.lower(id))
    }

    fn lower(&mut self, id: ExprId) -> Result<(), CodegenError> {
        let tree = self.tree;
        match &tree[id] {
            Expression::IntegerLiteral { token } => self.emit(Instruction::Push(integer_value(token))),
            Expression::RealLiteral {
                number, fraction, ..
            } => self.emit(Instruction::Push(real_value(number, fraction))),
            Expression::BooleanLiteral { value, .. } => self.emit(Instruction::Push(from_bool(*value))),
            Expression::Identifier { .. } => self.emit(Instruction::Push(0.0)),
            Expression::Parenthesized { inner, .. } => self.expression(*inner)?,
            Expression::Unary {
                operator, operand, ..
            } => {
                self.expression(*operand)?;
                if *operator != UnaryOperator::Plus {
                    self.emit(Instruction::Unary(*operator));
                }
            }
            Expression::Binary {
                operator,
                left,
                right,
                ..
            } => {
                self.expression(*left)?;
                self.expression(*right)?;
                self.emit(Instruction::Binary(*operator));
            }
            Expression::IfThenElse {
                condition,
                body,
                else_clause,
                ..
            } => {
                let otherwise = self.new_label();
                let end = self.new_label();
                self.expression(*condition)?;
                self.jump(Instruction::JumpIfFalse, otherwise);
                self.expression(*body)?;
                self.jump(Instruction::Jump, end);
                self.place(otherwise);
                match else_clause {
                    Some(else_clause) => self.expression(else_clause.body)?,
                    None => self.emit(Instruction::Push(0.0)),
                }
                self.place(end);
            }
            Expression::Let { parameters, .. } if !parameters.is_empty() => {
                return Err(CodegenError::Unsupported {
                    construct: "a let with parameters",
                    span: tree.span(id),
                });
            }
            Expression::Let { bound, .. } => {
                let slot = self.locals;
                self.locals += 1;
                self.expression(*bound)?;
                self.emit(Instruction::Dup);
                self.emit(Instruction::Store(slot));
            }
            Expression::MethodInvoke { .. } => {
                return Err(CodegenError::Unsupported {
                    construct: "a method invocation",
                    span: tree.span(id),
                });
            }
            Expression::Block { expressions } => {
                if expressions.is_empty() {
                    self.emit(Instruction::Push(0.0));
                }
                for (index, expr) in expressions.iter().enumerate() {
                    if index > 0 {
                        self.emit(Instruction::Pop);
                    }
                    self.expression(*expr)?;
                }
            }
            Expression::Missing { token } => {
                return Err(CodegenError::MissingExpression { span: token.span() });
            }
        }
        Ok(())
    }
}
