// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Verified instruction sequences and their interpreter.

use std::fmt;

use super::CodegenError;
use super::instruction::Instruction;
use crate::ast::is_truthy;

/// A zero-argument function produced by the code generator.
///
/// Construction verifies the program: jumps go forward and stay in range,
/// local slots exist, no instruction underflows the stack, every path into an
/// instruction arrives at the same depth, and the program ends with exactly
/// one value. [`CompiledFunction::call`] relies on these checks and always
/// terminates.
///
/// Immutable once built; each call gets its own operand stack and locals.
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledFunction {
    instructions: Vec<Instruction>,
    locals: usize,
    max_stack: usize,
}

impl CompiledFunction {
    /// Verifies `instructions` and wraps them as a callable function.
    ///
    /// # Errors
    ///
    /// Returns the first verification failure found.
    pub fn new(instructions: Vec<Instruction>, locals: usize) -> Result<Self, CodegenError> {
        let max_stack = verify(&instructions, locals)?;
        Ok(Self {
            instructions,
            locals,
            max_stack,
        })
    }

    /// Returns the instruction sequence.
    #[must_use]
    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions
    }

    /// Returns the number of local slots.
    #[must_use]
    pub fn locals(&self) -> usize {
        self.locals
    }

    /// Returns the deepest operand stack any path reaches.
    #[must_use]
    pub fn max_stack(&self) -> usize {
        self.max_stack
    }

    /// Runs the function and returns its value.
    #[must_use]
    pub fn call(&self) -> f64 {
        let mut stack: Vec<f64> = Vec::with_capacity(self.max_stack);
        let mut locals = vec![0.0; self.locals];
        let mut pc = 0;

        while let Some(instruction) = self.instructions.get(pc) {
            pc += 1;
            match *instruction {
                Instruction::Push(value) => stack.push(value),
                Instruction::Store(slot) => {
                    let value = pop(&mut stack);
                    if let Some(local) = locals.get_mut(slot) {
                        *local = value;
                    }
                }
                Instruction::Dup => {
                    let value = stack.last().copied().unwrap_or(f64::NAN);
                    stack.push(value);
                }
                Instruction::Pop => {
                    stack.pop();
                }
                Instruction::Binary(op) => {
                    let right = pop(&mut stack);
                    let left = pop(&mut stack);
                    stack.push(op.apply(left, right));
                }
                Instruction::Unary(op) => {
                    let operand = pop(&mut stack);
                    stack.push(op.apply(operand));
                }
                Instruction::Jump(target) => pc = target,
                Instruction::JumpIfFalse(target) => {
                    if !is_truthy(pop(&mut stack)) {
                        pc = target;
                    }
                }
            }
        }

        pop(&mut stack)
    }

    /// Converts the function into a plain closure.
    pub fn into_fn(self) -> impl Fn() -> f64 + Send + Sync + 'static {
        move || self.call()
    }
}

impl fmt::Display for CompiledFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "; locals: {}, max stack: {}", self.locals, self.max_stack)?;
        for (pc, instruction) in self.instructions.iter().enumerate() {
            writeln!(f, "{pc:>4}: {instruction}")?;
        }
        Ok(())
    }
}

fn pop(stack: &mut Vec<f64>) -> f64 {
    stack.pop().unwrap_or(f64::NAN)
}

/// Checks stack discipline over every path and returns the maximum depth.
fn verify(instructions: &[Instruction], locals: usize) -> Result<usize, CodegenError> {
    let end = instructions.len();
    let mut depths: Vec<Option<usize>> = vec![None; end + 1];
    let mut pending = vec![(0, 0)];
    let mut max_stack = 0;

    while let Some((pc, depth)) = pending.pop() {
        match depths[pc] {
            Some(expected) if expected == depth => continue,
            Some(expected) => {
                return Err(CodegenError::Unbalanced {
                    pc,
                    expected,
                    found: depth,
                });
            }
            None => depths[pc] = Some(depth),
        }
        let Some(&instruction) = instructions.get(pc) else {
            continue;
        };

        match instruction {
            Instruction::Store(slot) if slot >= locals => {
                return Err(CodegenError::InvalidSlot { pc, slot });
            }
            _ => {}
        }

        let (pops, pushes) = instruction.stack_effect();
        let depth = depth
            .checked_sub(pops)
            .ok_or(CodegenError::StackUnderflow { pc })?
            + pushes;
        max_stack = max_stack.max(depth);

        if let Some(target) = instruction.target() {
            if target <= pc || target > end {
                return Err(CodegenError::InvalidJump { pc, target });
            }
            pending.push((target, depth));
        }
        if instruction.falls_through() {
            pending.push((pc + 1, depth));
        }
    }

    match depths[end] {
        Some(1) => Ok(max_stack),
        found => Err(CodegenError::Unbalanced {
            pc: end,
            expected: 1,
            found: found.unwrap_or(0),
        }),
    }
}
