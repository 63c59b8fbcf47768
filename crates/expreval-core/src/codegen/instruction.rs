// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Stack machine instruction set.

use std::fmt;

use crate::ast::{BinaryOperator, UnaryOperator};

/// One stack machine instruction.
///
/// Jump targets are absolute instruction indices; a target equal to the
/// program length means "fall off the end".
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Instruction {
    /// Push a constant.
    Push(f64),
    /// Pop a value into a local slot.
    Store(usize),
    /// Duplicate the top of the stack.
    Dup,
    /// Discard the top of the stack.
    Pop,
    /// Pop right, pop left, push `left op right`.
    Binary(BinaryOperator),
    /// Pop a value and push `op value`. `+` is never emitted.
    Unary(UnaryOperator),
    /// Continue at the given index.
    Jump(usize),
    /// Pop a value; continue at the given index if it is zero.
    JumpIfFalse(usize),
}

impl Instruction {
    /// Values popped and pushed by this instruction.
    #[must_use]
    pub const fn stack_effect(self) -> (usize, usize) {
        match self {
            Self::Push(_) => (0, 1),
            Self::Store(_) | Self::Pop | Self::JumpIfFalse(_) => (1, 0),
            Self::Dup => (1, 2),
            Self::Binary(_) => (2, 1),
            Self::Unary(_) => (1, 1),
            Self::Jump(_) => (0, 0),
        }
    }

    /// Returns the jump target, if this is a jump.
    #[must_use]
    pub const fn target(self) -> Option<usize> {
        match self {
            Self::Jump(target) | Self::JumpIfFalse(target) => Some(target),
            _ => None,
        }
    }

    /// Returns true if execution can continue with the next instruction.
    #[must_use]
    pub const fn falls_through(self) -> bool {
        !matches!(self, Self::Jump(_))
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Push(value) => write!(f, "push {value}"),
            Self::Store(slot) => write!(f, "store {slot}"),
            Self::Dup => f.write_str("dup"),
            Self::Pop => f.write_str("pop"),
            Self::Binary(op) => write!(f, "binary {}", op.symbol()),
            Self::Unary(op) => write!(f, "unary {}", op.symbol()),
            Self::Jump(target) => write!(f, "jump @{target}"),
            Self::JumpIfFalse(target) => write!(f, "jump_if_false @{target}"),
        }
    }
}
