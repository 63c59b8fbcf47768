// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! The fixed type lattice.

use std::fmt;

/// A nominal type tag.
///
/// The set is closed; each variant is the single, process-wide symbol for its
/// name, obtained by value or through [`TypeSymbol::lookup`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeSymbol {
    /// Anything, including values whose type could not be determined.
    Object,
    Int,
    Double,
    Bool,
}

impl TypeSymbol {
    /// Every symbol, in declaration order.
    pub const ALL: [Self; 4] = [Self::Object, Self::Int, Self::Double, Self::Bool];

    /// Looks up a symbol by its nominal key.
    #[must_use]
    pub fn lookup(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|symbol| symbol.name() == name)
    }

    /// Returns the nominal key.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Object => "Object",
            Self::Int => "Int",
            Self::Double => "Double",
            Self::Bool => "Bool",
        }
    }

    /// Returns true for `Int` and `Double`.
    #[must_use]
    pub const fn is_numeric(self) -> bool {
        matches!(self, Self::Int | Self::Double)
    }

    /// Result type of an arithmetic operator applied to `self` and `other`.
    ///
    /// Identical types are kept, a `Double` on either side wins, and anything
    /// else falls back to `Int`.
    #[must_use]
    pub fn arithmetic(self, other: Self) -> Self {
        if self == other {
            self
        } else if self == Self::Double || other == Self::Double {
            Self::Double
        } else {
            Self::Int
        }
    }

    /// Common type of two conditional branches, or `None` if they conflict.
    ///
    /// Only `Int` and `Double` unify to something other than themselves.
    #[must_use]
    pub fn unify(self, other: Self) -> Option<Self> {
        match (self, other) {
            (a, b) if a == b => Some(a),
            (Self::Int, Self::Double) | (Self::Double, Self::Int) => Some(Self::Double),
            _ => None,
        }
    }
}

impl fmt::Display for TypeSymbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
