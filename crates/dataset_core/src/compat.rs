//! Type compatibility and widening rules.
//!
//! Two files may declare the same column with different types as long as one
//! type widens to the other under a rule the configuration allows. The
//! reconciled schema keeps the wider type.

use crate::{Column, LogicalType};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// A backward-compatible type change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Widening {
    /// int8 -> int16 -> int32 -> int64, the same for unsigned types, and
    /// unsigned into a strictly wider signed type
    IntegerPromotion,

    /// float16 -> float32 -> float64
    FloatPromotion,

    /// Integers that fit the mantissa exactly: up to 16 bits into float32,
    /// up to 32 bits into float64
    IntegerToFloat,

    /// decimal(p1, s1) -> decimal(p2, s2) when no integer or fractional
    /// digits are lost
    DecimalWidening,

    /// Nullable and non-nullable columns of the same type
    Nullability,
}

impl Widening {
    /// Every rule, in declaration order.
    pub const ALL: [Widening; 5] = [
        Widening::IntegerPromotion,
        Widening::FloatPromotion,
        Widening::IntegerToFloat,
        Widening::DecimalWidening,
        Widening::Nullability,
    ];
}

fn default_allowed() -> BTreeSet<Widening> {
    [
        Widening::IntegerPromotion,
        Widening::FloatPromotion,
        Widening::Nullability,
    ]
    .into_iter()
    .collect()
}

/// Allow-list of widenings accepted when reconciling schemas.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompatibilityRules {
    /// Widenings that are not reported as incompatible
    #[serde(default = "default_allowed")]
    pub allowed: BTreeSet<Widening>,
}

impl Default for CompatibilityRules {
    fn default() -> Self {
        Self {
            allowed: default_allowed(),
        }
    }
}

impl CompatibilityRules {
    /// Rules that only accept identical types.
    pub fn exact() -> Self {
        Self {
            allowed: BTreeSet::new(),
        }
    }

    /// Rules that accept every known widening.
    pub fn permissive() -> Self {
        Self {
            allowed: Widening::ALL.into_iter().collect(),
        }
    }

    /// Adds a widening to the allow-list.
    pub fn allow(mut self, widening: Widening) -> Self {
        self.allowed.insert(widening);
        self
    }

    /// Removes a widening from the allow-list.
    pub fn deny(mut self, widening: Widening) -> Self {
        self.allowed.remove(&widening);
        self
    }

    /// Returns true if the widening is allowed.
    pub fn allows(&self, widening: Widening) -> bool {
        self.allowed.contains(&widening)
    }

    /// Returns the common type of `a` and `b`, or `None` when they are
    /// incompatible under these rules.
    pub fn unify(&self, a: &LogicalType, b: &LogicalType) -> Option<LogicalType> {
        if a == b {
            return Some(a.clone());
        }

        match (a, b) {
            (LogicalType::List(x), LogicalType::List(y)) => {
                self.unify(x, y).map(|t| LogicalType::List(Box::new(t)))
            }
            (
                LogicalType::Map { key: ka, value: va },
                LogicalType::Map { key: kb, value: vb },
            ) => Some(LogicalType::Map {
                key: Box::new(self.unify(ka, kb)?),
                value: Box::new(self.unify(va, vb)?),
            }),
            (LogicalType::Struct(fa), LogicalType::Struct(fb)) => {
                if fa.len() != fb.len() {
                    return None;
                }
                fa.iter()
                    .zip(fb)
                    .map(|(x, y)| {
                        if x.name == y.name {
                            self.unify_columns(x, y)
                        } else {
                            None
                        }
                    })
                    .collect::<Option<Vec<_>>>()
                    .map(LogicalType::Struct)
            }
            _ if self.widens_to(a, b) => Some(b.clone()),
            _ if self.widens_to(b, a) => Some(a.clone()),
            _ => None,
        }
    }

    /// Unifies two declarations of the same column, including nullability.
    pub fn unify_columns(&self, existing: &Column, incoming: &Column) -> Option<Column> {
        let data_type = self.unify(&existing.data_type, &incoming.data_type)?;
        let nullable = if existing.nullable == incoming.nullable {
            existing.nullable
        } else if self.allows(Widening::Nullability) {
            true
        } else {
            return None;
        };

        Some(Column {
            name: existing.name.clone(),
            data_type,
            nullable,
        })
    }

    /// Returns true if `from` is strictly narrower than `to` under an
    /// allowed rule.
    fn widens_to(&self, from: &LogicalType, to: &LogicalType) -> bool {
        let (Some(from_bits), Some(to_bits)) = (from.bit_width(), to.bit_width()) else {
            return self.decimal_widens_to(from, to);
        };

        if self.allows(Widening::IntegerPromotion) {
            let same_sign = (from.is_signed_integer() && to.is_signed_integer())
                || (from.is_unsigned_integer() && to.is_unsigned_integer());
            if same_sign && to_bits > from_bits {
                return true;
            }
            if from.is_unsigned_integer() && to.is_signed_integer() && to_bits > from_bits {
                return true;
            }
        }

        if self.allows(Widening::FloatPromotion)
            && from.is_float()
            && to.is_float()
            && to_bits > from_bits
        {
            return true;
        }

        if self.allows(Widening::IntegerToFloat) && from.is_integer() {
            return match to {
                LogicalType::Float32 => from_bits <= 16,
                LogicalType::Float64 => from_bits <= 32,
                _ => false,
            };
        }

        false
    }

    fn decimal_widens_to(&self, from: &LogicalType, to: &LogicalType) -> bool {
        if !self.allows(Widening::DecimalWidening) {
            return false;
        }

        match (from, to) {
            (
                LogicalType::Decimal {
                    precision: p1,
                    scale: s1,
                },
                LogicalType::Decimal {
                    precision: p2,
                    scale: s2,
                },
            ) => {
                let int_digits_from = i16::from(*p1) - i16::from(*s1);
                let int_digits_to = i16::from(*p2) - i16::from(*s2);
                s2 >= s1 && int_digits_to >= int_digits_from
            }
            _ => false,
        }
    }
}
