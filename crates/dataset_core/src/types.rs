//! Logical column types.
//!
//! Footer schemas are mapped onto this closed set of types so that every
//! comparison between two files is exhaustive. Types the model does not name
//! are carried as [`LogicalType::Other`] and only match themselves.

use serde::{Serialize, Serializer};
use std::fmt;

/// Resolution of a timestamp column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TimeUnit {
    Second,
    Millisecond,
    Microsecond,
    Nanosecond,
}

impl TimeUnit {
    fn suffix(&self) -> &'static str {
        match self {
            TimeUnit::Second => "s",
            TimeUnit::Millisecond => "ms",
            TimeUnit::Microsecond => "us",
            TimeUnit::Nanosecond => "ns",
        }
    }
}

/// The logical type of a column, independent of its physical encoding.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum LogicalType {
    /// Column that only ever holds nulls
    Null,
    Boolean,
    Int8,
    Int16,
    Int32,
    Int64,
    UInt8,
    UInt16,
    UInt32,
    UInt64,
    Float16,
    Float32,
    Float64,
    /// Fixed-point decimal
    Decimal { precision: u8, scale: i8 },
    /// UTF-8 string (regular, large and view layouts)
    Utf8,
    /// Raw bytes (variable and fixed width)
    Binary,
    Date,
    Time,
    Timestamp { unit: TimeUnit },
    Duration,
    /// List of elements (regular, large and fixed-size layouts)
    List(Box<LogicalType>),
    /// Nested record
    Struct(Vec<Column>),
    Map {
        key: Box<LogicalType>,
        value: Box<LogicalType>,
    },
    /// A type without a dedicated variant, identified by its display name
    Other(String),
}

impl LogicalType {
    /// Returns true for signed integer types.
    pub fn is_signed_integer(&self) -> bool {
        matches!(
            self,
            LogicalType::Int8 | LogicalType::Int16 | LogicalType::Int32 | LogicalType::Int64
        )
    }

    /// Returns true for unsigned integer types.
    pub fn is_unsigned_integer(&self) -> bool {
        matches!(
            self,
            LogicalType::UInt8 | LogicalType::UInt16 | LogicalType::UInt32 | LogicalType::UInt64
        )
    }

    /// Returns true for any integer type.
    pub fn is_integer(&self) -> bool {
        self.is_signed_integer() || self.is_unsigned_integer()
    }

    /// Returns true for floating point types.
    pub fn is_float(&self) -> bool {
        matches!(
            self,
            LogicalType::Float16 | LogicalType::Float32 | LogicalType::Float64
        )
    }

    /// Width in bits of integer and floating point types.
    pub fn bit_width(&self) -> Option<u8> {
        match self {
            LogicalType::Int8 | LogicalType::UInt8 => Some(8),
            LogicalType::Int16 | LogicalType::UInt16 | LogicalType::Float16 => Some(16),
            LogicalType::Int32 | LogicalType::UInt32 | LogicalType::Float32 => Some(32),
            LogicalType::Int64 | LogicalType::UInt64 | LogicalType::Float64 => Some(64),
            _ => None,
        }
    }
}

impl fmt::Display for LogicalType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogicalType::Null => write!(f, "null"),
            LogicalType::Boolean => write!(f, "boolean"),
            LogicalType::Int8 => write!(f, "int8"),
            LogicalType::Int16 => write!(f, "int16"),
            LogicalType::Int32 => write!(f, "int32"),
            LogicalType::Int64 => write!(f, "int64"),
            LogicalType::UInt8 => write!(f, "uint8"),
            LogicalType::UInt16 => write!(f, "uint16"),
            LogicalType::UInt32 => write!(f, "uint32"),
            LogicalType::UInt64 => write!(f, "uint64"),
            LogicalType::Float16 => write!(f, "float16"),
            LogicalType::Float32 => write!(f, "float32"),
            LogicalType::Float64 => write!(f, "float64"),
            LogicalType::Decimal { precision, scale } => {
                write!(f, "decimal({}, {})", precision, scale)
            }
            LogicalType::Utf8 => write!(f, "string"),
            LogicalType::Binary => write!(f, "binary"),
            LogicalType::Date => write!(f, "date"),
            LogicalType::Time => write!(f, "time"),
            LogicalType::Timestamp { unit } => write!(f, "timestamp[{}]", unit.suffix()),
            LogicalType::Duration => write!(f, "duration"),
            LogicalType::List(element) => write!(f, "list<{}>", element),
            LogicalType::Struct(fields) => {
                write!(f, "struct<")?;
                for (i, field) in fields.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", field)?;
                }
                write!(f, ">")
            }
            LogicalType::Map { key, value } => write!(f, "map<{}, {}>", key, value),
            LogicalType::Other(name) => write!(f, "{}", name),
        }
    }
}

impl Serialize for LogicalType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// A named, typed column of a file or dataset schema.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Column {
    /// Column name
    pub name: String,

    /// Logical type of the column
    #[serde(rename = "type")]
    pub data_type: LogicalType,

    /// Whether the column may hold nulls
    pub nullable: bool,
}

impl Column {
    /// Creates a new column.
    pub fn new(name: impl Into<String>, data_type: LogicalType, nullable: bool) -> Self {
        Self {
            name: name.into(),
            data_type,
            nullable,
        }
    }

    /// Creates a nullable column.
    pub fn nullable(name: impl Into<String>, data_type: LogicalType) -> Self {
        Self::new(name, data_type, true)
    }

    /// Creates a non-nullable column.
    pub fn required(name: impl Into<String>, data_type: LogicalType) -> Self {
        Self::new(name, data_type, false)
    }

    /// Type label used in issue messages, e.g. `int64` or `int64 not null`.
    pub fn type_label(&self) -> String {
        if self.nullable {
            self.data_type.to_string()
        } else {
            format!("{} not null", self.data_type)
        }
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.name, self.type_label())
    }
}
