//! Type conversion from footer (Arrow) types to logical types.

use arrow_schema::{DataType, Field, TimeUnit as ArrowTimeUnit};
use dataset_core::{Column, LogicalType, TimeUnit};
use tracing::debug;

/// Converts an Arrow field to a dataset column.
pub fn arrow_field_to_column(field: &Field) -> Column {
    Column::new(
        field.name(),
        arrow_type_to_logical(field.data_type()),
        field.is_nullable(),
    )
}

/// Converts an Arrow type to a logical type.
///
/// Layout variants (large, view, fixed-size, dictionary-encoded) collapse to
/// the same logical type.
pub fn arrow_type_to_logical(data_type: &DataType) -> LogicalType {
    match data_type {
        DataType::Null => LogicalType::Null,
        DataType::Boolean => LogicalType::Boolean,
        DataType::Int8 => LogicalType::Int8,
        DataType::Int16 => LogicalType::Int16,
        DataType::Int32 => LogicalType::Int32,
        DataType::Int64 => LogicalType::Int64,
        DataType::UInt8 => LogicalType::UInt8,
        DataType::UInt16 => LogicalType::UInt16,
        DataType::UInt32 => LogicalType::UInt32,
        DataType::UInt64 => LogicalType::UInt64,
        DataType::Float16 => LogicalType::Float16,
        DataType::Float32 => LogicalType::Float32,
        DataType::Float64 => LogicalType::Float64,
        DataType::Decimal128(precision, scale) | DataType::Decimal256(precision, scale) => {
            LogicalType::Decimal {
                precision: *precision,
                scale: *scale,
            }
        }
        DataType::Utf8 | DataType::LargeUtf8 | DataType::Utf8View => LogicalType::Utf8,
        DataType::Binary
        | DataType::LargeBinary
        | DataType::BinaryView
        | DataType::FixedSizeBinary(_) => LogicalType::Binary,
        DataType::Date32 | DataType::Date64 => LogicalType::Date,
        DataType::Time32(_) | DataType::Time64(_) => LogicalType::Time,
        DataType::Timestamp(unit, _) => LogicalType::Timestamp {
            unit: convert_time_unit(unit),
        },
        DataType::Duration(_) => LogicalType::Duration,
        DataType::List(element)
        | DataType::LargeList(element)
        | DataType::FixedSizeList(element, _) => {
            LogicalType::List(Box::new(arrow_type_to_logical(element.data_type())))
        }
        DataType::Struct(fields) => LogicalType::Struct(
            fields
                .iter()
                .map(|field| arrow_field_to_column(field))
                .collect(),
        ),
        DataType::Map(entries, _) => match entries.data_type() {
            DataType::Struct(kv) if kv.len() == 2 => LogicalType::Map {
                key: Box::new(arrow_type_to_logical(kv[0].data_type())),
                value: Box::new(arrow_type_to_logical(kv[1].data_type())),
            },
            other => LogicalType::Other(format!("map<{}>", other)),
        },
        DataType::Dictionary(_, value) => arrow_type_to_logical(value),
        other => {
            debug!("No dedicated logical type for Arrow type {}", other);
            LogicalType::Other(other.to_string())
        }
    }
}

fn convert_time_unit(unit: &ArrowTimeUnit) -> TimeUnit {
    match unit {
        ArrowTimeUnit::Second => TimeUnit::Second,
        ArrowTimeUnit::Millisecond => TimeUnit::Millisecond,
        ArrowTimeUnit::Microsecond => TimeUnit::Microsecond,
        ArrowTimeUnit::Nanosecond => TimeUnit::Nanosecond,
    }
}
