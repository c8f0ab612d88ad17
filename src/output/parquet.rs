//! Parquet writer.
//!
//! Every column becomes one OPTIONAL leaf; nulls are encoded with definition level 0. The whole
//! dataset is written as a single row group.

use std::io::Write;
use std::sync::Arc;

use parquet::basic::{Compression, ConvertedType, Repetition, Type as PhysicalType};
use parquet::column::writer::ColumnWriter;
use parquet::data_type::ByteArray;
use parquet::errors::ParquetError;
use parquet::file::properties::WriterProperties;
use parquet::file::writer::SerializedFileWriter;
use parquet::schema::types::{Type, TypePtr};

use crate::error::{ProcessingError, ProcessingResult};
use crate::types::{DataSet, DataType, Schema, Value};

/// Write `dataset` as a Parquet file.
pub fn write_parquet<W: Write + Send>(
    dataset: &DataSet,
    writer: W,
    compression: Compression,
) -> ProcessingResult<()> {
    let schema = parquet_schema(&dataset.schema)?;
    let props = Arc::new(
        WriterProperties::builder()
            .set_compression(compression)
            .build(),
    );
    let mut writer = SerializedFileWriter::new(writer, schema, props)?;

    let mut rg = writer.next_row_group()?;
    let mut col_idx: usize = 0;
    while let Some(mut col) = rg.next_column()? {
        match col.untyped() {
            ColumnWriter::Int64ColumnWriter(w) => {
                let (values, defs) = leaf_values(dataset, col_idx, |v| match v {
                    Value::Int64(x) => Some(*x),
                    _ => None,
                })?;
                w.write_batch(&values, Some(&defs), None)?;
            }
            ColumnWriter::DoubleColumnWriter(w) => {
                let (values, defs) = leaf_values(dataset, col_idx, |v| match v {
                    Value::Float64(x) => Some(*x),
                    _ => None,
                })?;
                w.write_batch(&values, Some(&defs), None)?;
            }
            ColumnWriter::BoolColumnWriter(w) => {
                let (values, defs) = leaf_values(dataset, col_idx, |v| match v {
                    Value::Bool(x) => Some(*x),
                    _ => None,
                })?;
                w.write_batch(&values, Some(&defs), None)?;
            }
            ColumnWriter::ByteArrayColumnWriter(w) => {
                let (values, defs) = leaf_values(dataset, col_idx, |v| match v {
                    Value::Utf8(s) => Some(ByteArray::from(s.as_str())),
                    _ => None,
                })?;
                w.write_batch(&values, Some(&defs), None)?;
            }
            _ => {
                return Err(ParquetError::General(format!(
                    "unexpected column writer for column {col_idx}"
                ))
                .into());
            }
        }
        col.close()?;
        col_idx += 1;
    }
    rg.close()?;
    writer.close()?;
    Ok(())
}

fn parquet_schema(schema: &Schema) -> ProcessingResult<TypePtr> {
    let mut fields: Vec<TypePtr> = Vec::with_capacity(schema.len());
    for field in &schema.fields {
        let physical = match field.data_type {
            DataType::Int64 => PhysicalType::INT64,
            DataType::Float64 => PhysicalType::DOUBLE,
            DataType::Bool => PhysicalType::BOOLEAN,
            DataType::Utf8 => PhysicalType::BYTE_ARRAY,
        };
        let mut builder =
            Type::primitive_type_builder(&field.name, physical).with_repetition(Repetition::OPTIONAL);
        if field.data_type == DataType::Utf8 {
            builder = builder.with_converted_type(ConvertedType::UTF8);
        }
        fields.push(Arc::new(builder.build()?));
    }
    let root = Type::group_type_builder("schema").with_fields(fields).build()?;
    Ok(Arc::new(root))
}

/// Non-null values of column `idx` plus one definition level per row.
fn leaf_values<T>(
    dataset: &DataSet,
    idx: usize,
    mut extract: impl FnMut(&Value) -> Option<T>,
) -> ProcessingResult<(Vec<T>, Vec<i16>)> {
    let mut values = Vec::with_capacity(dataset.row_count());
    let mut defs = Vec::with_capacity(dataset.row_count());
    for (row_idx0, value) in dataset.column(idx).enumerate() {
        if value.is_null() {
            defs.push(0);
            continue;
        }
        match extract(value) {
            Some(v) => {
                values.push(v);
                defs.push(1);
            }
            None => {
                let field = &dataset.schema.fields[idx];
                return Err(ProcessingError::SchemaMismatch {
                    message: format!(
                        "row {} column '{}' holds {value:?} but the column type is {:?}",
                        row_idx0 + 1,
                        field.name,
                        field.data_type
                    ),
                });
            }
        }
    }
    Ok((values, defs))
}
