//! CSV writer.

use std::io::Write;

use crate::error::ProcessingResult;
use crate::types::{DataSet, Value};

/// Write `dataset` as CSV with a header row.
///
/// `Null` becomes an empty field, booleans are `true`/`false` and floats always carry a decimal
/// point (`1.0`).
pub fn write_csv<W: Write>(dataset: &DataSet, writer: W, delimiter: u8) -> ProcessingResult<()> {
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(false)
        .delimiter(delimiter)
        .from_writer(writer);

    wtr.write_record(dataset.schema.field_names())?;
    let mut record: Vec<String> = Vec::with_capacity(dataset.column_count());
    for row in &dataset.rows {
        record.clear();
        record.extend(row.iter().map(format_value));
        wtr.write_record(&record)?;
    }
    wtr.flush()?;
    Ok(())
}

fn format_value(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Int64(v) => v.to_string(),
        Value::Float64(v) => format!("{v:?}"),
        Value::Bool(v) => v.to_string(),
        Value::Utf8(s) => s.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{DataType, Field, Schema};

    #[test]
    fn writes_header_then_rows() {
        let ds = DataSet::new(
            Schema::new(vec![
                Field::new("user_name", DataType::Utf8),
                Field::new("score", DataType::Float64),
                Field::new("active", DataType::Bool),
                Field::new("age", DataType::Int64),
            ]),
            vec![
                vec![
                    Value::Utf8("Ada, Countess".to_string()),
                    Value::Float64(1.0),
                    Value::Bool(true),
                    Value::Null,
                ],
                vec![
                    Value::Null,
                    Value::Float64(98.5),
                    Value::Bool(false),
                    Value::Int64(36),
                ],
            ],
        );

        let mut out = Vec::new();
        write_csv(&ds, &mut out, b',').unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(
            text,
            "user_name,score,active,age\n\"Ada, Countess\",1.0,true,\n,98.5,false,36\n"
        );
    }

    #[test]
    fn empty_dataset_still_gets_a_header() {
        let ds = DataSet::new(
            Schema::new(vec![Field::new("a", DataType::Utf8), Field::new("b", DataType::Utf8)]),
            Vec::new(),
        );
        let mut out = Vec::new();
        write_csv(&ds, &mut out, b'|').unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "a|b\n");
    }
}
