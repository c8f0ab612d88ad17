use column_normalizer::ingestion::{read_csv_from_path, read_input, ReadOptions};
use column_normalizer::types::{DataType, Value};

#[test]
fn read_csv_from_path_happy_path() {
    let ds = read_csv_from_path("tests/fixtures/signups.csv", &ReadOptions::default()).unwrap();

    assert_eq!(ds.row_count(), 2);
    assert_eq!(
        ds.column_names(),
        vec!["User Name", "Sign Up/Date", "AGE", "Score", "Active"]
    );
    assert_eq!(
        ds.rows[0],
        vec![
            Value::Utf8("Ada Lovelace".to_string()),
            Value::Utf8("2024-01-05".to_string()),
            Value::Int64(36),
            Value::Float64(98.5),
            Value::Bool(true),
        ]
    );
    assert_eq!(ds.rows[1][3], Value::Null);
}

#[test]
fn read_input_infers_types_from_every_row() {
    let ds = read_input("tests/fixtures/signups.csv", &ReadOptions::default()).unwrap();
    let types: Vec<DataType> = ds.schema.fields.iter().map(|f| f.data_type).collect();
    assert_eq!(
        types,
        vec![
            DataType::Utf8,
            DataType::Utf8,
            DataType::Int64,
            DataType::Float64,
            DataType::Bool
        ]
    );
}

#[test]
fn read_input_accepts_glob_patterns() {
    let ds = read_input("tests/fixtures/sign*.csv", &ReadOptions::default()).unwrap();
    assert_eq!(ds.row_count(), 2);
}

#[test]
fn read_input_errors_on_missing_file() {
    let err = read_input("tests/fixtures/does_not_exist.csv", &ReadOptions::default()).unwrap_err();
    assert!(err.is_io());
    assert!(err.to_string().contains("csv error") || err.to_string().contains("io error"));
}
