use serde_json::json;
use sheet_sync_service::dataset::{CellValue, Dataset};
use sheet_sync_service::error::SyncError;
use sheet_sync_service::sheets::{dataset_from_values, spreadsheet_id_from_url, values_from_dataset};

#[test]
fn value_grid_maps_header_and_records() {
    let values = vec![
        vec![json!("DATA"), json!("MEDICO")],
        vec![json!("01/02/2023"), json!("Dr. Souza")],
        // The API omits trailing blank cells; the row must be padded.
        vec![json!("02/02/2023")],
    ];

    let data = dataset_from_values(&values).expect("well-formed grid");

    assert_eq!(data.columns(), ["DATA", "MEDICO"]);
    assert_eq!(data.row_count(), 2);
    assert_eq!(data.row(1).get("MEDICO"), Some(&CellValue::Missing));
}

#[test]
fn rows_wider_than_the_header_are_rejected() {
    let values = vec![
        vec![json!("DATA")],
        vec![json!("01/02/2023"), json!("stray")],
    ];

    let err = dataset_from_values(&values).unwrap_err();
    assert!(matches!(err, SyncError::RowShape { .. }));
}

#[test]
fn empty_grid_maps_to_an_empty_dataset() {
    let data = dataset_from_values(&[]).expect("empty grid");
    assert!(data.is_empty());
    assert!(data.columns().is_empty());
}

#[test]
fn dataset_renders_header_row_first() {
    let mut data = Dataset::new(vec!["DESCRICAO".to_string()]);
    data.push_row(vec![CellValue::Text("CARDIOLOGIA".to_string())])
        .expect("row arity");

    let values = values_from_dataset(&data);

    assert_eq!(values[0], vec!["DESCRICAO"]);
    assert_eq!(values[1], vec!["CARDIOLOGIA"]);
}

#[test]
fn write_then_read_mapping_round_trips_text_datasets() {
    let mut data = Dataset::new(vec!["DATA".to_string(), "MEDICO".to_string()]);
    data.push_row(vec![
        CellValue::Text("01/02/2023".to_string()),
        CellValue::Text("Dr. Souza".to_string()),
    ])
    .expect("row arity");
    data.push_row(vec![
        CellValue::Text("15/07/2024".to_string()),
        CellValue::Text("Dr. Lima".to_string()),
    ])
    .expect("row arity");

    let grid: Vec<Vec<serde_json::Value>> = values_from_dataset(&data)
        .into_iter()
        .map(|row| row.into_iter().map(serde_json::Value::String).collect())
        .collect();
    let round_tripped = dataset_from_values(&grid).expect("well-formed grid");

    assert_eq!(round_tripped, data);
}

#[test]
fn spreadsheet_id_is_extracted_from_document_urls() {
    let id = spreadsheet_id_from_url(
        "https://docs.google.com/spreadsheets/d/1AbC_dEf-123/edit#gid=0",
    )
    .expect("well-formed url");
    assert_eq!(id, "1AbC_dEf-123");
}

#[test]
fn urls_without_a_document_segment_are_config_errors() {
    let err = spreadsheet_id_from_url("https://docs.google.com/spreadsheets/").unwrap_err();
    assert!(matches!(err, SyncError::Config { .. }));

    let err = spreadsheet_id_from_url("not a url").unwrap_err();
    assert!(matches!(err, SyncError::Config { .. }));
}
