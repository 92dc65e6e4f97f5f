use anyhow::Result;
use parquetize::io::json::parse_json_frame;
use parquetize::*;
use pretty_assertions::assert_eq;

#[test]
fn records_file_keeps_first_seen_column_order() -> Result<()> {
    let tmp = tempfile::tempdir()?;
    let path = tmp.path().join("rows.json");
    std::fs::write(
        &path,
        r#"[{"z": 1, "a": "x"}, {"a": "y", "m": 0.5}, {"z": 3}]"#,
    )?;

    let frame = read_json_frame(&path)?;
    assert_eq!(frame.column_names(), vec!["z", "a", "m"]);
    assert_eq!(
        frame.column("z").map(|c| c.data.clone()),
        Some(ColumnData::Int64(vec![Some(1), None, Some(3)]))
    );
    assert_eq!(
        frame.column("m").map(|c| c.data.clone()),
        Some(ColumnData::Float64(vec![None, Some(0.5), None]))
    );
    Ok(())
}

#[test]
fn columns_shape_matches_records_shape() -> Result<()> {
    let records = parse_json_frame(r#"[{"a":1,"b":"x"},{"a":2,"b":"y"}]"#.as_bytes())?;
    let columns =
        parse_json_frame(r#"{"a":{"0":1,"1":2},"b":{"0":"x","1":"y"}}"#.as_bytes())?;
    assert_eq!(records, columns);
    Ok(())
}

#[test]
fn invalid_json_is_an_error() {
    let err = parse_json_frame("[{\"a\": 1,".as_bytes()).unwrap_err();
    assert!(format!("{err:#}").contains("invalid JSON"), "{err:#}");
}

#[test]
fn column_of_scalars_is_rejected() {
    let err = parse_json_frame(r#"{"a": [1, 2]}"#.as_bytes()).unwrap_err();
    assert!(err.to_string().contains("column \"a\" is an array"), "{err}");
}
