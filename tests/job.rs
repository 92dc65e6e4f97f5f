use anyhow::Result;
use parquetize::io::cloud::{ErrorKind, FakeObjectIO, ObjectIO};
use parquetize::*;
use pretty_assertions::assert_eq;
use std::fs;
use std::path::{Path, PathBuf};

fn config(root: &Path) -> JobConfig {
    JobConfig {
        scratch_root: root.to_path_buf(),
        ..JobConfig::default()
    }
}

/// Fetch an uploaded object and decode it as a frame.
fn fetch_frame(store: &FakeObjectIO, bucket: &str, key: &str) -> Result<TabularFrame> {
    let bytes = store.get_object(bucket, key)?;
    let tmp = tempfile::tempdir()?;
    let path = tmp.path().join("fetched.parquet");
    fs::write(&path, bytes)?;
    read_parquet_frame(&path)
}

fn scratch_dirs(root: &Path) -> Result<Vec<PathBuf>> {
    let mut dirs = fs::read_dir(root)?
        .map(|e| e.map(|e| e.path()))
        .collect::<Result<Vec<_>, _>>()?;
    dirs.sort();
    Ok(dirs)
}

fn expected_ab() -> Result<TabularFrame> {
    TabularFrame::new(vec![
        Column::new("a", ColumnData::Int64(vec![Some(1), Some(2)])),
        Column::new(
            "b",
            ColumnData::Utf8(vec![Some("x".into()), Some("y".into())]),
        ),
    ])
}

#[test]
fn csv_source_is_published_as_parquet() -> Result<()> {
    let root = tempfile::tempdir()?;
    let store = FakeObjectIO::new();
    store.put_object("in-bucket", "data.csv", b"a,b\n1,x\n2,y\n")?;

    let report = run_job(
        &store,
        "s3://in-bucket/data.csv",
        "s3://out-bucket/data.parquet",
        &config(root.path()),
    )?;

    assert_eq!(report.format, InputFormat::Csv);
    assert_eq!(report.rows, 2);
    assert_eq!(report.columns, 2);
    assert_eq!(report.bytes_downloaded, 12);
    assert_eq!(fetch_frame(&store, "out-bucket", "data.parquet")?, expected_ab()?);
    Ok(())
}

#[test]
fn json_source_gives_the_same_table_as_csv() -> Result<()> {
    let root = tempfile::tempdir()?;
    let store = FakeObjectIO::new();
    store.put_object(
        "in-bucket",
        "data.json",
        br#"[{"a":1,"b":"x"},{"a":2,"b":"y"}]"#,
    )?;

    let report = run_job(
        &store,
        "s3://in-bucket/data.json",
        "s3://out-bucket/data.parquet",
        &config(root.path()),
    )?;

    assert_eq!(report.format, InputFormat::Json);
    assert_eq!(fetch_frame(&store, "out-bucket", "data.parquet")?, expected_ab()?);
    Ok(())
}

#[test]
fn unsupported_suffix_aborts_without_upload() -> Result<()> {
    let root = tempfile::tempdir()?;
    let store = FakeObjectIO::new();
    store.put_object("in-bucket", "data.txt", b"a,b\n1,x\n")?;
    let puts_before = store.put_count();

    let err = run_job(
        &store,
        "s3://in-bucket/data.txt",
        "s3://out-bucket/data.parquet",
        &config(root.path()),
    )
    .unwrap_err();

    assert!(matches!(err, JobError::UnsupportedFormat { .. }), "{err}");
    assert!(err.to_string().contains("only CSV (.csv) or JSON (.json)"));
    assert_eq!(store.put_count(), puts_before);
    assert!(!store.contains("out-bucket", "data.parquet"));
    Ok(())
}

#[test]
fn failed_upload_leaves_scratch_files() -> Result<()> {
    let root = tempfile::tempdir()?;
    let store = FakeObjectIO::new();
    store.put_object("in-bucket", "data.csv", b"a,b\n1,x\n2,y\n")?;
    store.fail_puts(ErrorKind::Network);

    let err = run_job(
        &store,
        "s3://in-bucket/data.csv",
        "s3://out-bucket/data.parquet",
        &config(root.path()),
    )
    .unwrap_err();

    match &err {
        JobError::Transfer(e) => assert_eq!(e.kind, ErrorKind::Network),
        other => panic!("unexpected error: {other}"),
    }

    let dirs = scratch_dirs(root.path())?;
    assert_eq!(dirs.len(), 1);
    assert!(dirs[0].join("data.csv").is_file());
    assert!(dirs[0].join("output.parquet").is_file());
    Ok(())
}

#[test]
fn failed_upload_cleans_up_when_asked() -> Result<()> {
    let root = tempfile::tempdir()?;
    let store = FakeObjectIO::new();
    store.put_object("in-bucket", "data.csv", b"a,b\n1,x\n")?;
    store.fail_puts(ErrorKind::Network);

    let cfg = JobConfig {
        cleanup_on_failure: true,
        ..config(root.path())
    };
    let err = run_job(
        &store,
        "s3://in-bucket/data.csv",
        "s3://out-bucket/data.parquet",
        &cfg,
    )
    .unwrap_err();

    assert!(matches!(err, JobError::Transfer(_)), "{err}");
    assert!(scratch_dirs(root.path())?.is_empty());
    Ok(())
}

#[test]
fn success_removes_scratch_directory() -> Result<()> {
    let root = tempfile::tempdir()?;
    let store = FakeObjectIO::new();
    store.put_object("in-bucket", "nested/path/data.csv", b"a\n1\n")?;

    run_job(
        &store,
        "s3://in-bucket/nested/path/data.csv",
        "s3://out-bucket/out/data.parquet",
        &config(root.path()),
    )?;

    assert!(scratch_dirs(root.path())?.is_empty());
    assert!(store.contains("out-bucket", "out/data.parquet"));
    Ok(())
}

#[test]
fn malformed_csv_is_a_parse_error() -> Result<()> {
    let root = tempfile::tempdir()?;
    let store = FakeObjectIO::new();
    store.put_object("in-bucket", "data.csv", b"a,b\n1,x\n2\n")?;

    let err = run_job(
        &store,
        "s3://in-bucket/data.csv",
        "s3://out-bucket/data.parquet",
        &config(root.path()),
    )
    .unwrap_err();

    match &err {
        JobError::Parse { format, .. } => assert_eq!(*format, InputFormat::Csv),
        other => panic!("unexpected error: {other}"),
    }
    assert!(!store.contains("out-bucket", "data.parquet"));
    Ok(())
}

#[test]
fn repeated_runs_use_separate_scratch_dirs() -> Result<()> {
    let root = tempfile::tempdir()?;
    let store = FakeObjectIO::new();
    store.put_object("in-bucket", "data.csv", b"a\n1\n")?;
    store.fail_puts(ErrorKind::ServiceUnavailable);

    for _ in 0..2 {
        let _ = run_job(
            &store,
            "s3://in-bucket/data.csv",
            "s3://out-bucket/data.parquet",
            &config(root.path()),
        );
    }
    assert_eq!(scratch_dirs(root.path())?.len(), 2);
    Ok(())
}

#[test]
fn stages_can_be_driven_individually() -> Result<()> {
    let root = tempfile::tempdir()?;
    let store = FakeObjectIO::new();
    store.put_object("in", "t.json", br#"{"v": {"0": true, "1": null}}"#)?;

    let source = ObjectLocation::parse("s3://in/t.json")?;
    let destination = ObjectLocation::parse("s3://out/t.parquet")?;
    let scratch = parquetize::scratch::ScratchSpace::create(root.path(), uuid::Uuid::new_v4())?;

    let input = resolve_input(&store, &source, &scratch)?;
    let format = InputFormat::detect(input.path())?;
    let (output, frame) = convert(
        input.path(),
        format,
        scratch.output_path(),
        ParquetCompression::Zstd,
    )?;
    assert_eq!(
        frame.column("v").map(|c| c.data.clone()),
        Some(ColumnData::Boolean(vec![Some(true), None]))
    );

    let uploaded = publish(&store, &output, &destination)?;
    assert_eq!(uploaded, output.size()?);

    input.remove()?;
    output.remove()?;
    scratch.close()?;
    assert!(scratch_dirs(root.path())?.is_empty());
    Ok(())
}
