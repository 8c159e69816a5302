use delta_bench_studio::parser::{read_rows, RecordSource};
use delta_bench_studio::utils::error::ParseError;
use std::io::Write;
use tempfile::NamedTempFile;

fn write_log(lines: &[&str]) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    for line in lines {
        writeln!(file, "{}", line).unwrap();
    }
    file.flush().unwrap();
    file
}

const DIFF_LINE: &str = r#"{"taskName":"diff","labels":{"mode":"binary-diff","imageName":"nginx","old":"1","new":"2","threadNum":"1","threadSchedMode":"none","compressionMode":"bzip2","deltaEncoding":"bsdiffx"},"elapsedMilliseconds":120,"size":4096}"#;
const PULL_LINE: &str = r#"{"taskName":"pull","labels":{"mode":"file-diff"},"elapsedMilliseconds":88}"#;

#[test]
fn test_reads_all_records() {
    let file = write_log(&[DIFF_LINE, PULL_LINE]);
    let source = RecordSource::new(file.path());

    let records: Vec<_> = source
        .records()
        .unwrap()
        .collect::<Result<Vec<_>, _>>()
        .unwrap();

    assert_eq!(records.len(), 2);
    assert_eq!(records[0].task_name, "diff");
    assert_eq!(records[0].line, 1);
    assert_eq!(records[1].task_name, "pull");
    assert_eq!(records[1].measurement("elapsedMilliseconds").unwrap(), 88.0);
}

#[test]
fn test_source_restarts_from_beginning() {
    let file = write_log(&[DIFF_LINE, PULL_LINE]);
    let source = RecordSource::new(file.path());

    let first_pass = source.records().unwrap().count();
    let second_pass: Vec<_> = source
        .records()
        .unwrap()
        .collect::<Result<Vec<_>, _>>()
        .unwrap();

    // a fresh pass sees the whole input again, from the start
    assert_eq!(first_pass, 2);
    assert_eq!(second_pass.len(), 2);
    assert_eq!(second_pass[0].task_name, "diff");
}

#[test]
fn test_malformed_line_reports_position() {
    let file = write_log(&[DIFF_LINE, "{not json", PULL_LINE]);
    let source = RecordSource::new(file.path());

    let results: Vec<_> = source.records().unwrap().collect();
    assert!(results[0].is_ok());
    assert!(matches!(
        results[1],
        Err(ParseError::MalformedRecord { line: 2, .. })
    ));
}

#[test]
fn test_blank_lines_are_skipped() {
    let file = write_log(&[DIFF_LINE, "", PULL_LINE, ""]);
    let source = RecordSource::new(file.path());
    assert_eq!(source.records().unwrap().count(), 2);
}

#[test]
fn test_missing_input_file() {
    let source = RecordSource::new("/nonexistent/bench.log");
    assert!(matches!(source.records(), Err(ParseError::Io(_))));
}

#[test]
fn test_reads_flat_rows() {
    let file = write_log(&[
        "nginx,pull,ok,120,1,none,bzip2",
        "redis,patch,ok,45,8,none,bzip2",
    ]);
    let rows = read_rows(file.path()).unwrap();

    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].get(0).unwrap(), "nginx");
    assert_eq!(rows[0].get(1).unwrap(), "pull");
    assert_eq!(rows[1].number(3).unwrap(), 45.0);
    assert_eq!(rows[1].line, 2);
}
