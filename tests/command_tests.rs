use delta_bench_studio::commands::{
    execute_diff, execute_split, tag_mean, DiffArgs, SplitArgs,
};
use delta_bench_studio::parser::Row;
use std::io::Write;
use std::path::Path;
use tempfile::{tempdir, NamedTempFile};

fn diff_record(image: &str, old: &str, new: &str, th: &str, enc: &str, mode: &str) -> String {
    format!(
        r#"{{"taskName":"diff","labels":{{"mode":"{mode}","imageName":"{image}","old":"{old}","new":"{new}","threadNum":"{th}","threadSchedMode":"none","compressionMode":"bzip2","deltaEncoding":"{enc}"}},"elapsedMilliseconds":120,"size":4096}}"#
    )
}

/// Full configuration grid for both delta modes.
fn full_diff_log() -> Vec<String> {
    let mut lines = Vec::new();
    for (image, old, new) in [("nginx", "1", "2"), ("redis", "6", "7")] {
        for th in ["1", "8"] {
            for enc in ["bsdiffx", "xdelta3"] {
                for mode in ["binary-diff", "file-diff"] {
                    lines.push(diff_record(image, old, new, th, enc, mode));
                }
            }
        }
    }
    lines
}

fn write_log(lines: &[String]) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    for line in lines {
        writeln!(file, "{}", line).unwrap();
    }
    file.flush().unwrap();
    file
}

#[test]
fn test_diff_renders_chart() {
    let log = write_log(&full_diff_log());
    let out_dir = tempdir().unwrap();
    let output = out_dir.path().join("diff.png");

    execute_diff(DiffArgs {
        input: log.path().to_path_buf(),
        output: output.clone(),
    })
    .unwrap();

    assert!(output.exists());
    assert!(std::fs::metadata(&output).unwrap().len() > 0);
}

#[test]
fn test_diff_missing_declared_variant_fails() {
    // drop every xdelta3 record: the declared ordering still expects it
    let lines: Vec<String> = full_diff_log()
        .into_iter()
        .filter(|l| !l.contains("xdelta3"))
        .collect();
    let log = write_log(&lines);
    let out_dir = tempdir().unwrap();

    let err = execute_diff(DiffArgs {
        input: log.path().to_path_buf(),
        output: out_dir.path().join("diff.png"),
    })
    .unwrap_err();

    assert!(err.to_string().contains("never observed"));
}

#[test]
fn test_diff_unclassified_mode_fails() {
    let mut lines = full_diff_log();
    lines.push(diff_record("nginx", "1", "2", "1", "bsdiffx", "merge-diff"));
    let log = write_log(&lines);
    let out_dir = tempdir().unwrap();

    let err = execute_diff(DiffArgs {
        input: log.path().to_path_buf(),
        output: out_dir.path().join("diff.png"),
    })
    .unwrap_err();

    assert!(err.to_string().contains("unclassified"));
}

#[test]
fn test_diff_malformed_input_fails() {
    let mut lines = full_diff_log();
    lines.push("{broken".to_string());
    let log = write_log(&lines);
    let out_dir = tempdir().unwrap();

    assert!(execute_diff(DiffArgs {
        input: log.path().to_path_buf(),
        output: out_dir.path().join("diff.png"),
    })
    .is_err());
}

fn write_flat_log(rows: &[&str]) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    for row in rows {
        writeln!(file, "{}", row).unwrap();
    }
    file.flush().unwrap();
    file
}

fn read_bucket(dir: &Path, name: &str) -> String {
    std::fs::read_to_string(dir.join(format!("{name}_log.csv"))).unwrap()
}

#[test]
fn test_split_routes_rows_to_buckets() {
    let log = write_flat_log(&[
        "nginx,diff,a,120,1,none,binary-diff",
        "nginx,diff,a,150,1,none,file-diff",
        "nginx,patch,a,45",
        "redis,pull,a,80",
        "redis,pull-download,a,30",
        "nginx,merge,a,60",
        "nginx,di3fs,a,12",
    ]);
    let out_dir = tempdir().unwrap();

    execute_split(SplitArgs {
        input: log.path().to_path_buf(),
        out_dir: out_dir.path().to_path_buf(),
    })
    .unwrap();

    assert_eq!(
        read_bucket(out_dir.path(), "diff_binary"),
        "nginx,diff,a,120,1,none,binary-diff\n"
    );
    assert_eq!(
        read_bucket(out_dir.path(), "diff_file"),
        "nginx,diff,a,150,1,none,file-diff\n"
    );
    assert_eq!(read_bucket(out_dir.path(), "patch"), "nginx,patch,a,45\n");
    assert_eq!(read_bucket(out_dir.path(), "pull"), "redis,pull,a,80\n");
    assert_eq!(
        read_bucket(out_dir.path(), "pull_download"),
        "redis,pull-download,a,30\n"
    );
    assert_eq!(read_bucket(out_dir.path(), "merge"), "nginx,merge,a,60\n");
    assert_eq!(read_bucket(out_dir.path(), "di3fs"), "nginx,di3fs,a,12\n");
}

#[test]
fn test_split_unrecognized_task_fails() {
    let log = write_flat_log(&["nginx,frobnicate,a,1"]);
    let out_dir = tempdir().unwrap();

    let err = execute_split(SplitArgs {
        input: log.path().to_path_buf(),
        out_dir: out_dir.path().to_path_buf(),
    })
    .unwrap_err();

    assert!(err.to_string().contains("unrecognized task type"));
}

fn flat_row(line: usize, fields: &[&str]) -> Row {
    Row {
        line,
        fields: fields.iter().map(|s| s.to_string()).collect(),
    }
}

#[test]
fn test_tag_mean_reduces_by_tag() {
    let rows = vec![
        flat_row(1, &["nginx", "pull", "x", "3", "1", "none", "bzip2"]),
        flat_row(2, &["nginx", "pull", "x", "7", "1", "none", "bzip2"]),
        flat_row(3, &["redis", "pull", "x", "10", "8", "none", "bzip2"]),
    ];

    let reduced = tag_mean::reduce(&rows).unwrap();

    assert_eq!(reduced.len(), 2);
    assert_eq!(reduced[0], ("nginx,pull,1,none,bzip2".to_string(), 5.0));
    assert_eq!(reduced[1], ("redis,pull,8,none,bzip2".to_string(), 10.0));
}

#[test]
fn test_tag_mean_rejects_non_numeric_value() {
    let rows = vec![flat_row(1, &["nginx", "pull", "x", "abc", "1", "n", "b"])];
    assert!(tag_mean::reduce(&rows).is_err());
}
