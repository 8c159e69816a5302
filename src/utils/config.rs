//! Configuration and constants for the CLI.

/// Width of one bar in a grouped comparison chart, in axis units
pub const BAR_WIDTH: f64 = 0.4;

/// Figure dimensions in pixels
pub const FIGURE_WIDTH: u32 = 2000;
pub const FIGURE_HEIGHT: u32 = 1000;

// Label names used by the benchmark producer
pub const LABEL_IMAGE_NAME: &str = "imageName";
pub const LABEL_OLD: &str = "old";
pub const LABEL_NEW: &str = "new";
pub const LABEL_OUT: &str = "out";
pub const LABEL_MODE: &str = "mode";
pub const LABEL_THREAD_NUM: &str = "threadNum";
pub const LABEL_SCHED_MODE: &str = "threadSchedMode";
pub const LABEL_COMPRESSION: &str = "compressionMode";
pub const LABEL_ENCODING: &str = "deltaEncoding";
pub const LABEL_PATH_LABEL: &str = "pathLabel";
pub const LABEL_PATH: &str = "path";
pub const LABEL_ROOT: &str = "root";
pub const LABEL_COUNT: &str = "count";
pub const LABEL_MERGE_MODE: &str = "mergeMode";
pub const LABEL_TYPE: &str = "type";
pub const LABEL_COMPRESSED_SIZE: &str = "compressedSize";
pub const LABEL_OBJ: &str = "obj";

// Measurement field names (which fields a record carries varies by task)
pub const FIELD_ELAPSED_MS: &str = "elapsedMilliseconds";
pub const FIELD_ELAPSED_US: &str = "elapsedMicroseconds";
pub const FIELD_SIZE: &str = "size";
pub const FIELD_FILE_SIZE: &str = "fileSize";
pub const FIELD_FILE_DIFF_SIZE: &str = "fileEntryACompressionSize";
pub const FIELD_BINARY_DIFF_SIZE: &str = "fileEntryBCompressionSize";
pub const FIELD_ENTRY_TYPE: &str = "fileEntryBType";
pub const FIELD_PATH: &str = "path";

// Configuration axes the operator compares by default.
// The declared ordering of a comparison is the cartesian product of these,
// independent of which configurations actually appear in the data.
pub const THREAD_COUNTS: &[&str] = &["1", "8"];
pub const SCHED_MODES: &[&str] = &["none"];
pub const COMPRESSION_MODES: &[&str] = &["bzip2"];
pub const DELTA_ENCODINGS: &[&str] = &["bsdiffx", "xdelta3"];
