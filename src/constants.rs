//! Application constants for the event analyzer
//!
//! Column names of the recognized event schema, the labels used in the
//! summary table, sentinels for unavailable data and intake limits.

// =============================================================================
// Recognized Columns
// =============================================================================

/// Column names understood by the analysis engine
pub mod columns {
    /// Date-like column driving the date range and monthly series
    pub const EVENT_DATE: &str = "event_date";

    /// Categorical event type
    pub const EVENT_TYPE: &str = "event_type";

    /// Categorical event location
    pub const LOCATION: &str = "location";

    /// Numeric attendance count
    pub const ATTENDANCE: &str = "attendance";

    /// Numeric duration in hours
    pub const DURATION_HOURS: &str = "duration_hours";

    /// Every column the engine reads, in header-check order
    pub const RECOGNIZED: [&str; 5] = [EVENT_DATE, EVENT_TYPE, LOCATION, ATTENDANCE, DURATION_HOURS];
}

// =============================================================================
// Summary Table Labels
// =============================================================================

/// Human-readable names used as keys in the summary statistics
pub mod stat_labels {
    pub const AVERAGE_ATTENDANCE: &str = "Average Attendance";
    pub const MEDIAN_ATTENDANCE: &str = "Median Attendance";
    pub const TOTAL_ATTENDANCE: &str = "Total Attendance";
    pub const AVERAGE_DURATION: &str = "Average Duration (hrs)";
    pub const MEDIAN_DURATION: &str = "Median Duration (hrs)";

    /// Key of the placeholder entry
    pub const INFO: &str = "Info";

    /// Placeholder text when no numeric column qualifies
    pub const NO_NUMERIC_COLUMNS: &str = "No numeric attendance or duration columns found.";
}

// =============================================================================
// Formats and Sentinels
// =============================================================================

/// Sentinel used for both ends of an unavailable date range
pub const NOT_AVAILABLE: &str = "N/A";

/// Output format of date range endpoints
pub const DATE_OUTPUT_FORMAT: &str = "%Y-%m-%d";

/// Output format of monthly bucket labels
pub const MONTH_OUTPUT_FORMAT: &str = "%Y-%m";

/// Date-only input formats tried in order
pub const DATE_INPUT_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y"];

/// Date-time input formats tried in order
pub const DATETIME_INPUT_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
];

/// Cell values read as missing, in addition to empty cells
pub const MISSING_VALUE_TOKENS: &[&str] = &[
    "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// Infix the CSV reader gives to repeated header names (`name_duplicated_0`, ...)
pub const DUPLICATE_HEADER_INFIX: &str = "_duplicated_";

/// Decimal places kept for averaged and fractional statistics
pub const STAT_DECIMALS: i32 = 2;

// =============================================================================
// Limits
// =============================================================================

/// Number of entries in the top event types listing
pub const DEFAULT_TOP_N: usize = 5;

/// Largest upload accepted by the intake guard (16 MiB)
pub const MAX_UPLOAD_BYTES: u64 = 16 * 1024 * 1024;

/// Extensions accepted by the intake guard, compared case-insensitively
pub const ALLOWED_EXTENSIONS: &[&str] = &["csv"];

/// Name reported for sources that are not files on disk
pub const IN_MEMORY_SOURCE: &str = "<in-memory>";
