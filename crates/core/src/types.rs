/// Identifies one prior submission of a job in the run archive.
pub type OneUpNo = i64;

/// 1-based parameter sequence number, as stored in the schema tables.
pub type ParamNumber = i32;

/// All timestamps are local wall-clock time; reports print them as-is.
pub type Timestamp = chrono::DateTime<chrono::Local>;

/// Archive parameter number reserved for the page-length override.
pub const PAGE_LENGTH_PARAM: ParamNumber = 99;
