//! Standard exit codes (BSD sysexits.h compatible)

/// Command line usage error
pub const USAGE: i32 = 64;

/// Data format error: inconsistent project document or rig
pub const DATAERR: i32 = 65;

/// Can't create output file, e.g. namespace conflict in the datapack folder
pub const CANTCREAT: i32 = 73;

/// Input/output error
pub const IOERR: i32 = 74;

/// Configuration error
pub const CONFIG: i32 = 78;
