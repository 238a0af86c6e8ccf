pub mod list;
pub mod run;

pub const EXIT_OK: u8 = 0;

/// Finished, but with non-fatal errors.
pub const EXIT_ERRORS: u8 = 1;

/// The calendar source could not be read, or there was nothing to list.
pub const EXIT_SOURCE: u8 = 2;
