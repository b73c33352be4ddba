pub mod constants;
pub mod de_errors;
pub mod jpl_ephem;
pub mod time;
