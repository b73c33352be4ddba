//! # Constants and type definitions for jplde
//!
//! This module centralizes the **reference epochs**, **format constants** and
//! **common type aliases** used throughout the crate.
//!
//! ## Overview
//!
//! - Julian Date reference points
//! - Sizes fixed by the JPL DE binary format (number of series, constant name slots)
//! - Defaults used when opening an ephemeris file or running conformance files

// -------------------------------------------------------------------------------------------------
// Reference epochs
// -------------------------------------------------------------------------------------------------

/// Julian Date of J2000.0 (2000-01-01 12:00:00 TDB)
pub const J2000_JD: f64 = 2451545.0;

// -------------------------------------------------------------------------------------------------
// JPL DE binary format
// -------------------------------------------------------------------------------------------------

/// Number of coefficient series stored in a DE file (body ids 0..=14)
pub const N_SERIES: usize = 15;

/// Number of constant names held in the fixed part of the header
pub const OLD_MAX_CONSTANTS: usize = 400;

/// Initial number of header bytes read when opening a file.
///
/// Enough for every file with at most [`OLD_MAX_CONSTANTS`] named constants.
pub const DEFAULT_HEADER_BUFFER_LEN: usize = 30_000;

/// Slack added to `6 * numConstants` when deciding whether the header must be re-read
pub const HEADER_REREAD_SLACK: usize = 4_000;

/// Acceptance threshold of the JPL `testpo` conformance files (AU, AU/day, rad or s)
pub const TESTPO_TOLERANCE: f64 = 1e-8;

// -------------------------------------------------------------------------------------------------
// Type aliases
// -------------------------------------------------------------------------------------------------

/// Julian Date (TDB), in days
pub type JulianDate = f64;
