//! JPL DE binary ephemeris reader.
//!
//! This module decodes the binary ephemeris files JPL distributes for its
//! Development Ephemerides (DE102 .. DE441) and evaluates their Chebyshev
//! series at arbitrary epochs.
//!
//! The work is split in a few submodules, leaves first:
//!
//! - [`header_layout`] and [`de_byte_order`]: byte offsets of the header fields
//!   and the byte order the file was written in.
//! - [`de_header`]: decodes the header record into a [`DeHeader`](de_header::DeHeader)
//!   and derives the size of a data record.
//! - [`record_layout`]: where each series sits inside a data record.
//! - [`ephem_source`] and [`block_cache`]: reads data records from a file (or
//!   memory) and keeps the last one decoded.
//! - [`chebyshev`] and [`de_ephemeris`]: evaluates a series at a Julian Date. The
//!   [`DeEphemeris`](de_ephemeris::DeEphemeris) handle is the public entry point.
//! - [`body_compositor`]: bodies that are not stored directly (Earth,
//!   barycentric Moon, solar system barycenter) and states relative to a center.
//! - [`de_ids`], [`de_version`], [`series_state`]: identifiers, known solutions and
//!   the evaluated state type.
//! - [`testpo`]: runs JPL's `testpo.<v>` conformance files.
//!
//! # File layout
//!
//! ```text
//! +------------------------------------------------------------------------------+
//! |                               DE BINARY FILE                                 |
//! +------------------------------------------------------------------------------+
//! | record 0 | labels, constant names, jdStart/jdEnd/jdStep, numConstants,       |
//! |          | AU, EMRAT, coefficient pointers, DE number                        |
//! +----------+-------------------------------------------------------------------+
//! | record 1 | numConstants f64 values                                           |
//! +----------+-------------------------------------------------------------------+
//! | record 2 | [ start JD | end JD | series 0 | series 1 | ... | series 14 ]     |
//! | record 3 | [ start JD | end JD | ... ]                                     |
//! |   ...    |   one record per jdStep days, from jdStart to jdEnd               |
//! +------------------------------------------------------------------------------+
//!
//!   Every record has the same size, derived from the coefficient pointers.
//!   In a data record, series b holds n_sub sub-intervals, each with
//!   n_components x n_coeff coefficients:
//!
//!   [ sub 0: x0..x(n-1) y0..y(n-1) z0..z(n-1) | sub 1: ... | ... ]
//! ```
//!
//! # Example
//!
//! ```rust,no_run
//! use jplde::jpl_ephem::{de_byte_order::ByteOrder, de_ephemeris::DeEphemeris, de_ids::DeTarget};
//!
//! let ephem = DeEphemeris::open("jpleph.440", ByteOrder::Little)?;
//! let earth = ephem.state_au(DeTarget::Earth, Some(DeTarget::Sun), 2451545.0)?;
//! println!("{:?}", earth.position);
//! # Ok::<(), jplde::de_errors::DeError>(())
//! ```

pub mod block_cache;
pub mod body_compositor;
pub mod chebyshev;
pub mod de_byte_order;
pub mod de_ephemeris;
pub mod de_header;
pub mod de_ids;
pub mod de_version;
pub mod ephem_source;
pub mod header_layout;
pub mod record_layout;
pub mod series_state;
pub mod testpo;

#[cfg(test)]
pub(crate) mod test_support;
