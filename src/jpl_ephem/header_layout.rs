//! Byte offsets of the DE binary header.
//!
//! The header is not self-describing: every field lives at a fixed offset that is
//! shared by all DE solutions written with the "Group 1050" layout (DE102 through
//! DE441). Offsets are grouped in a [`HeaderLayout`] so that another layout can be
//! added next to [`GROUP_1050`] without touching the decoder.
//!
//! ```text
//! offset  size        field
//! ------  ----------  ------------------------------------------------------------
//!      0  84          description label
//!     84  84          start epoch label
//!    168  84          end epoch label
//!    252  400 x 6     constant names (first 400)
//!   2652  f64 x 3     jdStart, jdEnd, jdStep
//!   2676  i32         numConstants
//!   2680  f64         AU (km)
//!   2688  f64         Earth-Moon mass ratio
//!   2696  12 x 3 i32  coefficient pointers, series 0..=11
//!   2840  i32         DE version number
//!   2844  3 i32       coefficient pointer, series 12 (librations)
//!   2856  n x 6       constant names beyond the 400th (only if numConstants > 400)
//!    cur  3 i32       coefficient pointer, series 13
//! cur+12  3 i32       coefficient pointer, series 14
//! ```

use crate::constants::OLD_MAX_CONSTANTS;

/// Named offsets of one header layout, in bytes from the start of the file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderLayout {
    pub label_len: usize,
    pub description: usize,
    pub start_label: usize,
    pub end_label: usize,
    pub constant_name_len: usize,
    pub constant_names: usize,
    pub fixed_constant_names: usize,
    pub jd_start: usize,
    pub jd_end: usize,
    pub jd_step: usize,
    pub n_constants: usize,
    pub au: usize,
    pub emrat: usize,
    /// First coefficient pointer triple; series `0..leading_pointers` follow with `pointer_stride`.
    pub pointers: usize,
    pub leading_pointers: usize,
    pub pointer_stride: usize,
    pub version: usize,
    pub libration_pointer: usize,
    /// Start of the extra constant names, and of the trailing pointers when there are none.
    pub extra_constant_names: usize,
}

/// Layout shared by every published DE binary.
pub const GROUP_1050: HeaderLayout = HeaderLayout {
    label_len: 84,
    description: 0,
    start_label: 84,
    end_label: 168,
    constant_name_len: 6,
    constant_names: 252,
    fixed_constant_names: OLD_MAX_CONSTANTS,
    jd_start: 2652,
    jd_end: 2660,
    jd_step: 2668,
    n_constants: 2676,
    au: 2680,
    emrat: 2688,
    pointers: 2696,
    leading_pointers: 12,
    pointer_stride: 12,
    version: 2840,
    libration_pointer: 2844,
    extra_constant_names: 2856,
};

impl HeaderLayout {
    /// Offset of the series 13 pointer triple; series 14 follows one stride later.
    pub fn trailing_pointers(&self, n_constants: usize) -> usize {
        self.extra_constant_names
            + n_constants.saturating_sub(self.fixed_constant_names) * self.constant_name_len
    }

    /// Number of bytes needed to decode every header field for `n_constants`.
    pub fn header_len(&self, n_constants: usize) -> usize {
        self.trailing_pointers(n_constants) + 2 * self.pointer_stride
    }
}
