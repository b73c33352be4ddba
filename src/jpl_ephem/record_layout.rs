//! Per-series addressing inside a data record.
//!
//! The header stores coefficient pointers with a 1-based start index, counted in
//! doubles from the beginning of the record (the two leading doubles being the
//! record's start and end Julian Dates). [`RecordLayout`] converts them once to
//! 0-based indices so the evaluator never has to adjust them again.
use crate::{constants::N_SERIES, de_errors::DeError};

use super::{
    de_header::DeHeader,
    de_ids::{component_count, DeSeries},
};

/// Where and how one series is stored in every data record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeriesLayout {
    /// 0-based index of the first coefficient in the record, in doubles.
    pub start: usize,
    pub coeffs_per_component: usize,
    pub sub_intervals: usize,
    pub component_count: usize,
}

impl SeriesLayout {
    /// Number of doubles the series occupies in one sub-interval.
    pub fn sub_interval_len(&self) -> usize {
        self.coeffs_per_component * self.component_count
    }

    /// 0-based index of the coefficients of `component` in sub-interval `sub_interval`.
    pub fn coefficient_offset(&self, component: usize, sub_interval: usize) -> usize {
        self.start + component * self.coeffs_per_component + self.sub_interval_len() * sub_interval
    }

    /// One past the last double used by the series in a record.
    pub fn end(&self) -> usize {
        self.start + self.sub_interval_len() * self.sub_intervals
    }
}

/// Layout of all 15 series, derived from a [`DeHeader`].
///
/// A series whose pointer has a zero start, zero coefficients or zero
/// sub-intervals is absent from the file (e.g. TT-TDB in DE405).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordLayout {
    series: [Option<SeriesLayout>; N_SERIES],
    record_len: usize,
}

impl RecordLayout {
    /// Build the layout from the header's coefficient pointers.
    ///
    /// Arguments
    /// -----------------
    /// * `header`: a decoded header.
    ///
    /// Return
    /// ----------
    /// * The layout, or [`DeError::MalformedHeader`] when a present series would
    ///   start before the record's date span or extend past the end of the record.
    pub fn from_header(header: &DeHeader) -> Result<Self, DeError> {
        let record_len = header.block_size_bytes() / 8;
        let mut series = [None; N_SERIES];

        for (id, (slot, pointer)) in series
            .iter_mut()
            .zip(header.coefficient_pointers().iter())
            .enumerate()
        {
            let [start, n_coeffs, n_subs] = pointer.map(|v| v.max(0) as usize);
            if start == 0 || n_coeffs == 0 || n_subs == 0 {
                continue;
            }
            if start < 3 {
                return Err(DeError::MalformedHeader(format!(
                    "series {id} starts at index {start}, inside the record date span"
                )));
            }

            let layout = SeriesLayout {
                start: start - 1,
                coeffs_per_component: n_coeffs,
                sub_intervals: n_subs,
                component_count: component_count(id),
            };
            let end = layout
                .sub_interval_len()
                .checked_mul(n_subs)
                .and_then(|n| n.checked_add(layout.start));
            match end {
                Some(end) if end <= record_len => {}
                _ => {
                    return Err(DeError::MalformedHeader(format!(
                        "series {id} pointer {pointer:?} runs past the record length {record_len}"
                    )))
                }
            }
            *slot = Some(layout);
        }

        Ok(RecordLayout { series, record_len })
    }

    /// Layout of a series, [`DeError::SeriesNotAvailable`] if the file does not carry it.
    pub fn series(&self, series: DeSeries) -> Result<&SeriesLayout, DeError> {
        self.series[series.id()]
            .as_ref()
            .ok_or(DeError::SeriesNotAvailable(series))
    }

    pub fn is_available(&self, series: DeSeries) -> bool {
        self.series[series.id()].is_some()
    }

    /// Number of doubles in one record.
    pub fn record_len(&self) -> usize {
        self.record_len
    }
}
