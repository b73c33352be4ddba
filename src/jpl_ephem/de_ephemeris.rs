//! Ephemeris handle and series evaluation.
//!
//! [`DeEphemeris`] owns everything needed to answer queries on one DE binary:
//! the decoded header, the per-series record layout, the byte source and a
//! single-slot [`BlockCache`]. Queries take `&self`; the cache sits behind a
//! mutex so a handle can be shared between threads.
//!
//! Typical workflow
//! -----------------
//! 1. Open a file with [`DeEphemeris::open`] (or [`DeEphemeris::open_with`] to let the
//!    byte order be detected).
//! 2. Evaluate a stored series with [`DeEphemeris::position`], or a body relative to
//!    another with [`DeEphemeris::state`].
//! 3. Convert to AU with [`SeriesState::to_au`] or query [`DeEphemeris::state_au`].
use std::sync::{Mutex, PoisonError};

use camino::Utf8Path;
use hifitime::Epoch;

use crate::{constants::DEFAULT_HEADER_BUFFER_LEN, de_errors::DeError, time::epoch_to_jd_tdb};

use super::{
    block_cache::BlockCache,
    body_compositor,
    chebyshev,
    de_byte_order::ByteOrder,
    de_header::DeHeader,
    de_ids::{DeSeries, DeTarget},
    ephem_source::{EphemerisSource, FileSource},
    record_layout::{RecordLayout, SeriesLayout},
    series_state::{Components, SeriesState},
};

/// Settings used when opening a DE binary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenOptions {
    /// Byte order of the file; `None` detects it from the header.
    pub byte_order: Option<ByteOrder>,
    /// Size of the first header read, in bytes.
    pub header_buffer_len: usize,
}

impl Default for OpenOptions {
    fn default() -> Self {
        OpenOptions {
            byte_order: None,
            header_buffer_len: DEFAULT_HEADER_BUFFER_LEN,
        }
    }
}

impl OpenOptions {
    pub fn byte_order(mut self, byte_order: ByteOrder) -> Self {
        self.byte_order = Some(byte_order);
        self
    }

    pub fn header_buffer_len(mut self, len: usize) -> Self {
        self.header_buffer_len = len;
        self
    }
}

/// An opened JPL DE binary.
#[derive(Debug)]
pub struct DeEphemeris {
    source: Box<dyn EphemerisSource>,
    header: DeHeader,
    layout: RecordLayout,
    cache: Mutex<BlockCache>,
}

impl DeEphemeris {
    /// Open a DE binary written in a known byte order.
    ///
    /// Arguments
    /// -----------------
    /// * `path`: path of the binary file (e.g. `jpleph.440`).
    /// * `byte_order`: byte order the file was written in.
    ///
    /// Return
    /// ----------
    /// * The handle, [`DeError::MalformedHeader`] if the header cannot be decoded,
    ///   or [`DeError::IoError`] if the file cannot be read.
    pub fn open(path: impl AsRef<Utf8Path>, byte_order: ByteOrder) -> Result<Self, DeError> {
        Self::open_with(path, &OpenOptions::default().byte_order(byte_order))
    }

    /// Open a DE binary with explicit [`OpenOptions`].
    pub fn open_with(path: impl AsRef<Utf8Path>, options: &OpenOptions) -> Result<Self, DeError> {
        Self::from_source(Box::new(FileSource::new(path)), options)
    }

    /// Build a handle on any byte source.
    ///
    /// See also
    /// ------------
    /// * [`MemorySource`](super::ephem_source::MemorySource) for files already in memory.
    pub fn from_source(
        source: Box<dyn EphemerisSource>,
        options: &OpenOptions,
    ) -> Result<Self, DeError> {
        let header = DeHeader::read(
            source.as_ref(),
            options.byte_order,
            options.header_buffer_len,
        )?;
        let layout = RecordLayout::from_header(&header)?;
        let cache = Mutex::new(BlockCache::new(&header));

        Ok(DeEphemeris {
            source,
            header,
            layout,
            cache,
        })
    }

    pub fn header(&self) -> &DeHeader {
        &self.header
    }

    pub fn layout(&self) -> &RecordLayout {
        &self.layout
    }

    /// Index of the data record currently cached, if any.
    pub fn cached_block_index(&self) -> Option<u64> {
        self.cache
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .cached_index()
    }

    /// Evaluate a series stored in the file.
    ///
    /// Arguments
    /// -----------------
    /// * `series`: the file series to evaluate.
    /// * `jd`: Julian Date (TDB) in `[jd_start, jd_end)`.
    ///
    /// Return
    /// ----------
    /// * The position and velocity of the series, with one value per component of
    ///   the series, in the file's units (km, km/day for bodies).
    /// * [`DeError::SeriesNotAvailable`] if the file does not carry the series,
    ///   [`DeError::OutOfRange`] if `jd` is outside the file,
    ///   [`DeError::IoError`] or [`DeError::InvalidBlock`] if the data record
    ///   cannot be read or used.
    ///
    /// Positions of the planets, the Sun and the Earth-Moon barycenter are relative to
    /// the solar system barycenter; the Moon's is relative to the Earth.
    pub fn position(&self, series: DeSeries, jd: f64) -> Result<SeriesState, DeError> {
        let layout = *self.layout.series(series)?;

        let (index, block) = {
            let mut cache = self.cache.lock().unwrap_or_else(PoisonError::into_inner);
            cache.block_for(self.source.as_ref(), jd)?
        };

        evaluate_series(&layout, &block, index, jd)
    }

    /// State of `target` relative to `center`, in the file's units.
    ///
    /// `center = None` returns the target in its own frame (barycentric for bodies).
    /// Derived bodies (Earth, barycentric Moon, solar system barycenter) are
    /// composed by the [`body_compositor`].
    pub fn state(
        &self,
        target: DeTarget,
        center: Option<DeTarget>,
        jd: f64,
    ) -> Result<SeriesState, DeError> {
        body_compositor::relative_state(self, target, center, jd)
    }

    /// Same as [`Self::state`], with positional targets converted to AU and AU/day
    /// using the AU stored in the file.
    pub fn state_au(
        &self,
        target: DeTarget,
        center: Option<DeTarget>,
        jd: f64,
    ) -> Result<SeriesState, DeError> {
        let state = self.state(target, center, jd)?;
        if target.is_positional() {
            Ok(state.to_au(self.header.au_km()))
        } else {
            Ok(state)
        }
    }

    /// Same as [`Self::state`] at a `hifitime` epoch, taken on the TDB scale.
    pub fn state_at(
        &self,
        target: DeTarget,
        center: Option<DeTarget>,
        epoch: &Epoch,
    ) -> Result<SeriesState, DeError> {
        self.state(target, center, epoch_to_jd_tdb(epoch))
    }
}

/// Evaluate one series from a decoded data record.
///
/// Arguments
/// -----------------
/// * `layout`: where the series lives in the record.
/// * `block`: the record, starting with its own start and end Julian Dates.
/// * `index`: index of the record in the file, for error reporting.
/// * `jd`: Julian Date (TDB) covered by the record.
///
/// Return
/// ----------
/// * The [`SeriesState`], or [`DeError::InvalidBlock`] when the record's span is not
///   positive or the coefficients run past its end.
pub fn evaluate_series(
    layout: &SeriesLayout,
    block: &[f64],
    index: u64,
    jd: f64,
) -> Result<SeriesState, DeError> {
    let invalid = |reason: String| DeError::InvalidBlock { index, reason };

    let (start_jd, end_jd) = match block {
        [start, end, ..] => (*start, *end),
        _ => return Err(invalid(format!("record holds only {} values", block.len()))),
    };

    let duration = end_jd - start_jd;
    if !(duration > 0.0) {
        return Err(invalid(format!(
            "non-positive span [{start_jd}, {end_jd}]"
        )));
    }

    let n_subs = layout.sub_intervals as f64;
    let sub_duration = (duration / n_subs).floor();
    if !(sub_duration > 0.0) {
        return Err(invalid(format!(
            "span of {duration} days too short for {} sub-intervals",
            layout.sub_intervals
        )));
    }

    let sub_index = (((jd - start_jd) / sub_duration).floor().max(0.0) as usize)
        .min(layout.sub_intervals - 1);
    let sub_start = start_jd + sub_index as f64 * sub_duration;
    let x = ((jd - sub_start) / sub_duration) * 2.0 - 1.0;
    let velocity_scale = 2.0 * n_subs / duration;

    let mut position = Components::with_capacity(layout.component_count);
    let mut velocity = Components::with_capacity(layout.component_count);

    for component in 0..layout.component_count {
        let offset = layout.coefficient_offset(component, sub_index);
        let coeffs = block
            .get(offset..offset + layout.coeffs_per_component)
            .ok_or_else(|| {
                invalid(format!(
                    "coefficients {offset}..{} past the record end ({})",
                    offset + layout.coeffs_per_component,
                    block.len()
                ))
            })?;

        let (value, slope) = chebyshev::evaluate(x, coeffs);
        position.push(value);
        velocity.push(slope * velocity_scale);
    }

    Ok(SeriesState::new(position, velocity))
}
