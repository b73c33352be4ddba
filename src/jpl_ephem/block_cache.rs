//! Single-slot cache of decoded data records.
//!
//! A data record covers `jd_step` days. Consecutive queries usually fall in the
//! same record, so only the last one read is kept. Blocks are shared as
//! `Arc<[f64]>`: a caller can keep evaluating a block after the cache moved on.
use std::sync::Arc;

use tracing::{debug, trace};

use crate::de_errors::DeError;

use super::{de_byte_order::ByteOrder, de_header::DeHeader, ephem_source::EphemerisSource};

#[derive(Debug, Clone)]
pub struct BlockCache {
    jd_start: f64,
    jd_end: f64,
    jd_step: f64,
    block_size: usize,
    byte_order: ByteOrder,
    cached: Option<(u64, Arc<[f64]>)>,
}

impl BlockCache {
    /// Create an empty cache for the file described by `header`.
    pub fn new(header: &DeHeader) -> Self {
        BlockCache {
            jd_start: header.jd_start(),
            jd_end: header.jd_end(),
            jd_step: header.jd_step(),
            block_size: header.block_size_bytes(),
            byte_order: header.byte_order(),
            cached: None,
        }
    }

    /// Index of the data record holding `jd`.
    ///
    /// Return
    /// ----------
    /// * `floor((jd - jd_start) / jd_step)`, or [`DeError::OutOfRange`] when `jd` is
    ///   not in `[jd_start, jd_end)` (NaN included).
    pub fn block_index(&self, jd: f64) -> Result<u64, DeError> {
        if !(jd >= self.jd_start && jd < self.jd_end) {
            return Err(DeError::OutOfRange {
                jd,
                start: self.jd_start,
                end: self.jd_end,
            });
        }
        Ok(((jd - self.jd_start) / self.jd_step).floor() as u64)
    }

    /// Byte offset of a data record; the header and constants records come first.
    pub fn block_offset(&self, index: u64) -> u64 {
        (index + 2) * self.block_size as u64
    }

    /// Index of the block currently held, if any.
    pub fn cached_index(&self) -> Option<u64> {
        self.cached.as_ref().map(|(index, _)| *index)
    }

    /// Return the data record covering `jd`, reading it from `source` on a miss.
    ///
    /// Arguments
    /// -----------------
    /// * `source`: the byte source of the ephemeris.
    /// * `jd`: Julian Date (TDB).
    ///
    /// Return
    /// ----------
    /// * `(block index, block)` where the block holds `block_size / 8` doubles, the
    ///   first two being the block's start and end Julian Dates.
    /// * [`DeError::OutOfRange`] before any read when `jd` is outside the file,
    ///   [`DeError::IoError`] on a short or failed read. The cache is left unchanged
    ///   on error.
    pub fn block_for(
        &mut self,
        source: &dyn EphemerisSource,
        jd: f64,
    ) -> Result<(u64, Arc<[f64]>), DeError> {
        let index = self.block_index(jd)?;

        if let Some((cached_index, block)) = &self.cached {
            if *cached_index == index {
                trace!(block = index, "block cache hit");
                return Ok((index, Arc::clone(block)));
            }
        }

        let offset = self.block_offset(index);
        debug!(source = %source, block = index, offset, "block cache miss");

        let bytes = source.read_exact_at(offset, self.block_size)?;
        let block: Arc<[f64]> = self.byte_order.decode_f64s(&bytes).into();

        self.cached = Some((index, Arc::clone(&block)));
        Ok((index, block))
    }
}
