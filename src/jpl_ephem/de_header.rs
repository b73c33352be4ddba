//! Decoder for the header of a JPL DE binary.
//!
//! The header occupies the first two records of the file:
//!
//! * **record 0** holds labels, constant names, the covered date range, the
//!   Earth-Moon mass ratio and the coefficient pointer table (see
//!   [`header_layout`](super::header_layout) for the offsets);
//! * **record 1** holds the values of the named constants.
//!
//! The size of a record is not stored anywhere: it is recovered from the
//! coefficient pointer table ([`compute_block_size`]).
use std::fmt;

use nom::{bytes::complete::take, multi::count, IResult, Parser};
use tracing::debug;

use crate::{
    constants::{HEADER_REREAD_SLACK, N_SERIES},
    de_errors::DeError,
};

use super::{
    de_byte_order::ByteOrder,
    de_ids::component_count,
    ephem_source::EphemerisSource,
    header_layout::{HeaderLayout, GROUP_1050},
};

/// Coefficient pointer table, as stored in the file.
///
/// One row per series (`0..=14`):
/// `[start index (1-based, in doubles), coefficients per component, sub-intervals per block]`.
pub type CoefficientPointers = [[i32; 3]; N_SERIES];

/// Decoded header of a DE binary. Immutable once the file is opened.
#[derive(Debug, Clone, PartialEq)]
pub struct DeHeader {
    pub(crate) description: String,
    pub(crate) start_label: String,
    pub(crate) end_label: String,
    pub(crate) constant_names: Vec<String>,
    pub(crate) jd_start: f64,
    pub(crate) jd_end: f64,
    pub(crate) jd_step: f64,
    pub(crate) au_km: f64,
    pub(crate) earth_moon_mass_ratio: f64,
    pub(crate) version: i32,
    pub(crate) coefficient_pointers: CoefficientPointers,
    pub(crate) block_size_bytes: usize,
    pub(crate) constants: Vec<f64>,
    pub(crate) byte_order: ByteOrder,
}

/// Fixed-width text field, trailing blanks and NULs removed.
fn parse_text(len: usize) -> impl Fn(&[u8]) -> IResult<&[u8], String> {
    move |input: &[u8]| {
        let (rest, raw) = take(len)(input)?;
        Ok((
            rest,
            String::from_utf8_lossy(raw)
                .trim_end_matches(|c: char| c == ' ' || c == '\0')
                .to_string(),
        ))
    }
}

/// Parse `n` consecutive Fortran CHAR*6 constant names.
fn parse_constant_names(input: &[u8], name_len: usize, n: usize) -> IResult<&[u8], Vec<String>> {
    count(parse_text(name_len), n).parse(input)
}

/// Record size in bytes, from the last series with a nonzero start index.
///
/// `8 * (start + n_coeffs * n_subs * n_components - 1)`: the record ends with the
/// last coefficient of the last series stored in it.
///
/// Arguments
/// -----------------
/// * `pointers`: the raw coefficient pointer table.
///
/// Return
/// ----------
/// * The record size in bytes, or [`DeError::MalformedHeader`] if every start
///   index is zero or the computed length is not positive or overflows.
pub fn compute_block_size(pointers: &CoefficientPointers) -> Result<usize, DeError> {
    let (series, pointer) = pointers
        .iter()
        .enumerate()
        .rev()
        .find(|(_, pointer)| pointer[0] != 0)
        .ok_or_else(|| {
            DeError::MalformedHeader("header contains no coefficient offsets".into())
        })?;

    let [start, n_coeffs, n_subs] = pointer.map(i64::from);
    let overflow = || {
        DeError::MalformedHeader(format!(
            "record length overflows for series {series} pointer {pointer:?}"
        ))
    };
    let record_len = n_coeffs
        .checked_mul(n_subs)
        .and_then(|n| n.checked_mul(component_count(series) as i64))
        .and_then(|n| n.checked_add(start - 1))
        .ok_or_else(overflow)?;
    if record_len <= 0 {
        return Err(DeError::MalformedHeader(format!(
            "non-positive record length {record_len} computed from series {series}"
        )));
    }

    usize::try_from(record_len)
        .ok()
        .and_then(|n| n.checked_mul(8))
        .ok_or_else(overflow)
}

/// Read the first `len` bytes of the source, or fewer if the source is shorter.
fn read_prefix(source: &dyn EphemerisSource, len: usize) -> Result<Vec<u8>, DeError> {
    Ok(source.read_up_to(0, len)?)
}

/// Grow `buffer` to `needed` bytes by reading the start of the source again.
fn ensure_prefix(
    source: &dyn EphemerisSource,
    buffer: &mut Vec<u8>,
    needed: usize,
    what: &str,
) -> Result<(), DeError> {
    if buffer.len() < needed {
        debug!(
            source = %source,
            from = buffer.len(),
            to = needed,
            "re-reading DE header to fit {what}"
        );
        *buffer = read_prefix(source, needed)?;
    }
    Ok(())
}

/// Field accessors over the raw header bytes that report truncation as a malformed header.
struct HeaderBytes<'a> {
    bytes: &'a [u8],
    order: ByteOrder,
}

impl HeaderBytes<'_> {
    fn f64(&self, name: &str, offset: usize) -> Result<f64, DeError> {
        self.order
            .f64_at(self.bytes, offset)
            .ok_or_else(|| truncated(name, offset, self.bytes.len()))
    }

    fn i32(&self, name: &str, offset: usize) -> Result<i32, DeError> {
        self.order
            .i32_at(self.bytes, offset)
            .ok_or_else(|| truncated(name, offset, self.bytes.len()))
    }

    fn pointer(&self, name: &str, offset: usize) -> Result<[i32; 3], DeError> {
        Ok([
            self.i32(name, offset)?,
            self.i32(name, offset + 4)?,
            self.i32(name, offset + 8)?,
        ])
    }

    fn text(&self, name: &str, offset: usize, len: usize) -> Result<String, DeError> {
        let input = self
            .bytes
            .get(offset..)
            .ok_or_else(|| truncated(name, offset, self.bytes.len()))?;
        parse_text(len)(input)
            .map(|(_, text)| text)
            .map_err(|_| truncated(name, offset, self.bytes.len()))
    }

    fn names(&self, offset: usize, name_len: usize, n: usize) -> Result<Vec<String>, DeError> {
        let input = self
            .bytes
            .get(offset..)
            .ok_or_else(|| truncated("constant names", offset, self.bytes.len()))?;
        parse_constant_names(input, name_len, n)
            .map(|(_, names)| names)
            .map_err(|_| truncated("constant names", offset, self.bytes.len()))
    }
}

fn truncated(name: &str, offset: usize, len: usize) -> DeError {
    DeError::MalformedHeader(format!(
        "truncated header: {name} at offset {offset} past {len} available bytes"
    ))
}

impl DeHeader {
    /// Read and decode the header of a DE binary.
    ///
    /// The first `initial_len` bytes are read (raised to the fixed header region if
    /// smaller). When the constant count calls for more, because there are many
    /// named constants or because the constant values sit past the buffer, the
    /// start of the file is read again with a buffer large enough.
    ///
    /// Arguments
    /// -----------------
    /// * `source`: the byte source of the ephemeris.
    /// * `byte_order`: byte order of the file, `None` to detect it with [`ByteOrder::sniff`].
    /// * `initial_len`: size of the first read, usually
    ///   [`DEFAULT_HEADER_BUFFER_LEN`](crate::constants::DEFAULT_HEADER_BUFFER_LEN).
    ///
    /// Return
    /// ----------
    /// * The decoded [`DeHeader`], [`DeError::MalformedHeader`] when the fields are
    ///   truncated or inconsistent, or [`DeError::IoError`] on read failure.
    pub fn read(
        source: &dyn EphemerisSource,
        byte_order: Option<ByteOrder>,
        initial_len: usize,
    ) -> Result<Self, DeError> {
        let layout = &GROUP_1050;
        let source_len = usize::try_from(source.byte_len()?).unwrap_or(usize::MAX);
        let mut buffer = read_prefix(source, initial_len.max(layout.header_len(0)))?;

        let order = match byte_order {
            Some(order) => order,
            None => ByteOrder::sniff(&buffer)?,
        };

        let n_constants = HeaderBytes {
            bytes: &buffer,
            order,
        }
        .i32("numConstants", layout.n_constants)?;
        let n_constants = usize::try_from(n_constants).map_err(|_| {
            DeError::MalformedHeader(format!("negative constant count {n_constants}"))
        })?;

        let names_end = layout.header_len(n_constants);
        if names_end > source_len {
            return Err(DeError::MalformedHeader(format!(
                "{n_constants} constants need a {names_end}-byte header, {source} holds {source_len} bytes"
            )));
        }
        ensure_prefix(
            source,
            &mut buffer,
            (n_constants * layout.constant_name_len + HEADER_REREAD_SLACK).min(source_len),
            "constant names",
        )?;

        let mut header = Self::parse_record0(&buffer, order, layout)?;

        let constants_offset = header.block_size_bytes;
        let constants_end = constants_offset.saturating_add(n_constants * 8);
        if constants_end > source_len {
            return Err(DeError::MalformedHeader(format!(
                "record size {constants_offset} and {n_constants} constant values run past the end of {source} ({source_len} bytes)"
            )));
        }
        ensure_prefix(source, &mut buffer, constants_end, "constant values")?;
        header.constants = (0..n_constants)
            .map(|i| {
                HeaderBytes {
                    bytes: &buffer,
                    order,
                }
                .f64("constant value", constants_offset + i * 8)
            })
            .collect::<Result<_, _>>()?;

        header.validate(layout)?;

        debug!(
            source = %source,
            version = header.version,
            block_size = header.block_size_bytes,
            n_constants,
            byte_order = ?order,
            "decoded DE header"
        );

        Ok(header)
    }

    /// Decode every field of record 0. Constant values are left empty.
    ///
    /// The buffer must hold the whole of record 0 up to the trailing pointers;
    /// missing bytes are reported as [`DeError::MalformedHeader`].
    pub fn parse_record0(
        bytes: &[u8],
        order: ByteOrder,
        layout: &HeaderLayout,
    ) -> Result<Self, DeError> {
        let raw = HeaderBytes { bytes, order };

        let description = raw.text("description", layout.description, layout.label_len)?;
        let start_label = raw.text("start label", layout.start_label, layout.label_len)?;
        let end_label = raw.text("end label", layout.end_label, layout.label_len)?;

        let jd_start = raw.f64("jdStart", layout.jd_start)?;
        let jd_end = raw.f64("jdEnd", layout.jd_end)?;
        let jd_step = raw.f64("jdStep", layout.jd_step)?;
        let n_constants = raw.i32("numConstants", layout.n_constants)?;
        let n_constants = usize::try_from(n_constants).map_err(|_| {
            DeError::MalformedHeader(format!("negative constant count {n_constants}"))
        })?;
        let au_km = raw.f64("AU", layout.au)?;
        let earth_moon_mass_ratio = raw.f64("EMRAT", layout.emrat)?;

        let mut coefficient_pointers: CoefficientPointers = [[0; 3]; N_SERIES];
        for (i, pointer) in coefficient_pointers
            .iter_mut()
            .take(layout.leading_pointers)
            .enumerate()
        {
            *pointer = raw.pointer("coefficient pointer", layout.pointers + i * layout.pointer_stride)?;
        }

        let version = raw.i32("version", layout.version)?;
        coefficient_pointers[12] = raw.pointer("libration pointer", layout.libration_pointer)?;

        let mut constant_names = raw.names(
            layout.constant_names,
            layout.constant_name_len,
            layout.fixed_constant_names,
        )?;
        if n_constants > layout.fixed_constant_names {
            constant_names.extend(raw.names(
                layout.extra_constant_names,
                layout.constant_name_len,
                n_constants - layout.fixed_constant_names,
            )?);
        }
        constant_names.truncate(n_constants);

        let trailing = layout.trailing_pointers(n_constants);
        coefficient_pointers[13] = raw.pointer("lunar mantle pointer", trailing)?;
        coefficient_pointers[14] =
            raw.pointer("TT-TDB pointer", trailing + layout.pointer_stride)?;

        let block_size_bytes = compute_block_size(&coefficient_pointers)?;

        Ok(DeHeader {
            description,
            start_label,
            end_label,
            constant_names,
            jd_start,
            jd_end,
            jd_step,
            au_km,
            earth_moon_mass_ratio,
            version,
            coefficient_pointers,
            block_size_bytes,
            constants: Vec::new(),
            byte_order: order,
        })
    }

    /// Cross-field consistency checks.
    fn validate(&self, layout: &HeaderLayout) -> Result<(), DeError> {
        let malformed = |reason: String| Err(DeError::MalformedHeader(reason));

        if self.version <= 0 {
            return malformed(format!("corrupt version stamp {}", self.version));
        }
        if !(self.jd_step.is_finite() && self.jd_step > 0.0) {
            return malformed(format!("invalid block span {} days", self.jd_step));
        }
        if !(self.jd_start.is_finite() && self.jd_end.is_finite() && self.jd_end > self.jd_start)
        {
            return malformed(format!(
                "invalid date range [{}, {}]",
                self.jd_start, self.jd_end
            ));
        }
        if let Some((series, pointer)) = self
            .coefficient_pointers
            .iter()
            .enumerate()
            .find(|(_, pointer)| pointer.iter().any(|v| *v < 0))
        {
            return malformed(format!(
                "negative coefficient pointer {pointer:?} for series {series}"
            ));
        }
        let header_len = layout.header_len(self.constants.len());
        if self.block_size_bytes < header_len {
            return malformed(format!(
                "record size {} smaller than the header itself ({header_len} bytes)",
                self.block_size_bytes
            ));
        }
        Ok(())
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn start_label(&self) -> &str {
        &self.start_label
    }

    pub fn end_label(&self) -> &str {
        &self.end_label
    }

    /// Names of the constants, one per value of [`Self::constants`].
    pub fn constant_names(&self) -> &[String] {
        &self.constant_names
    }

    pub fn constants(&self) -> &[f64] {
        &self.constants
    }

    /// Value of a named constant, e.g. `"EMRAT"` or `"AU"`.
    pub fn constant(&self, name: &str) -> Option<f64> {
        self.constant_names
            .iter()
            .position(|n| n == name)
            .and_then(|i| self.constants.get(i).copied())
    }

    /// Iterate over `(name, value)` pairs in file order.
    pub fn named_constants(&self) -> impl Iterator<Item = (&str, f64)> {
        self.constant_names
            .iter()
            .map(String::as_str)
            .zip(self.constants.iter().copied())
    }

    pub fn jd_start(&self) -> f64 {
        self.jd_start
    }

    pub fn jd_end(&self) -> f64 {
        self.jd_end
    }

    /// Time span of one data record, in days.
    pub fn jd_step(&self) -> f64 {
        self.jd_step
    }

    /// Astronomical unit in km, as used by this solution.
    pub fn au_km(&self) -> f64 {
        self.au_km
    }

    pub fn earth_moon_mass_ratio(&self) -> f64 {
        self.earth_moon_mass_ratio
    }

    /// DE number of the solution (e.g. 405, 440).
    pub fn version(&self) -> i32 {
        self.version
    }

    pub fn coefficient_pointers(&self) -> &CoefficientPointers {
        &self.coefficient_pointers
    }

    /// Size of one record in bytes; also the offset of the constants record.
    pub fn block_size_bytes(&self) -> usize {
        self.block_size_bytes
    }

    pub fn byte_order(&self) -> ByteOrder {
        self.byte_order
    }

    /// Number of data records covering `[jd_start, jd_end)`.
    pub fn block_count(&self) -> usize {
        ((self.jd_end - self.jd_start) / self.jd_step).round() as usize
    }
}

impl fmt::Display for DeHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        const LABEL_WIDTH: usize = 20;
        const VALUE_WIDTH: usize = 30;

        let border = format!(
            "+{:-<label$}+{:-<value$}+",
            "",
            "",
            label = LABEL_WIDTH + 2,
            value = VALUE_WIDTH + 2
        );
        let row = |f: &mut fmt::Formatter<'_>, label: &str, value: String| {
            writeln!(
                f,
                "| {:<label$} | {:<value$} |",
                label,
                value,
                label = LABEL_WIDTH,
                value = VALUE_WIDTH
            )
        };

        writeln!(
            f,
            "+{:^label$}+{:^value$}+",
            "JPL DE Binary Header",
            "",
            label = LABEL_WIDTH + 2,
            value = VALUE_WIDTH + 2
        )?;
        writeln!(f, "{border}")?;
        row(f, "Version", format!("DE{}", self.version))?;
        row(f, "Start JD", format!("{:.6}", self.jd_start))?;
        row(f, "End JD", format!("{:.6}", self.jd_end))?;
        row(f, "Step (days)", format!("{}", self.jd_step))?;
        row(f, "Record size (bytes)", self.block_size_bytes.to_string())?;
        row(f, "Constants", self.constants.len().to_string())?;
        row(f, "AU (km)", format!("{}", self.au_km))?;
        row(f, "EMRAT", format!("{}", self.earth_moon_mass_ratio))?;
        row(f, "Byte order", format!("{:?}", self.byte_order))?;
        writeln!(f, "{border}")?;

        Ok(())
    }
}
