//! Byte order of a DE binary file.
//!
//! DE binaries are written in the byte order of the machine that produced them and
//! carry no marker saying which one it is. The order is either supplied by the
//! caller or guessed with [`ByteOrder::sniff`] from two header fields that have a
//! narrow plausible range.
use nom::number::complete::{be_f64, be_i32, le_f64, le_i32};

use crate::de_errors::DeError;

use super::header_layout::GROUP_1050;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ByteOrder {
    #[default]
    Little,
    Big,
}

impl ByteOrder {
    /// Byte order of the running machine.
    pub fn native() -> Self {
        if cfg!(target_endian = "big") {
            ByteOrder::Big
        } else {
            ByteOrder::Little
        }
    }

    /// Guess the byte order from the start of a header.
    ///
    /// A byte order is plausible when `jdStep` decodes to a positive number of days
    /// below one million and `numConstants` lies in `0..=100_000`. Little-endian
    /// wins when both are.
    ///
    /// Arguments
    /// -----------------
    /// * `header`: the first bytes of the file, at least up to the end of `emrat`.
    ///
    /// Return
    /// ----------
    /// * The plausible [`ByteOrder`], or [`DeError::MalformedHeader`] if the buffer
    ///   is too short or neither order yields sensible values.
    pub fn sniff(header: &[u8]) -> Result<Self, DeError> {
        let layout = &GROUP_1050;
        if header.len() < layout.emrat + 8 {
            return Err(DeError::MalformedHeader(format!(
                "header too short to detect byte order ({} bytes)",
                header.len()
            )));
        }

        let plausible = |order: ByteOrder| -> bool {
            let step = order.f64_at(header, layout.jd_step);
            let ncon = order.i32_at(header, layout.n_constants);
            matches!((step, ncon), (Some(step), Some(ncon))
                if (1e-6..1e6).contains(&step) && (0..=100_000).contains(&ncon))
        };

        [ByteOrder::Little, ByteOrder::Big]
            .into_iter()
            .find(|order| plausible(*order))
            .ok_or_else(|| {
                DeError::MalformedHeader(
                    "unable to detect byte order: no plausible step and constant count".into(),
                )
            })
    }

    /// Decode the `f64` stored at `offset`, `None` if it runs past the buffer.
    pub(crate) fn f64_at(self, input: &[u8], offset: usize) -> Option<f64> {
        let slice = input.get(offset..)?;
        let parsed = match self {
            ByteOrder::Little => le_f64::<_, nom::error::Error<&[u8]>>(slice),
            ByteOrder::Big => be_f64::<_, nom::error::Error<&[u8]>>(slice),
        };
        parsed.ok().map(|(_, value)| value)
    }

    /// Decode the `i32` stored at `offset`, `None` if it runs past the buffer.
    pub(crate) fn i32_at(self, input: &[u8], offset: usize) -> Option<i32> {
        let slice = input.get(offset..)?;
        let parsed = match self {
            ByteOrder::Little => le_i32::<_, nom::error::Error<&[u8]>>(slice),
            ByteOrder::Big => be_i32::<_, nom::error::Error<&[u8]>>(slice),
        };
        parsed.ok().map(|(_, value)| value)
    }

    /// Decode a whole buffer as consecutive `f64` values.
    ///
    /// Trailing bytes that do not fill a whole value are ignored.
    pub(crate) fn decode_f64s(self, input: &[u8]) -> Vec<f64> {
        input
            .chunks_exact(8)
            .map(|chunk| {
                let mut raw = [0u8; 8];
                raw.copy_from_slice(chunk);
                match self {
                    ByteOrder::Little => f64::from_le_bytes(raw),
                    ByteOrder::Big => f64::from_be_bytes(raw),
                }
            })
            .collect()
    }
}

impl std::str::FromStr for ByteOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "little" | "le" => Ok(ByteOrder::Little),
            "big" | "be" => Ok(ByteOrder::Big),
            "native" => Ok(ByteOrder::native()),
            _ => Err(format!("Invalid byte order: {s}")),
        }
    }
}
