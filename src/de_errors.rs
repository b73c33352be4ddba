use thiserror::Error;

use crate::jpl_ephem::de_ids::DeSeries;

/// Reasons a line of a `testpo` conformance file can be rejected.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TestpoParseError {
    #[error("line is too short ({0} characters)")]
    TooShortLine(usize),

    #[error("invalid {field} field: {value:?}")]
    InvalidField { field: &'static str, value: String },

    #[error("line holds non-ASCII characters, fixed columns cannot be read")]
    NonAsciiLine,

    #[error("no EOT marker found before the test cases")]
    MissingEot,
}

#[derive(Error, Debug)]
pub enum DeError {
    #[error("Malformed DE header: {0}")]
    MalformedHeader(String),

    #[error("Unable to perform file operation: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Julian Date {jd} outside ephemeris range [{start}, {end})")]
    OutOfRange { jd: f64, start: f64, end: f64 },

    #[error("Series {0:?} is not available in this ephemeris file")]
    SeriesNotAvailable(DeSeries),

    #[error("Invalid data block {index}: {reason}")]
    InvalidBlock { index: u64, reason: String },

    #[error("Invalid DE series id: {0}")]
    InvalidSeriesId(u8),

    #[error("Invalid testpo target/center code: {0}")]
    InvalidTargetCode(i32),

    #[error("Invalid JPL DE version: {0}")]
    InvalidDeVersion(String),

    #[error("Error while parsing testpo line {line}: {source}")]
    TestpoParse {
        line: usize,
        source: TestpoParseError,
    },
}

impl PartialEq for DeError {
    fn eq(&self, other: &Self) -> bool {
        use DeError::*;
        match (self, other) {
            (MalformedHeader(a), MalformedHeader(b)) => a == b,

            // io::Error is not comparable: same variant means equal
            (IoError(_), IoError(_)) => true,

            (
                OutOfRange {
                    jd: a,
                    start: sa,
                    end: ea,
                },
                OutOfRange {
                    jd: b,
                    start: sb,
                    end: eb,
                },
            ) => a == b && sa == sb && ea == eb,
            (SeriesNotAvailable(a), SeriesNotAvailable(b)) => a == b,
            (
                InvalidBlock {
                    index: ia,
                    reason: ra,
                },
                InvalidBlock {
                    index: ib,
                    reason: rb,
                },
            ) => ia == ib && ra == rb,
            (InvalidSeriesId(a), InvalidSeriesId(b)) => a == b,
            (InvalidTargetCode(a), InvalidTargetCode(b)) => a == b,
            (InvalidDeVersion(a), InvalidDeVersion(b)) => a == b,
            (
                TestpoParse {
                    line: la,
                    source: sa,
                },
                TestpoParse {
                    line: lb,
                    source: sb,
                },
            ) => la == lb && sa == sb,

            _ => false,
        }
    }
}
