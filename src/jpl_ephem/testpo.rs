//! Runner for JPL's `testpo.<v>` conformance files.
//!
//! JPL ships every DE solution with a text file of reference values. After a
//! free-form header terminated by a line starting with `EOT`, each line is one
//! test case in fixed columns:
//!
//! ```text
//! columns  field
//! -------  ---------------------------------------------------------------
//!   0..3   DE number
//!   4..9   year
//!  10..12  month
//!  13..15  day
//!  15..25  Julian Date (TDB)
//!  25..28  target code (see DeTarget)
//!  28..31  center code, 0 for none
//!  31..34  component, 1-based into (x, y, z, vx, vy, vz)
//!  34..    expected value, to the end of the line
//! ```
//!
//! Expected values are in AU and AU/day, except for nutations, librations, the
//! lunar mantle angular velocity and TT-TDB which are compared unscaled.
use std::fmt;

use camino::Utf8Path;
use tracing::{debug, warn};

use crate::{
    constants::TESTPO_TOLERANCE,
    de_errors::{DeError, TestpoParseError},
    time::jd_to_calendar,
};

use super::{de_ephemeris::DeEphemeris, de_ids::DeTarget};

/// One line of a `testpo` file.
#[derive(Debug, Clone, PartialEq)]
pub struct TestpoCase {
    pub de_number: i32,
    pub year: i32,
    pub month: u32,
    pub day: u32,
    pub jd: f64,
    pub target: i32,
    pub center: i32,
    /// 1-based index into the concatenated position and velocity.
    pub component: usize,
    pub expected: f64,
}

/// Trimmed text of columns `start..end`, the end clipped to the line length.
fn column(line: &str, start: usize, end: usize) -> &str {
    line.get(start..end.min(line.len())).unwrap_or("").trim()
}

fn parse_field<T: std::str::FromStr>(
    line: &str,
    field: &'static str,
    start: usize,
    end: usize,
) -> Result<T, TestpoParseError> {
    let raw = column(line, start, end);
    raw.parse().map_err(|_| TestpoParseError::InvalidField {
        field,
        value: raw.to_string(),
    })
}

/// Minimum line length: every column up to the first digit of the expected value.
const MIN_LINE_LEN: usize = 35;

impl TestpoCase {
    /// Parse one test case line.
    ///
    /// Fortran `D` exponents in the expected value are accepted.
    pub fn parse(line: &str) -> Result<Self, TestpoParseError> {
        let line = line.trim_end();
        if !line.is_ascii() {
            return Err(TestpoParseError::NonAsciiLine);
        }
        if line.len() < MIN_LINE_LEN {
            return Err(TestpoParseError::TooShortLine(line.len()));
        }

        let expected_raw = column(line, 34, line.len()).replace(['D', 'd'], "E");
        let expected = expected_raw
            .parse()
            .map_err(|_| TestpoParseError::InvalidField {
                field: "expected",
                value: expected_raw.clone(),
            })?;

        Ok(TestpoCase {
            de_number: parse_field(line, "de", 0, 3)?,
            year: parse_field(line, "year", 4, 9)?,
            month: parse_field(line, "month", 10, 12)?,
            day: parse_field(line, "day", 13, 15)?,
            jd: parse_field(line, "jd", 15, 25)?,
            target: parse_field(line, "target", 25, 28)?,
            center: parse_field(line, "center", 28, 31)?,
            component: parse_field(line, "component", 31, 34)?,
            expected,
        })
    }

    /// Whether the year, month and day columns agree with the Julian Date.
    pub fn calendar_matches(&self) -> bool {
        let date = jd_to_calendar(self.jd);
        date.year == self.year && date.month == self.month && date.day.floor() as u32 == self.day
    }
}

/// Parse the test cases of a whole file, with their 1-based line numbers.
///
/// Return
/// ----------
/// * The cases following the `EOT` line; blank lines are ignored.
/// * [`DeError::TestpoParse`] with [`TestpoParseError::MissingEot`] when there is
///   no `EOT` line, or with the parse error of the first invalid case.
pub fn parse_testpo(text: &str) -> Result<Vec<(usize, TestpoCase)>, DeError> {
    let mut lines = text.lines().enumerate();

    lines
        .by_ref()
        .find(|(_, line)| line.starts_with("EOT"))
        .ok_or(DeError::TestpoParse {
            line: 0,
            source: TestpoParseError::MissingEot,
        })?;

    lines
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(i, line)| {
            TestpoCase::parse(line)
                .map(|case| (i + 1, case))
                .map_err(|source| DeError::TestpoParse { line: i + 1, source })
        })
        .collect()
}

/// A case whose computed value is off by more than the tolerance.
#[derive(Debug, Clone, PartialEq)]
pub struct TestpoFailure {
    pub line: usize,
    pub case: TestpoCase,
    pub computed: f64,
    pub difference: f64,
}

/// Outcome of a conformance run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TestpoReport {
    /// Cases evaluated.
    pub tests: usize,
    pub failed: usize,
    /// Cases outside the file's date range or needing a series the file lacks.
    pub skipped: usize,
    pub failures: Vec<TestpoFailure>,
}

impl TestpoReport {
    pub fn passed(&self) -> bool {
        self.failed == 0
    }
}

impl fmt::Display for TestpoReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for failure in &self.failures {
            let case = &failure.case;
            writeln!(
                f,
                "Fail: line {:>5} | jd {:>10.1} | t {:>2} | c {:>2} | x {} | expected {:>+.20} | computed {:>+.20} | diff {:.3e}",
                failure.line,
                case.jd,
                case.target,
                case.center,
                case.component,
                case.expected,
                failure.computed,
                failure.difference
            )?;
        }
        write!(
            f,
            "Tests ran: {} Failed: {} Skipped: {}",
            self.tests, self.failed, self.skipped
        )
    }
}

/// Value a test case compares against, or `None` when the case is skipped.
///
/// Return
/// ----------
/// * `Some(value)` in AU / AU/day (or unscaled for angles and TT-TDB).
/// * `None` when `jd` is outside the ephemeris or a needed series is absent.
/// * [`DeError::InvalidTargetCode`] for unknown codes and
///   [`DeError::TestpoParse`] when the component does not exist for the target.
pub fn compute_case(
    ephem: &DeEphemeris,
    case: &TestpoCase,
    line: usize,
) -> Result<Option<f64>, DeError> {
    let header = ephem.header();
    if !(case.jd >= header.jd_start() && case.jd < header.jd_end()) {
        return Ok(None);
    }

    let target = DeTarget::try_from(case.target)?;
    let center = match case.center {
        0 => None,
        code => Some(DeTarget::try_from(code)?),
    };

    let state = match ephem.state_au(target, center, case.jd) {
        Ok(state) => state,
        Err(DeError::SeriesNotAvailable(series)) => {
            debug!(line, ?series, "skipping test case, series not in file");
            return Ok(None);
        }
        Err(err) => return Err(err),
    };

    case.component
        .checked_sub(1)
        .and_then(|i| state.component(i))
        .map(Some)
        .ok_or_else(|| DeError::TestpoParse {
            line,
            source: TestpoParseError::InvalidField {
                field: "component",
                value: case.component.to_string(),
            },
        })
}

/// Run every case of a `testpo` text against an ephemeris.
pub fn run_testpo(ephem: &DeEphemeris, text: &str) -> Result<TestpoReport, DeError> {
    let mut report = TestpoReport::default();

    for (line, case) in parse_testpo(text)? {
        if case.de_number != ephem.header().version() {
            debug!(
                line,
                expected = case.de_number,
                found = ephem.header().version(),
                "DE number of test case differs from the file"
            );
        }

        if !case.calendar_matches() {
            debug!(line, jd = case.jd, "calendar date of test case does not match its JD");
        }

        let Some(computed) = compute_case(ephem, &case, line)? else {
            report.skipped += 1;
            continue;
        };

        report.tests += 1;
        let difference = (computed - case.expected).abs();
        if !(difference <= TESTPO_TOLERANCE) {
            warn!(line, computed, expected = case.expected, difference, "test case failed");
            report.failed += 1;
            report.failures.push(TestpoFailure {
                line,
                case,
                computed,
                difference,
            });
        }
    }

    Ok(report)
}

/// Read a `testpo` file and run it against an ephemeris.
pub fn run_testpo_file(
    ephem: &DeEphemeris,
    path: impl AsRef<Utf8Path>,
) -> Result<TestpoReport, DeError> {
    let text = std::fs::read_to_string(path.as_ref())?;
    run_testpo(ephem, &text)
}

#[cfg(test)]
mod test_testpo {
    use super::*;

    const LINE: &str =
        "405  1600.01.01 2305447.5  3 12  1   -0.30215722474115770000        ";

    #[test]
    fn test_parse_case() {
        let case = TestpoCase::parse(LINE).unwrap();
        assert!(case.calendar_matches());
        assert_eq!(
            case,
            TestpoCase {
                de_number: 405,
                year: 1600,
                month: 1,
                day: 1,
                jd: 2305447.5,
                target: 3,
                center: 12,
                component: 1,
                expected: -0.3021572247411577,
            }
        );
    }

    #[test]
    fn test_parse_negative_year_and_fortran_exponent() {
        let line = "102 -1410.04.16 1206160.5 14  0  2    0.12345678901234D-03";
        let case = TestpoCase::parse(line).unwrap();
        assert_eq!(case.year, -1410);
        assert_eq!(case.center, 0);
        assert_eq!(case.expected, 0.12345678901234e-3);
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(
            TestpoCase::parse("405  1600.01.01"),
            Err(TestpoParseError::TooShortLine(15))
        );
        assert_eq!(
            TestpoCase::parse(&LINE.replacen("1600", "16°0", 1)),
            Err(TestpoParseError::NonAsciiLine)
        );
        // short and non-ASCII: the encoding is reported first
        assert_eq!(
            TestpoCase::parse("405 é"),
            Err(TestpoParseError::NonAsciiLine)
        );
        let bad_target = LINE.replacen(" 3 12", " x 12", 1);
        assert_eq!(
            TestpoCase::parse(&bad_target),
            Err(TestpoParseError::InvalidField {
                field: "target",
                value: "x".into()
            })
        );
    }

    #[test]
    fn test_parse_file_skips_header() {
        let text = format!("DENUM 405\nsome header\n\nEOT\n{LINE}\n\n{LINE}\n");
        let cases = parse_testpo(&text).unwrap();
        assert_eq!(cases.len(), 2);
        assert_eq!(cases[0].0, 5);
        assert_eq!(cases[1].0, 7);

        assert_eq!(
            parse_testpo(LINE).unwrap_err(),
            DeError::TestpoParse {
                line: 0,
                source: TestpoParseError::MissingEot
            }
        );

        let broken = format!("EOT\n{LINE}\n405 broken\n");
        assert_eq!(
            parse_testpo(&broken).unwrap_err(),
            DeError::TestpoParse {
                line: 3,
                source: TestpoParseError::TooShortLine(10)
            }
        );
    }

    #[test]
    fn test_report_display() {
        let report = TestpoReport {
            tests: 10,
            failed: 0,
            skipped: 2,
            failures: vec![],
        };
        assert!(report.passed());
        assert_eq!(report.to_string(), "Tests ran: 10 Failed: 0 Skipped: 2");
    }
}
