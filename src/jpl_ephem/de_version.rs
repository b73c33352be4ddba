//! Known JPL DE solutions and their file names.
//!
//! [`DeVersion`] covers the DE solutions JPL distributes as binary files and maps
//! each one to:
//! - the conventional **local file names** `jpleph.<v>` (binary ephemeris) and
//!   `testpo.<v>` (conformance test file), via [`DeVersion::ephemeris_filename`]
//!   and [`DeVersion::testpo_filename`];
//! - the **Linux distribution path fragment** under JPL's `eph/planets/Linux/`
//!   directory, via [`DeVersion::linux_path`].
//!
//! Typical use
//! -----------------
//! ```rust
//! use jplde::jpl_ephem::de_version::DeVersion;
//!
//! let v: DeVersion = "DE440".parse().unwrap();
//! assert_eq!(v.linux_path(), "de440/linux_p1550p2650.440");
//! assert_eq!(v.ephemeris_filename(), "jpleph.440");
//! assert_eq!("430t".parse::<DeVersion>().unwrap(), DeVersion::DE430t);
//! ```
use std::{fmt, str::FromStr};

use crate::de_errors::DeError;

/// Enumerates the published JPL DE binary solutions.
///
/// The `t` variants (e.g. `DE430t`, `DE440t`) are distributions that also carry
/// the TT-TDB series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DeVersion {
    DE102,
    DE200,
    DE202,
    DE403,
    DE405,
    DE406,
    DE410,
    DE413,
    DE414,
    DE418,
    DE421,
    DE422,
    DE423,
    DE424,
    DE430,
    DE430t,
    DE431,
    DE432,
    DE432t,
    DE433,
    DE434,
    DE435,
    DE436,
    DE436t,
    DE438,
    DE438t,
    DE440,
    DE440t,
    DE441,
}

impl DeVersion {
    pub const ALL: [DeVersion; 29] = [
        DeVersion::DE102,
        DeVersion::DE200,
        DeVersion::DE202,
        DeVersion::DE403,
        DeVersion::DE405,
        DeVersion::DE406,
        DeVersion::DE410,
        DeVersion::DE413,
        DeVersion::DE414,
        DeVersion::DE418,
        DeVersion::DE421,
        DeVersion::DE422,
        DeVersion::DE423,
        DeVersion::DE424,
        DeVersion::DE430,
        DeVersion::DE430t,
        DeVersion::DE431,
        DeVersion::DE432,
        DeVersion::DE432t,
        DeVersion::DE433,
        DeVersion::DE434,
        DeVersion::DE435,
        DeVersion::DE436,
        DeVersion::DE436t,
        DeVersion::DE438,
        DeVersion::DE438t,
        DeVersion::DE440,
        DeVersion::DE440t,
        DeVersion::DE441,
    ];

    /// File suffix of the solution, e.g. `"440"` or `"430t"`.
    pub fn suffix(&self) -> &'static str {
        match self {
            DeVersion::DE102 => "102",
            DeVersion::DE200 => "200",
            DeVersion::DE202 => "202",
            DeVersion::DE403 => "403",
            DeVersion::DE405 => "405",
            DeVersion::DE406 => "406",
            DeVersion::DE410 => "410",
            DeVersion::DE413 => "413",
            DeVersion::DE414 => "414",
            DeVersion::DE418 => "418",
            DeVersion::DE421 => "421",
            DeVersion::DE422 => "422",
            DeVersion::DE423 => "423",
            DeVersion::DE424 => "424",
            DeVersion::DE430 => "430",
            DeVersion::DE430t => "430t",
            DeVersion::DE431 => "431",
            DeVersion::DE432 => "432",
            DeVersion::DE432t => "432t",
            DeVersion::DE433 => "433",
            DeVersion::DE434 => "434",
            DeVersion::DE435 => "435",
            DeVersion::DE436 => "436",
            DeVersion::DE436t => "436t",
            DeVersion::DE438 => "438",
            DeVersion::DE438t => "438t",
            DeVersion::DE440 => "440",
            DeVersion::DE440t => "440t",
            DeVersion::DE441 => "441",
        }
    }

    /// DE number as stored in the header's version field.
    pub fn number(&self) -> i32 {
        self.suffix()
            .trim_end_matches('t')
            .parse()
            .unwrap_or_default()
    }

    /// Return the **Linux distribution path fragment** for this DE version.
    ///
    /// This is the path relative to JPL's `eph/planets/Linux/` directory
    /// (e.g., `de440/linux_p1550p2650.440`); prepend a base location.
    pub fn linux_path(&self) -> &'static str {
        match self {
            DeVersion::DE102 => "de102/lnxm1410p3002.102",
            DeVersion::DE200 => "de200/lnxm1600p2170.200",
            DeVersion::DE202 => "de202/lnxp1900p2050.202",
            DeVersion::DE403 => "de403/lnxp1600p2200.403",
            DeVersion::DE405 => "de405/lnxp1600p2200.405",
            DeVersion::DE406 => "de406/lnxm3000p3000.406",
            DeVersion::DE410 => "de410/lnxp1960p2020.410",
            DeVersion::DE413 => "de413/lnxp1900p2050.413",
            DeVersion::DE414 => "de414/lnxp1600p2200.414",
            DeVersion::DE418 => "de418/lnxp1900p2050.418",
            DeVersion::DE421 => "de421/lnxp1900p2053.421",
            DeVersion::DE422 => "de422/lnxm3000p3000.422",
            DeVersion::DE423 => "de423/lnxp1800p2200.423",
            DeVersion::DE424 => "de424/lnxm3000p3000.424",
            DeVersion::DE430 => "de430/linux_p1550p2650.430",
            DeVersion::DE430t => "de430t/linux_p1550p2650.430t",
            DeVersion::DE431 => "de431/lnxm13000p17000.431",
            DeVersion::DE432 => "de432/linux_p1550p2650.432",
            DeVersion::DE432t => "de432t/linux_p1550p2650.432t",
            DeVersion::DE433 => "de433/linux_p1550p2650.433",
            DeVersion::DE434 => "de434/linux_p1550p2650.434",
            DeVersion::DE435 => "de435/linux_p1550p2650.435",
            DeVersion::DE436 => "de436/linux_p1550p2650.436",
            DeVersion::DE436t => "de436t/linux_p1550p2650.436t",
            DeVersion::DE438 => "de438/linux_p1550p2650.438",
            DeVersion::DE438t => "de438t/linux_p1550p2650.438t",
            DeVersion::DE440 => "de440/linux_p1550p2650.440",
            DeVersion::DE440t => "de440t/linux_p1550p2650.440t",
            DeVersion::DE441 => "de441/linux_m13000p17000.441",
        }
    }

    /// Conventional local name of the binary ephemeris, `jpleph.<suffix>`.
    pub fn ephemeris_filename(&self) -> String {
        format!("jpleph.{}", self.suffix())
    }

    /// Name of JPL's conformance test file, `testpo.<suffix>`.
    pub fn testpo_filename(&self) -> String {
        format!("testpo.{}", self.suffix())
    }

    /// Directory holding a solution's files in JPL's tree, e.g. `de440t`.
    pub fn directory(&self) -> String {
        format!("de{}", self.suffix())
    }
}

impl fmt::Display for DeVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DE{}", self.suffix())
    }
}

/// Parse a [`DeVersion`] from `"DE440"`, `"de440"`, `"440"` or `"440t"`.
impl FromStr for DeVersion {
    type Err = DeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let suffix = trimmed
            .strip_prefix("DE")
            .or_else(|| trimmed.strip_prefix("de"))
            .unwrap_or(trimmed);

        DeVersion::ALL
            .into_iter()
            .find(|v| v.suffix().eq_ignore_ascii_case(suffix))
            .ok_or_else(|| DeError::InvalidDeVersion(s.to_string()))
    }
}
