#![allow(dead_code)]

use approx::assert_relative_eq;
use camino::Utf8PathBuf;
use jplde::jpl_ephem::{
    de_byte_order::ByteOrder,
    de_ephemeris::{DeEphemeris, OpenOptions},
    series_state::SeriesState,
};
use jplde::time::jd_to_calendar;
use tempfile::TempDir;

#[path = "../../src/jpl_ephem/test_support.rs"]
pub mod synthetic;

pub use synthetic::SyntheticDe;

/// A synthetic DE binary written to a temporary directory.
pub struct SyntheticFile {
    _dir: TempDir,
    pub path: Utf8PathBuf,
    pub spec: SyntheticDe,
}

pub fn write_synthetic(spec: SyntheticDe) -> SyntheticFile {
    let dir = tempfile::tempdir().unwrap();
    let path = Utf8PathBuf::from_path_buf(dir.path().join(format!("jpleph.{}", spec.version)))
        .unwrap();
    std::fs::write(&path, spec.build()).unwrap();
    SyntheticFile {
        _dir: dir,
        path,
        spec,
    }
}

impl SyntheticFile {
    pub fn open(&self) -> DeEphemeris {
        let order = if self.spec.big_endian {
            ByteOrder::Big
        } else {
            ByteOrder::Little
        };
        DeEphemeris::open(&self.path, order).unwrap()
    }

    pub fn open_sniffed(&self) -> DeEphemeris {
        DeEphemeris::open_with(&self.path, &OpenOptions::default()).unwrap()
    }

    /// Write a text file next to the binary.
    pub fn write_sibling(&self, name: &str, contents: &str) -> Utf8PathBuf {
        let path = self.path.with_file_name(name);
        std::fs::write(&path, contents).unwrap();
        path
    }
}

pub fn assert_state_close(state: &SeriesState, expected: &(Vec<f64>, Vec<f64>)) {
    assert_eq!(state.position.len(), expected.0.len());
    for (computed, wanted) in state.position.iter().zip(expected.0.iter()) {
        assert_relative_eq!(*computed, *wanted, epsilon = 1e-9, max_relative = 1e-12);
    }
    for (computed, wanted) in state.velocity.iter().zip(expected.1.iter()) {
        assert_relative_eq!(*computed, *wanted, epsilon = 1e-10, max_relative = 1e-10);
    }
}

/// One line of a `testpo` file, in JPL's fixed columns.
pub fn testpo_line(
    de: i32,
    jd: f64,
    target: i32,
    center: i32,
    component: usize,
    value: f64,
) -> String {
    let date = jd_to_calendar(jd);
    format!(
        "{de:>3} {:>5}.{:02}.{:02}{jd:>10.1}{target:>3}{center:>3}{component:>3}  {value:.20}",
        date.year,
        date.month,
        date.day.floor() as u32
    )
}

/// Path of a real DE binary given through `JPLDE_FILE`, if any.
pub fn real_ephemeris_path() -> Option<Utf8PathBuf> {
    std::env::var("JPLDE_FILE").ok().map(Utf8PathBuf::from)
}
