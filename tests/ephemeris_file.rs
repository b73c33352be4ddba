mod common;

use approx::assert_relative_eq;
use common::{assert_state_close, write_synthetic, SyntheticDe};
use hifitime::{Epoch, TimeScale};
use jplde::{
    de_errors::DeError,
    jpl_ephem::{
        de_byte_order::ByteOrder,
        de_ephemeris::{DeEphemeris, OpenOptions},
        de_ids::{DeSeries, DeTarget},
    },
};

#[test]
fn test_every_series_in_range_is_finite() {
    let file = write_synthetic(SyntheticDe::default());
    let ephem = file.open();
    let spec = &file.spec;

    let mut jd = spec.jd_start;
    while jd < spec.jd_end() {
        for series in DeSeries::ALL {
            if !ephem.layout().is_available(series) {
                continue;
            }
            let state = ephem.position(series, jd).unwrap();
            assert_eq!(state.len(), series.component_count());
            assert!(state
                .position
                .iter()
                .chain(state.velocity.iter())
                .all(|v| v.is_finite()));
            assert_state_close(&state, &spec.expected_state(series.id(), jd));
        }
        jd += 1.37;
    }
}

#[test]
fn test_range_boundaries() {
    let file = write_synthetic(SyntheticDe::default());
    let ephem = file.open();
    let spec = &file.spec;

    assert!(ephem.position(DeSeries::Sun, spec.jd_start).is_ok());
    assert!(ephem.position(DeSeries::Sun, spec.jd_end() - 1e-3).is_ok());

    let at_end = ephem.position(DeSeries::Sun, spec.jd_end()).unwrap_err();
    assert_eq!(
        at_end,
        DeError::OutOfRange {
            jd: spec.jd_end(),
            start: spec.jd_start,
            end: spec.jd_end(),
        }
    );
    assert!(matches!(
        ephem.position(DeSeries::Sun, spec.jd_start - spec.jd_step),
        Err(DeError::OutOfRange { .. })
    ));
    assert!(matches!(
        ephem.position(DeSeries::Sun, spec.jd_end() + 10.0 * spec.jd_step),
        Err(DeError::OutOfRange { .. })
    ));
}

#[test]
fn test_continuity_across_block_boundaries() {
    let file = write_synthetic(SyntheticDe::default());
    let ephem = file.open();
    let spec = &file.spec;

    for block in 1..spec.n_blocks {
        let boundary = spec.jd_start + block as f64 * spec.jd_step;
        for series in [DeSeries::Mercury, DeSeries::Moon, DeSeries::Librations] {
            let before = ephem.position(series, boundary - 1e-6).unwrap();
            let after = ephem.position(series, boundary).unwrap();
            for i in 0..before.len() {
                assert_relative_eq!(before.position[i], after.position[i], epsilon = 1e-4);
                assert_relative_eq!(before.velocity[i], after.velocity[i], epsilon = 1e-4);
            }
        }
    }
}

#[test]
fn test_repeated_queries_are_identical() {
    let file = write_synthetic(SyntheticDe::default());
    let ephem = file.open();
    let jd = file.spec.jd_start + 77.25;

    let first = ephem.state(DeTarget::Earth, Some(DeTarget::Sun), jd).unwrap();
    ephem.position(DeSeries::Pluto, file.spec.jd_start).unwrap();
    let second = ephem.state(DeTarget::Earth, Some(DeTarget::Sun), jd).unwrap();
    assert_eq!(first, second);
    assert_eq!(ephem.cached_block_index(), Some(2));
}

#[test]
fn test_big_endian_file_with_sniffing() {
    let file = write_synthetic(SyntheticDe {
        big_endian: true,
        ..SyntheticDe::default()
    });
    let sniffed = file.open_sniffed();
    let forced = file.open();
    assert_eq!(sniffed.header(), forced.header());
    assert_eq!(sniffed.header().byte_order(), ByteOrder::Big);

    let jd = file.spec.jd_start + 12.5;
    assert_state_close(
        &sniffed.position(DeSeries::Jupiter, jd).unwrap(),
        &file.spec.expected_state(DeSeries::Jupiter.id(), jd),
    );
}

#[test]
fn test_many_constants_and_small_header_buffer() {
    let file = write_synthetic(SyntheticDe {
        n_constants: 460,
        absent_at_cursor: true,
        ..SyntheticDe::default()
    });
    let options = OpenOptions::default()
        .byte_order(ByteOrder::Little)
        .header_buffer_len(512);
    let ephem = DeEphemeris::open_with(&file.path, &options).unwrap();

    let header = ephem.header();
    assert_eq!(header.constants().len(), 460);
    assert_eq!(header.constant("EMRAT"), Some(file.spec.emrat));
    assert_eq!(header.constant("C00459"), Some(459.0 * 1.5 + 0.25));
    assert_eq!(header, file.open().header());

    let jd = file.spec.jd_start + 100.0;
    assert_state_close(
        &ephem.position(DeSeries::TtMinusTdb, jd).unwrap(),
        &file.spec.expected_state(DeSeries::TtMinusTdb.id(), jd),
    );
}

#[test]
fn test_missing_and_truncated_files() {
    let err = DeEphemeris::open("/nonexistent/dir/jpleph.440", ByteOrder::Little).unwrap_err();
    assert!(matches!(err, DeError::IoError(_)));

    let file = write_synthetic(SyntheticDe::default());
    let bytes = std::fs::read(&file.path).unwrap();
    std::fs::write(&file.path, &bytes[..1000]).unwrap();
    assert!(matches!(
        DeEphemeris::open(&file.path, ByteOrder::Little),
        Err(DeError::MalformedHeader(_))
    ));

    // header intact, last data record cut short
    let keep = bytes.len() - file.spec.block_size() / 2;
    std::fs::write(&file.path, &bytes[..keep]).unwrap();
    let ephem = DeEphemeris::open(&file.path, ByteOrder::Little).unwrap();
    assert!(ephem.position(DeSeries::Mars, file.spec.jd_start).is_ok());
    assert!(matches!(
        ephem.position(DeSeries::Mars, file.spec.jd_end() - 1.0),
        Err(DeError::IoError(_))
    ));
}

#[test]
fn test_corrupt_pointer_table_on_disk() {
    let file = write_synthetic(SyntheticDe::default());
    let clean = std::fs::read(&file.path).unwrap();

    let mut huge = clean.clone();
    file.spec.patch_pointer(&mut huge, 14, [1, 2_000_000_000, 200]);
    std::fs::write(&file.path, &huge).unwrap();
    assert!(matches!(
        DeEphemeris::open(&file.path, ByteOrder::Little),
        Err(DeError::MalformedHeader(_))
    ));

    let mut overflow = clean;
    file.spec.patch_pointer(&mut overflow, 12, [i32::MAX; 3]);
    std::fs::write(&file.path, &overflow).unwrap();
    assert!(matches!(
        DeEphemeris::open_with(&file.path, &OpenOptions::default()),
        Err(DeError::MalformedHeader(_))
    ));
}

#[test]
fn test_state_at_hifitime_epoch() {
    let file = write_synthetic(SyntheticDe::default());
    let ephem = file.open();

    // 2000-01-01 12:00 TDB is JD 2451545.0, 8.5 days after the synthetic start
    let epoch = Epoch::from_gregorian(2000, 1, 1, 12, 0, 0, 0, TimeScale::TDB);
    let state = ephem.state_at(DeTarget::Venus, None, &epoch).unwrap();
    let expected = file
        .spec
        .expected_state(DeSeries::Venus.id(), 2451545.0);
    for i in 0..3 {
        assert_relative_eq!(state.position[i], expected.0[i], max_relative = 1e-9);
    }
}

#[test]
fn test_state_in_au() {
    let file = write_synthetic(SyntheticDe::default());
    let ephem = file.open();
    let jd = file.spec.jd_start + 20.0;

    let km = ephem.state(DeTarget::Saturn, None, jd).unwrap();
    let au = ephem.state_au(DeTarget::Saturn, None, jd).unwrap();
    let (position, _) = au.as_vector3().unwrap();
    assert_relative_eq!(position.x, km.position[0] / file.spec.au, max_relative = 1e-15);

    let nutations = ephem.state_au(DeTarget::Nutations, None, jd).unwrap();
    assert_eq!(nutations, ephem.state(DeTarget::Nutations, None, jd).unwrap());
}
