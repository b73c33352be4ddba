//! Bodies derived from the stored series.
//!
//! DE files do not store the Earth: they store the Earth-Moon barycenter (EMB,
//! relative to the solar system barycenter) and the geocentric Moon. With
//! `μ = EMRAT` the Earth/Moon mass ratio:
//!
//! ```text
//! earth      = emb - moon_geo / (1 + μ)
//! moon_ssb   = moon_geo + earth
//! ssb        = 0
//! ```
//!
//! A body relative to a center is `target - center`, both taken relative to the
//! solar system barycenter.
use crate::de_errors::DeError;

use super::{
    de_ephemeris::DeEphemeris,
    de_ids::{DeSeries, DeTarget},
    series_state::SeriesState,
};

/// Earth state from the Earth-Moon barycenter and the geocentric Moon.
///
/// Arguments
/// -----------------
/// * `emb`: barycentric Earth-Moon barycenter.
/// * `moon`: geocentric Moon.
/// * `earth_moon_mass_ratio`: Earth mass over Moon mass (`EMRAT`).
pub fn earth_from_emb(
    emb: &SeriesState,
    moon: &SeriesState,
    earth_moon_mass_ratio: f64,
) -> SeriesState {
    emb - &(moon / (1.0 + earth_moon_mass_ratio))
}

/// Barycentric Moon from the geocentric Moon and the barycentric Earth.
pub fn moon_ssb_from_geocentric(moon: &SeriesState, earth: &SeriesState) -> SeriesState {
    moon + earth
}

/// Barycentric Earth and geocentric Moon at `jd`.
fn earth_and_moon(ephem: &DeEphemeris, jd: f64) -> Result<(SeriesState, SeriesState), DeError> {
    let emb = ephem.position(DeSeries::EarthMoonBarycenter, jd)?;
    let moon = ephem.position(DeSeries::Moon, jd)?;
    let earth = earth_from_emb(&emb, &moon, ephem.header().earth_moon_mass_ratio());
    Ok((earth, moon))
}

/// State of a target in its own frame.
///
/// Bodies are relative to the solar system barycenter (the Moon included); the
/// other series are returned as stored.
pub fn target_state(ephem: &DeEphemeris, target: DeTarget, jd: f64) -> Result<SeriesState, DeError> {
    if let Some(series) = target.direct_series() {
        return ephem.position(series, jd);
    }

    match target {
        DeTarget::Earth => earth_and_moon(ephem, jd).map(|(earth, _)| earth),
        DeTarget::Moon => {
            let (earth, moon) = earth_and_moon(ephem, jd)?;
            Ok(moon_ssb_from_geocentric(&moon, &earth))
        }
        _ => {
            // solar system barycenter, still bounded by the file's date range
            let header = ephem.header();
            if !(jd >= header.jd_start() && jd < header.jd_end()) {
                return Err(DeError::OutOfRange {
                    jd,
                    start: header.jd_start(),
                    end: header.jd_end(),
                });
            }
            Ok(SeriesState::zeros(3))
        }
    }
}

/// State of `target` relative to `center`.
///
/// Arguments
/// -----------------
/// * `target`: body or series to evaluate.
/// * `center`: reference body, `None` for the target's own frame.
/// * `jd`: Julian Date (TDB).
///
/// Return
/// ----------
/// * `target - center`, or [`DeError::InvalidTargetCode`] when a center is given
///   for a non-positional series (or is itself non-positional).
pub fn relative_state(
    ephem: &DeEphemeris,
    target: DeTarget,
    center: Option<DeTarget>,
    jd: f64,
) -> Result<SeriesState, DeError> {
    let state = target_state(ephem, target, jd)?;

    let Some(center) = center else {
        return Ok(state);
    };
    if !(target.is_positional() && center.is_positional()) {
        return Err(DeError::InvalidTargetCode(i32::from(center)));
    }

    Ok(&state - &target_state(ephem, center, jd)?)
}
