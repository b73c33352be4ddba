use hifitime::Epoch;

use crate::constants::JulianDate;

/// First Julian day number of the Gregorian calendar (1582-10-15).
const GREGORIAN_START_JDN: f64 = 2_299_161.0;

/// Calendar date with a fractional day.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CalendarDate {
    pub year: i32,
    pub month: u32,
    /// Day of month, with the fraction of the day (0h = .0).
    pub day: f64,
}

/// Transformation from julian date (JD) to a calendar date
///
/// Dates before 1582-10-15 are expressed in the Julian calendar, later dates in the
/// Gregorian calendar, as in the JPL `testpo` files. Years are astronomical
/// (1 BC is year 0).
///
/// Argument
/// --------
/// * `jd`: a julian date, `jd >= 0`
///
/// Return
/// ------
/// * the calendar date (Meeus, Astronomical Algorithms, ch. 7)
pub fn jd_to_calendar(jd: JulianDate) -> CalendarDate {
    let shifted = jd + 0.5;
    let z = shifted.trunc();
    let f = shifted - z;

    let a = if z >= GREGORIAN_START_JDN {
        let alpha = ((z - 1_867_216.25) / 36_524.25).floor();
        z + 1.0 + alpha - (alpha / 4.0).floor()
    } else {
        z
    };

    let b = a + 1524.0;
    let c = ((b - 122.1) / 365.25).floor();
    let d = (365.25 * c).floor();
    let e = ((b - d) / 30.6001).floor();

    let day = b - d - (30.6001 * e).floor() + f;
    let month = (if e > 13.0 { e - 13.0 } else { e - 1.0 }) as u32;
    let year = (if month < 3 { c - 4715.0 } else { c - 4716.0 }) as i32;

    CalendarDate { year, month, day }
}

/// Julian date (TDB) of an epoch, whatever its time scale.
pub fn epoch_to_jd_tdb(epoch: &Epoch) -> JulianDate {
    epoch.to_jde_tdb_days()
}
