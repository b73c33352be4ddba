/// Coefficient series stored in a JPL DE binary file.
///
/// DE files index their Chebyshev series by an integer id (`0..=14`). This enum
/// gives those raw ids a physical meaning.
///
/// | id | series | components | units | center |
/// |----|--------|-----------:|-------|--------|
/// | 0  | Mercury | x,y,z | km | SSB |
/// | 1  | Venus | x,y,z | km | SSB |
/// | 2  | Earth-Moon barycenter | x,y,z | km | SSB |
/// | 3  | Mars | x,y,z | km | SSB |
/// | 4  | Jupiter | x,y,z | km | SSB |
/// | 5  | Saturn | x,y,z | km | SSB |
/// | 6  | Uranus | x,y,z | km | SSB |
/// | 7  | Neptune | x,y,z | km | SSB |
/// | 8  | Pluto | x,y,z | km | SSB |
/// | 9  | Moon | x,y,z | km | Earth |
/// | 10 | Sun | x,y,z | km | SSB |
/// | 11 | Nutations | dPsi,dEps | rad | |
/// | 12 | Lunar mantle libration | phi,theta,psi | rad | |
/// | 13 | Lunar mantle angular velocity | Ox,Oy,Oz | rad/day | |
/// | 14 | TT-TDB | t | s | geocenter |
///
/// Conversions
/// -----------
/// * [`TryFrom<u8>`] converts a raw file id, rejecting anything above 14.
/// * [`From<DeSeries>`] for `u8` / `usize` recovers the raw id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeSeries {
    Mercury = 0,
    Venus = 1,
    EarthMoonBarycenter = 2,
    Mars = 3,
    Jupiter = 4,
    Saturn = 5,
    Uranus = 6,
    Neptune = 7,
    Pluto = 8,
    Moon = 9,
    Sun = 10,
    Nutations = 11,
    Librations = 12,
    LunarMantleOmega = 13,
    TtMinusTdb = 14,
}

impl DeSeries {
    /// Every series, ordered by file id.
    pub const ALL: [DeSeries; 15] = [
        DeSeries::Mercury,
        DeSeries::Venus,
        DeSeries::EarthMoonBarycenter,
        DeSeries::Mars,
        DeSeries::Jupiter,
        DeSeries::Saturn,
        DeSeries::Uranus,
        DeSeries::Neptune,
        DeSeries::Pluto,
        DeSeries::Moon,
        DeSeries::Sun,
        DeSeries::Nutations,
        DeSeries::Librations,
        DeSeries::LunarMantleOmega,
        DeSeries::TtMinusTdb,
    ];

    /// Number of physical components carried by the series.
    pub fn component_count(self) -> usize {
        component_count(self as usize)
    }

    /// Raw file id of the series.
    pub fn id(self) -> usize {
        self as usize
    }
}

/// Component count of each file series, indexed by series id.
///
/// Unknown ids have no components.
pub(crate) fn component_count(index: usize) -> usize {
    match index {
        0..=10 => 3, // planets, Moon and Sun
        11 => 2,     // nutations
        12 | 13 => 3,
        14 => 1, // TT-TDB
        _ => 0,
    }
}

impl TryFrom<u8> for DeSeries {
    type Error = crate::de_errors::DeError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        DeSeries::ALL
            .get(value as usize)
            .copied()
            .ok_or(crate::de_errors::DeError::InvalidSeriesId(value))
    }
}

impl From<DeSeries> for u8 {
    fn from(id: DeSeries) -> Self {
        id as u8
    }
}

impl From<DeSeries> for usize {
    fn from(id: DeSeries) -> Self {
        id as usize
    }
}

/// Target and center bodies as numbered by the JPL `testpo` conformance files.
///
/// Unlike [`DeSeries`], these include bodies that are not stored directly in the
/// file (the Earth, the barycentric Moon, the solar system barycenter) and are
/// derived by the [`body_compositor`](crate::jpl_ephem::body_compositor).
///
/// Code `0` ("no center") is not a variant; it is handled by the conformance
/// runner as the zero state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeTarget {
    Mercury = 1,
    Venus = 2,
    Earth = 3,
    Mars = 4,
    Jupiter = 5,
    Saturn = 6,
    Uranus = 7,
    Neptune = 8,
    Pluto = 9,
    Moon = 10,
    Sun = 11,
    SolarSystemBarycenter = 12,
    EarthMoonBarycenter = 13,
    Nutations = 14,
    Librations = 15,
    LunarMantleOmega = 16,
    TtMinusTdb = 17,
}

impl DeTarget {
    /// Series read directly from the file for this target, `None` for derived targets.
    pub fn direct_series(self) -> Option<DeSeries> {
        match self {
            DeTarget::Mercury => Some(DeSeries::Mercury),
            DeTarget::Venus => Some(DeSeries::Venus),
            DeTarget::Mars => Some(DeSeries::Mars),
            DeTarget::Jupiter => Some(DeSeries::Jupiter),
            DeTarget::Saturn => Some(DeSeries::Saturn),
            DeTarget::Uranus => Some(DeSeries::Uranus),
            DeTarget::Neptune => Some(DeSeries::Neptune),
            DeTarget::Pluto => Some(DeSeries::Pluto),
            DeTarget::Sun => Some(DeSeries::Sun),
            DeTarget::EarthMoonBarycenter => Some(DeSeries::EarthMoonBarycenter),
            DeTarget::Nutations => Some(DeSeries::Nutations),
            DeTarget::Librations => Some(DeSeries::Librations),
            DeTarget::LunarMantleOmega => Some(DeSeries::LunarMantleOmega),
            DeTarget::TtMinusTdb => Some(DeSeries::TtMinusTdb),
            DeTarget::Earth | DeTarget::Moon | DeTarget::SolarSystemBarycenter => None,
        }
    }

    /// Whether the target is a position in km, i.e. meaningful to express in AU.
    ///
    /// Nutations, librations, lunar mantle rates and TT-TDB are angles, angular
    /// rates and seconds.
    pub fn is_positional(self) -> bool {
        !matches!(
            self,
            DeTarget::Nutations
                | DeTarget::Librations
                | DeTarget::LunarMantleOmega
                | DeTarget::TtMinusTdb
        )
    }

    /// Number of components of the target's state.
    pub fn component_count(self) -> usize {
        match self.direct_series() {
            Some(series) => series.component_count(),
            None => 3,
        }
    }
}

impl TryFrom<i32> for DeTarget {
    type Error = crate::de_errors::DeError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(DeTarget::Mercury),
            2 => Ok(DeTarget::Venus),
            3 => Ok(DeTarget::Earth),
            4 => Ok(DeTarget::Mars),
            5 => Ok(DeTarget::Jupiter),
            6 => Ok(DeTarget::Saturn),
            7 => Ok(DeTarget::Uranus),
            8 => Ok(DeTarget::Neptune),
            9 => Ok(DeTarget::Pluto),
            10 => Ok(DeTarget::Moon),
            11 => Ok(DeTarget::Sun),
            12 => Ok(DeTarget::SolarSystemBarycenter),
            13 => Ok(DeTarget::EarthMoonBarycenter),
            14 => Ok(DeTarget::Nutations),
            15 => Ok(DeTarget::Librations),
            16 => Ok(DeTarget::LunarMantleOmega),
            17 => Ok(DeTarget::TtMinusTdb),
            _ => Err(crate::de_errors::DeError::InvalidTargetCode(value)),
        }
    }
}

impl From<DeTarget> for i32 {
    fn from(target: DeTarget) -> Self {
        target as i32
    }
}
