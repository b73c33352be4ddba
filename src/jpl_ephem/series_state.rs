//! Evaluated state of a DE series.
//!
//! Units
//! -----------------
//! Units follow the series: km and km/day for bodies, radians and rad/day for
//! nutations and librations, rad/day and rad/day² for the lunar mantle angular
//! velocity, seconds and s/day for TT-TDB.
//!
//! Arithmetic semantics
//! -----------------
//! Addition and subtraction are component-wise and require both operands to have the
//! same number of components; they are used to combine body states
//! (see [`body_compositor`](super::body_compositor)).
use std::ops::{Add, Div, Mul, Sub};

use nalgebra::Vector3;
use smallvec::SmallVec;

/// Component storage: one to three values, always inline.
pub type Components = SmallVec<[f64; 3]>;

/// Position and velocity of one series at one epoch.
///
/// Fields
/// -----------------
/// * `position`: one value per component of the series.
/// * `velocity`: time derivative of each component, per day.
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesState {
    pub position: Components,
    pub velocity: Components,
}

impl SeriesState {
    pub fn new(position: Components, velocity: Components) -> Self {
        debug_assert_eq!(position.len(), velocity.len());
        SeriesState { position, velocity }
    }

    /// State with `n` components, all zero (e.g. the solar system barycenter).
    pub fn zeros(n: usize) -> Self {
        SeriesState {
            position: SmallVec::from_elem(0.0, n),
            velocity: SmallVec::from_elem(0.0, n),
        }
    }

    pub fn len(&self) -> usize {
        self.position.len()
    }

    pub fn is_empty(&self) -> bool {
        self.position.is_empty()
    }

    /// Value `i` of the concatenated `position ‖ velocity` vector.
    ///
    /// This is the indexing used by the conformance files: for a body, `0..3`
    /// are x, y, z and `3..6` are vx, vy, vz.
    pub fn component(&self, i: usize) -> Option<f64> {
        self.position
            .get(i)
            .or_else(|| self.velocity.get(i.checked_sub(self.position.len())?))
            .copied()
    }

    /// Convert km and km/day to AU and AU/day.
    ///
    /// Arguments
    /// -----------------
    /// * `au_km`: length of the astronomical unit in km, preferably the one
    ///   stored in the file header ([`DeHeader::au_km`](super::de_header::DeHeader::au_km)).
    #[must_use = "`.to_au()` returns a new SeriesState; assign or use it"]
    pub fn to_au(&self, au_km: f64) -> Self {
        self / au_km
    }

    /// Position and velocity as `nalgebra` vectors, `None` unless the series has
    /// exactly three components.
    pub fn as_vector3(&self) -> Option<(Vector3<f64>, Vector3<f64>)> {
        match (self.position.as_slice(), self.velocity.as_slice()) {
            ([x, y, z], [vx, vy, vz]) => {
                Some((Vector3::new(*x, *y, *z), Vector3::new(*vx, *vy, *vz)))
            }
            _ => None,
        }
    }
}

fn zip_with(a: &[f64], b: &[f64], op: impl Fn(f64, f64) -> f64) -> Components {
    debug_assert_eq!(a.len(), b.len());
    a.iter().zip(b.iter()).map(|(x, y)| op(*x, *y)).collect()
}

fn scale(a: &[f64], op: impl Fn(f64) -> f64) -> Components {
    a.iter().map(|x| op(*x)).collect()
}

impl Add for &SeriesState {
    type Output = SeriesState;

    fn add(self, other: Self) -> Self::Output {
        SeriesState {
            position: zip_with(&self.position, &other.position, |a, b| a + b),
            velocity: zip_with(&self.velocity, &other.velocity, |a, b| a + b),
        }
    }
}

impl Add for SeriesState {
    type Output = SeriesState;

    fn add(self, other: Self) -> Self::Output {
        &self + &other
    }
}

impl Sub for &SeriesState {
    type Output = SeriesState;

    fn sub(self, other: Self) -> Self::Output {
        SeriesState {
            position: zip_with(&self.position, &other.position, |a, b| a - b),
            velocity: zip_with(&self.velocity, &other.velocity, |a, b| a - b),
        }
    }
}

impl Sub for SeriesState {
    type Output = SeriesState;

    fn sub(self, other: Self) -> Self::Output {
        &self - &other
    }
}

impl Mul<f64> for &SeriesState {
    type Output = SeriesState;

    fn mul(self, rhs: f64) -> Self::Output {
        SeriesState {
            position: scale(&self.position, |v| v * rhs),
            velocity: scale(&self.velocity, |v| v * rhs),
        }
    }
}

impl Mul<f64> for SeriesState {
    type Output = SeriesState;

    fn mul(self, rhs: f64) -> Self::Output {
        &self * rhs
    }
}

impl Div<f64> for &SeriesState {
    type Output = SeriesState;

    fn div(self, rhs: f64) -> Self::Output {
        SeriesState {
            position: scale(&self.position, |v| v / rhs),
            velocity: scale(&self.velocity, |v| v / rhs),
        }
    }
}

impl Div<f64> for SeriesState {
    type Output = SeriesState;

    fn div(self, rhs: f64) -> Self::Output {
        &self / rhs
    }
}
