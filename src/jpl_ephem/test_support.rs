//! Synthetic DE binaries for tests and benchmarks.
//!
//! Builds byte-exact files in the "Group 1050" layout. Every component of every
//! series is a quadratic in time, `f(t) = a + b t + c t²` with `t = jd - jd_start`,
//! stored as its exact Chebyshev expansion on each sub-interval. Positions and
//! velocities therefore have closed forms ([`SyntheticDe::expected_state`]) and
//! are continuous across sub-interval and block boundaries.
//!
//! This file only depends on `std` so that integration tests and benches can
//! include it with `#[path]`.
#![allow(dead_code)]

pub const COMPONENTS: [usize; 15] = [3, 3, 3, 3, 3, 3, 3, 3, 3, 3, 3, 2, 3, 3, 1];

#[derive(Debug, Clone)]
pub struct SyntheticDe {
    pub big_endian: bool,
    pub version: i32,
    pub jd_start: f64,
    pub jd_step: f64,
    pub n_blocks: usize,
    pub au: f64,
    pub emrat: f64,
    pub n_constants: usize,
    /// `(coefficients per component, sub-intervals per block)` per series.
    pub series: [Option<(usize, usize)>; 15],
    /// Write absent series as `[cursor, 0, 0]` (DE440 style) instead of zeros.
    pub absent_at_cursor: bool,
}

impl Default for SyntheticDe {
    fn default() -> Self {
        SyntheticDe {
            big_endian: false,
            version: 999,
            jd_start: 2451536.5,
            jd_step: 32.0,
            n_blocks: 4,
            au: 149597870.7,
            emrat: 81.30056,
            n_constants: 3,
            series: [
                Some((4, 2)),
                Some((3, 1)),
                Some((5, 2)),
                Some((3, 1)),
                Some((3, 1)),
                Some((3, 1)),
                Some((3, 1)),
                Some((3, 1)),
                Some((3, 1)),
                Some((6, 4)),
                Some((4, 1)),
                Some((4, 2)),
                Some((5, 16)),
                None,
                Some((3, 2)),
            ],
            absent_at_cursor: false,
        }
    }
}

impl SyntheticDe {
    pub fn jd_end(&self) -> f64 {
        self.jd_start + self.n_blocks as f64 * self.jd_step
    }

    /// Raw pointer table as written in the header (1-based start index).
    pub fn pointers(&self) -> [[i32; 3]; 15] {
        let mut pointers = [[0i32; 3]; 15];
        let mut cursor = 3usize;
        for (i, series) in self.series.iter().enumerate() {
            match series {
                Some((n_coeffs, n_subs)) => {
                    pointers[i] = [cursor as i32, *n_coeffs as i32, *n_subs as i32];
                    cursor += n_coeffs * n_subs * COMPONENTS[i];
                }
                None if self.absent_at_cursor => pointers[i] = [cursor as i32, 0, 0],
                None => {}
            }
        }
        pointers
    }

    /// Number of doubles in one record.
    pub fn record_len(&self) -> usize {
        2 + self
            .series
            .iter()
            .enumerate()
            .filter_map(|(i, s)| s.map(|(nc, ns)| nc * ns * COMPONENTS[i]))
            .sum::<usize>()
    }

    pub fn block_size(&self) -> usize {
        8 * self.record_len()
    }

    pub fn constant_name(i: usize) -> String {
        match i {
            0 => "DENUM".to_string(),
            1 => "AU".to_string(),
            2 => "EMRAT".to_string(),
            _ => format!("C{i:05}"),
        }
    }

    pub fn constant_value(&self, i: usize) -> f64 {
        match i {
            0 => self.version as f64,
            1 => self.au,
            2 => self.emrat,
            _ => i as f64 * 1.5 + 0.25,
        }
    }

    /// Coefficients `(a, b, c)` of the quadratic of one component.
    pub fn quadratic(series: usize, component: usize) -> (f64, f64, f64) {
        let s = (series + 1) as f64;
        let c = component as f64;
        let sign = if series % 2 == 0 { 1.0 } else { -1.0 };
        (
            1000.0 * s + 10.0 * c - 5000.0,
            0.5 * s + 0.1 * c,
            sign * 1e-3 * (c + 1.0),
        )
    }

    /// Exact `(position, velocity)` of a series at `jd`, velocity per day.
    pub fn expected_state(&self, series: usize, jd: f64) -> (Vec<f64>, Vec<f64>) {
        let t = jd - self.jd_start;
        (0..COMPONENTS[series])
            .map(|component| {
                let (a, b, c) = Self::quadratic(series, component);
                (a + b * t + c * t * t, b + 2.0 * c * t)
            })
            .unzip()
    }

    /// Chebyshev expansion of a component's quadratic over `[t0, t0 + len]`.
    fn chebyshev_coefficients(series: usize, component: usize, t0: f64, len: f64, n: usize) -> Vec<f64> {
        let (a, b, c) = Self::quadratic(series, component);
        let mid = t0 + len / 2.0;
        let half = len / 2.0;
        let mut coeffs = vec![0.0; n];
        coeffs[0] = a + b * mid + c * mid * mid + c * half * half / 2.0;
        coeffs[1] = b * half + 2.0 * c * mid * half;
        coeffs[2] = c * half * half / 2.0;
        coeffs
    }

    fn put_f64(&self, buf: &mut [u8], offset: usize, value: f64) {
        let bytes = if self.big_endian {
            value.to_be_bytes()
        } else {
            value.to_le_bytes()
        };
        buf[offset..offset + 8].copy_from_slice(&bytes);
    }

    fn put_i32(&self, buf: &mut [u8], offset: usize, value: i32) {
        let bytes = if self.big_endian {
            value.to_be_bytes()
        } else {
            value.to_le_bytes()
        };
        buf[offset..offset + 4].copy_from_slice(&bytes);
    }

    fn put_text(buf: &mut [u8], offset: usize, len: usize, text: &str) {
        let padded = format!("{text:<len$}");
        buf[offset..offset + len].copy_from_slice(&padded.as_bytes()[..len]);
    }

    /// Offset of the pointer triple of `series` in record 0.
    pub fn pointer_offset(&self, series: usize) -> usize {
        let trailing = 2856 + self.n_constants.saturating_sub(400) * 6;
        match series {
            0..=11 => 2696 + series * 12,
            12 => 2844,
            _ => trailing + (series - 13) * 12,
        }
    }

    /// Overwrite one `i32` of a built file, in the file's byte order.
    pub fn patch_i32(&self, bytes: &mut [u8], offset: usize, value: i32) {
        self.put_i32(bytes, offset, value);
    }

    /// Overwrite the pointer triple of `series` in a built file.
    pub fn patch_pointer(&self, bytes: &mut [u8], series: usize, pointer: [i32; 3]) {
        let offset = self.pointer_offset(series);
        for (j, value) in pointer.iter().enumerate() {
            self.put_i32(bytes, offset + j * 4, *value);
        }
    }

    /// Serialize the whole file: header record, constants record, data records.
    pub fn build(&self) -> Vec<u8> {
        let block_size = self.block_size();
        let header_len = 2856 + self.n_constants.saturating_sub(400) * 6 + 24;
        assert!(header_len <= block_size, "record too small for the header");
        assert!(self.n_constants * 8 <= block_size, "record too small for the constants");

        let mut out = vec![0u8; block_size * (2 + self.n_blocks)];

        // record 0
        Self::put_text(&mut out, 0, 84, &format!("JPL Planetary Ephemeris DE{0}/LE{0}", self.version));
        Self::put_text(&mut out, 84, 84, &format!("Start Epoch: JED= {:.1}", self.jd_start));
        Self::put_text(&mut out, 168, 84, &format!("Final Epoch: JED= {:.1}", self.jd_end()));
        for i in 0..self.n_constants.min(400) {
            Self::put_text(&mut out, 252 + i * 6, 6, &Self::constant_name(i));
        }
        self.put_f64(&mut out, 2652, self.jd_start);
        self.put_f64(&mut out, 2660, self.jd_end());
        self.put_f64(&mut out, 2668, self.jd_step);
        self.put_i32(&mut out, 2676, self.n_constants as i32);
        self.put_f64(&mut out, 2680, self.au);
        self.put_f64(&mut out, 2688, self.emrat);

        let pointers = self.pointers();
        for (i, pointer) in pointers.iter().take(12).enumerate() {
            for (j, value) in pointer.iter().enumerate() {
                self.put_i32(&mut out, 2696 + i * 12 + j * 4, *value);
            }
        }
        self.put_i32(&mut out, 2840, self.version);
        for (j, value) in pointers[12].iter().enumerate() {
            self.put_i32(&mut out, 2844 + j * 4, *value);
        }
        for i in 400..self.n_constants {
            Self::put_text(&mut out, 2856 + (i - 400) * 6, 6, &Self::constant_name(i));
        }
        let trailing = 2856 + self.n_constants.saturating_sub(400) * 6;
        for (k, pointer) in pointers[13..].iter().enumerate() {
            for (j, value) in pointer.iter().enumerate() {
                self.put_i32(&mut out, trailing + k * 12 + j * 4, *value);
            }
        }

        // record 1
        for i in 0..self.n_constants {
            self.put_f64(&mut out, block_size + i * 8, self.constant_value(i));
        }

        // data records
        for block in 0..self.n_blocks {
            let base = (block + 2) * block_size;
            let start = self.jd_start + block as f64 * self.jd_step;
            self.put_f64(&mut out, base, start);
            self.put_f64(&mut out, base + 8, start + self.jd_step);

            for (series, spec) in self.series.iter().enumerate() {
                let Some((n_coeffs, n_subs)) = *spec else {
                    continue;
                };
                let first = pointers[series][0] as usize - 1;
                let sub_len = self.jd_step / n_subs as f64;
                for sub in 0..n_subs {
                    let t0 = start - self.jd_start + sub as f64 * sub_len;
                    for component in 0..COMPONENTS[series] {
                        let coeffs =
                            Self::chebyshev_coefficients(series, component, t0, sub_len, n_coeffs);
                        let index = first
                            + sub * n_coeffs * COMPONENTS[series]
                            + component * n_coeffs;
                        for (k, value) in coeffs.iter().enumerate() {
                            self.put_f64(&mut out, base + (index + k) * 8, *value);
                        }
                    }
                }
            }
        }

        out
    }
}
