/// `size x size` table of spatial weights, stored column-major by kernel
/// offset: `get(kx, ky)` addresses horizontal offset `kx`, vertical `ky`.
///
/// `w(kx, ky) = exp(-0.5 * sqrt((kx - c)^2 + (ky - c)^2 / factor)^power)`
/// with `c = size / 2`. The factor only divides the vertical term.
#[derive(Clone, Debug, PartialEq)]
pub struct SpatialWeights {
    size: usize,
    values: Vec<f64>,
}

impl SpatialWeights {
    pub fn new(size: usize, factor: f64, power: f64) -> Self {
        let c = (size / 2) as f64;
        let mut values = Vec::with_capacity(size * size);
        for kx in 0..size {
            let dx = kx as f64 - c;
            for ky in 0..size {
                let dy = ky as f64 - c;
                let dist = (dx * dx + dy * dy / factor).sqrt();
                values.push((-0.5 * dist.powf(power)).exp());
            }
        }
        Self { size, values }
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    #[inline]
    pub fn get(&self, kx: usize, ky: usize) -> f64 {
        self.values[kx * self.size + ky]
    }
}

const LEVELS: usize = 256;

/// Weights for every pair of byte values:
/// `w(a, b) = exp(-0.5 * (|a - b| / factor)^power)`.
#[derive(Clone, Debug, PartialEq)]
pub struct RangeWeights {
    values: Box<[f64]>,
}

impl RangeWeights {
    pub fn new(factor: f64, power: f64) -> Self {
        let mut values = vec![0.0; LEVELS * LEVELS].into_boxed_slice();
        for a in 0..LEVELS {
            for b in 0..LEVELS {
                let diff = (a as f64 - b as f64).abs();
                values[a * LEVELS + b] = (-0.5 * (diff / factor).powf(power)).exp();
            }
        }
        Self { values }
    }

    #[inline]
    pub fn get(&self, a: u8, b: u8) -> f64 {
        self.values[a as usize * LEVELS + b as usize]
    }
}

#[cfg(test)]
mod tests {
    use super::{RangeWeights, SpatialWeights};

    #[test]
    fn spatial_centre_is_one_and_decays() {
        let s = SpatialWeights::new(5, 10.0, 2.0);
        assert_eq!(s.get(2, 2), 1.0);
        assert!(s.get(3, 2) < 1.0);
        assert!(s.get(4, 2) < s.get(3, 2));
        assert!((s.get(3, 2) - (-0.5f64).exp()).abs() < 1e-12);
        // vertical distance is damped by the factor
        assert!((s.get(2, 3) - (-0.05f64).exp()).abs() < 1e-12);
        assert_eq!(s.get(0, 1), s.get(4, 3));
    }

    #[test]
    fn range_is_symmetric_and_peaks_on_diagonal() {
        let r = RangeWeights::new(50.0, 2.0);
        assert_eq!(r.get(17, 17), 1.0);
        assert_eq!(r.get(10, 200), r.get(200, 10));
        assert!((r.get(0, 50) - (-0.5f64).exp()).abs() < 1e-12);
        assert!(r.get(0, 255) < r.get(0, 100));
    }
}
