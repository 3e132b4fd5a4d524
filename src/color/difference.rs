//! Perceptual color difference
//!
//! CIEDE2000 (Sharma, Wu & Dalal 2005) and CIE76. The batch form of
//! CIEDE2000 maps the same per-pair kernel over its inputs, so scalar and
//! batch results are identical element for element.
//!
//! Hue angles live in `[0, 2π)` rather than the usual `(-π, π]`, and all
//! trigonometry is in radians; the degree constants of the formula are
//! converted where they appear.

use std::f64::consts::{PI, TAU};

use serde::{Deserialize, Serialize};

use crate::color::Lab;
use crate::{ColorError, Result};

/// 25^7, the chroma normalizer shared by G and R_C
const POW25_7: f64 = 6_103_515_625.0;

/// Parametric weighting factors (kL, kC, kH)
///
/// All 1.0 for the reference conditions; kL = 2 is common for textiles.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Weights {
    pub kl: f64,
    pub kc: f64,
    pub kh: f64,
}

impl Default for Weights {
    fn default() -> Self {
        Self {
            kl: 1.0,
            kc: 1.0,
            kh: 1.0,
        }
    }
}

/// The four weighted components of a CIEDE2000 difference
///
/// `delta_e = sqrt(lightness² + chroma² + hue² + rotation)`; the rotation
/// term enters unsquared.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ciede2000Terms {
    pub lightness: f64,
    pub chroma: f64,
    pub hue: f64,
    pub rotation: f64,
}

impl Ciede2000Terms {
    /// Combine the terms into ΔE00
    pub fn delta_e(&self) -> f64 {
        let squared = self.lightness * self.lightness
            + self.chroma * self.chroma
            + self.hue * self.hue
            + self.rotation;
        // rounding can push an exact match a hair below zero; NaN stays NaN
        if squared < 0.0 {
            0.0
        } else {
            squared.sqrt()
        }
    }
}

/// Polar form with the angle mapped into [0, 2π)
fn cart_to_polar_2pi(x: f64, y: f64) -> (f64, f64) {
    let radius = x.hypot(y);
    let mut theta = y.atan2(x);
    if theta < 0.0 {
        theta += TAU;
    }
    (radius, theta)
}

/// Compute the weighted CIEDE2000 terms for one pair of colors
pub fn ciede2000_terms(lab1: Lab, lab2: Lab, weights: Weights) -> Ciede2000Terms {
    // distort `a` by the mean raw chroma; everything after works in the
    // primed coordinates
    let c_bar = 0.5 * (lab1.a.hypot(lab1.b) + lab2.a.hypot(lab2.b));
    let c7 = c_bar.powi(7);
    let g = 0.5 * (1.0 - (c7 / (c7 + POW25_7)).sqrt());
    let scale = 1.0 + g;
    let (c1, h1) = cart_to_polar_2pi(lab1.a * scale, lab1.b);
    let (c2, h2) = cart_to_polar_2pi(lab2.a * scale, lab2.b);

    let l_bar = 0.5 * (lab1.l + lab2.l);
    let l_offset = (l_bar - 50.0).powi(2);
    let sl = 1.0 + 0.015 * l_offset / (20.0 + l_offset).sqrt();
    let lightness = (lab2.l - lab1.l) / (weights.kl * sl);

    let c_bar = 0.5 * (c1 + c2);
    let sc = 1.0 + 0.045 * c_bar;
    let chroma = (c2 - c1) / (weights.kc * sc);

    let h_diff = h2 - h1;
    let h_sum = h1 + h2;
    let chroma_product = c1 * c2;

    // hue is undefined without chroma
    let dh = if chroma_product == 0.0 {
        0.0
    } else if h_diff > PI {
        h_diff - TAU
    } else if h_diff < -PI {
        h_diff + TAU
    } else {
        h_diff
    };
    let dh_term = 2.0 * chroma_product.sqrt() * (dh / 2.0).sin();

    let mut h_bar = h_sum;
    if chroma_product != 0.0 && h_diff.abs() > PI {
        if h_sum < TAU {
            h_bar += TAU;
        } else {
            h_bar -= TAU;
        }
    }
    if chroma_product == 0.0 {
        h_bar *= 2.0;
    }
    h_bar *= 0.5;

    let t = 1.0 - 0.17 * (h_bar - 30f64.to_radians()).cos()
        + 0.24 * (2.0 * h_bar).cos()
        + 0.32 * (3.0 * h_bar + 6f64.to_radians()).cos()
        - 0.20 * (4.0 * h_bar - 63f64.to_radians()).cos();
    let sh = 1.0 + 0.015 * c_bar * t;
    let hue = dh_term / (weights.kh * sh);

    let c7 = c_bar.powi(7);
    let rc = 2.0 * (c7 / (c7 + POW25_7)).sqrt();
    let d_theta = 30f64.to_radians() * (-((h_bar.to_degrees() - 275.0) / 25.0).powi(2)).exp();
    let rotation = -(2.0 * d_theta).sin() * rc * chroma * hue;

    Ciede2000Terms {
        lightness,
        chroma,
        hue,
        rotation,
    }
}

/// CIEDE2000 difference with reference weights (kL = kC = kH = 1)
pub fn delta_e_2000(lab1: Lab, lab2: Lab) -> f64 {
    delta_e_2000_weighted(lab1, lab2, Weights::default())
}

/// CIEDE2000 difference with custom weights
pub fn delta_e_2000_weighted(lab1: Lab, lab2: Lab, weights: Weights) -> f64 {
    ciede2000_terms(lab1, lab2, weights).delta_e()
}

/// CIEDE2000 over parallel arrays of colors
///
/// # Errors
///
/// Returns `ShapeMismatch` when the slices differ in length.
pub fn delta_e_2000_batch(lab1: &[Lab], lab2: &[Lab], weights: Weights) -> Result<Vec<f64>> {
    if lab1.len() != lab2.len() {
        return Err(ColorError::ShapeMismatch {
            left: lab1.len(),
            right: lab2.len(),
        });
    }

    Ok(lab1
        .iter()
        .zip(lab2)
        .map(|(a, b)| delta_e_2000_weighted(*a, *b, weights))
        .collect())
}

/// CIE76 difference: Euclidean distance in Lab
pub fn delta_e_76(lab1: Lab, lab2: Lab) -> f64 {
    let dl = lab2.l - lab1.l;
    let da = lab2.a - lab1.a;
    let db = lab2.b - lab1.b;
    (dl * dl + da * da + db * db).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;
    use palette::color_difference::Ciede2000;
    use rand::{rngs::StdRng, Rng, SeedableRng};

    /// Sharma, Wu & Dalal test data: (L1, a1, b1, L2, a2, b2, ΔE00)
    const SHARMA_PAIRS: [(f64, f64, f64, f64, f64, f64, f64); 34] = [
        (50.0, 2.6772, -79.7751, 50.0, 0.0, -82.7485, 2.0425),
        (50.0, 3.1571, -77.2803, 50.0, 0.0, -82.7485, 2.8615),
        (50.0, 2.8361, -74.0200, 50.0, 0.0, -82.7485, 3.4412),
        (50.0, -1.3802, -84.2814, 50.0, 0.0, -82.7485, 1.0000),
        (50.0, -1.1848, -84.8006, 50.0, 0.0, -82.7485, 1.0000),
        (50.0, -0.9009, -85.5211, 50.0, 0.0, -82.7485, 1.0000),
        (50.0, 0.0, 0.0, 50.0, -1.0, 2.0, 2.3669),
        (50.0, -1.0, 2.0, 50.0, 0.0, 0.0, 2.3669),
        (50.0, 2.4900, -0.0010, 50.0, -2.4900, 0.0009, 7.1792),
        (50.0, 2.4900, -0.0010, 50.0, -2.4900, 0.0010, 7.1792),
        (50.0, 2.4900, -0.0010, 50.0, -2.4900, 0.0011, 7.2195),
        (50.0, 2.4900, -0.0010, 50.0, -2.4900, 0.0012, 7.2195),
        (50.0, -0.0010, 2.4900, 50.0, 0.0009, -2.4900, 4.8045),
        (50.0, -0.0010, 2.4900, 50.0, 0.0010, -2.4900, 4.8045),
        (50.0, -0.0010, 2.4900, 50.0, 0.0011, -2.4900, 4.7461),
        (50.0, 2.5, 0.0, 50.0, 0.0, -2.5, 4.3065),
        (50.0, 2.5, 0.0, 73.0, 25.0, -18.0, 27.1492),
        (50.0, 2.5, 0.0, 61.0, -5.0, 29.0, 22.8977),
        (50.0, 2.5, 0.0, 56.0, -27.0, -3.0, 31.9030),
        (50.0, 2.5, 0.0, 58.0, 24.0, 15.0, 19.4535),
        (50.0, 2.5, 0.0, 50.0, 3.1736, 0.5854, 1.0000),
        (50.0, 2.5, 0.0, 50.0, 3.2972, 0.0, 1.0000),
        (50.0, 2.5, 0.0, 50.0, 1.8634, 0.5757, 1.0000),
        (50.0, 2.5, 0.0, 50.0, 3.2592, 0.3350, 1.0000),
        (60.2574, -34.0099, 36.2677, 60.4626, -34.1751, 39.4387, 1.2644),
        (63.0109, -31.0961, -5.8663, 62.8187, -29.7946, -4.0864, 1.2630),
        (61.2901, 3.7196, -5.3901, 61.4292, 2.2480, -4.9620, 1.8731),
        (35.0831, -44.1164, 3.7933, 35.0232, -40.0716, 1.5901, 1.8645),
        (22.7233, 20.0904, -46.6940, 23.0331, 14.9730, -42.5619, 2.0373),
        (36.4612, 47.8580, 18.3852, 36.2715, 50.5065, 21.2231, 1.4146),
        (90.8027, -2.0831, 1.4410, 91.1528, -1.6435, 0.0447, 1.4441),
        (90.9257, -0.5406, -0.9208, 88.6381, -0.8985, -0.7239, 1.5381),
        (6.7747, -0.2908, -2.4247, 5.8714, -0.0985, -2.2286, 0.6377),
        (2.0776, 0.0795, -1.1350, 0.9033, -0.0636, -0.5514, 0.9082),
    ];

    fn random_lab(rng: &mut StdRng) -> Lab {
        Lab::new(
            rng.gen_range(0.0..100.0),
            rng.gen_range(-128.0..127.0),
            rng.gen_range(-128.0..127.0),
        )
    }

    #[test]
    fn test_sharma_reference_pairs() {
        for (i, &(l1, a1, b1, l2, a2, b2, expected)) in SHARMA_PAIRS.iter().enumerate() {
            let result = delta_e_2000(Lab::new(l1, a1, b1), Lab::new(l2, a2, b2));
            assert!(
                (result - expected).abs() < 1e-3,
                "pair {}: expected {expected:.4}, got {result:.4}",
                i + 1
            );
        }
    }

    #[test]
    fn test_known_value() {
        let de = delta_e_2000(Lab::new(50.0, 2.6772, -79.7751), Lab::new(50.0, 0.0, -82.7485));
        assert!((de - 2.0425).abs() < 1e-3);
    }

    #[test]
    fn test_symmetry() {
        let mut rng = StdRng::seed_from_u64(2000);
        for _ in 0..500 {
            let a = random_lab(&mut rng);
            let b = random_lab(&mut rng);
            assert!((delta_e_2000(a, b) - delta_e_2000(b, a)).abs() < 1e-9);
        }
        for &(l1, a1, b1, l2, a2, b2, _) in &SHARMA_PAIRS {
            let a = Lab::new(l1, a1, b1);
            let b = Lab::new(l2, a2, b2);
            assert!((delta_e_2000(a, b) - delta_e_2000(b, a)).abs() < 1e-9);
        }
    }

    #[test]
    fn test_identity() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..200 {
            let a = random_lab(&mut rng);
            assert_eq!(delta_e_2000(a, a), 0.0);
        }
        assert_eq!(delta_e_2000(Lab::new(0.0, 0.0, 0.0), Lab::new(0.0, 0.0, 0.0)), 0.0);
    }

    #[test]
    fn test_zero_chroma_has_no_hue_term() {
        let gray = Lab::new(50.0, 0.0, 0.0);
        for step in 0..36 {
            let angle = (step as f64 * 10.0).to_radians();
            let colored = Lab::new(55.0, 20.0 * angle.cos(), 20.0 * angle.sin());

            let terms = ciede2000_terms(gray, colored, Weights::default());
            assert_eq!(terms.hue, 0.0, "hue term at {} degrees", step * 10);
            assert_eq!(terms.rotation, 0.0);

            let reversed = ciede2000_terms(colored, gray, Weights::default());
            assert_eq!(reversed.hue, 0.0);
        }
    }

    #[test]
    fn test_batch_matches_scalar() {
        let mut rng = StdRng::seed_from_u64(42);
        let left: Vec<Lab> = (0..64).map(|_| random_lab(&mut rng)).collect();
        let right: Vec<Lab> = (0..64).map(|_| random_lab(&mut rng)).collect();
        let weights = Weights {
            kl: 2.0,
            kc: 1.0,
            kh: 1.0,
        };

        let batch = delta_e_2000_batch(&left, &right, weights).unwrap();
        assert_eq!(batch.len(), 64);
        for (i, value) in batch.iter().enumerate() {
            assert_eq!(*value, delta_e_2000_weighted(left[i], right[i], weights));
        }
    }

    #[test]
    fn test_batch_shape_mismatch() {
        let left = [Lab::new(50.0, 0.0, 0.0); 3];
        let right = [Lab::new(50.0, 0.0, 0.0); 2];
        match delta_e_2000_batch(&left, &right, Weights::default()) {
            Err(ColorError::ShapeMismatch { left, right }) => {
                assert_eq!((left, right), (3, 2));
            }
            other => panic!("expected ShapeMismatch, got {other:?}"),
        }
    }

    #[test]
    fn test_lightness_weight_scales_lightness_term() {
        let a = Lab::new(40.0, 0.0, 0.0);
        let b = Lab::new(60.0, 0.0, 0.0);
        let reference = delta_e_2000(a, b);
        let relaxed = delta_e_2000_weighted(
            a,
            b,
            Weights {
                kl: 2.0,
                ..Weights::default()
            },
        );
        assert!((relaxed - reference / 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_agrees_with_palette_ciede2000() {
        let mut rng = StdRng::seed_from_u64(99);
        for _ in 0..200 {
            let a = random_lab(&mut rng);
            let b = random_lab(&mut rng);
            let ours = delta_e_2000(a, b);
            let reference = a.difference(b);
            assert!(
                (ours - reference).abs() < 1e-3,
                "{a:?} vs {b:?}: ours {ours}, palette {reference}"
            );
        }
    }

    #[test]
    fn test_nan_component_is_not_a_match() {
        let gray = Lab::new(50.0, 0.0, 0.0);
        let broken = Lab::new(f64::NAN, 0.0, 0.0);
        assert!(delta_e_2000(broken, gray).is_nan());
        assert!(delta_e_2000(gray, broken).is_nan());
    }

    #[test]
    fn test_delta_e_76() {
        let a = Lab::new(50.0, 0.0, 0.0);
        let b = Lab::new(60.0, 10.0, 10.0);
        assert!((delta_e_76(a, b) - 300f64.sqrt()).abs() < 1e-12);
        assert_eq!(delta_e_76(a, a), 0.0);
    }
}
