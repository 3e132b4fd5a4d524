//! Color space conversion between sRGB, CIE XYZ and CIE Lab
//!
//! All functions are pure and total. RGB values use the 0–255 scale and
//! XYZ the 0–100 scale (Yn = 100). Nothing here clamps: out-of-gamut
//! input produces out-of-range output, and callers that need displayable
//! bytes go through [`to_rgb8`].
//!
//! The forward and inverse sRGB gamma curves branch at different points
//! (0.04045 on encoded values, 0.0031308 on linear values). Both are kept
//! exactly as published.

use palette::white_point::D65;

use crate::constants::{cie, srgb, D65_WHITE_POINT_XYZ};
use crate::{ColorError, Result};

/// CIE L*a*b* under D65, double precision
pub type Lab = palette::Lab<D65, f64>;

/// CIE XYZ under D65, double precision, on the 0–100 scale
pub type Xyz = palette::Xyz<D65, f64>;

/// Check that a color value has exactly three components
///
/// This is the single validation point for slice input; every typed
/// conversion below takes fixed-size arrays. Out-of-gamut values pass,
/// NaN and infinities do not.
pub fn triple(values: &[f64]) -> Result<[f64; 3]> {
    match values {
        &[a, b, c] => finite([a, b, c]),
        _ => Err(ColorError::InvalidDimension {
            expected: 3,
            actual: values.len(),
        }),
    }
}

/// Reject triples holding NaN or infinite components
pub fn finite(values: [f64; 3]) -> Result<[f64; 3]> {
    match values.iter().find(|v| !v.is_finite()) {
        Some(bad) => Err(ColorError::InvalidParameter {
            parameter: "color".to_string(),
            value: format!("{values:?} (component {bad})"),
        }),
        None => Ok(values),
    }
}

/// Build a Lab color from a three component slice
pub fn lab_from_slice(values: &[f64]) -> Result<Lab> {
    let [l, a, b] = triple(values)?;
    Ok(Lab::new(l, a, b))
}

/// Lab components as a plain array
pub fn lab_components(lab: Lab) -> [f64; 3] {
    [lab.l, lab.a, lab.b]
}

fn mul(matrix: &[[f64; 3]; 3], v: [f64; 3]) -> [f64; 3] {
    let row = |r: &[f64; 3]| r[0] * v[0] + r[1] * v[1] + r[2] * v[2];
    [row(&matrix[0]), row(&matrix[1]), row(&matrix[2])]
}

fn decode_gamma(v: f64) -> f64 {
    if v > srgb::DECODE_THRESHOLD {
        ((v + 0.055) / 1.055).powf(srgb::GAMMA)
    } else {
        v / 12.92
    }
}

fn encode_gamma(v: f64) -> f64 {
    if v > srgb::ENCODE_THRESHOLD {
        1.055 * v.powf(1.0 / srgb::GAMMA) - 0.055
    } else {
        v * 12.92
    }
}

fn lab_f(t: f64) -> f64 {
    if t > cie::EPSILON {
        t.cbrt()
    } else {
        cie::KAPPA_SLOPE * t + cie::OFFSET
    }
}

fn lab_f_inverse(f: f64) -> f64 {
    let cubed = f * f * f;
    if cubed > cie::EPSILON {
        cubed
    } else {
        (f - cie::OFFSET) / cie::KAPPA_SLOPE
    }
}

/// Convert sRGB (0–255 per channel) to XYZ
pub fn srgb_to_xyz(rgb: [f64; 3]) -> Xyz {
    let linear = rgb.map(|channel| decode_gamma(channel / 255.0) * 100.0);
    let [x, y, z] = mul(&srgb::TO_XYZ, linear);
    Xyz::new(x, y, z)
}

/// Convert XYZ to Lab relative to the D65 white point
pub fn xyz_to_lab(xyz: Xyz) -> Lab {
    let [xn, yn, zn] = D65_WHITE_POINT_XYZ;
    let fx = lab_f(xyz.x / xn);
    let fy = lab_f(xyz.y / yn);
    let fz = lab_f(xyz.z / zn);

    Lab::new(116.0 * fy - 16.0, 500.0 * (fx - fy), 200.0 * (fy - fz))
}

/// Convert Lab to XYZ relative to the D65 white point
pub fn lab_to_xyz(lab: Lab) -> Xyz {
    let [xn, yn, zn] = D65_WHITE_POINT_XYZ;
    let fy = (lab.l + 16.0) / 116.0;
    let fx = lab.a / 500.0 + fy;
    let fz = fy - lab.b / 200.0;

    Xyz::new(
        xn * lab_f_inverse(fx),
        yn * lab_f_inverse(fy),
        zn * lab_f_inverse(fz),
    )
}

/// Convert XYZ to sRGB on the 0–255 scale, unclamped
pub fn xyz_to_srgb(xyz: Xyz) -> [f64; 3] {
    let linear = mul(&srgb::FROM_XYZ, [xyz.x / 100.0, xyz.y / 100.0, xyz.z / 100.0]);
    linear.map(|channel| encode_gamma(channel) * 255.0)
}

/// Convert Lab to sRGB on the 0–255 scale, unclamped
pub fn lab_to_srgb(lab: Lab) -> [f64; 3] {
    xyz_to_srgb(lab_to_xyz(lab))
}

/// Convert sRGB (0–255 per channel) to Lab
pub fn srgb_to_lab(rgb: [f64; 3]) -> Lab {
    xyz_to_lab(srgb_to_xyz(rgb))
}

/// Convert an 8-bit sRGB pixel to Lab
pub fn rgb8_to_lab(rgb: [u8; 3]) -> Lab {
    srgb_to_lab(rgb.map(f64::from))
}

/// Clamp and round a float sRGB triple to displayable bytes
pub fn to_rgb8(rgb: [f64; 3]) -> [u8; 3] {
    rgb.map(|channel| channel.round().clamp(0.0, 255.0) as u8)
}

/// Convert 8-bit sRGB to a hexadecimal color string
///
/// Hex color string (e.g., "#FF0000")
pub fn hex(rgb: [u8; 3]) -> String {
    format!("#{:02X}{:02X}{:02X}", rgb[0], rgb[1], rgb[2])
}
