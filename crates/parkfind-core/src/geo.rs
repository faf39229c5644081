//! Pure geodesy: SVY21 plane coordinates and great-circle distance.
//!
//! The HDB facility table carries positions as SVY21 eastings/northings, a
//! transverse-Mercator projection of the WGS84 ellipsoid centred on
//! Singapore. Both directions are closed-form series expansions
//! (meridional-arc and footpoint-latitude) — no iteration and no failure
//! modes, deterministic to floating-point precision.
//!
//! Round-trip accuracy inside Singapore's bounds is well under 1e-4 degrees
//! (a few centimetres on the ground).

use crate::carpark::Position;

/// Mean Earth radius in kilometres, as used by the haversine formula.
const EARTH_RADIUS_KM: f64 = 6371.0;

// WGS84 ellipsoid.
const A: f64 = 6_378_137.0;
const F: f64 = 1.0 / 298.257_223_563;

// SVY21 projection. Fundamental point: Base 7 at Pierce Reservoir.
// The published origin is 1 22 02.9154 N, 103 49 31.9752 E; the rounded
// values below are the ones that reproduce the agency's test data exactly.
const ORIGIN_LAT: f64 = 1.366_666;
const ORIGIN_LON: f64 = 103.833_333;
const FALSE_NORTHING: f64 = 38_744.572;
const FALSE_EASTING: f64 = 28_001.642;
const SCALE: f64 = 1.0;

const B: f64 = A * (1.0 - F);
const E2: f64 = (2.0 * F) - (F * F);
const E4: f64 = E2 * E2;
const E6: f64 = E4 * E2;
const A0: f64 = 1.0 - (E2 / 4.0) - (3.0 * E4 / 64.0) - (5.0 * E6 / 256.0);
const A2: f64 = (3.0 / 8.0) * (E2 + (E4 / 4.0) + (15.0 * E6 / 128.0));
const A4: f64 = (15.0 / 256.0) * (E4 + (3.0 * E6 / 4.0));
const A6: f64 = 35.0 * E6 / 3072.0;

/// Meridional arc length from the equator to `lat` degrees.
fn calc_m(lat: f64) -> f64 {
    let lat_r = lat.to_radians();
    A * ((A0 * lat_r) - (A2 * (2.0 * lat_r).sin()) + (A4 * (4.0 * lat_r).sin())
        - (A6 * (6.0 * lat_r).sin()))
}

/// Radius of curvature in the meridian plane.
fn calc_rho(sin2_lat: f64) -> f64 {
    let num = A * (1.0 - E2);
    let denom = (1.0 - E2 * sin2_lat).powf(3.0 / 2.0);
    num / denom
}

/// Radius of curvature in the prime vertical.
fn calc_v(sin2_lat: f64) -> f64 {
    A / (1.0 - E2 * sin2_lat).sqrt()
}

/// Converts SVY21 plane coordinates to WGS84 latitude/longitude in degrees.
#[must_use]
#[allow(clippy::many_single_char_names, clippy::similar_names)]
pub fn to_lat_lon(northing: f64, easting: f64) -> Position {
    let n_prime = northing - FALSE_NORTHING;
    let m_origin = calc_m(ORIGIN_LAT);
    let m_prime = m_origin + (n_prime / SCALE);
    let n = (A - B) / (A + B);
    let n2 = n * n;
    let n3 = n2 * n;
    let n4 = n2 * n2;
    let g = A
        * (1.0 - n)
        * (1.0 - n2)
        * (1.0 + (9.0 * n2 / 4.0) + (225.0 * n4 / 64.0))
        * (std::f64::consts::PI / 180.0);
    let sigma = (m_prime * std::f64::consts::PI) / (180.0 * g);

    // Footpoint latitude.
    let lat_prime = sigma
        + ((3.0 * n / 2.0) - (27.0 * n3 / 32.0)) * (2.0 * sigma).sin()
        + ((21.0 * n2 / 16.0) - (55.0 * n4 / 32.0)) * (4.0 * sigma).sin()
        + (151.0 * n3 / 96.0) * (6.0 * sigma).sin()
        + (1097.0 * n4 / 512.0) * (8.0 * sigma).sin();

    let sin_lat_prime = lat_prime.sin();
    let sin2_lat_prime = sin_lat_prime * sin_lat_prime;

    let rho_prime = calc_rho(sin2_lat_prime);
    let v_prime = calc_v(sin2_lat_prime);
    let psi_prime = v_prime / rho_prime;
    let psi_prime2 = psi_prime * psi_prime;
    let psi_prime3 = psi_prime2 * psi_prime;
    let psi_prime4 = psi_prime3 * psi_prime;
    let t_prime = lat_prime.tan();
    let t_prime2 = t_prime * t_prime;
    let t_prime4 = t_prime2 * t_prime2;
    let t_prime6 = t_prime4 * t_prime2;
    let e_prime = easting - FALSE_EASTING;
    let x = e_prime / (SCALE * v_prime);
    let x2 = x * x;
    let x3 = x2 * x;
    let x5 = x3 * x2;
    let x7 = x5 * x2;

    let lat_factor = t_prime / (SCALE * rho_prime);
    let lat_term1 = lat_factor * ((e_prime * x) / 2.0);
    let lat_term2 = lat_factor
        * ((e_prime * x3) / 24.0)
        * ((-4.0 * psi_prime2) + (9.0 * psi_prime) * (1.0 - t_prime2) + (12.0 * t_prime2));
    let lat_term3 = lat_factor
        * ((e_prime * x5) / 720.0)
        * ((8.0 * psi_prime4) * (11.0 - 24.0 * t_prime2)
            - (12.0 * psi_prime3) * (21.0 - 71.0 * t_prime2)
            + (15.0 * psi_prime2) * (15.0 - 98.0 * t_prime2 + 15.0 * t_prime4)
            + (180.0 * psi_prime) * (5.0 * t_prime2 - 3.0 * t_prime4)
            + 360.0 * t_prime4);
    let lat_term4 = lat_factor
        * ((e_prime * x7) / 40320.0)
        * (1385.0 - 3633.0 * t_prime2 + 4095.0 * t_prime4 + 1575.0 * t_prime6);
    let lat = lat_prime - lat_term1 + lat_term2 - lat_term3 + lat_term4;

    let sec_lat_prime = 1.0 / lat.cos();
    let lon_term1 = x * sec_lat_prime;
    let lon_term2 = ((x3 * sec_lat_prime) / 6.0) * (psi_prime + 2.0 * t_prime2);
    let lon_term3 = ((x5 * sec_lat_prime) / 120.0)
        * ((-4.0 * psi_prime3) * (1.0 - 6.0 * t_prime2)
            + psi_prime2 * (9.0 - 68.0 * t_prime2)
            + 72.0 * psi_prime * t_prime2
            + 24.0 * t_prime4);
    let lon_term4 = ((x7 * sec_lat_prime) / 5040.0)
        * (61.0 + 662.0 * t_prime2 + 1320.0 * t_prime4 + 720.0 * t_prime6);
    let lon = ORIGIN_LON.to_radians() + lon_term1 - lon_term2 + lon_term3 - lon_term4;

    Position::new(lat.to_degrees(), lon.to_degrees())
}

/// Converts WGS84 latitude/longitude in degrees to SVY21 `(northing, easting)`.
#[must_use]
#[allow(clippy::many_single_char_names, clippy::similar_names)]
pub fn to_projected(lat: f64, lon: f64) -> (f64, f64) {
    let lat_r = lat.to_radians();
    let sin_lat = lat_r.sin();
    let sin2_lat = sin_lat * sin_lat;
    let cos_lat = lat_r.cos();
    let cos2_lat = cos_lat * cos_lat;
    let cos3_lat = cos2_lat * cos_lat;
    let cos4_lat = cos3_lat * cos_lat;
    let cos5_lat = cos4_lat * cos_lat;
    let cos6_lat = cos5_lat * cos_lat;
    let cos7_lat = cos6_lat * cos_lat;

    let rho = calc_rho(sin2_lat);
    let v = calc_v(sin2_lat);
    let psi = v / rho;
    let t = lat_r.tan();
    let w = (lon - ORIGIN_LON).to_radians();

    let m = calc_m(lat);
    let m_origin = calc_m(ORIGIN_LAT);

    let w2 = w * w;
    let w4 = w2 * w2;
    let w6 = w4 * w2;
    let w8 = w6 * w2;

    let psi2 = psi * psi;
    let psi3 = psi2 * psi;
    let psi4 = psi3 * psi;

    let t2 = t * t;
    let t4 = t2 * t2;
    let t6 = t4 * t2;

    let n_term1 = w2 / 2.0 * v * sin_lat * cos_lat;
    let n_term2 = w4 / 24.0 * v * sin_lat * cos3_lat * (4.0 * psi2 + psi - t2);
    let n_term3 = w6 / 720.0
        * v
        * sin_lat
        * cos5_lat
        * ((8.0 * psi4) * (11.0 - 24.0 * t2) - (28.0 * psi3) * (1.0 - 6.0 * t2)
            + psi2 * (1.0 - 32.0 * t2)
            - psi * 2.0 * t2
            + t4);
    let n_term4 = w8 / 40320.0 * v * sin_lat * cos7_lat * (1385.0 - 3111.0 * t2 + 543.0 * t4 - t6);
    let northing = FALSE_NORTHING + SCALE * (m - m_origin + n_term1 + n_term2 + n_term3 + n_term4);

    let e_term1 = w2 / 6.0 * cos2_lat * (psi - t2);
    let e_term2 = w4 / 120.0
        * cos4_lat
        * ((4.0 * psi3) * (1.0 - 6.0 * t2) + psi2 * (1.0 + 8.0 * t2) - psi * 2.0 * t2 + t4);
    let e_term3 = w6 / 5040.0 * cos6_lat * (61.0 - 479.0 * t2 + 179.0 * t4 - t6);
    let easting = FALSE_EASTING + SCALE * v * w * cos_lat * (1.0 + e_term1 + e_term2 + e_term3);

    (northing, easting)
}

/// Great-circle distance between two points in kilometres (haversine).
///
/// Symmetric, non-negative, and zero for identical points up to floating
/// precision. The arcsine argument is clamped to `[0, 1]`: floating error on
/// near-antipodal pairs can push it fractionally outside, which would
/// otherwise yield NaN.
#[must_use]
pub fn distance_km(a: Position, b: Position) -> f64 {
    let lat1 = a.latitude.to_radians();
    let lat2 = b.latitude.to_radians();
    let dlat = (b.latitude - a.latitude).to_radians();
    let dlon = (b.longitude - a.longitude).to_radians();

    let h = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
    let c = 2.0 * h.clamp(0.0, 1.0).sqrt().asin();
    c * EARTH_RADIUS_KM
}
