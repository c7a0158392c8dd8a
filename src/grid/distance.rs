//! Great-circle distance used to rank fallback candidates.

/// Statute miles per degree of arc (60 nautical miles × 1.1515)
const MILES_PER_DEGREE: f64 = 60.0 * 1.1515;

/// Distance in statute miles between two points via the spherical law of
/// cosines. Only the ordering of results matters to callers.
pub fn distance_miles(lon1: f64, lat1: f64, lon2: f64, lat2: f64) -> f64 {
    let (phi1, phi2) = (lat1.to_radians(), lat2.to_radians());
    let theta = (lon1 - lon2).to_radians();

    let cos_angle = phi1.sin() * phi2.sin() + phi1.cos() * phi2.cos() * theta.cos();

    // Rounding can push the argument just past ±1 for coincident points.
    let angle = cos_angle.clamp(-1.0, 1.0).acos();

    angle.to_degrees() * MILES_PER_DEGREE
}
