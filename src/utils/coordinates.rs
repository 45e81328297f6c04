use crate::error::{ProcessingError, Result};

/// Index of the axis value closest to `target`. Ties resolve to the first
/// index. NaN axis values are never selected.
///
/// # Examples
/// ```
/// use era5_aermet::utils::nearest_index;
///
/// let lats = [49.75, 49.5, 49.25];
/// assert_eq!(nearest_index(&lats, 49.55), Some(1));
/// ```
pub fn nearest_index(axis: &[f64], target: f64) -> Option<usize> {
    if !target.is_finite() {
        return None;
    }

    let mut best: Option<(usize, f64)> = None;
    for (i, &value) in axis.iter().enumerate() {
        let distance = (value - target).abs();
        if !distance.is_finite() {
            continue;
        }
        match best {
            Some((_, best_distance)) if distance >= best_distance => {}
            _ => best = Some((i, distance)),
        }
    }

    best.map(|(i, _)| i)
}

/// Shift a longitude into the convention of `axis` (0..360 or -180..180).
pub fn align_longitude(axis: &[f64], longitude: f64) -> f64 {
    let uses_0_360 = axis.iter().any(|&v| v > 180.0);
    if uses_0_360 && longitude < 0.0 {
        longitude + 360.0
    } else if !uses_0_360 && longitude > 180.0 {
        longitude - 360.0
    } else {
        longitude
    }
}

/// Reject coordinates outside the geographic range
pub fn validate_coordinates(latitude: f64, longitude: f64) -> Result<()> {
    if !(-90.0..=90.0).contains(&latitude) {
        return Err(ProcessingError::InvalidCoordinate(format!(
            "Latitude {} is outside [-90, 90]",
            latitude
        )));
    }

    if !(-180.0..=360.0).contains(&longitude) {
        return Err(ProcessingError::InvalidCoordinate(format!(
            "Longitude {} is outside [-180, 360]",
            longitude
        )));
    }

    Ok(())
}

/// Calculate the distance between two points using the Haversine formula
pub fn haversine_distance(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    const EARTH_RADIUS_KM: f64 = 6371.0;

    let lat1_rad = lat1.to_radians();
    let lat2_rad = lat2.to_radians();
    let delta_lat = (lat2 - lat1).to_radians();
    let delta_lon = (lon2 - lon1).to_radians();

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (delta_lon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().asin();

    EARTH_RADIUS_KM * c
}
