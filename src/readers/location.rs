use crate::error::{ProcessingError, Result};
use crate::models::PointTable;
use crate::readers::dataset::GriddedDataset;
use crate::utils::coordinates::{align_longitude, haversine_distance, nearest_index, validate_coordinates};
use tracing::info;

/// Grid cell nearest to a requested location.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridPoint {
    pub lat_index: usize,
    pub lon_index: usize,
    pub latitude: f64,
    pub longitude: f64,
}

impl GridPoint {
    /// Great-circle distance from the requested location, in km
    pub fn distance_km(&self, latitude: f64, longitude: f64) -> f64 {
        haversine_distance(latitude, longitude, self.latitude, self.longitude)
    }
}

/// Nearest grid point on each axis independently, as a coordinate-wise
/// `nearest` selection does.
pub fn resolve_nearest(
    dataset: &dyn GriddedDataset,
    latitude: f64,
    longitude: f64,
) -> Result<GridPoint> {
    validate_coordinates(latitude, longitude)?;

    let lats = dataset.latitudes();
    let lons = dataset.longitudes();
    let longitude = align_longitude(lons, longitude);

    let lat_index = nearest_index(lats, latitude)
        .ok_or_else(|| ProcessingError::Schema("latitude".to_string()))?;
    let lon_index = nearest_index(lons, longitude)
        .ok_or_else(|| ProcessingError::Schema("longitude".to_string()))?;

    Ok(GridPoint {
        lat_index,
        lon_index,
        latitude: lats[lat_index],
        longitude: lons[lon_index],
    })
}

/// Resolve the nearest grid point and return its rows.
pub fn extract_point(
    dataset: &dyn GriddedDataset,
    latitude: f64,
    longitude: f64,
) -> Result<PointTable> {
    let point = resolve_nearest(dataset, latitude, longitude)?;
    info!(
        grid_lat = point.latitude,
        grid_lon = point.longitude,
        distance_km = %format!("{:.1}", point.distance_km(latitude, longitude)),
        "Selected nearest grid point"
    );
    dataset.select_point(point.lat_index, point.lon_index)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::readers::dataset::InMemoryDataset;
    use chrono::NaiveDate;

    fn grid() -> InMemoryDataset {
        let time = NaiveDate::from_ymd_opt(2025, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        let lats = vec![49.75, 49.5, 49.25];
        let lons = vec![25.25, 25.5, 25.75, 26.0];
        let values = (0..12).map(|v| v as f64).collect();
        InMemoryDataset::new(lats, lons, vec![time])
            .with_variable("t2m", values)
            .unwrap()
    }

    #[test]
    fn test_resolve_ternopil() {
        let point = resolve_nearest(&grid(), 49.55, 25.60).unwrap();
        assert_eq!(point.lat_index, 1);
        assert_eq!(point.lon_index, 1);
        assert_eq!(point.latitude, 49.5);
        assert_eq!(point.longitude, 25.5);
        assert!(point.distance_km(49.55, 25.60) < 10.0);
    }

    #[test]
    fn test_extract_point() {
        let table = extract_point(&grid(), 49.3, 25.95).unwrap();
        // lat index 2, lon index 3
        assert_eq!(table.column("t2m").unwrap(), &[11.0]);
    }

    #[test]
    fn test_invalid_target() {
        assert!(resolve_nearest(&grid(), 95.0, 25.0).is_err());
    }
}
