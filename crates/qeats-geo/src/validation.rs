use qeats_core::models::geo::{LATITUDE_RANGE, LONGITUDE_RANGE};
use qeats_core::models::{GeoPoint, ProximityQuery};
use qeats_core::{QeatsError, Result};

/// Validate that a point has finite, in-range coordinates
pub fn validate_point(point: &GeoPoint) -> Result<()> {
    check_coordinate("latitude", point.latitude, LATITUDE_RANGE)?;
    check_coordinate("longitude", point.longitude, LONGITUDE_RANGE)?;
    Ok(())
}

/// Validate a proximity query before any lookup happens
pub fn validate_query(query: &ProximityQuery) -> Result<()> {
    validate_point(&query.point)?;

    if !query.radius_km.is_finite() || query.radius_km <= 0.0 {
        return Err(QeatsError::invalid_input(
            "radius_km",
            format!("serving radius must be a positive number of kilometers, got {}", query.radius_km),
        ));
    }

    Ok(())
}

fn check_coordinate(field: &str, value: f64, (min, max): (f64, f64)) -> Result<()> {
    if !value.is_finite() {
        return Err(QeatsError::invalid_input(field, "coordinate must be finite"));
    }
    if value < min || value > max {
        return Err(QeatsError::invalid_input(
            field,
            format!("{} is outside [{}, {}]", value, min, max),
        ));
    }
    Ok(())
}
