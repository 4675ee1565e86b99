//! Great-circle bearing between two geographic points.

/// A compass direction in degrees, clockwise from north.
pub type Degrees = f64;

/// Initial bearing of the great circle from `(lat1, lng1)` to `(lat2, lng2)`,
/// all in decimal degrees. The result lies in `[0, 360)`.
///
/// Coordinates are not range checked here. Two identical points give
/// `atan2(0, 0) = 0`, which is as good a heading as any at zero distance.
pub fn bearing(lat1: f64, lng1: f64, lat2: f64, lng2: f64) -> Degrees {
    let (lat1, lat2) = (lat1.to_radians(), lat2.to_radians());
    let d_lng = (lng2 - lng1).to_radians();

    let y = d_lng.sin() * lat2.cos();
    let x = lat1.cos() * lat2.sin() - lat1.sin() * lat2.cos() * d_lng.cos();

    normalize(y.atan2(x).to_degrees())
}

/// Folds any finite angle into `[0, 360)`.
pub fn normalize(deg: Degrees) -> Degrees {
    let wrapped = deg.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360 for tiny negative inputs
    if wrapped >= 360.0 {
        0.0
    } else {
        wrapped
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    #[test]
    fn same_point_is_zero() {
        for &(lat, lng) in &[(0.0, 0.0), (45.5, -122.6), (-89.9, 179.9), (90.0, -180.0)] {
            assert_eq!(bearing(lat, lng, lat, lng), 0.0);
        }
    }

    #[test]
    fn cardinal_directions() {
        assert!((bearing(0.0, 0.0, 0.0, 90.0) - 90.0).abs() < EPS);
        assert!((bearing(0.0, 0.0, 0.0, -90.0) - 270.0).abs() < EPS);
        assert!((bearing(0.0, 0.0, 10.0, 0.0) - 0.0).abs() < EPS);
        assert!((bearing(10.0, 0.0, 0.0, 0.0) - 180.0).abs() < EPS);
    }

    #[test]
    fn always_in_range() {
        let coords = [-90.0, -45.3, -0.001, 0.0, 0.001, 33.3, 89.99, 90.0];
        let lngs = [-180.0, -120.5, -0.5, 0.0, 0.5, 60.25, 179.5, 180.0];
        for &lat1 in &coords {
            for &lng1 in &lngs {
                for &lat2 in &coords {
                    for &lng2 in &lngs {
                        let b = bearing(lat1, lng1, lat2, lng2);
                        assert!((0.0..360.0).contains(&b), "{b} out of range");
                    }
                }
            }
        }
    }

    #[test]
    fn normalize_wraps() {
        assert_eq!(normalize(360.0), 0.0);
        assert!((normalize(-90.0) - 270.0).abs() < EPS);
        assert!((normalize(450.0) - 90.0).abs() < EPS);
        assert!(normalize(-1e-20) < 360.0);
    }
}
