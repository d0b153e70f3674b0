//! Nearest-stop lookup.
//!
//! Distances are great-circle distances on a spherical Earth. A linear scan
//! is plenty for a single city's worth of stops.

use crate::domain::{Coordinate, InvalidCoordinate, Stop};

/// Mean Earth radius in kilometres.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Error from a nearest-stop query.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GeoError {
    #[error(transparent)]
    InvalidCoordinate(#[from] InvalidCoordinate),

    #[error("no candidate stops to search")]
    NotFound,
}

/// The closest stop and how far away it is.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NearestStop<'a> {
    pub stop: &'a Stop,
    pub distance_km: f64,
}

/// Haversine distance between two points, in kilometres.
///
/// # Examples
///
/// ```
/// use stop_server::domain::Coordinate;
/// use stop_server::geo::haversine_km;
///
/// let a = Coordinate::new(0.0, 0.0).unwrap();
/// let b = Coordinate::new(0.0, 1.0).unwrap();
/// assert!((haversine_km(a, b) - 111.195).abs() < 0.001);
/// ```
pub fn haversine_km(a: Coordinate, b: Coordinate) -> f64 {
    let phi1 = a.lat().to_radians();
    let phi2 = b.lat().to_radians();
    let d_phi = (b.lat() - a.lat()).to_radians();
    let d_lambda = (b.lon() - a.lon()).to_radians();

    let h = (d_phi / 2.0).sin().powi(2) + phi1.cos() * phi2.cos() * (d_lambda / 2.0).sin().powi(2);
    // Rounding can push h a hair past 1 for antipodal points
    2.0 * EARTH_RADIUS_KM * h.sqrt().min(1.0).asin()
}

/// Find the candidate closest to `query`.
///
/// Ties go to the earliest candidate.
pub fn nearest_stop(query: Coordinate, candidates: &[Stop]) -> Result<NearestStop<'_>, GeoError> {
    let mut best: Option<NearestStop<'_>> = None;

    for stop in candidates {
        let distance_km = haversine_km(query, stop.location);
        if best.is_none_or(|b| distance_km < b.distance_km) {
            best = Some(NearestStop { stop, distance_km });
        }
    }

    best.ok_or(GeoError::NotFound)
}

/// Find the closest candidate to a raw latitude/longitude pair.
pub fn nearest(lat: f64, lon: f64, candidates: &[Stop]) -> Result<NearestStop<'_>, GeoError> {
    let query = Coordinate::new(lat, lon)?;
    nearest_stop(query, candidates)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::StopId;

    fn stop(id: u32, lat: f64, lon: f64) -> Stop {
        Stop {
            id: StopId(id),
            code: None,
            name: format!("Stop {id}"),
            area: "Kesklinn".to_string(),
            location: Coordinate::new(lat, lon).unwrap(),
        }
    }

    fn coord(lat: f64, lon: f64) -> Coordinate {
        Coordinate::new(lat, lon).unwrap()
    }

    #[test]
    fn zero_distance_to_self() {
        let p = coord(59.437, 24.7536);
        assert_eq!(haversine_km(p, p), 0.0);
    }

    #[test]
    fn one_degree_of_latitude() {
        let d = haversine_km(coord(0.0, 0.0), coord(1.0, 0.0));
        // 6371 * pi / 180
        assert!((d - 111.194_926_644_558_7).abs() < 1e-6);
    }

    #[test]
    fn known_city_pair() {
        // Tallinn to Tartu, roughly 161 km
        let d = haversine_km(coord(59.437, 24.7536), coord(58.378, 26.729));
        assert!((150.0..170.0).contains(&d), "got {d}");
    }

    #[test]
    fn symmetric() {
        let a = coord(10.0, 20.0);
        let b = coord(-33.0, 151.0);
        assert!((haversine_km(a, b) - haversine_km(b, a)).abs() < 1e-9);
    }

    #[test]
    fn antipodal_points_are_half_circumference() {
        let d = haversine_km(coord(0.0, 0.0), coord(0.0, 180.0));
        assert!((d - EARTH_RADIUS_KM * std::f64::consts::PI).abs() < 1e-6);
    }

    #[test]
    fn single_candidate_always_wins() {
        let stops = vec![stop(1, 10.0, 10.0)];
        for (lat, lon) in [(0.0, 0.0), (-45.0, 170.0), (89.0, -179.0)] {
            let found = nearest(lat, lon, &stops).unwrap();
            assert_eq!(found.stop.id, StopId(1));
        }
    }

    #[test]
    fn picks_exact_match() {
        let stops = vec![stop(1, 0.0, 0.0), stop(2, 10.0, 10.0)];
        let found = nearest(0.0, 0.0, &stops).unwrap();
        assert_eq!(found.stop.id, StopId(1));
        assert_eq!(found.distance_km, 0.0);
    }

    #[test]
    fn picks_closest_regardless_of_order() {
        let stops = vec![
            stop(1, 59.50, 24.70),
            stop(2, 59.437, 24.754),
            stop(3, 59.40, 24.80),
        ];
        let found = nearest(59.4372, 24.7530, &stops).unwrap();
        assert_eq!(found.stop.id, StopId(2));
    }

    #[test]
    fn ties_go_to_first_candidate() {
        let stops = vec![stop(7, 1.0, 0.0), stop(8, -1.0, 0.0)];
        let found = nearest(0.0, 0.0, &stops).unwrap();
        assert_eq!(found.stop.id, StopId(7));
    }

    #[test]
    fn empty_candidates_not_found() {
        assert_eq!(nearest(0.0, 0.0, &[]), Err(GeoError::NotFound));
    }

    #[test]
    fn invalid_query_rejected() {
        let stops = vec![stop(1, 0.0, 0.0)];
        assert!(matches!(
            nearest(f64::NAN, 0.0, &stops),
            Err(GeoError::InvalidCoordinate(_))
        ));
        assert!(matches!(
            nearest(0.0, 200.0, &stops),
            Err(GeoError::InvalidCoordinate(_))
        ));
        // Validation happens before the empty check
        assert!(matches!(
            nearest(95.0, 0.0, &[]),
            Err(GeoError::InvalidCoordinate(_))
        ));
    }

    #[test]
    fn repeated_queries_identical() {
        let stops = vec![stop(1, 59.5, 24.7), stop(2, 59.4, 24.8)];
        let a = nearest(59.45, 24.75, &stops).unwrap();
        let b = nearest(59.45, 24.75, &stops).unwrap();
        assert_eq!(a.stop.id, b.stop.id);
        assert_eq!(a.distance_km.to_bits(), b.distance_km.to_bits());
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    prop_compose! {
        fn valid_coord()(lat in -90.0f64..=90.0, lon in -180.0f64..=180.0) -> Coordinate {
            Coordinate::new(lat, lon).unwrap()
        }
    }

    proptest! {
        /// Distance is never negative and never exceeds half the circumference
        #[test]
        fn distance_bounded(a in valid_coord(), b in valid_coord()) {
            let d = haversine_km(a, b);
            prop_assert!(d >= 0.0);
            prop_assert!(d <= EARTH_RADIUS_KM * std::f64::consts::PI + 1e-9);
        }

        /// The chosen stop is at least as close as every other candidate
        #[test]
        fn nearest_is_minimal(
            query in valid_coord(),
            points in prop::collection::vec(valid_coord(), 1..20)
        ) {
            let stops: Vec<Stop> = points
                .into_iter()
                .enumerate()
                .map(|(i, location)| Stop {
                    id: crate::domain::StopId(i as u32),
                    code: None,
                    name: String::new(),
                    area: String::new(),
                    location,
                })
                .collect();

            let found = nearest_stop(query, &stops).unwrap();
            for s in &stops {
                prop_assert!(found.distance_km <= haversine_km(query, s.location));
            }
        }
    }
}
