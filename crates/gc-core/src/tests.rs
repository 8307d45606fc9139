//! Unit tests for gc-core primitives.

#[cfg(test)]
mod ids {
    use crate::{CellId, NodeId};

    #[test]
    fn index_roundtrip() {
        let id = CellId(42);
        assert_eq!(id.index(), 42);
        assert_eq!(CellId::try_from(42usize).unwrap(), id);
    }

    #[test]
    fn ordering() {
        assert!(CellId(0) < CellId(1));
        assert!(NodeId(100) > NodeId(99));
    }

    #[test]
    fn invalid_sentinels_are_max() {
        assert_eq!(CellId::INVALID.0, u32::MAX);
        assert_eq!(NodeId::INVALID.0, u32::MAX);
    }

    #[test]
    fn display() {
        assert_eq!(CellId(7).to_string(), "CellId(7)");
    }
}

#[cfg(test)]
mod geo {
    use crate::GeoPoint;

    #[test]
    fn zero_distance() {
        let p = GeoPoint::new(49.195, 16.608);
        assert!(p.distance_m(p) < 0.01);
    }

    #[test]
    fn one_degree_latitude() {
        // ~1 degree of latitude ≈ 111 km
        let a = GeoPoint::new(49.0, 16.0);
        let b = GeoPoint::new(50.0, 16.0);
        let d = a.distance_m(b);
        assert!((d - 111_195.0).abs() < 50.0, "got {d}");
    }

    #[test]
    fn nan_is_not_finite() {
        assert!(GeoPoint::new(1.0, 2.0).is_finite());
        assert!(!GeoPoint::new(f64::NAN, 2.0).is_finite());
        assert!(!GeoPoint::new(1.0, f64::INFINITY).is_finite());
    }
}

#[cfg(test)]
mod point {
    use crate::{AggregateRecord, GcError, GeoPoint, WeightedPoint};

    #[test]
    fn valid_point() {
        let p = WeightedPoint::try_new(49.2, 16.6, 120.0).unwrap();
        assert_eq!(p.pos, GeoPoint::new(49.2, 16.6));
        assert_eq!(p.weight, 120.0);
    }

    #[test]
    fn zero_weight_is_allowed() {
        assert!(WeightedPoint::try_new(0.0, 0.0, 0.0).is_ok());
    }

    #[test]
    fn negative_weight_rejected() {
        let err = WeightedPoint::try_new(0.0, 0.0, -1.0).unwrap_err();
        assert!(matches!(err, GcError::InvalidPoint(_)));
    }

    #[test]
    fn nan_coordinate_rejected() {
        assert!(WeightedPoint::try_new(f64::NAN, 0.0, 1.0).is_err());
        assert!(WeightedPoint::try_new(0.0, 0.0, f64::NAN).is_err());
    }

    #[test]
    fn record_tuple_shape() {
        let r = AggregateRecord::new(GeoPoint::new(10.0, 20.0), 0.25);
        assert_eq!(r.as_tuple(), (10.0, 20.0, 0.25));
        assert_eq!(AggregateRecord::from((10.0, 20.0, 0.25)), r);
        assert_eq!(r.pos(), GeoPoint::new(10.0, 20.0));
    }
}
