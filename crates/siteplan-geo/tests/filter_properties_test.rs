//! Property tests for the selection filter
//!
//! The filter must return the whole layer when no shape is drawn, and an
//! order-preserving subsequence of intersecting features otherwise.

use proptest::prelude::*;
use siteplan_core::models::{Crs, Feature, FeatureCollection, FeatureId, Geometry};
use siteplan_geo::{filter_features, intersects};

fn bbox() -> impl Strategy<Value = [f64; 4]> {
    (-10.0f64..10.0, -10.0f64..10.0, 0.01f64..5.0, 0.01f64..5.0)
        .prop_map(|(x, y, w, h)| [x, y, x + w, y + h])
}

fn layer() -> impl Strategy<Value = FeatureCollection> {
    prop::collection::vec(bbox(), 0..24).prop_map(|boxes| {
        let features = boxes
            .into_iter()
            .enumerate()
            .map(|(i, b)| Feature::new(FeatureId(i), Geometry::rectangle(b), Default::default()))
            .collect();
        FeatureCollection::new("blocks", Crs::wgs84(), features)
    })
}

proptest! {
    #[test]
    fn no_shape_returns_every_feature(collection in layer()) {
        prop_assert_eq!(filter_features(&collection, None), collection);
    }

    #[test]
    fn selection_is_ordered_subsequence(collection in layer(), shape in bbox()) {
        let shape = Geometry::rectangle(shape);
        let selected = filter_features(&collection, Some(&shape));

        prop_assert!(selected.len() <= collection.len());

        let ids: Vec<_> = selected.iter().map(|f| f.id).collect();
        let mut sorted = ids.clone();
        sorted.sort();
        sorted.dedup();
        prop_assert_eq!(&ids, &sorted);

        for feature in &selected {
            prop_assert_eq!(feature, &collection.features[feature.id.0]);
        }
    }

    #[test]
    fn selection_is_exactly_the_intersecting_features(collection in layer(), shape in bbox()) {
        let shape = Geometry::rectangle(shape);
        let selected = filter_features(&collection, Some(&shape));

        let expected: Vec<_> = collection
            .iter()
            .filter(|f| intersects(&f.geometry, &shape))
            .map(|f| f.id)
            .collect();
        let actual: Vec<_> = selected.iter().map(|f| f.id).collect();

        prop_assert_eq!(actual, expected);
    }
}
