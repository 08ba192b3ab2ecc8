use crate::models::{
    FeatureId,
    Spot,
    SpotLocation,
};
use crate::oracle::AssignedSpot;
use std::collections::HashMap;

/// At most one spot per physical location.
#[derive(Debug, Default)]
pub struct SpotRegistry {
    spots: HashMap<SpotLocation, Spot>,
}

impl SpotRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.spots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.spots.is_empty()
    }

    pub fn contains(&self, location: &SpotLocation) -> bool {
        self.spots.contains_key(location)
    }

    pub fn get(&self, location: &SpotLocation) -> Option<&Spot> {
        self.spots.get(location)
    }

    pub fn get_mut(&mut self, location: &SpotLocation) -> Option<&mut Spot> {
        self.spots.get_mut(location)
    }

    /// Returns the spot at `location`, creating it with `make` if there is none.
    pub fn get_or_create(
        &mut self,
        location: SpotLocation,
        make: impl FnOnce() -> Spot,
    ) -> &mut Spot {
        self.spots.entry(location).or_insert_with(make)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Spot> {
        self.spots.values()
    }

    /// All spots, ordered by x then y to limit stage movement.
    pub fn into_sorted_spots(self) -> Vec<Spot> {
        let mut spots: Vec<(SpotLocation, Spot)> = self.spots.into_iter().collect();
        spots.sort_by_key(|(location, _)| (location.x, location.y));
        spots.into_iter().map(|(_, spot)| spot).collect()
    }
}

/// Which spots each feature was scheduled on.
#[derive(Debug, Default, Clone)]
pub struct FeatureSpotIndex {
    inner: HashMap<FeatureId, Vec<AssignedSpot>>,
}

impl FeatureSpotIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn spots_for(&self, feature: FeatureId) -> &[AssignedSpot] {
        self.inner
            .get(&feature)
            .map(|x| x.as_slice())
            .unwrap_or(&[])
    }

    pub fn record(&mut self, feature: FeatureId, spot: &Spot) {
        self.inner.entry(feature).or_default().push(AssignedSpot {
            location: spot.location(),
            collision_energy: spot.collision_energy(),
        });
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&FeatureId, &Vec<AssignedSpot>)> {
        self.inner.iter()
    }
}
