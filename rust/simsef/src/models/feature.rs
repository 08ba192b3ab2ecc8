use super::imaging::FrameId;
use crate::utils::TupleRange;
use serde::{
    Deserialize,
    Serialize,
};

/// Feature list row id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FeatureId(pub u32);

impl std::fmt::Display for FeatureId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PixelIntensity {
    pub frame: FrameId,
    pub intensity: f32,
}

/// A detected image feature.
///
/// `pixels` is the feature's intensity trace over the image, in frame order.
#[derive(Debug, Clone, Serialize, Deserialize, bon::Builder)]
pub struct ImagingFeature {
    id: FeatureId,
    mz: f64,
    mobility: f32,
    mobility_range: TupleRange<f32>,
    height: f32,
    area: f32,
    #[builder(default)]
    #[serde(default)]
    pixels: Vec<PixelIntensity>,
}

impl ImagingFeature {
    pub fn id(&self) -> FeatureId {
        self.id
    }

    pub fn mz(&self) -> f64 {
        self.mz
    }

    pub fn mobility(&self) -> f32 {
        self.mobility
    }

    pub fn mobility_range(&self) -> TupleRange<f32> {
        self.mobility_range
    }

    pub fn height(&self) -> f32 {
        self.height
    }

    pub fn area(&self) -> f32 {
        self.area
    }

    pub fn pixels(&self) -> &[PixelIntensity] {
        &self.pixels
    }

    /// Pixel indices sorted by descending intensity.
    ///
    /// The sort is stable, so equally intense pixels keep their frame order.
    pub fn intensity_sorted_indices(&self) -> Vec<usize> {
        let mut order: Vec<usize> = (0..self.pixels.len()).collect();
        order.sort_by(|a, b| {
            self.pixels[*b]
                .intensity
                .total_cmp(&self.pixels[*a].intensity)
        });
        order
    }

    /// The frame holding the most intense pixel.
    pub fn representative_frame(&self) -> Option<FrameId> {
        self.intensity_sorted_indices()
            .first()
            .map(|i| self.pixels[*i].frame)
    }

    pub fn num_pixels_above(&self, threshold: f32) -> usize {
        self.pixels
            .iter()
            .filter(|p| p.intensity > threshold)
            .count()
    }
}
