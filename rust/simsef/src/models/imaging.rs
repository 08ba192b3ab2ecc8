use crate::utils::TupleRange;
use rayon::prelude::*;
use serde::{
    Deserialize,
    Serialize,
};
use std::collections::HashMap;

/// Identifier of a single imaging frame (one pixel of the image).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FrameId(pub u32);

/// Position of a frame on the MALDI target.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SpotInfo {
    pub spot_name: String,
    pub x_index: i32,
    pub y_index: i32,
}

impl SpotInfo {
    pub fn location(&self) -> SpotLocation {
        SpotLocation {
            x: self.x_index,
            y: self.y_index,
        }
    }
}

/// Value key for a physical spot on the target.
///
/// Two lookups for the same grid position always resolve to the same key,
/// regardless of which frame they came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SpotLocation {
    pub x: i32,
    pub y: i32,
}

impl SpotLocation {
    /// Euclidean distance in grid (pixel) units.
    pub fn distance(&self, other: &SpotLocation) -> f64 {
        let dx = (self.x - other.x) as f64;
        let dy = (self.y - other.y) as f64;
        (dx * dx + dy * dy).sqrt()
    }
}

/// One mobility scan of a frame, as a centroided mass list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MobilityScan {
    pub mobility: f32,
    pub mz: Vec<f64>,
    pub intensity: Vec<f32>,
}

impl MobilityScan {
    pub fn num_peaks(&self) -> usize {
        self.mz.len().min(self.intensity.len())
    }

    /// Index of the peak closest to `mz`, `None` for an empty scan.
    ///
    /// Requires the peaks to be sorted by m/z.
    pub fn closest_index(&self, mz: f64) -> Option<usize> {
        let n = self.num_peaks();
        if n == 0 {
            return None;
        }
        let pos = self.mz[..n].partition_point(|x| *x < mz);
        if pos == 0 {
            return Some(0);
        }
        if pos == n {
            return Some(n - 1);
        }
        if (self.mz[pos] - mz).abs() < (mz - self.mz[pos - 1]).abs() {
            Some(pos)
        } else {
            Some(pos - 1)
        }
    }

    fn sort_by_mz(&mut self) {
        let n = self.num_peaks();
        self.mz.truncate(n);
        self.intensity.truncate(n);
        if self.mz.windows(2).all(|w| w[0] <= w[1]) {
            return;
        }
        let mut order: Vec<usize> = (0..n).collect();
        order.sort_by(|a, b| self.mz[*a].total_cmp(&self.mz[*b]));
        self.mz = order.iter().map(|i| self.mz[*i]).collect();
        self.intensity = order.iter().map(|i| self.intensity[*i]).collect();
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImagingFrame {
    pub id: FrameId,
    /// Frames without spot info can not be targeted for MS/MS.
    #[serde(default)]
    pub spot_info: Option<SpotInfo>,
    #[serde(default)]
    pub mobility_scans: Vec<MobilityScan>,
}

impl ImagingFrame {
    /// Smallest absolute mobility step between two consecutive mobility scans.
    pub fn smallest_mobility_delta(&self) -> Option<f32> {
        self.mobility_scans
            .windows(2)
            .map(|w| (w[1].mobility - w[0].mobility).abs())
            .filter(|d| *d > 0.0)
            .min_by(|a, b| a.total_cmp(b))
    }
}

#[derive(Debug, Clone, Deserialize)]
struct ImagingDatasetRepr {
    frames: Vec<ImagingFrame>,
    mobility_bounds: TupleRange<f32>,
    ramp_time_ms: f64,
    #[serde(default = "default_true")]
    is_ion_mobility: bool,
}

fn default_true() -> bool {
    true
}

/// In-memory view of a single ion mobility imaging raw file.
#[derive(Debug, Clone, Deserialize)]
#[serde(from = "ImagingDatasetRepr")]
pub struct ImagingDataset {
    frames: Vec<ImagingFrame>,
    frame_index: HashMap<FrameId, usize>,
    mobility_bounds: TupleRange<f32>,
    ramp_time_ms: f64,
    is_ion_mobility: bool,
}

impl From<ImagingDatasetRepr> for ImagingDataset {
    fn from(value: ImagingDatasetRepr) -> Self {
        Self::new(
            value.frames,
            value.mobility_bounds,
            value.ramp_time_ms,
            value.is_ion_mobility,
        )
    }
}

impl ImagingDataset {
    pub fn new(
        mut frames: Vec<ImagingFrame>,
        mobility_bounds: TupleRange<f32>,
        ramp_time_ms: f64,
        is_ion_mobility: bool,
    ) -> Self {
        frames.par_iter_mut().for_each(|frame| {
            frame
                .mobility_scans
                .iter_mut()
                .for_each(|scan| scan.sort_by_mz());
        });
        let frame_index = frames
            .iter()
            .enumerate()
            .map(|(i, f)| (f.id, i))
            .collect();
        Self {
            frames,
            frame_index,
            mobility_bounds,
            ramp_time_ms,
            is_ion_mobility,
        }
    }

    pub fn frame(&self, id: FrameId) -> Option<&ImagingFrame> {
        self.frame_index.get(&id).map(|i| &self.frames[*i])
    }

    pub fn spot_info(&self, id: FrameId) -> Option<&SpotInfo> {
        self.frame(id).and_then(|f| f.spot_info.as_ref())
    }

    pub fn frames(&self) -> &[ImagingFrame] {
        &self.frames
    }

    /// Number of pixels, the hard ceiling for the number of MS/MS spots.
    pub fn num_frames(&self) -> usize {
        self.frames.len()
    }

    pub fn mobility_bounds(&self) -> TupleRange<f32> {
        self.mobility_bounds
    }

    pub fn ramp_time_ms(&self) -> f64 {
        self.ramp_time_ms
    }

    pub fn is_ion_mobility(&self) -> bool {
        self.is_ion_mobility
    }
}
