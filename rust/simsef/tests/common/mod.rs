#![allow(dead_code)]

use simsef::models::{
    FeatureId,
    FrameId,
    ImagingDataset,
    ImagingFeature,
    ImagingFrame,
    MobilityScan,
    PixelIntensity,
    SpotInfo,
};
use simsef::TupleRange;

pub const NUM_SCANS: usize = 20;
pub const RAMP_TIME_MS: f64 = 100.0;

/// Background peak added to every mobility scan of one pixel.
pub struct Contaminant {
    pub x: i32,
    pub y: i32,
    pub mz: f64,
    pub intensity: f32,
}

/// Square grid of pixels, one frame per pixel.
///
/// Every mobility scan (1.09 down to 0.90) holds a peak of intensity 100 at
/// each of `mzs`, plus the contaminants of its pixel.
pub struct SyntheticImage {
    pub width: i32,
    pub height: i32,
    pub mzs: Vec<f64>,
    pub contaminants: Vec<Contaminant>,
}

impl SyntheticImage {
    pub fn new(width: i32, height: i32, mzs: &[f64]) -> Self {
        Self {
            width,
            height,
            mzs: mzs.to_vec(),
            contaminants: Vec::new(),
        }
    }

    pub fn with_contaminant(mut self, x: i32, y: i32, mz: f64, intensity: f32) -> Self {
        self.contaminants.push(Contaminant {
            x,
            y,
            mz,
            intensity,
        });
        self
    }

    pub fn frame_id(&self, x: i32, y: i32) -> FrameId {
        FrameId((y * self.width + x + 1) as u32)
    }

    fn frame(&self, x: i32, y: i32) -> ImagingFrame {
        let mobility_scans = (0..NUM_SCANS)
            .map(|i| {
                let mut mz = self.mzs.clone();
                let mut intensity = vec![100.0; self.mzs.len()];
                for c in self.contaminants.iter().filter(|c| c.x == x && c.y == y) {
                    mz.push(c.mz);
                    intensity.push(c.intensity);
                }
                MobilityScan {
                    mobility: 1.09 - 0.01 * i as f32,
                    mz,
                    intensity,
                }
            })
            .collect();
        ImagingFrame {
            id: self.frame_id(x, y),
            spot_info: Some(SpotInfo {
                spot_name: format!("R00X{x:03}Y{y:03}"),
                x_index: x,
                y_index: y,
            }),
            mobility_scans,
        }
    }

    pub fn build(&self) -> ImagingDataset {
        let mut frames = Vec::new();
        for y in 0..self.height {
            for x in 0..self.width {
                frames.push(self.frame(x, y));
            }
        }
        ImagingDataset::new(
            frames,
            TupleRange::try_new(0.6, 1.6).unwrap(),
            RAMP_TIME_MS,
            true,
        )
    }

    /// Feature with a mobility window of 0.02 around `mobility`.
    pub fn feature(
        &self,
        id: u32,
        mz: f64,
        mobility: f32,
        area: f32,
        pixels: &[((i32, i32), f32)],
    ) -> ImagingFeature {
        let height = pixels.iter().map(|p| p.1).fold(0.0, f32::max);
        ImagingFeature::builder()
            .id(FeatureId(id))
            .mz(mz)
            .mobility(mobility)
            .mobility_range(TupleRange::try_new(mobility - 0.01, mobility + 0.01).unwrap())
            .height(height)
            .area(area)
            .pixels(
                pixels
                    .iter()
                    .map(|((x, y), intensity)| PixelIntensity {
                        frame: self.frame_id(*x, *y),
                        intensity: *intensity,
                    })
                    .collect(),
            )
            .build()
    }
}
