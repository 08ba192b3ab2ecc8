use crate::models::{
    FrameId,
    ImagingDataset,
    ImagingFrame,
    MobilityScan,
};
use crate::utils::constants::{
    C13_ISOTOPE_DISTANCE,
    ISOTOPE_MZ_TOLERANCE_DA,
    ISOTOPE_MZ_TOLERANCE_PPM,
};
use crate::utils::TupleRange;

/// Scores how clean an isolation window is at a frame.
///
/// Implementations may keep a cursor into the raw data, so queries take `&mut self`.
pub trait PurityScorer {
    /// Fraction of the isolation window intensity that belongs to the precursor, in [0, 1].
    fn purity(
        &mut self,
        frame: FrameId,
        precursor_mz: f64,
        isolation_window: TupleRange<f64>,
        mobility_window: TupleRange<f32>,
    ) -> f64;
}

/// Stateful cursor over the mobility scans of one frame at a time.
pub struct MobilityScanCursor<'a> {
    dataset: &'a ImagingDataset,
    current: Option<&'a ImagingFrame>,
    sum_isotopes: bool,
}

impl<'a> MobilityScanCursor<'a> {
    pub fn new(dataset: &'a ImagingDataset) -> Self {
        Self {
            dataset,
            current: None,
            sum_isotopes: true,
        }
    }

    pub fn with_isotopes(mut self, sum_isotopes: bool) -> Self {
        self.sum_isotopes = sum_isotopes;
        self
    }

    /// Positions the cursor on `frame`. Unknown frames leave it on no frame.
    pub fn jump_to_frame(&mut self, frame: FrameId) {
        self.current = self.dataset.frame(frame);
    }

    pub fn mobility_scans(&self) -> &'a [MobilityScan] {
        match self.current {
            Some(frame) => &frame.mobility_scans,
            None => &[],
        }
    }
}

impl PurityScorer for MobilityScanCursor<'_> {
    fn purity(
        &mut self,
        frame: FrameId,
        precursor_mz: f64,
        isolation_window: TupleRange<f64>,
        mobility_window: TupleRange<f32>,
    ) -> f64 {
        self.jump_to_frame(frame);
        purity_in_mz_and_mobility_range(
            precursor_mz,
            self.mobility_scans(),
            isolation_window,
            mobility_window,
            self.sum_isotopes,
        )
    }
}

fn is_potential_isotope(monoisotopic_mz: f64, mz_to_check: f64) -> bool {
    let num_c13 = (mz_to_check - monoisotopic_mz).round();
    let expected = monoisotopic_mz + num_c13 * C13_ISOTOPE_DISTANCE;
    let tolerance = ISOTOPE_MZ_TOLERANCE_DA.max(expected * ISOTOPE_MZ_TOLERANCE_PPM / 1e6);
    (expected - mz_to_check).abs() <= tolerance
}

/// Precursor intensity divided by the total intensity in the isolation window,
/// summed over all mobility scans inside `mobility_window`.
///
/// The precursor is the peak closest to `precursor_mz` in each scan. With
/// `sum_isotopes` its 13C isotope peaks count as precursor intensity too.
/// Returns 0 when the window holds no intensity.
pub fn purity_in_mz_and_mobility_range(
    precursor_mz: f64,
    scans: &[MobilityScan],
    isolation_window: TupleRange<f64>,
    mobility_window: TupleRange<f32>,
    sum_isotopes: bool,
) -> f64 {
    let mut precursor_intensity = 0.0_f64;
    let mut window_intensity = 0.0_f64;

    for scan in scans {
        if scan.num_peaks() == 0 || !mobility_window.contains(scan.mobility) {
            continue;
        }
        let Some(closest) = scan.closest_index(precursor_mz) else {
            continue;
        };

        let scan_precursor_mz = scan.mz[closest];
        if isolation_window.contains(scan_precursor_mz) {
            precursor_intensity += scan.intensity[closest] as f64;
            window_intensity += scan.intensity[closest] as f64;
        }

        let mut add_neighbour = |i: usize| -> bool {
            if !isolation_window.contains(scan.mz[i]) {
                return false;
            }
            window_intensity += scan.intensity[i] as f64;
            if sum_isotopes && is_potential_isotope(scan_precursor_mz, scan.mz[i]) {
                precursor_intensity += scan.intensity[i] as f64;
            }
            true
        };

        for i in (0..closest).rev() {
            if !add_neighbour(i) {
                break;
            }
        }
        for i in (closest + 1)..scan.num_peaks() {
            if !add_neighbour(i) {
                break;
            }
        }
    }

    if window_intensity > 0.0 {
        precursor_intensity / window_intensity
    } else {
        0.0
    }
}
