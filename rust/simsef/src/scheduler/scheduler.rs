use super::registry::{
    FeatureSpotIndex,
    SpotRegistry,
};
use crate::cancel::CancellationToken;
use crate::config::SchedulerConfig;
use crate::errors::{
    ConfigError,
    Result,
    UnsupportedDataError,
};
use crate::models::{
    AcquisitionMode,
    FeatureId,
    FrameId,
    ImagingDataset,
    ImagingFeature,
    Precursor,
    Spot,
};
use crate::oracle::{
    AssignedSpot,
    CollisionEnergyRules,
    DistanceRules,
    MobilityScanCursor,
    PurityScorer,
    adjust_mobility_range,
    mobility_distance_for_switch_time,
};
use indicatif::ProgressBar;
use std::collections::HashMap;
use std::time::Instant;
use tracing::{
    debug,
    info,
    instrument,
    trace,
    warn,
};

/// Result of a finished scheduling run.
#[derive(Debug)]
pub struct Schedule {
    /// Ordered by x then y index.
    pub spots: Vec<Spot>,
    precursors: Vec<Precursor>,
    precursor_index: HashMap<FeatureId, usize>,
    pub feature_spots: FeatureSpotIndex,
    /// Number of features (value) that ended with a given number of spectra (index).
    pub spectra_histogram: Vec<usize>,
    pub min_mobility_distance: f32,
}

impl Schedule {
    pub fn new(
        spots: Vec<Spot>,
        precursors: Vec<Precursor>,
        feature_spots: FeatureSpotIndex,
        spectra_histogram: Vec<usize>,
        min_mobility_distance: f32,
    ) -> Self {
        let precursor_index = precursors
            .iter()
            .enumerate()
            .map(|(i, p)| (p.feature(), i))
            .collect();
        Self {
            spots,
            precursors,
            precursor_index,
            feature_spots,
            spectra_histogram,
            min_mobility_distance,
        }
    }

    /// One per scheduled feature, in processing order.
    pub fn precursors(&self) -> &[Precursor] {
        &self.precursors
    }

    pub fn precursor(&self, feature: FeatureId) -> Option<&Precursor> {
        self.precursor_index
            .get(&feature)
            .map(|&idx| &self.precursors[idx])
    }

    pub fn assigned_spots(&self, feature: FeatureId) -> &[AssignedSpot] {
        self.feature_spots.spots_for(feature)
    }

    pub fn total_spectra(&self) -> u32 {
        self.precursors.iter().map(|p| p.total_spot_count()).sum()
    }
}

#[derive(Debug)]
pub enum ScheduleOutcome {
    Finished(Schedule),
    /// The run was cancelled, nothing it produced is usable.
    Cancelled,
}

impl ScheduleOutcome {
    pub fn finished(self) -> Option<Schedule> {
        match self {
            ScheduleOutcome::Finished(schedule) => Some(schedule),
            ScheduleOutcome::Cancelled => None,
        }
    }
}

struct RunState<'d> {
    dataset: &'d ImagingDataset,
    registry: SpotRegistry,
    feature_spots: FeatureSpotIndex,
    precursors: Vec<Precursor>,
    spectra_histogram: Vec<usize>,
    min_mobility_distance: f32,
}

impl RunState<'_> {
    fn record_spectra(&mut self, total: u32) {
        let last = self.spectra_histogram.len() - 1;
        self.spectra_histogram[(total as usize).min(last)] += 1;
    }

    fn into_schedule(self) -> Schedule {
        Schedule::new(
            self.registry.into_sorted_spots(),
            self.precursors,
            self.feature_spots,
            self.spectra_histogram,
            self.min_mobility_distance,
        )
    }
}

/// Greedy MS/MS spot scheduler for one imaging raw file.
///
/// Features are processed one at a time, weakest first. Each feature first
/// tries to join spots created for earlier features and only then creates
/// new spots on its own most intense pixels.
pub struct Scheduler<R: CollisionEnergyRules, P: PurityScorer> {
    config: SchedulerConfig,
    mode: AcquisitionMode,
    total_spectra: u32,
    rules: R,
    purity: P,
    cancel: CancellationToken,
    progress: ProgressBar,
}

impl<R: CollisionEnergyRules, P: PurityScorer> Scheduler<R, P> {
    pub fn new(
        config: SchedulerConfig,
        rules: R,
        purity: P,
    ) -> std::result::Result<Self, ConfigError> {
        let mode = config.validate()?;
        let total_spectra = config.total_spectra_per_feature()?;
        Ok(Self {
            config,
            mode,
            total_spectra,
            rules,
            purity,
            cancel: CancellationToken::new(),
            progress: ProgressBar::hidden(),
        })
    }

    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn with_progress(mut self, progress: ProgressBar) -> Self {
        self.progress = progress;
        self
    }

    pub fn mode(&self) -> AcquisitionMode {
        self.mode
    }

    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    #[instrument(skip_all, fields(num_features = features.len()))]
    pub fn run(
        &mut self,
        dataset: &ImagingDataset,
        features: &[ImagingFeature],
    ) -> Result<ScheduleOutcome> {
        if !dataset.is_ion_mobility() {
            return Err(UnsupportedDataError::NotIonMobility.into());
        }
        check_feature_frames(dataset, features)?;

        let start = Instant::now();
        let min_mobility_distance = self.min_mobility_distance(dataset, features)?;
        debug!("Minimum mobility distance between precursors: {min_mobility_distance}");

        let mut state = RunState {
            dataset,
            registry: SpotRegistry::new(),
            feature_spots: FeatureSpotIndex::new(),
            precursors: Vec::new(),
            spectra_histogram: vec![0; self.total_spectra as usize + 1],
            min_mobility_distance,
        };

        // Weak features first, while there is still plenty of room in the spots.
        let mut queue: Vec<&ImagingFeature> = features.iter().collect();
        queue.sort_by(|a, b| a.area().total_cmp(&b.area()));

        self.progress.set_length(queue.len() as u64);
        let mut below_threshold = 0;
        let mut spot_limit_reached = 0;
        for feature in queue {
            if self.cancel.is_cancelled() {
                info!("Scheduling cancelled");
                self.progress.abandon();
                return Ok(ScheduleOutcome::Cancelled);
            }
            self.progress.inc(1);

            let threshold = self.config.min_intensity.for_height(feature.height());
            if feature.height() < threshold {
                below_threshold += 1;
                continue;
            }

            let mobility_window = adjust_mobility_range(
                feature.mobility(),
                feature.mobility_range(),
                self.config.min_mobility_width,
                self.config.max_mobility_width,
                dataset.mobility_bounds(),
            );
            let mut precursor =
                Precursor::new(feature, mobility_window, &self.config.collision_energies);

            self.add_to_existing_spots(&mut state, feature, &mut precursor, threshold);

            if precursor.lowest_count_across_collision_energies() < self.config.spectra_per_feature
            {
                if state.registry.len() >= dataset.num_frames() {
                    // reuse of existing spots is still possible for later features
                    if spot_limit_reached == 0 {
                        warn!("Too many MS/MS spots, cannot create any more.");
                    }
                    spot_limit_reached += 1;
                } else {
                    self.create_new_spots(&mut state, feature, &mut precursor, threshold);
                }
            }

            trace!(
                "Feature {} scheduled with {} spectra",
                precursor.feature(),
                precursor.total_spot_count()
            );
            state.record_spectra(precursor.total_spot_count());
            state.precursors.push(precursor);
        }
        self.progress.finish();

        let num_scheduled = state.precursors.len();
        for (num_spectra, count) in state.spectra_histogram.iter().enumerate() {
            debug!(
                "{} features have {} MS/MS spectra ({:.1} %)",
                count,
                num_spectra,
                *count as f64 / num_scheduled.max(1) as f64 * 100.0
            );
        }
        info!(
            "Scheduled {} features on {} spots in {:?} ({} below intensity threshold, {} hit the spot limit)",
            num_scheduled,
            state.registry.len(),
            start.elapsed(),
            below_threshold,
            spot_limit_reached,
        );

        Ok(ScheduleOutcome::Finished(state.into_schedule()))
    }

    fn min_mobility_distance(
        &self,
        dataset: &ImagingDataset,
        features: &[ImagingFeature],
    ) -> Result<f32> {
        let Some(frame_id) = features.iter().find_map(|f| f.representative_frame()) else {
            // without pixels nothing can be scheduled anyway
            return Ok(0.0);
        };
        let frame = dataset
            .frame(frame_id)
            .ok_or(UnsupportedDataError::UnknownFrame(frame_id))?;
        Ok(mobility_distance_for_switch_time(
            frame,
            dataset.ramp_time_ms(),
            self.config.quad_switch_time_ms,
        )?)
    }

    fn passes_purity(&mut self, frame: FrameId, precursor: &Precursor) -> bool {
        let Some(isolation_window) = self.config.isolation_window(precursor.mz()) else {
            return false;
        };
        let purity = self.purity.purity(
            frame,
            precursor.mz(),
            isolation_window,
            precursor.mobility_window(),
        );
        trace!("Purity of {} at {:?}: {:.3}", precursor.feature(), frame, purity);
        purity >= self.config.min_purity
    }

    /// Adds the precursor to spots other features already created on this feature's pixels.
    fn add_to_existing_spots(
        &mut self,
        state: &mut RunState<'_>,
        feature: &ImagingFeature,
        precursor: &mut Precursor,
        threshold: f32,
    ) {
        let dataset = state.dataset;
        let target = self.config.spectra_per_feature;
        let min_mobility_distance = state.min_mobility_distance;

        let candidates: Vec<_> = feature
            .pixels()
            .iter()
            .filter(|pixel| pixel.intensity >= threshold)
            .filter_map(|pixel| {
                dataset
                    .spot_info(pixel.frame)
                    .map(|info| (pixel.frame, info.location()))
            })
            .filter(|(_, location)| state.registry.contains(location))
            .collect();

        for (frame, location) in candidates {
            let Some(spot) = state.registry.get(&location) else {
                continue;
            };
            if !spot.can_accept_precursor(precursor, min_mobility_distance) {
                continue;
            }
            let spot_ce = spot.collision_energy();

            let allowed = self.rules.possible_for_reuse(
                precursor,
                state.feature_spots.spots_for(precursor.feature()),
                location,
                &self.config.collision_energies,
                target,
            );
            if !allowed.contains(&spot_ce) {
                continue;
            }

            if !self.passes_purity(frame, precursor) {
                continue;
            }

            if let Some(spot) = state.registry.get_mut(&location) {
                if spot.try_add_precursor(precursor, min_mobility_distance) {
                    state.feature_spots.record(precursor.feature(), spot);
                }
            }

            if precursor.lowest_count_across_collision_energies() >= target {
                break;
            }
        }
    }

    /// Creates spots on the feature's own pixels, most intense first.
    fn create_new_spots(
        &mut self,
        state: &mut RunState<'_>,
        feature: &ImagingFeature,
        precursor: &mut Precursor,
        threshold: f32,
    ) {
        let dataset = state.dataset;
        let target = self.config.spectra_per_feature;
        let total_target = self.total_spectra;
        let min_mobility_distance = state.min_mobility_distance;
        let mode = self.mode;

        for idx in feature.intensity_sorted_indices() {
            if precursor.total_spot_count() >= total_target {
                break;
            }
            let pixel = feature.pixels()[idx];
            // sorted by intensity, all remaining pixels are weaker
            if pixel.intensity < threshold {
                break;
            }
            let Some(info) = dataset.spot_info(pixel.frame) else {
                continue;
            };
            let location = info.location();

            // Claimed locations were offered in the reuse pass already. Their
            // energy is fixed, so they only qualify if the best energy matches.
            let existing_ce = match state.registry.get(&location) {
                Some(spot) if !spot.can_accept_precursor(precursor, min_mobility_distance) => {
                    continue;
                }
                Some(spot) => Some(spot.collision_energy()),
                None => None,
            };

            let Some(ce) = self.rules.best_for_new_spot(
                precursor,
                state.feature_spots.spots_for(precursor.feature()),
                location,
                &self.config.collision_energies,
                target,
                self.config.new_spot_ce_lookahead,
            ) else {
                continue;
            };
            if existing_ce.is_some_and(|existing| existing != ce) {
                continue;
            }

            if !self.passes_purity(pixel.frame, precursor) {
                continue;
            }

            let spot = state
                .registry
                .get_or_create(location, || Spot::new(info.clone(), mode, ce));
            if spot.try_add_precursor(precursor, min_mobility_distance) {
                state.feature_spots.record(precursor.feature(), spot);
            }
        }
    }
}

fn check_feature_frames(
    dataset: &ImagingDataset,
    features: &[ImagingFeature],
) -> std::result::Result<(), UnsupportedDataError> {
    for feature in features {
        for pixel in feature.pixels() {
            if dataset.frame(pixel.frame).is_none() {
                return Err(UnsupportedDataError::UnknownFrame(pixel.frame));
            }
        }
    }
    Ok(())
}

/// Runs the scheduler with the distance based energy rules and purity
/// computed from the dataset's mobility scans.
pub fn schedule(
    config: SchedulerConfig,
    dataset: &ImagingDataset,
    features: &[ImagingFeature],
    cancel: CancellationToken,
) -> Result<ScheduleOutcome> {
    let rules = DistanceRules::new(config.min_spot_distance);
    let cursor = MobilityScanCursor::new(dataset);
    Scheduler::new(config, rules, cursor)?
        .with_cancellation(cancel)
        .run(dataset, features)
}
