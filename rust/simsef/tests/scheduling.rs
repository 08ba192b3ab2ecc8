mod common;

use common::SyntheticImage;
use simsef::models::{
    FeatureId,
    ImagingDataset,
    ImagingFeature,
    SpotInfo,
    SpotLocation,
};
use simsef::{
    CancellationToken,
    CollisionEnergy,
    ConfigError,
    Schedule,
    ScheduleOutcome,
    SchedulerConfig,
    SchedulerError,
    UnsupportedDataError,
};

fn ces(values: &[f64]) -> Vec<CollisionEnergy> {
    values.iter().map(|v| CollisionEnergy(*v)).collect()
}

fn run(config: SchedulerConfig, dataset: &ImagingDataset, features: &[ImagingFeature]) -> Schedule {
    match simsef::schedule(config, dataset, features, CancellationToken::new()).unwrap() {
        ScheduleOutcome::Finished(schedule) => schedule,
        ScheduleOutcome::Cancelled => panic!("run was not cancelled"),
    }
}

fn locations(schedule: &Schedule) -> Vec<(i32, i32)> {
    schedule
        .spots
        .iter()
        .map(|s| (s.location().x, s.location().y))
        .collect()
}

fn spot_ces(schedule: &Schedule) -> Vec<f64> {
    schedule.spots.iter().map(|s| s.collision_energy().0).collect()
}

#[test]
fn test_single_mode_uses_one_spot_per_energy() {
    let image = SyntheticImage::new(12, 1, &[500.0]);
    let dataset = image.build();
    let features = vec![image.feature(
        1,
        500.0,
        1.0,
        1e6,
        &[((0, 0), 1e5), ((5, 0), 8e4), ((10, 0), 6e4)],
    )];
    let config = SchedulerConfig {
        spectra_per_feature: 1,
        collision_energies: ces(&[20.0, 35.0]),
        ..Default::default()
    };

    let schedule = run(config, &dataset, &features);
    assert_eq!(locations(&schedule), vec![(0, 0), (5, 0)]);
    assert_eq!(spot_ces(&schedule), vec![20.0, 35.0]);
    for spot in &schedule.spots {
        let hosted: Vec<_> = spot.precursors().map(|p| p.feature).collect();
        assert_eq!(hosted, vec![FeatureId(1)]);
    }
    let precursor = schedule.precursor(FeatureId(1)).unwrap();
    assert_eq!(precursor.total_spot_count(), 2);
}

#[test]
fn test_two_spectra_per_energy_with_two_usable_pixels() {
    let image = SyntheticImage::new(12, 1, &[500.0]);
    let dataset = image.build();
    // the third pixel is below the 1e3 intensity threshold
    let features = vec![image.feature(
        1,
        500.0,
        1.0,
        1e6,
        &[((0, 0), 1e5), ((5, 0), 9e4), ((10, 0), 500.0)],
    )];
    let config = SchedulerConfig {
        spectra_per_feature: 2,
        collision_energies: ces(&[20.0, 35.0]),
        ..Default::default()
    };

    let schedule = run(config, &dataset, &features);
    assert_eq!(schedule.spots.len(), 2);
    assert_ne!(
        schedule.spots[0].collision_energy(),
        schedule.spots[1].collision_energy()
    );
    let precursor = schedule.precursor(FeatureId(1)).unwrap();
    assert_eq!(precursor.spot_count_for_collision_energy(CollisionEnergy(20.0)), 1);
    assert_eq!(precursor.spot_count_for_collision_energy(CollisionEnergy(35.0)), 1);
}

#[test]
fn test_energies_alternate_until_target() {
    let image = SyntheticImage::new(16, 1, &[500.0]);
    let dataset = image.build();
    let features = vec![image.feature(
        1,
        500.0,
        1.0,
        1e6,
        &[
            ((0, 0), 1e5),
            ((5, 0), 9e4),
            ((10, 0), 8e4),
            ((15, 0), 7e4),
        ],
    )];
    let config = SchedulerConfig {
        spectra_per_feature: 2,
        collision_energies: ces(&[20.0, 35.0]),
        ..Default::default()
    };

    let schedule = run(config, &dataset, &features);
    assert_eq!(locations(&schedule), vec![(0, 0), (5, 0), (10, 0), (15, 0)]);
    assert_eq!(spot_ces(&schedule), vec![20.0, 35.0, 20.0, 35.0]);
    assert_eq!(schedule.spectra_histogram, vec![0, 0, 0, 0, 1]);
}

#[test]
fn test_same_energy_spots_keep_distance() {
    let image = SyntheticImage::new(4, 1, &[500.0]);
    let dataset = image.build();
    let features = vec![image.feature(
        1,
        500.0,
        1.0,
        1e6,
        &[((0, 0), 1e5), ((1, 0), 9e4), ((2, 0), 8e4), ((3, 0), 7e4)],
    )];
    let config = SchedulerConfig {
        spectra_per_feature: 3,
        collision_energies: ces(&[20.0]),
        min_spot_distance: 3.0,
        ..Default::default()
    };

    let schedule = run(config, &dataset, &features);
    assert_eq!(locations(&schedule), vec![(0, 0), (3, 0)]);
}

#[test]
fn test_triple_spot_fills_three_quadrants() {
    let image = SyntheticImage::new(2, 2, &[500.0, 600.0, 700.0, 800.0]);
    let dataset = image.build();
    // same pixel and overlapping mobility for all four, weakest first
    let features: Vec<_> = (1..=4)
        .map(|i| {
            image.feature(
                i,
                400.0 + 100.0 * i as f64,
                1.0,
                1e3 * i as f32,
                &[((0, 0), 1e5)],
            )
        })
        .collect();
    let config = SchedulerConfig {
        spectra_per_feature: 1,
        collision_energies: ces(&[30.0]),
        acquisition_mode: "triple".to_string(),
        ..Default::default()
    };

    let schedule = run(config, &dataset, &features);
    assert_eq!(schedule.spots.len(), 1);
    let spot = &schedule.spots[0];
    assert_eq!(spot.collision_energy(), CollisionEnergy(30.0));
    assert!(spot.precursor_list(0, 0).is_none());
    for ((x, y), feature) in [((0, 1), 1), ((1, 0), 2), ((1, 1), 3)] {
        let list = spot.precursor_list(x, y).unwrap();
        assert_eq!(list.len(), 1);
        assert_eq!(list[0].feature, FeatureId(feature));
    }

    let rejected = schedule.precursor(FeatureId(4)).unwrap();
    assert_eq!(rejected.total_spot_count(), 0);
    assert!(schedule.assigned_spots(FeatureId(4)).is_empty());
    assert_eq!(schedule.spectra_histogram, vec![1, 3]);
}

#[test]
fn test_pixels_of_one_spot_fill_its_quadrants() {
    let image = SyntheticImage::new(4, 1, &[500.0]);
    let built = image.build();
    // four frames acquired on the same physical spot
    let frames = built
        .frames()
        .iter()
        .cloned()
        .map(|mut frame| {
            frame.spot_info = Some(SpotInfo {
                spot_name: "R00X000Y000".to_string(),
                x_index: 0,
                y_index: 0,
            });
            frame
        })
        .collect();
    let dataset = ImagingDataset::new(
        frames,
        built.mobility_bounds(),
        built.ramp_time_ms(),
        true,
    );
    let features = vec![image.feature(
        1,
        500.0,
        1.0,
        1e6,
        &[((0, 0), 1e5), ((1, 0), 9e4), ((2, 0), 8e4), ((3, 0), 7e4)],
    )];
    let config = SchedulerConfig {
        spectra_per_feature: 4,
        collision_energies: ces(&[30.0]),
        acquisition_mode: "triple".to_string(),
        min_spot_distance: 0.0,
        ..Default::default()
    };

    let schedule = run(config, &dataset, &features);
    assert_eq!(schedule.spots.len(), 1);
    let spot = &schedule.spots[0];
    for (offset, list) in spot.all_quadrant_lists() {
        assert_eq!(list.len(), 1, "quadrant {offset:?}");
        assert_eq!(list[0].feature, FeatureId(1));
    }
    assert!(schedule
        .assigned_spots(FeatureId(1))
        .iter()
        .all(|s| s.collision_energy == CollisionEnergy(30.0)));
    // the fourth pixel found no free quadrant
    assert_eq!(schedule.precursor(FeatureId(1)).unwrap().total_spot_count(), 3);
}

#[test]
fn test_weak_feature_gets_no_spots() {
    let image = SyntheticImage::new(4, 1, &[500.0]);
    let dataset = image.build();
    let features = vec![image.feature(1, 500.0, 1.0, 1e4, &[((0, 0), 500.0), ((2, 0), 400.0)])];

    let schedule = run(SchedulerConfig::default(), &dataset, &features);
    assert!(schedule.spots.is_empty());
    assert!(schedule.precursor(FeatureId(1)).is_none());
    assert!(schedule.spectra_histogram.iter().all(|c| *c == 0));
}

#[test]
fn test_impure_pixel_is_skipped() {
    let image = SyntheticImage::new(6, 1, &[500.0]).with_contaminant(0, 0, 500.4, 1000.0);
    let dataset = image.build();
    let features = vec![image.feature(1, 500.0, 1.0, 1e6, &[((0, 0), 1e5), ((5, 0), 9e4)])];
    let config = SchedulerConfig {
        spectra_per_feature: 1,
        collision_energies: ces(&[20.0]),
        ..Default::default()
    };

    let schedule = run(config, &dataset, &features);
    assert_eq!(locations(&schedule), vec![(5, 0)]);
}

#[test]
fn test_raising_min_purity_never_adds_locations() {
    // purities 1.0, 0.8, 0.6, 0.4 and 0.2 from left to right
    let image = SyntheticImage::new(21, 1, &[500.0])
        .with_contaminant(5, 0, 500.4, 25.0)
        .with_contaminant(10, 0, 500.4, 100.0 * 0.4 / 0.6)
        .with_contaminant(15, 0, 500.4, 150.0)
        .with_contaminant(20, 0, 500.4, 400.0);
    let dataset = image.build();
    let features = vec![image.feature(
        1,
        500.0,
        1.0,
        1e6,
        &[
            ((0, 0), 1e5),
            ((5, 0), 9e4),
            ((10, 0), 8e4),
            ((15, 0), 7e4),
            ((20, 0), 6e4),
        ],
    )];

    let counts: Vec<usize> = [0.0, 0.5, 0.7, 0.9, 0.95]
        .into_iter()
        .map(|min_purity| {
            let config = SchedulerConfig {
                spectra_per_feature: 10,
                collision_energies: ces(&[20.0]),
                min_purity,
                ..Default::default()
            };
            run(config, &dataset, &features).spots.len()
        })
        .collect();
    assert_eq!(counts, vec![5, 3, 2, 1, 1]);
    assert!(counts.windows(2).all(|w| w[1] <= w[0]));
}

#[test]
fn test_existing_spot_is_used_before_creating_one() {
    let image = SyntheticImage::new(6, 1, &[500.0, 700.0]);
    let dataset = image.build();
    let features = vec![
        image.feature(1, 500.0, 1.0, 1e3, &[((0, 0), 1e5)]),
        // the new spot pass alone would pick (5, 0) first
        image.feature(2, 700.0, 1.05, 2e3, &[((0, 0), 2e3), ((5, 0), 1e5)]),
    ];
    let config = SchedulerConfig {
        spectra_per_feature: 1,
        collision_energies: ces(&[20.0]),
        ..Default::default()
    };

    let schedule = run(config, &dataset, &features);
    assert_eq!(locations(&schedule), vec![(0, 0)]);
    let assigned = schedule.assigned_spots(FeatureId(2));
    assert_eq!(assigned.len(), 1);
    assert_eq!(assigned[0].location, SpotLocation { x: 0, y: 0 });
    assert_eq!(schedule.spots[0].num_precursors(), 2);
}

#[test]
fn test_no_new_spots_once_every_pixel_has_one() {
    let image = SyntheticImage::new(2, 1, &[500.0, 700.0, 900.0]);
    let dataset = image.build();
    let pixels = [((0, 0), 1e5), ((1, 0), 9e4)];
    let features = vec![
        image.feature(1, 500.0, 1.0, 1e3, &pixels),
        image.feature(2, 700.0, 1.05, 2e3, &pixels),
        // overlaps feature 1 in mobility, cannot share its spots
        image.feature(3, 900.0, 1.0, 3e3, &pixels),
    ];
    let config = SchedulerConfig {
        spectra_per_feature: 2,
        collision_energies: ces(&[20.0]),
        min_spot_distance: 0.0,
        ..Default::default()
    };

    let schedule = run(config, &dataset, &features);
    assert_eq!(schedule.spots.len(), 2);
    assert_eq!(schedule.precursor(FeatureId(1)).unwrap().total_spot_count(), 2);
    assert_eq!(schedule.precursor(FeatureId(2)).unwrap().total_spot_count(), 2);
    assert_eq!(schedule.precursor(FeatureId(3)).unwrap().total_spot_count(), 0);
}

#[test]
fn test_cancelled_run() {
    let image = SyntheticImage::new(2, 1, &[500.0]);
    let dataset = image.build();
    let features = vec![image.feature(1, 500.0, 1.0, 1e3, &[((0, 0), 1e5)])];
    let cancel = CancellationToken::new();
    cancel.cancel();

    let outcome =
        simsef::schedule(SchedulerConfig::default(), &dataset, &features, cancel).unwrap();
    assert!(matches!(outcome, ScheduleOutcome::Cancelled));
}

#[test]
fn test_rejects_non_mobility_data() {
    let image = SyntheticImage::new(2, 1, &[500.0]);
    let built = image.build();
    let dataset = ImagingDataset::new(
        built.frames().to_vec(),
        built.mobility_bounds(),
        built.ramp_time_ms(),
        false,
    );
    let features = vec![image.feature(1, 500.0, 1.0, 1e3, &[((0, 0), 1e5)])];

    let err = simsef::schedule(
        SchedulerConfig::default(),
        &dataset,
        &features,
        CancellationToken::new(),
    )
    .unwrap_err();
    assert!(matches!(
        err,
        SchedulerError::UnsupportedData(UnsupportedDataError::NotIonMobility)
    ));
}

#[test]
fn test_rejects_unknown_acquisition_mode() {
    let image = SyntheticImage::new(2, 1, &[500.0]);
    let dataset = image.build();
    let config = SchedulerConfig {
        acquisition_mode: "quadruple".to_string(),
        ..Default::default()
    };

    let err = simsef::schedule(config, &dataset, &[], CancellationToken::new()).unwrap_err();
    assert!(matches!(
        err,
        SchedulerError::Config(ConfigError::UnsupportedAcquisitionMode(_))
    ));
}

#[test]
fn test_rejects_overflowing_spectra_target() {
    let image = SyntheticImage::new(2, 1, &[500.0]);
    let dataset = image.build();
    let features = vec![image.feature(1, 500.0, 1.0, 1e3, &[((0, 0), 1e5)])];
    let config = SchedulerConfig {
        spectra_per_feature: 3_000_000_000,
        collision_energies: ces(&[20.0, 35.0]),
        ..Default::default()
    };

    let err = simsef::schedule(config, &dataset, &features, CancellationToken::new()).unwrap_err();
    assert!(matches!(
        err,
        SchedulerError::Config(ConfigError::TooManySpectra { .. })
    ));
}

#[test]
fn test_rejects_features_outside_the_dataset() {
    let image = SyntheticImage::new(2, 1, &[500.0]);
    let dataset = image.build();
    // frame 5 does not exist in a 2 x 1 image
    let features = vec![image.feature(1, 500.0, 1.0, 1e3, &[((0, 2), 1e5)])];

    let err = simsef::schedule(
        SchedulerConfig::default(),
        &dataset,
        &features,
        CancellationToken::new(),
    )
    .unwrap_err();
    assert!(matches!(
        err,
        SchedulerError::UnsupportedData(UnsupportedDataError::UnknownFrame(_))
    ));
}
