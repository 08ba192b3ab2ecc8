mod common;

use common::SyntheticImage;
use simsef::output::{
    ACQUISITION_FILE,
    PARAMETERS_FILE,
    PRECURSORS_REPORT,
    SPOTS_REPORT,
};
use simsef::{
    CancellationToken,
    CollisionEnergy,
    ImagingFeature,
    JsonPlanWriter,
    Schedule,
    SchedulerConfig,
    SchedulerError,
    WriteStatus,
    write_outputs,
};
use std::path::Path;

fn scheduled() -> (Schedule, Vec<ImagingFeature>, SchedulerConfig) {
    let image = SyntheticImage::new(10, 1, &[500.0, 700.0]);
    let dataset = image.build();
    let features = vec![
        image.feature(1, 500.0, 1.0, 1e3, &[((0, 0), 1e5), ((5, 0), 9e4)]),
        image.feature(2, 700.0, 1.05, 2e3, &[((0, 0), 2e4), ((9, 0), 3e4)]),
    ];
    let config = SchedulerConfig {
        spectra_per_feature: 1,
        collision_energies: vec![CollisionEnergy(20.0), CollisionEnergy(35.0)],
        ..Default::default()
    };
    let schedule = simsef::schedule(config.clone(), &dataset, &features, CancellationToken::new())
        .unwrap()
        .finished()
        .unwrap();
    (schedule, features, config)
}

fn write(
    directory: &Path,
    schedule: &Schedule,
    features: &[ImagingFeature],
    config: &SchedulerConfig,
) -> Result<WriteStatus, SchedulerError> {
    let mut writer = JsonPlanWriter::new(directory.join(ACQUISITION_FILE));
    write_outputs(
        directory,
        schedule,
        features,
        config,
        &mut writer,
        &CancellationToken::new(),
    )
}

fn schedule_and_write(directory: &Path) -> WriteStatus {
    let (schedule, features, config) = scheduled();
    write(directory, &schedule, &features, &config).unwrap()
}

fn read(directory: &Path, name: &str) -> String {
    std::fs::read_to_string(directory.join(name)).unwrap()
}

#[test]
fn test_writes_all_outputs() {
    let dir = tempfile::tempdir().unwrap();
    assert_eq!(schedule_and_write(dir.path()), WriteStatus::Completed);

    // feature 1 creates (0, 0) at 20 and (5, 0) at 35, feature 2 joins (0, 0)
    // and creates (9, 0) at 35
    let spots = read(dir.path(), SPOTS_REPORT);
    let lines: Vec<&str> = spots.lines().collect();
    assert_eq!(
        lines,
        vec![
            "spot_name,x_index,y_index,ce,num_precursors,precursor_ids",
            "R00X000Y000,0,0,20.0,2,{1;2}",
            "R00X005Y000,5,0,35.0,1,{1}",
            "R00X009Y000,9,0,35.0,1,{2}",
        ]
    );

    let precursors = read(dir.path(), PRECURSORS_REPORT);
    let lines: Vec<&str> = precursors.lines().collect();
    assert_eq!(
        lines[0],
        "id,height,area,mz,spots_above_threshold,total_spots,spots_20.0,spots_35.0"
    );
    assert_eq!(lines[1], "2,30000,2000,700,2,2,1,1");
    assert_eq!(lines[2], "1,100000,1000,500,2,2,1,1");

    let parameters = read(dir.path(), PARAMETERS_FILE);
    assert!(parameters.lines().any(|l| l == "spectra_per_feature: 1"));

    let plan: serde_json::Value =
        serde_json::from_str(&read(dir.path(), ACQUISITION_FILE)).unwrap();
    assert_eq!(plan["spots"].as_array().unwrap().len(), 3);
}

#[test]
fn test_reports_are_deterministic() {
    let first = tempfile::tempdir().unwrap();
    let second = tempfile::tempdir().unwrap();
    schedule_and_write(first.path());
    schedule_and_write(second.path());
    for name in [SPOTS_REPORT, PRECURSORS_REPORT, PARAMETERS_FILE, ACQUISITION_FILE] {
        assert_eq!(read(first.path(), name), read(second.path(), name), "{name}");
    }
}

#[test]
fn test_cancelled_writing_stops_early() {
    let image = SyntheticImage::new(2, 1, &[500.0]);
    let dataset = image.build();
    let features = vec![image.feature(1, 500.0, 1.0, 1e3, &[((0, 0), 1e5)])];
    let config = SchedulerConfig::default();
    let schedule = simsef::schedule(
        config.clone(),
        &dataset,
        &features,
        CancellationToken::new(),
    )
    .unwrap()
    .finished()
    .unwrap();

    let dir = tempfile::tempdir().unwrap();
    let cancel = CancellationToken::new();
    cancel.cancel();
    let mut writer = JsonPlanWriter::new(dir.path().join(ACQUISITION_FILE));
    let status =
        write_outputs(dir.path(), &schedule, &features, &config, &mut writer, &cancel).unwrap();
    assert_eq!(status, WriteStatus::Cancelled);
    assert!(!dir.path().join(SPOTS_REPORT).exists());
}

#[test]
fn test_output_directory_under_a_file_fails() {
    let (schedule, features, config) = scheduled();
    let dir = tempfile::tempdir().unwrap();
    let blocker = dir.path().join("blocker");
    std::fs::write(&blocker, "not a directory").unwrap();
    let target = blocker.join("out");

    let result = write(&target, &schedule, &features, &config);
    assert!(matches!(result, Err(SchedulerError::Io { .. })));
    assert!(!target.join(SPOTS_REPORT).exists());
    assert!(!target.join(PRECURSORS_REPORT).exists());
}

#[test]
fn test_unwritable_report_aborts_writing() {
    let (schedule, features, config) = scheduled();
    let dir = tempfile::tempdir().unwrap();
    // a directory where the spots report should go
    std::fs::create_dir(dir.path().join(SPOTS_REPORT)).unwrap();

    match write(dir.path(), &schedule, &features, &config) {
        Err(SchedulerError::Io { path, .. }) => assert_eq!(path, dir.path().join(SPOTS_REPORT)),
        other => panic!("expected an I/O error, got {other:?}"),
    }
    assert!(!dir.path().join(PRECURSORS_REPORT).exists());
    assert!(!dir.path().join(PARAMETERS_FILE).exists());
}

#[test]
fn test_schedule_only_writes_nothing() {
    let (schedule, features, mut config) = scheduled();
    config.schedule_only = true;
    let dir = tempfile::tempdir().unwrap();
    let target = dir.path().join("out");

    let status = write(&target, &schedule, &features, &config).unwrap();
    assert_eq!(status, WriteStatus::Skipped);
    assert!(!target.exists());
}
