//! End-to-end sweep scenarios over real (temporary) sample directories.
//!
//! The engine is a closure; the filesystem layout drives the missing/scored
//! split exactly as it does in production.

use std::cell::Cell;
use std::fs;
use std::path::Path;

use anyhow::bail;
use tempfile::TempDir;

use barrido::aggregate::Aggregation;
use barrido::config::SweepConfig;
use barrido::sweep::{Decision, PointStatus, SweepRunner};
use barrido::Error;

struct Fixture {
    _dir: TempDir,
    config: SweepConfig,
}

/// A samples root containing the given sample folders, plus a reference dir.
fn fixture(steps: &[u32], etas: &[f64], sample_dirs: &[&str]) -> Fixture {
    let dir = TempDir::new().expect("tempdir");
    let reference = dir.path().join("reference");
    let samples = dir.path().join("samples");
    fs::create_dir(&reference).unwrap();
    fs::create_dir(&samples).unwrap();
    for name in sample_dirs {
        fs::create_dir(samples.join(name)).unwrap();
    }

    let config = SweepConfig {
        reference_path: reference,
        samples_root: samples,
        steps: steps.to_vec(),
        etas: etas.to_vec(),
        image_size: 256,
        batch_size: 64,
    };
    Fixture { _dir: dir, config }
}

fn panicking_engine() -> impl Fn(&Path, &Path, u32, u32) -> anyhow::Result<f64> {
    |_: &Path, _: &Path, _: u32, _: u32| panic!("engine must not be invoked")
}

// =============================================================================
// Single-point scenario
// =============================================================================

#[test]
fn test_single_point_sweep() {
    let fx = fixture(&[10], &[0.0], &["steps_10_eta_0"]);
    let engine = |_: &Path, _: &Path, _: u32, _: u32| -> anyhow::Result<f64> { Ok(5.0) };

    let run = SweepRunner::new(&fx.config, &engine)
        .run(&Decision::Abort)
        .unwrap();
    let results = run.results();

    assert_eq!(results.len(), 1);
    let record = &results.records()[0];
    assert_eq!(record.status(), PointStatus::Scored);
    assert_eq!(record.fid(), Some(5.0));
    assert_eq!(record.point().steps(), 10);
    assert_eq!(record.point().eta(), 0.0);

    let agg = Aggregation::from_results(results);
    assert_eq!(agg.stats().mean(), Some(5.0));
    assert_eq!(agg.stats().min(), Some(5.0));
    assert_eq!(agg.stats().max(), Some(5.0));
    assert_eq!(agg.stats().std(), None, "single sample has no std");

    assert_eq!(agg.pivot().n_rows(), 1);
    assert_eq!(agg.pivot().n_cols(), 1);
    assert_eq!(agg.pivot().cell(0, 0), Some(5.0));

    // Best and worst are both the single record.
    assert_eq!(agg.best().unwrap().fid(), Some(5.0));
    assert_eq!(agg.worst().unwrap().fid(), Some(5.0));
    assert!(run.info().finished_at() >= run.info().started_at());
}

// =============================================================================
// Mixed-status scenario: ok / error / ok / missing
// =============================================================================

#[test]
fn test_mixed_statuses_sweep() {
    // (20, 1.0) folder absent; engine fails on (10, 1.0).
    let fx = fixture(
        &[10, 20],
        &[0.0, 1.0],
        &["steps_10_eta_0", "steps_10_eta_1", "steps_20_eta_0"],
    );
    let engine = |_: &Path, sample: &Path, _: u32, _: u32| -> anyhow::Result<f64> {
        match sample.file_name().and_then(|n| n.to_str()).unwrap() {
            "steps_10_eta_0" => Ok(3.0),
            "steps_10_eta_1" => bail!("CUDA out of memory"),
            "steps_20_eta_0" => Ok(4.0),
            other => bail!("unexpected sample folder {other}"),
        }
    };

    let run = SweepRunner::new(&fx.config, &engine)
        .run(&Decision::Abort)
        .unwrap();
    let results = run.results();

    assert_eq!(results.len(), 4);
    let statuses: Vec<PointStatus> = results.records().iter().map(|r| r.status()).collect();
    assert_eq!(
        statuses,
        vec![
            PointStatus::Scored,
            PointStatus::EngineFailed,
            PointStatus::Scored,
            PointStatus::MissingSample,
        ]
    );
    assert!(results.records()[1].detail().unwrap().contains("CUDA"));

    let agg = Aggregation::from_results(results);
    assert_eq!(agg.stats().mean(), Some(3.5));
    assert_eq!(agg.stats().min(), Some(3.0));
    assert_eq!(agg.stats().max(), Some(4.0));
    assert!((agg.stats().std().unwrap() - 0.5f64.sqrt()).abs() < 1e-12);

    let best = agg.best().unwrap();
    assert_eq!((best.point().steps(), best.point().eta()), (10, 0.0));
    assert_eq!(best.fid(), Some(3.0));

    let worst = agg.worst().unwrap();
    assert_eq!((worst.point().steps(), worst.point().eta()), (20, 0.0));
    assert_eq!(worst.fid(), Some(4.0));
}

// =============================================================================
// Failure isolation and short-circuit protection
// =============================================================================

#[test]
fn test_all_samples_missing_never_short_circuits() {
    let fx = fixture(&[10, 20], &[0.0, 0.2], &[]);

    let run = SweepRunner::new(&fx.config, &panicking_engine())
        .run(&Decision::Abort)
        .unwrap();
    let results = run.results();

    assert_eq!(results.len(), 4);
    assert!(results
        .records()
        .iter()
        .all(|r| r.status() == PointStatus::MissingSample));

    let agg = Aggregation::from_results(results);
    assert_eq!(agg.stats().min(), None);
    assert_eq!(agg.stats().max(), None);
    assert_eq!(agg.stats().mean(), None);
    assert!(agg.best().is_none());
    assert!(agg.worst().is_none());
}

#[test]
fn test_every_engine_failure_still_yields_a_record() {
    let fx = fixture(&[10, 20], &[0.0], &["steps_10_eta_0", "steps_20_eta_0"]);
    let engine =
        |_: &Path, _: &Path, _: u32, _: u32| -> anyhow::Result<f64> { bail!("model crashed") };

    let run = SweepRunner::new(&fx.config, &engine)
        .run(&Decision::Abort)
        .unwrap();

    assert_eq!(run.results().len(), 2);
    assert!(run
        .results()
        .records()
        .iter()
        .all(|r| r.status() == PointStatus::EngineFailed));
}

#[test]
fn test_equal_scores_pick_first_in_grid_order() {
    let fx = fixture(
        &[10, 20],
        &[0.0, 0.2],
        &[
            "steps_10_eta_0",
            "steps_10_eta_02",
            "steps_20_eta_0",
            "steps_20_eta_02",
        ],
    );
    let engine = |_: &Path, _: &Path, _: u32, _: u32| -> anyhow::Result<f64> { Ok(2.0) };

    let run = SweepRunner::new(&fx.config, &engine)
        .run(&Decision::Abort)
        .unwrap();
    let agg = Aggregation::from_results(run.results());

    let best = agg.best().unwrap();
    let worst = agg.worst().unwrap();
    assert_eq!((best.point().steps(), best.point().eta()), (10, 0.0));
    assert_eq!((worst.point().steps(), worst.point().eta()), (10, 0.0));
}

// =============================================================================
// Engine parameter forwarding
// =============================================================================

#[test]
fn test_engine_receives_fixed_parameters_and_reference() {
    let fx = fixture(&[10], &[0.5], &["steps_10_eta_05"]);
    let seen = Cell::new((0u32, 0u32));
    let reference = fx.config.reference_path.clone();

    let engine = |r: &Path, sample: &Path, img: u32, batch: u32| -> anyhow::Result<f64> {
        assert_eq!(r, reference.as_path());
        assert!(sample.ends_with("steps_10_eta_05"));
        seen.set((img, batch));
        Ok(1.0)
    };

    SweepRunner::new(&fx.config, &engine)
        .run(&Decision::Abort)
        .unwrap();
    assert_eq!(seen.get(), (256, 64));
}

// =============================================================================
// Pre-sweep failures (fatal, outside the point boundary)
// =============================================================================

#[test]
fn test_unknown_eta_fails_before_any_scoring() {
    let fx = fixture(&[10], &[0.3], &[]);

    let err = SweepRunner::new(&fx.config, &panicking_engine())
        .run(&Decision::Abort)
        .unwrap_err();
    assert!(matches!(err, Error::UnknownEta(_)));
}

#[test]
fn test_missing_samples_root_is_fatal() {
    let fx = fixture(&[10], &[0.0], &[]);
    let mut config = fx.config.clone();
    config.samples_root = fx.config.samples_root.join("nope");

    let err = SweepRunner::new(&config, &panicking_engine())
        .run(&Decision::Abort)
        .unwrap_err();
    assert!(matches!(err, Error::SamplesRootMissing(_)));
}

#[test]
fn test_missing_reference_abort_policy_terminates_run() {
    let fx = fixture(&[10], &[0.0], &["steps_10_eta_0"]);
    let mut config = fx.config.clone();
    config.reference_path = fx.config.reference_path.join("gone");

    let err = SweepRunner::new(&config, &panicking_engine())
        .run(&Decision::Abort)
        .unwrap_err();
    assert!(matches!(err, Error::ReferenceMissing(_)));
}

#[test]
fn test_missing_reference_proceed_policy_runs_sweep() {
    let fx = fixture(&[10], &[0.0], &["steps_10_eta_0"]);
    let mut config = fx.config.clone();
    config.reference_path = fx.config.reference_path.join("gone");

    let engine = |_: &Path, _: &Path, _: u32, _: u32| -> anyhow::Result<f64> { Ok(7.0) };
    let run = SweepRunner::new(&config, &engine)
        .run(&Decision::Proceed)
        .unwrap();
    assert_eq!(run.results().records()[0].fid(), Some(7.0));
}

#[test]
fn test_policy_callback_sees_the_reference_path() {
    let fx = fixture(&[10], &[0.0], &[]);
    let mut config = fx.config.clone();
    config.reference_path = fx.config.reference_path.join("gone");

    let asked = Cell::new(false);
    let policy = |reference: &Path| {
        assert!(reference.ends_with("gone"));
        asked.set(true);
        Decision::Abort
    };

    let err = SweepRunner::new(&config, &panicking_engine())
        .run(&policy)
        .unwrap_err();
    assert!(asked.get());
    assert!(matches!(err, Error::ReferenceMissing(_)));
}
