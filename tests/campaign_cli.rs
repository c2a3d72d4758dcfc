use std::fs;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::tempdir;

const CONFIG: &str = "\
- fragment_tag: \"SMOKE DEB\"
  h_collision: 800000.0
  d_n: 100
  t0: 0.0
  h_offset: 50000.0
  target_fraction: 0.5
  max_dv: 0.01
  FoV: 0.35
  range: 250000.0
  incidence_angle: 0.52
  ablation_time: 5.0
  scan_time: 5.0
  cooldown_time: 30.0
  fluence: 8500.0
  Cm: 0.0001
  freq: 56.0
  min_perigee: 200000.0
  t_max: 3600.0
  bisect_tol: 0.01
";

// No row matches the configured tag, so the run finishes immediately with an
// empty population and still appends its summary row.
const CATALOG: &str = "\
Name,d_eq,a,e,i,long_asc,arg_peri,mean_anom,M,A_M
OTHER DEB,0.05,7178137.0,0.01,1.71,0.3,0.1,0.2,0.25,0.7
";

fn line_count(path: &std::path::Path) -> usize {
    fs::read_to_string(path).expect("read results").lines().count()
}

#[test]
fn appends_once_and_skips_known_configurations() {
    let dir = tempdir().expect("temp dir");
    let config = dir.path().join("campaign.yaml");
    let catalog = dir.path().join("fragments.csv");
    let output = dir.path().join("results.csv");
    fs::write(&config, CONFIG).expect("write config");
    fs::write(&catalog, CATALOG).expect("write catalogue");

    let run = |force: bool| {
        let mut cmd = Command::cargo_bin("campaign").expect("binary");
        cmd.arg("--config")
            .arg(&config)
            .arg("--catalog")
            .arg(&catalog)
            .arg("--output")
            .arg(&output);
        if force {
            cmd.arg("--force");
        }
        cmd
    };

    run(false)
        .assert()
        .success()
        .stdout(predicate::str::contains("run 0"));
    assert_eq!(line_count(&output), 2);

    // Same configuration again: recognized and skipped.
    run(false).assert().success();
    assert_eq!(line_count(&output), 2);

    // Forced re-run appends a second row.
    run(true).assert().success();
    assert_eq!(line_count(&output), 3);
}
