use std::io::Write;

use laser_debris_removal::config::{load_runs, ConfigError};
use laser_debris_removal::constants::{EARTH_EQUATORIAL_RADIUS_M, EARTH_J2, EARTH_MU_M3_S2};
use tempfile::{Builder, NamedTempFile};

const FULL_YAML: &str = "\
- fragment_tag: \"TEST DEB\"
  R_e: 6378000.0
  J2: 0.00108
  mu: 3.986e14
  h_collision: 800000.0
  d_n: 500
  t0: 86400.0
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
  t_max: 31536000.0
  bisect_tol: 0.01
  filter_percent: 2
";

const MINIMAL_YAML: &str = "\
- fragment_tag: \"TEST DEB\"
  h_collision: 800000.0
  d_n: 500
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
  t_max: 31536000.0
  bisect_tol: 0.01
";

fn write_yaml(contents: &str) -> NamedTempFile {
    let mut file = Builder::new()
        .suffix(".yaml")
        .tempfile()
        .expect("temp config");
    file.write_all(contents.as_bytes()).expect("write config");
    file.flush().expect("flush config");
    file
}

#[test]
fn yaml_list_parses_all_options() {
    let file = write_yaml(FULL_YAML);
    let runs = load_runs(file.path()).expect("config loads");
    assert_eq!(runs.len(), 1);

    let run = &runs[0];
    run.validate().expect("valid configuration");
    assert_eq!(run.fragment_tag, "TEST DEB");
    assert_eq!(run.earth_radius, 6_378_000.0);
    assert_eq!(run.j2, 0.00108);
    assert_eq!(run.d_n, 500);
    assert_eq!(run.filter_percent, 2);
    assert_eq!(run.cm, 0.0001);
    assert_eq!(run.fov, 0.35);
}

#[test]
fn omitted_constants_fall_back_to_earth_defaults() {
    let file = write_yaml(MINIMAL_YAML);
    let runs = load_runs(file.path()).expect("config loads");
    let run = &runs[0];
    assert_eq!(run.earth_radius, EARTH_EQUATORIAL_RADIUS_M);
    assert_eq!(run.j2, EARTH_J2);
    assert_eq!(run.mu, EARTH_MU_M3_S2);
    assert_eq!(run.filter_percent, 1);
}

#[test]
fn single_toml_record_parses() {
    let contents = "\
fragment_tag = \"TEST DEB\"
h_collision = 800000.0
d_n = 500
t0 = 0.0
h_offset = 50000.0
target_fraction = 0.5
max_dv = 0.01
FoV = 0.35
range = 250000.0
incidence_angle = 0.52
ablation_time = 5.0
scan_time = 5.0
cooldown_time = 30.0
fluence = 8500.0
Cm = 0.0001
freq = 56.0
min_perigee = 200000.0
t_max = 31536000.0
bisect_tol = 0.01
";
    let mut file = Builder::new()
        .suffix(".toml")
        .tempfile()
        .expect("temp config");
    file.write_all(contents.as_bytes()).expect("write config");
    file.flush().expect("flush config");

    let runs = load_runs(file.path()).expect("config loads");
    assert_eq!(runs.len(), 1);
    assert_eq!(runs[0].fragment_tag, "TEST DEB");
    assert_eq!(runs[0].mu, EARTH_MU_M3_S2);
}

#[test]
fn missing_required_field_is_a_parse_error() {
    let truncated = MINIMAL_YAML.replace("  t_max: 31536000.0\n", "");
    let file = write_yaml(&truncated);
    let error = load_runs(file.path()).expect_err("missing field must fail");
    assert!(matches!(error, ConfigError::Parse(_)));
}

#[test]
fn negative_duration_fails_validation() {
    let bad = MINIMAL_YAML.replace("  scan_time: 5.0\n", "  scan_time: -5.0\n");
    let file = write_yaml(&bad);
    let runs = load_runs(file.path()).expect("config loads");
    let error = runs[0].validate().expect_err("negative duration must fail");
    assert!(matches!(error, ConfigError::Invalid(_)));
}

#[test]
fn out_of_range_target_fraction_fails_validation() {
    let bad = MINIMAL_YAML.replace("  target_fraction: 0.5\n", "  target_fraction: 1.5\n");
    let file = write_yaml(&bad);
    let runs = load_runs(file.path()).expect("config loads");
    assert!(runs[0].validate().is_err());
}
