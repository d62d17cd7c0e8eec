use assert_cmd::prelude::*;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

fn repo_root() -> PathBuf {
    let manifest_dir = Path::new(env!("CARGO_MANIFEST_DIR"));
    manifest_dir
        .parent()
        .and_then(|p| p.parent())
        .expect("expected crates/<name> layout")
        .to_path_buf()
}

fn basic_fixture() -> PathBuf {
    let fixture = repo_root()
        .join("fixtures")
        .join("massmail")
        .join("basic.json");
    assert!(fixture.exists(), "fixture missing: {}", fixture.display());
    fixture
}

fn run_json(args: &[&str]) -> Value {
    let exe = assert_cmd::cargo_bin!("massmail-cli");
    let output = Command::new(exe)
        .args(args)
        .arg(basic_fixture())
        .output()
        .expect("run massmail-cli");
    assert!(
        output.status.success(),
        "massmail-cli failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).expect("stdout is JSON")
}

#[test]
fn layout_prints_the_scene() {
    let scene = run_json(&["layout", "--mode", "exploded"]);
    assert_eq!(scene["mode"], "EXPLODED");
    assert_eq!(scene["clusters"].as_array().unwrap().len(), 3);
    assert_eq!(scene["clusters"][0]["boundingBox"]["left"], 0.0);
    assert_eq!(scene["clusters"][1]["boundingBox"]["left"], 60.0);
    assert_eq!(scene["emails"].as_array().unwrap().len(), 7);
}

#[test]
fn layout_marks_keyword_matches() {
    let scene = run_json(&["layout", "--keywords", "budget,parking"]);
    let emphasized: Vec<u64> = scene["emails"]
        .as_array()
        .unwrap()
        .iter()
        .filter(|e| e["emphasized"] == true)
        .map(|e| e["index"].as_u64().unwrap())
        .collect();
    assert_eq!(emphasized, vec![3, 4, 5]);
}

#[test]
fn layout_flags_override_the_view() {
    let scene = run_json(&["layout", "--canvas-width", "1200", "--padding", "4"]);
    // (-10 - -50) * (1200 / 100)
    assert_eq!(scene["emails"][0]["x"], 480.0);
    assert_eq!(scene["clusters"][0]["labelAnchor"]["y"], 456.0 - 4.0 - 5.0);
}

#[test]
fn layout_reads_a_config_file() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let config = tmp.path().join("layout.json");
    fs::write(&config, r#"{ "exploded": { "rowWidthLimit": 50 } }"#).expect("write config");

    let scene = run_json(&[
        "layout",
        "--mode",
        "exploded",
        "--config",
        config.to_string_lossy().as_ref(),
    ]);
    // 30 + 24 >= 50: the second cluster starts a new row.
    assert_eq!(scene["clusters"][1]["boundingBox"]["left"], 0.0);
    assert_eq!(scene["clusters"][1]["boundingBox"]["top"], 600.0);
}

#[test]
fn render_writes_svg_to_a_file() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let out = tmp.path().join("clusters.svg");

    let exe = assert_cmd::cargo_bin!("massmail-cli");
    Command::new(exe)
        .args([
            "render",
            "--keywords",
            "vaccine",
            "--out",
            out.to_string_lossy().as_ref(),
            basic_fixture().to_string_lossy().as_ref(),
        ])
        .assert()
        .success();

    let svg = fs::read_to_string(&out).expect("read svg");
    assert!(svg.starts_with("<svg"));
    assert!(svg.contains(r#"viewBox="0 0 600 400""#));
    assert_eq!(svg.matches("<circle").count(), 7);
    assert_eq!(svg.matches(r#"opacity="0.2""#).count(), 5);
}

#[test]
fn render_png_smoke() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let out = tmp.path().join("clusters.png");

    let exe = assert_cmd::cargo_bin!("massmail-cli");
    Command::new(exe)
        .args([
            "render",
            "--mode",
            "exploded",
            "--format",
            "png",
            "--scale",
            "2",
            "--out",
            out.to_string_lossy().as_ref(),
            basic_fixture().to_string_lossy().as_ref(),
        ])
        .assert()
        .success();

    let bytes = fs::read(&out).expect("read png");
    assert!(
        bytes.starts_with(b"\x89PNG\r\n\x1a\n"),
        "output is not a PNG"
    );
}

#[test]
fn render_png_defaults_next_to_the_input() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let input = tmp.path().join("basic.json");
    fs::copy(basic_fixture(), &input).expect("copy fixture");

    let exe = assert_cmd::cargo_bin!("massmail-cli");
    Command::new(exe)
        .args(["render", "--format", "png", input.to_string_lossy().as_ref()])
        .assert()
        .success();

    assert!(input.with_extension("png").exists());
}

#[test]
fn move_reassigns_the_email() {
    let data = run_json(&["move", "--email", "0", "--cluster", "finance"]);
    assert_eq!(data["emails"][0]["clusterId"], "finance");
    assert_eq!(data["emails"][0]["timeStamp"], "2021-03-01");
    assert_eq!(data["clusters"].as_array().unwrap().len(), 3);
}

#[test]
fn move_accepts_numeric_cluster_ids() {
    let data = run_json(&["move", "--email", "3", "--cluster", "2.5"]);
    assert_eq!(data["emails"][3]["clusterId"], 2.5);
}

#[test]
fn drop_on_empty_space_splits_off_a_singleton() {
    let data = run_json(&["drop", "--email", "0"]);
    let clusters = data["clusters"].as_array().unwrap();
    assert_eq!(clusters.len(), 4);

    let created = &clusters[3];
    assert_eq!(created["label"], "Health");
    assert_eq!(data["emails"][0]["clusterId"], created["id"]);
    assert!(created["id"].is_string());
}

#[test]
fn drop_on_a_cluster_moves_the_email() {
    let data = run_json(&["drop", "--email", "5", "--cluster", "0"]);
    assert_eq!(data["emails"][5]["clusterId"], 0);
    assert_eq!(data["clusters"].as_array().unwrap().len(), 3);
}

#[test]
fn relax_keeps_every_email() {
    let data = run_json(&["relax", "--iterations", "20"]);
    let emails = data["emails"].as_array().unwrap();
    assert_eq!(emails.len(), 7);
    for e in emails {
        assert!(e["embedding"]["x"].as_f64().unwrap().is_finite());
        assert!(e["embedding"]["y"].as_f64().unwrap().is_finite());
    }
}

#[test]
fn reads_the_dataset_from_stdin() {
    let text = fs::read_to_string(basic_fixture()).expect("read fixture");
    let exe = assert_cmd::cargo_bin!("massmail-cli");
    let output = assert_cmd::Command::new(exe)
        .args(["layout", "-"])
        .write_stdin(text)
        .output()
        .expect("run massmail-cli");
    assert!(output.status.success());
    let scene: Value = serde_json::from_slice(&output.stdout).expect("stdout is JSON");
    assert_eq!(scene["mode"], "ORIGINAL");
}

#[test]
fn unknown_cluster_is_reported() {
    let exe = assert_cmd::cargo_bin!("massmail-cli");
    let output = Command::new(exe)
        .args(["move", "--email", "0", "--cluster", "nope"])
        .arg(basic_fixture())
        .output()
        .expect("run massmail-cli");
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("no cluster with id `nope`"));
}

#[test]
fn bad_arguments_print_usage() {
    let exe = assert_cmd::cargo_bin!("massmail-cli");
    Command::new(exe).arg("--help").assert().code(2);

    let exe = assert_cmd::cargo_bin!("massmail-cli");
    Command::new(exe)
        .args(["move", "--cluster", "finance"])
        .assert()
        .code(2);
}
