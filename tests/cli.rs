use assert_cmd::Command;

mod common;
use common::create_sample_root;

#[test]
fn runs() {
    let mut cmd = Command::cargo_bin("imagetxt").unwrap();
    cmd.assert()
        .success()
        .stdout(predicates::str::contains("imagetxt"));
}

#[test]
fn outputs_tool_name() {
    let mut cmd = Command::cargo_bin("imagetxt").unwrap();
    cmd.arg("-V");
    cmd.assert().success().stdout("imagetxt 0.4.0\n");
}

// Inspect subcommand tests

#[test]
fn inspect_reports_subsets_and_labels() {
    let temp = tempfile::tempdir().unwrap();
    create_sample_root(temp.path());

    let mut cmd = Command::cargo_bin("imagetxt").unwrap();
    cmd.arg("inspect").arg(temp.path());
    cmd.assert()
        .success()
        .stdout(predicates::str::contains("2 subset(s), 3 item(s)"))
        .stdout(predicates::str::contains("train: 2 item(s)"))
        .stdout(predicates::str::contains("cat"));
}

#[test]
fn inspect_json_output_format() {
    let temp = tempfile::tempdir().unwrap();
    create_sample_root(temp.path());

    let mut cmd = Command::cargo_bin("imagetxt").unwrap();
    cmd.arg("inspect").arg(temp.path()).args(["--output", "json"]);
    cmd.assert()
        .success()
        .stdout(predicates::str::contains("\"subsets\""))
        .stdout(predicates::str::contains("\"annotations\""));
}

#[test]
fn inspect_missing_root_fails() {
    let mut cmd = Command::cargo_bin("imagetxt").unwrap();
    cmd.args(["inspect", "no/such/dataset"]);
    cmd.assert()
        .failure()
        .stderr(predicates::str::contains("error:"));
}

// Convert subcommand tests

#[test]
fn convert_writes_a_decodable_tree() {
    let temp = tempfile::tempdir().unwrap();
    let input = temp.path().join("input");
    let output = temp.path().join("output");
    create_sample_root(&input);

    let mut cmd = Command::cargo_bin("imagetxt").unwrap();
    cmd.arg("convert").arg(&input).arg(&output);
    cmd.assert()
        .success()
        .stdout(predicates::str::contains("converted 2 subset(s)"));

    let train = std::fs::read_to_string(output.join("train.txt")).unwrap();
    assert_eq!(train, "img001.jpg 0 2\n\"two words\".jpg 1\n");
    let labels = std::fs::read_to_string(output.join("synsets.txt")).unwrap();
    assert_eq!(labels, "cat\ndog\nbird\n");
}

#[test]
fn convert_rejects_an_unknown_format() {
    let temp = tempfile::tempdir().unwrap();
    let input = temp.path().join("input");
    create_sample_root(&input);

    let mut cmd = Command::cargo_bin("imagetxt").unwrap();
    cmd.arg("convert")
        .arg(&input)
        .arg(temp.path().join("output"))
        .args(["--to", "coco"]);
    cmd.assert()
        .failure()
        .stderr(predicates::str::contains("unsupported format"));
}

#[test]
fn convert_honors_the_default_image_ext_flag() {
    let temp = tempfile::tempdir().unwrap();
    let input = temp.path().join("input");
    let output = temp.path().join("output");
    create_sample_root(&input);

    let mut cmd = Command::cargo_bin("imagetxt").unwrap();
    cmd.arg("convert")
        .arg(&input)
        .arg(&output)
        .args(["--default-image-ext", ".png"]);
    cmd.assert().success();

    let val = std::fs::read_to_string(output.join("val.txt")).unwrap();
    assert_eq!(val, "img002.png 1\n");
}
