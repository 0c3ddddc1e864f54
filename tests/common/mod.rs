#![allow(dead_code)]

use std::fs;
use std::path::Path;

pub fn write_labels(root: &Path, names: &[&str]) {
    fs::create_dir_all(root).expect("create dataset root");
    let mut body = String::new();
    for name in names {
        body.push_str(name);
        body.push('\n');
    }
    fs::write(root.join("synsets.txt"), body).expect("write labels file");
}

pub fn write_subset(root: &Path, name: &str, body: &str) {
    fs::create_dir_all(root).expect("create dataset root");
    fs::write(root.join(format!("{name}.txt")), body).expect("write subset file");
}

/// A small two-subset dataset root: catalog `cat`/`dog`/`bird`, a `train`
/// subset with a quoted id, and a `val` subset.
pub fn create_sample_root(root: &Path) {
    write_labels(root, &["cat", "dog", "bird"]);
    write_subset(root, "train", "img001.jpg 0 2\n\"two words\".png 1\n");
    write_subset(root, "val", "img002.jpg 1\n");
}
