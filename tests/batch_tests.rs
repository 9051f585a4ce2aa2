//! Integration tests for the batch drivers.

use constmul::batch::{file_path, write_batch};
use constmul::core::BitContext;
use constmul::emit::ModuleKind;
use constmul::netlist::Netlist;
use constmul::search::generate;
use std::fs;
use std::path::PathBuf;

/// Fresh scratch directory under the system temp dir
fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("constmul-{}-{}", name, std::process::id()));
    let _ = fs::remove_dir_all(&dir);
    dir
}

#[test]
fn test_batch_writes_one_file_per_constant() {
    let _ = env_logger::builder().is_test(true).try_init();
    let table = generate(BitContext::new(8, 16).unwrap());
    let dir = scratch_dir("macc");

    let written = write_batch(&dir, ModuleKind::Macc, &table).unwrap();
    assert_eq!(written, 256);
    assert_eq!(fs::read_dir(&dir).unwrap().count(), 256);

    // -1 is stored under its masked value
    let text = fs::read_to_string(dir.join("macc255.v")).unwrap();
    assert!(text.contains("module macc001_neg ("));
    let text = fs::read_to_string(dir.join("macc000.v")).unwrap();
    assert!(text.contains("    assign o = c;"));

    fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn test_batch_reference_files_parse() {
    let table = generate(BitContext::new(4, 8).unwrap());
    let dir = scratch_dir("spec");

    let written = write_batch(&dir, ModuleKind::Reference, &table).unwrap();
    assert_eq!(written, 16);

    for n in table.context().constants() {
        let path = file_path(&dir, ModuleKind::Reference, &table, n);
        let text = fs::read_to_string(&path).unwrap();
        Netlist::parse(&text).unwrap_or_else(|e| panic!("{}: {}", path.display(), e));
    }
    assert!(dir.join("spec008.v").exists());
    assert!(!dir.join("spec016.v").exists());

    fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn test_file_names() {
    let table = generate(BitContext::new(8, 16).unwrap());
    let dir = PathBuf::from("const_mul");
    assert_eq!(
        file_path(&dir, ModuleKind::Multiplier, &table, 5),
        dir.join("mul005.v")
    );
    assert_eq!(
        file_path(&dir, ModuleKind::Reference, &table, -128),
        dir.join("spec128.v")
    );
}
