use std::fs;
use std::path::PathBuf;

use flagchain::{ConfigError, FlagSet, Origin, PrecedenceStack};
use tempfile::TempDir;

fn flags() -> FlagSet {
    FlagSet::builder("test")
        .string("c", "", "Read flags from `FILE`")
        .string("n", "", "Specify your `NAME`")
        .int("a", 0, "Specify your `AGE`")
        .bool("m", false, "Mark as a member")
        .build()
        .unwrap()
}

/// Writes `test.cfg` linking to `parent.cfg`; returns both paths.
fn write_chain(dir: &TempDir) -> (PathBuf, PathBuf) {
    let parent = dir.path().join("parent.cfg");
    let test = dir.path().join("test.cfg");
    fs::write(&parent, "-m true\n").unwrap();
    fs::write(&test, format!("-a 30\n-c {}\n", parent.display())).unwrap();
    (test, parent)
}

#[test]
fn early_and_late_resolution() {
    let dir = TempDir::new().unwrap();
    let (test, parent) = write_chain(&dir);
    let test_str = test.to_str().unwrap();
    let parent_str = parent.to_str().unwrap();

    let mut flags = flags();
    flags.parse(["-n", "fake", "-c", test_str]).unwrap();
    let stack = PrecedenceStack::load(&mut flags, "c").unwrap();

    let origins: Vec<_> = stack.snapshots().iter().map(|s| s.origin().clone()).collect();
    assert_eq!(
        origins,
        [Origin::Process, Origin::File(test.clone()), Origin::File(parent.clone())]
    );

    // Loading leaves the last parsed values in place.
    assert_eq!(flags.string("c"), Some(parent_str));

    let early = stack.unroll(&mut flags, false);
    assert!(early.failures().is_empty());
    assert_eq!(flags.string("n"), Some("fake"));
    assert_eq!(flags.string("c"), Some(test_str));
    assert_eq!(flags.int("a"), Some(30));
    assert_eq!(flags.bool("m"), Some(true));

    let late = stack.unroll(&mut flags, true);
    assert_eq!(flags.string("c"), Some(parent_str));
    assert_eq!(late.get("a"), Some("30"));
    assert_eq!(late.get("m"), Some("true"));
    assert_eq!(late.get("n"), Some("fake"));

    let early_again = stack.unroll(&mut flags, false);
    assert_eq!(early_again, early);
    assert_eq!(flags.string("c"), Some(test_str));
}

#[test]
fn process_values_win_early_and_file_values_win_late() {
    let dir = TempDir::new().unwrap();
    let cfg = dir.path().join("override.cfg");
    fs::write(&cfg, "-n from-file -a 7").unwrap();

    let mut flags = flags();
    flags
        .parse(["-n", "from-cli", "-c", cfg.to_str().unwrap()])
        .unwrap();
    let stack = PrecedenceStack::load(&mut flags, "c").unwrap();

    assert_eq!(stack.effective(false)["n"], "from-cli");
    assert_eq!(stack.effective(true)["n"], "from-file");
    assert_eq!(stack.effective(false)["a"], "7");
}

#[test]
fn self_reference_keeps_partial_stack() {
    let dir = TempDir::new().unwrap();
    let cfg = dir.path().join("test.cfg");
    fs::write(&cfg, format!("-c {}", cfg.display())).unwrap();

    let mut flags = flags();
    flags.parse(["-c", cfg.to_str().unwrap()]).unwrap();
    let mut stack = PrecedenceStack::new(&flags).unwrap();
    let err = stack.process_config_file(&cfg, "c", &mut flags).unwrap_err();

    assert!(matches!(err, ConfigError::CircularReference(ref p) if p == &cfg));
    assert!(err.to_string().contains("test.cfg"));
    assert_eq!(stack.len(), 2);
}

#[test]
fn load_reports_cycle() {
    let dir = TempDir::new().unwrap();
    let a = dir.path().join("a.cfg");
    let b = dir.path().join("b.cfg");
    fs::write(&a, format!("-c {}", b.display())).unwrap();
    fs::write(&b, format!("-c {}", a.display())).unwrap();

    let mut flags = flags();
    flags.parse(["-c", a.to_str().unwrap()]).unwrap();
    let err = PrecedenceStack::load(&mut flags, "c").unwrap_err();

    assert!(matches!(err.innermost(), ConfigError::CircularReference(p) if p == &a));
}

#[test]
fn dump_lists_every_source() {
    let dir = TempDir::new().unwrap();
    let (test, _) = write_chain(&dir);

    let mut flags = flags();
    flags.parse(["-c", test.to_str().unwrap()]).unwrap();
    let stack = PrecedenceStack::load(&mut flags, "c").unwrap();

    let table: toml::Table = toml::from_str(&stack.to_toml().unwrap()).unwrap();
    assert_eq!(table["source"].as_array().map(Vec::len), Some(3));
}
