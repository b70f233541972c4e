use mutant_campaign::safety;
use std::path::Path;
use tempfile::TempDir;

#[test]
fn backup_path_format() {
    let path = safety::backup_path(Path::new("/tmp/foo.js"));
    assert_eq!(path, Path::new("/tmp/.foo.js.mutator.bak"));
}

#[test]
fn backup_path_nested() {
    let path = safety::backup_path(Path::new("/home/user/project/src/app.ts"));
    assert_eq!(path, Path::new("/home/user/project/src/.app.ts.mutator.bak"));
}

#[test]
fn check_interrupted_run_returns_none_when_clean() {
    let dir = TempDir::new().unwrap();
    let source = dir.path().join("app.js");
    std::fs::write(&source, "x = 1;").unwrap();
    assert!(safety::check_interrupted_run(&source).is_none());
}

#[test]
fn write_and_remove_backup() {
    let dir = TempDir::new().unwrap();
    let source = dir.path().join("app.js");
    std::fs::write(&source, "x = 1;").unwrap();

    let bak = safety::write_backup(&source, "x = 1;").unwrap();
    assert_eq!(safety::check_interrupted_run(&source), Some(bak.clone()));
    assert_eq!(std::fs::read_to_string(&bak).unwrap(), "x = 1;");

    safety::remove_backup(&source).unwrap();
    assert!(!bak.exists());
    // removing twice is fine
    safety::remove_backup(&source).unwrap();
}

#[test]
fn restore_from_backup_restores_and_cleans() {
    let dir = TempDir::new().unwrap();
    let source = dir.path().join("app.js");
    let backup = dir.path().join(".app.js.mutator.bak");

    std::fs::write(&source, "mutated").unwrap();
    std::fs::write(&backup, "original").unwrap();

    safety::restore_from_backup(&source, &backup).unwrap();
    assert_eq!(std::fs::read_to_string(&source).unwrap(), "original");
    assert!(!backup.exists());
}

#[test]
fn recover_interrupted_only_touches_files_with_backups() {
    let dir = TempDir::new().unwrap();
    let a = dir.path().join("a.js");
    let b = dir.path().join("b.js");
    std::fs::write(&a, "if (false) {}").unwrap();
    std::fs::write(&b, "untouched").unwrap();
    safety::write_backup(&a, "if (x) {}").unwrap();

    let restored = safety::recover_interrupted([a.as_path(), b.as_path()]).unwrap();
    assert_eq!(restored, vec![a.clone()]);
    assert_eq!(std::fs::read_to_string(&a).unwrap(), "if (x) {}");
    assert_eq!(std::fs::read_to_string(&b).unwrap(), "untouched");

    assert!(safety::recover_interrupted([a.as_path()]).unwrap().is_empty());
}

#[test]
fn recover_interrupted_checks_interleaved_repeats_once() {
    let dir = TempDir::new().unwrap();
    let a = dir.path().join("a.js");
    let b = dir.path().join("b.js");
    std::fs::write(&a, "x = 1;").unwrap();
    std::fs::write(&b, "y = 1;").unwrap();
    safety::write_backup(&a, "x = 0;").unwrap();
    safety::write_backup(&b, "y = 0;").unwrap();

    let files = [a.as_path(), b.as_path(), a.as_path(), b.as_path(), a.as_path()];
    let restored = safety::recover_interrupted(files).unwrap();
    assert_eq!(restored, vec![a.clone(), b.clone()]);
    assert_eq!(std::fs::read_to_string(&a).unwrap(), "x = 0;");
    assert_eq!(std::fs::read_to_string(&b).unwrap(), "y = 0;");
    assert!(!safety::backup_path(&a).exists());
}
