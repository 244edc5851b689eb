use std::fs;
use std::path::Path;

use tempfile::tempdir;
use vizscan::commands::{ontology_json, ScanOverrides};
use vizscan::{collect_preset_files, display_name, read_subdir};

#[test]
fn overrides_apply_on_top_of_defaults() {
    let overrides = ScanOverrides {
        enable_dynamic: true,
        fps: Some(30),
        output: Some("custom.jsonld".to_string()),
        details: true,
        ..ScanOverrides::default()
    };
    let config = overrides.resolve().expect("resolve");
    assert!(config.enable_dynamic);
    assert_eq!(config.fps, 30);
    assert_eq!(config.duration, 5);
    assert_eq!(config.output, "custom.jsonld");
    assert!(config.include_details);
    assert!(!config.score_quality);
}

#[test]
fn overrides_reject_zero_fps_for_dynamic() {
    let overrides =
        ScanOverrides { enable_dynamic: true, fps: Some(0), ..ScanOverrides::default() };
    assert!(overrides.resolve().is_err());
}

#[test]
fn flags_win_over_config_file() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("scan.json");
    fs::write(&path, r#"{"fps": 24, "duration": 2}"#).expect("write config");

    let overrides =
        ScanOverrides { config: Some(path), fps: Some(50), ..ScanOverrides::default() };
    let config = overrides.resolve().expect("resolve");
    assert_eq!(config.fps, 50);
    assert_eq!(config.duration, 2);
}

#[test]
fn collects_matching_files_sorted() {
    let dir = tempdir().expect("tempdir");
    let root = dir.path();
    fs::create_dir_all(root.join("sub")).expect("mkdir");
    for name in ["c.milk", "a.milk", "b.txt", "sub/d.milk"] {
        fs::write(root.join(name), "").expect("write");
    }
    let keep = |p: &Path| p.extension().is_some_and(|e| e == "milk");

    let flat = collect_preset_files(root, false, &keep).expect("collect");
    let names: Vec<String> = flat.iter().map(|p| display_name(p)).collect();
    assert_eq!(names, vec!["a.milk", "c.milk"]);

    let deep = collect_preset_files(root, true, &keep).expect("collect");
    assert_eq!(deep.len(), 3);

    let single = collect_preset_files(&root.join("b.txt"), false, &keep).expect("collect");
    assert_eq!(single.len(), 1, "explicit files bypass the extension filter");

    let none = collect_preset_files(&root.join("missing"), true, &keep).expect("collect");
    assert!(none.is_empty());
}

#[test]
fn ontology_json_lists_every_rule() {
    let json = ontology_json().expect("ontology");
    let parsed: serde_json::Value = serde_json::from_str(&json).expect("valid json");
    assert_eq!(parsed.as_array().map(Vec::len), Some(6));
}

fn keep_milk(p: &Path) -> bool {
    p.extension().is_some_and(|e| e == "milk")
}

#[test]
fn unreadable_subdirectories_are_skipped() {
    let dir = tempdir().expect("tempdir");
    let file = dir.path().join("plain.milk");
    fs::write(&file, "").expect("write");

    assert!(read_subdir(&dir.path().join("missing")).is_none());
    assert!(read_subdir(&file).is_none());
    assert!(read_subdir(dir.path()).is_some());
}

#[test]
fn missing_root_read_is_not_an_error() {
    let dir = tempdir().expect("tempdir");
    let files = collect_preset_files(&dir.path().join("gone"), true, &keep_milk).expect("collect");
    assert!(files.is_empty());
}

#[cfg(unix)]
#[test]
fn locked_subdirectory_does_not_abort_the_walk() {
    use std::os::unix::fs::PermissionsExt;

    let dir = tempdir().expect("tempdir");
    let root = dir.path();
    let locked = root.join("locked");
    fs::create_dir_all(&locked).expect("mkdir");
    fs::write(root.join("a.milk"), "").expect("write");
    fs::write(locked.join("b.milk"), "").expect("write");
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).expect("chmod");

    let result = collect_preset_files(root, true, &keep_milk);
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).expect("restore");

    // Privileged users can still read the locked directory.
    let files = result.expect("walk should not fail");
    assert!(files.contains(&root.join("a.milk")));
}

#[cfg(unix)]
#[test]
fn symlinked_presets_are_included() {
    use std::os::unix::fs::symlink;

    let dir = tempdir().expect("tempdir");
    let root = dir.path();
    let store = tempdir().expect("tempdir");
    fs::write(store.path().join("real.milk"), "").expect("write");
    symlink(store.path().join("real.milk"), root.join("linked.milk")).expect("symlink");
    symlink(root.join("nowhere.milk"), root.join("dangling.milk")).expect("symlink");

    let files = collect_preset_files(root, false, &keep_milk).expect("collect");
    let names: Vec<String> = files.iter().map(|p| display_name(p)).collect();
    assert_eq!(names, vec!["linked.milk"]);
}

#[cfg(unix)]
#[test]
fn symlinked_directories_are_not_entered() {
    use std::os::unix::fs::symlink;

    let dir = tempdir().expect("tempdir");
    let root = dir.path();
    fs::create_dir_all(root.join("sub")).expect("mkdir");
    fs::write(root.join("sub").join("a.milk"), "").expect("write");
    symlink(root, root.join("sub").join("loop")).expect("symlink");
    symlink(root.join("missing_dir"), root.join("dangling_dir")).expect("symlink");

    let files = collect_preset_files(root, true, &keep_milk).expect("collect");
    assert_eq!(files, vec![root.join("sub").join("a.milk")]);
}
