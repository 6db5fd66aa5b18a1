use duwiz::exclude::ExclusionFilter;
use duwiz::utils::{fold_case, normalize_path};
use std::path::{Path, PathBuf};

#[test]
fn test_relative_paths_are_excluded_like_absolute_ones() {
    let cwd = std::env::current_dir().unwrap();
    let filter = ExclusionFilter::new([cwd.join("target")]);

    assert!(filter.is_excluded(Path::new("target/debug")));
    assert!(filter.is_excluded(Path::new("./src/../target")));
    assert!(!filter.is_excluded(Path::new("src")));
}

#[test]
fn test_normalized_prefixes_are_folded() {
    let filter = ExclusionFilter::new(["/Mnt/./Archive/../Backups"]);
    assert_eq!(filter.prefixes(), &[PathBuf::from("/mnt/backups")]);
}

#[test]
fn test_fold_case_after_normalize() {
    let normalized = normalize_path(Path::new("/A/b/../C")).unwrap();
    assert_eq!(fold_case(&normalized), PathBuf::from("/a/c"));
}
