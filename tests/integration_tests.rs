use duwiz::data::EntryKind;
use duwiz::dispatch::dispatch;
use duwiz::exclude::ExclusionFilter;
use duwiz::registry::ResultRegistry;
use duwiz::scan::collect_targets;
use duwiz::size::{SizeEngine, SizeMode};
use duwiz::thread_pool::ThreadPoolStrategy;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;

/// Collects, dispatches and joins a full run over `root`.
fn run(
    root: &Path,
    max_depth: usize,
    filter: &ExclusionFilter,
    strategy: ThreadPoolStrategy,
    threads: Option<usize>,
) -> Arc<ResultRegistry> {
    let registry = Arc::new(ResultRegistry::new());
    collect_targets(root, max_depth, filter, &registry);
    let handle = dispatch(&registry, SizeEngine::default(), strategy, threads)
        .expect("Failed to dispatch");
    assert_eq!(handle.join(), 0);
    registry
}

fn relative(root: &Path, path: &Path) -> PathBuf {
    path.strip_prefix(root).unwrap().to_path_buf()
}

/// Sum of every regular file under `dir`, without following links.
fn true_size(dir: &Path) -> u64 {
    walkdir::WalkDir::new(dir)
        .follow_links(false)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .map(|e| e.metadata().unwrap().len())
        .sum()
}

#[test]
fn test_small_tree_ranking() {
    // temp/
    // ├── a   (10 bytes)
    // ├── b   (20 bytes)
    // └── d/
    //     └── e (5 bytes)
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let root = temp_dir.path();
    fs::write(root.join("a"), [0u8; 10]).unwrap();
    fs::write(root.join("b"), [0u8; 20]).unwrap();
    fs::create_dir(root.join("d")).unwrap();
    fs::write(root.join("d/e"), [0u8; 5]).unwrap();

    let registry = run(
        root,
        1,
        &ExclusionFilter::default(),
        ThreadPoolStrategy::Unbounded,
        None,
    );

    let mut targets: Vec<PathBuf> = registry
        .targets()
        .iter()
        .map(|p| relative(root, p))
        .collect();
    targets.sort();
    assert_eq!(
        targets,
        vec![PathBuf::from("a"), PathBuf::from("b"), PathBuf::from("d")]
    );

    let all = registry.snapshot();
    let sizes: Vec<(PathBuf, u64)> = all
        .iter()
        .map(|e| (relative(root, &e.path), e.size))
        .collect();
    assert_eq!(
        sizes,
        vec![
            (PathBuf::from("b"), 20),
            (PathBuf::from("a"), 10),
            (PathBuf::from("d"), 5),
        ]
    );
    assert_eq!(all[2].kind, Some(EntryKind::Dir));

    let top: Vec<PathBuf> = registry
        .top_n(2)
        .iter()
        .map(|e| relative(root, &e.path))
        .collect();
    assert_eq!(top, vec![PathBuf::from("b"), PathBuf::from("a")]);
    assert!(registry.is_complete());
    assert_eq!(registry.completed_targets(), 3);
    assert_eq!(registry.partial_count(), 0);
}

#[test]
fn test_every_target_completes_with_true_size() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let root = temp_dir.path();
    for top in 0..4 {
        for sub in 0..3 {
            let dir = root.join(format!("top{top}/sub{sub}/leaf"));
            fs::create_dir_all(&dir).unwrap();
            fs::write(dir.join("data.bin"), vec![1u8; 100 * (top + 1) + sub]).unwrap();
            fs::write(
                root.join(format!("top{top}/sub{sub}/note.txt")),
                "note",
            )
            .unwrap();
        }
        fs::write(root.join(format!("top{top}/readme")), vec![0u8; top]).unwrap();
    }

    for (strategy, threads) in [
        (ThreadPoolStrategy::Unbounded, None),
        (ThreadPoolStrategy::Fixed, Some(3)),
    ] {
        let registry = run(root, 2, &ExclusionFilter::default(), strategy, threads);

        // 4 x (3 subdirectories + 1 readme)
        assert_eq!(registry.total_targets(), 16);
        assert_eq!(registry.completed_targets(), registry.total_targets());

        let all = registry.snapshot();
        assert!(all.iter().all(|e| e.calculated && !e.is_partial));
        assert!(all.windows(2).all(|w| w[0].size >= w[1].size));
        for entry in &all {
            assert_eq!(entry.size, true_size(&entry.path), "{}", entry.path.display());
        }
    }
}

#[test]
fn test_excluded_subtree_never_registered() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let root = temp_dir.path();
    fs::create_dir_all(root.join("keep/inner")).unwrap();
    fs::create_dir_all(root.join("Secret/deep/deeper")).unwrap();
    fs::write(root.join("keep/inner/file"), "x").unwrap();
    fs::write(root.join("Secret/deep/deeper/file"), "y").unwrap();
    fs::write(root.join("Secret/top"), "z").unwrap();

    let filter = ExclusionFilter::new([root.join("secret")]);
    for depth in 0..=4 {
        let registry = ResultRegistry::new();
        collect_targets(root, depth, &filter, &registry);
        for target in registry.targets() {
            assert!(
                !relative(root, &target).starts_with("Secret"),
                "{} registered at depth {depth}",
                target.display()
            );
        }
    }
}

#[cfg(unix)]
#[test]
fn test_symlinks_are_neither_targets_nor_followed() {
    use std::os::unix::fs::symlink;

    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let outside = TempDir::new().expect("Failed to create temp dir");
    fs::write(outside.path().join("huge"), vec![0u8; 10_000]).unwrap();

    let root = temp_dir.path();
    fs::create_dir(root.join("real")).unwrap();
    fs::write(root.join("real/file"), [0u8; 7]).unwrap();
    symlink(outside.path(), root.join("real/escape")).unwrap();
    symlink(outside.path(), root.join("linked_dir")).unwrap();
    symlink(outside.path().join("huge"), root.join("linked_file")).unwrap();

    let registry = run(
        root,
        1,
        &ExclusionFilter::default(),
        ThreadPoolStrategy::Unbounded,
        None,
    );

    let targets: Vec<PathBuf> = registry
        .targets()
        .iter()
        .map(|p| relative(root, p))
        .collect();
    assert_eq!(targets, vec![PathBuf::from("real")]);
    assert_eq!(registry.top_n(1)[0].size, 7);
}

#[test]
fn test_last_straggler_ahead_of_leader_is_partial() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let root = temp_dir.path();
    fs::write(root.join("small"), [0u8; 1]).unwrap();
    let big = root.join("big");
    for i in 0..20 {
        let dir = big.join(format!("part{i}"));
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("blob"), vec![0u8; 64]).unwrap();
    }

    let registry = ResultRegistry::new();
    collect_targets(root, 1, &ExclusionFilter::default(), &registry);
    assert_eq!(registry.total_targets(), 2);

    // the small file finishes first, leaving "big" as the only pending target
    SizeEngine::default().run(&root.join("small"), &registry);

    let impatient = SizeEngine::new(Duration::ZERO, SizeMode::Apparent);
    let outcome = impatient.run(&big, &registry);

    assert!(outcome.is_partial);
    assert!(outcome.size > 1);
    assert!(outcome.size <= true_size(&big));
    assert!(registry.is_complete());

    let leader = &registry.top_n(1)[0];
    assert_eq!(leader.path, big);
    assert!(leader.is_partial);
    assert_eq!(registry.partial_count(), 1);
}

#[test]
fn test_straggler_with_company_is_never_partial() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let root = temp_dir.path();
    for name in ["one", "two"] {
        let dir = root.join(name);
        fs::create_dir(&dir).unwrap();
        fs::write(dir.join("blob"), vec![0u8; 32]).unwrap();
    }

    let registry = ResultRegistry::new();
    collect_targets(root, 1, &ExclusionFilter::default(), &registry);

    // "two" is still pending while "one" runs, so "one" must finish exactly
    let impatient = SizeEngine::new(Duration::ZERO, SizeMode::Apparent);
    let outcome = impatient.run(&root.join("one"), &registry);
    assert!(!outcome.is_partial);
    assert_eq!(outcome.size, 32);
}
