use std::fs;
use std::path::Path;

use scoped_fs::{FileScope, RootSource, ScopeError, select_root};
use tempfile::TempDir;

fn scope_in(dir: &TempDir) -> FileScope {
    FileScope::new(dir.path().to_path_buf())
}

fn label_of(dir: &TempDir) -> String {
    scope_in(dir).root_label()
}

fn mkdirs(root: &Path, rels: &[&str]) {
    for rel in rels {
        fs::create_dir_all(root.join(rel)).expect("fixture directory should be created");
    }
}

#[test]
fn test_traversal_never_escapes_root() {
    let dir = tempfile::tempdir().expect("tempdir should be created");
    let scope = scope_in(&dir);

    for requested in [
        "../etc/passwd",
        "/../etc/passwd",
        "..\\..\\secret",
        "docs/../../outside",
        "a/b/../../../../x",
        "..",
    ] {
        let err = scope
            .resolve(requested)
            .expect_err("traversal should be rejected");
        assert!(
            matches!(err, ScopeError::AccessDenied(_)),
            "expected AccessDenied for {requested}, got: {err:?}"
        );
    }
}

#[test]
fn test_hide_pattern_excludes_subtree() {
    let dir = tempfile::tempdir().expect("tempdir should be created");
    mkdirs(dir.path(), &["a/b", "c"]);
    let scope = scope_in(&dir);
    let label = label_of(&dir);

    let nodes = scope
        .list_tree("", 20, &["a".to_string()])
        .expect("listing should succeed");

    let paths: Vec<&str> = nodes.iter().map(|node| node.path.as_str()).collect();
    assert_eq!(paths, vec![label.clone(), format!("{label}/c")]);
    assert!(nodes[0].has_children, "root still has the visible child c");
}

#[test]
fn test_builtin_cache_dir_is_always_hidden() {
    let dir = tempfile::tempdir().expect("tempdir should be created");
    mkdirs(dir.path(), &[".tmb/thumbs", "docs"]);
    let scope = scope_in(&dir);
    let label = label_of(&dir);

    let nodes = scope.list_tree("", 20, &[]).expect("listing should succeed");
    let paths: Vec<&str> = nodes.iter().map(|node| node.path.as_str()).collect();
    assert_eq!(paths, vec![label.clone(), format!("{label}/docs")]);
}

#[cfg(unix)]
#[test]
fn test_symlink_cycle_terminates_and_visits_once() {
    let dir = tempfile::tempdir().expect("tempdir should be created");
    mkdirs(dir.path(), &["x"]);
    std::os::unix::fs::symlink(dir.path().join("x"), dir.path().join("x/loop"))
        .expect("cycle symlink should be created");
    let scope = scope_in(&dir);
    let label = label_of(&dir);

    let nodes = scope.list_tree("", 20, &[]).expect("listing should terminate");

    let x_display = format!("{label}/x");
    let x_visits = nodes.iter().filter(|node| node.path == x_display).count();
    assert_eq!(x_visits, 1, "cycle target should be visited exactly once");

    // 自环链接不应被当成可下钻目录重复出现
    let mut seen = std::collections::HashSet::new();
    for node in &nodes {
        assert!(seen.insert(&node.path), "duplicate node: {}", node.path);
    }
}

#[test]
fn test_write_then_read_round_trips() {
    let dir = tempfile::tempdir().expect("tempdir should be created");
    mkdirs(dir.path(), &["docs"]);
    let scope = scope_in(&dir);

    for content in ["hello", "", "line one\nline two\n", "path/like/content"] {
        scope
            .write_text("docs/note.txt", content)
            .expect("write should succeed");
        let read = scope.read_text("docs/note.txt").expect("read should succeed");
        assert_eq!(read, content);
    }
}

#[test]
fn test_read_missing_file_is_io_error() {
    let dir = tempfile::tempdir().expect("tempdir should be created");
    let scope = scope_in(&dir);

    let err = scope
        .read_text("missing.txt")
        .expect_err("missing file should fail");
    assert!(matches!(err, ScopeError::Io(_)));
}

#[test]
fn test_depth_zero_lists_single_node() {
    let dir = tempfile::tempdir().expect("tempdir should be created");
    mkdirs(dir.path(), &["child"]);
    let scope = scope_in(&dir);
    let label = label_of(&dir);

    let nodes = scope.list_tree("", 0, &[]).expect("listing should succeed");
    assert_eq!(nodes.len(), 1);
    assert_eq!(nodes[0].path, label);
    assert!(nodes[0].has_children);

    let empty = tempfile::tempdir().expect("tempdir should be created");
    let nodes = scope_in(&empty)
        .list_tree("", 0, &[])
        .expect("listing should succeed");
    assert_eq!(nodes.len(), 1);
    assert!(!nodes[0].has_children);
}

#[test]
fn test_depth_zero_has_children_respects_hide() {
    let dir = tempfile::tempdir().expect("tempdir should be created");
    mkdirs(dir.path(), &["only"]);
    let scope = scope_in(&dir);

    let nodes = scope
        .list_tree("", 0, &["only".to_string()])
        .expect("listing should succeed");
    assert_eq!(nodes.len(), 1);
    assert!(!nodes[0].has_children, "hidden child should not count");
}

#[test]
fn test_start_path_may_repeat_root_label() {
    let dir = tempfile::tempdir().expect("tempdir should be created");
    mkdirs(dir.path(), &["docs/inner"]);
    let scope = scope_in(&dir);
    let label = label_of(&dir);

    let direct = scope.list_tree("docs", 20, &[]).expect("listing should succeed");
    let labeled = scope
        .list_tree(&format!("{label}/docs"), 20, &[])
        .expect("listing should succeed");

    let direct_paths: Vec<&str> = direct.iter().map(|node| node.path.as_str()).collect();
    let labeled_paths: Vec<&str> = labeled.iter().map(|node| node.path.as_str()).collect();
    assert_eq!(direct_paths, labeled_paths);
    assert_eq!(direct_paths, vec![format!("{label}/docs"), format!("{label}/docs/inner")]);
}

#[test]
fn test_tree_soft_failures_return_empty() {
    let dir = tempfile::tempdir().expect("tempdir should be created");
    mkdirs(dir.path(), &["docs"]);
    fs::write(dir.path().join("plain.txt"), "text").expect("file should be written");
    let scope = scope_in(&dir);

    assert!(scope.list_tree("missing", 20, &[]).expect("soft failure").is_empty());
    assert!(scope.list_tree("plain.txt", 20, &[]).expect("soft failure").is_empty());
    assert!(scope.list_tree("../outside", 20, &[]).expect("soft failure").is_empty());
    assert!(scope.list_tree("docs/../..", 20, &[]).expect("soft failure").is_empty());
}

#[test]
fn test_override_candidate_wins_over_default() {
    let override_dir = tempfile::tempdir().expect("override dir should be created");
    let default_dir = tempfile::tempdir().expect("default dir should be created");

    let (root, source) = select_root(vec![
        (override_dir.path().to_path_buf(), RootSource::Override),
        (default_dir.path().to_path_buf(), RootSource::PrivilegeDefault),
    ])
    .expect("override candidate should be selected");

    assert_eq!(root, override_dir.path());
    assert_eq!(source, RootSource::Override);
}

#[test]
fn test_readme_scenario() {
    let dir = tempfile::tempdir().expect("tempdir should be created");
    mkdirs(dir.path(), &["docs"]);
    fs::write(dir.path().join("docs/readme.txt"), "hello").expect("file should be written");
    let scope = scope_in(&dir);

    let body = scope
        .read_text("/docs/readme.txt")
        .expect("read inside the root should succeed");
    assert_eq!(body, "hello");

    let err = scope
        .read_text("/../etc/passwd")
        .expect_err("escape should be rejected");
    assert!(matches!(err, ScopeError::AccessDenied(_)));
}
