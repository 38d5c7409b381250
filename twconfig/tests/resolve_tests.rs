#![allow(clippy::unwrap_used)]
//! Integration tests for `twconfig::resolve_content`.

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;
use twconfig::{
    ContentScanConfig, ResolveOptions, ScanErrorKind, load_config, load_project_config,
    resolve_content,
};

fn touch(root: &Path, rel: &str) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, "class=\"flex p-4\"").unwrap();
}

fn reference_config() -> ContentScanConfig {
    let fixture = Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/tailwind.config.js");
    load_config(&fixture).unwrap()
}

fn relative(files: &[&str]) -> Vec<PathBuf> {
    files.iter().map(PathBuf::from).collect()
}

#[test]
fn test_reference_globs_select_lib_and_test_sources() {
    let tmp = TempDir::new().unwrap();
    for rel in [
        "lib/main.dart",
        "lib/src/widgets/button.dart",
        "lib/web/app.tsx",
        "lib/web/util.js",
        "lib/README.md",
        "lib/.hidden/secret.dart",
        "test/widget_test.dart",
        "test/e2e/flow.ts",
        "test/fixtures/data.json",
        "web/index.js",
        "node_modules/pkg/index.js",
    ] {
        touch(tmp.path(), rel);
    }

    let resolution = resolve_content(&reference_config(), tmp.path(), &ResolveOptions::default());

    assert!(resolution.ok(), "got: {:?}", resolution.scan_errors);
    assert_eq!(
        resolution.relative_files(),
        relative(&[
            "lib/main.dart",
            "lib/src/widgets/button.dart",
            "lib/web/app.tsx",
            "lib/web/util.js",
            "test/e2e/flow.ts",
            "test/widget_test.dart",
        ])
    );
}

#[test]
fn test_missing_roots_contribute_nothing() {
    let tmp = TempDir::new().unwrap();
    touch(tmp.path(), "lib/main.dart");

    let resolution = resolve_content(&reference_config(), tmp.path(), &ResolveOptions::default());
    assert!(resolution.ok());
    assert_eq!(resolution.relative_files(), relative(&["lib/main.dart"]));
}

#[test]
fn test_negated_patterns_exclude() {
    let tmp = TempDir::new().unwrap();
    touch(tmp.path(), "src/app.js");
    touch(tmp.path(), "src/generated/api.js");
    touch(tmp.path(), "src/generated/keep.ts");

    let config = ContentScanConfig::with_globs(["./src/**/*.{js,ts}", "!./src/generated/*.js"]);
    let resolution = resolve_content(&config, tmp.path(), &ResolveOptions::default());
    assert_eq!(
        resolution.relative_files(),
        relative(&["src/app.js", "src/generated/keep.ts"])
    );
}

#[test]
fn test_node_modules_only_when_named() {
    let tmp = TempDir::new().unwrap();
    touch(tmp.path(), "src/app.js");
    touch(tmp.path(), "src/node_modules/dep/index.js");
    touch(tmp.path(), "node_modules/ui-kit/dist/button.js");

    let skipped = ContentScanConfig::with_globs(["./src/**/*.js"]);
    let resolution = resolve_content(&skipped, tmp.path(), &ResolveOptions::default());
    assert_eq!(resolution.relative_files(), relative(&["src/app.js"]));

    let named =
        ContentScanConfig::with_globs(["./src/**/*.js", "./node_modules/ui-kit/**/*.js"]);
    let resolution = resolve_content(&named, tmp.path(), &ResolveOptions::default());
    assert_eq!(
        resolution.relative_files(),
        relative(&[
            "node_modules/ui-kit/dist/button.js",
            "src/app.js",
            "src/node_modules/dep/index.js",
        ])
    );
}

#[test]
fn test_literal_file_and_parent_patterns() {
    let tmp = TempDir::new().unwrap();
    touch(tmp.path(), "app/index.html");
    touch(tmp.path(), "shared/card.js");
    touch(tmp.path(), "shared/deep/skip.js");

    let config = ContentScanConfig::with_globs(["./index.html", "../shared/*.js"]);
    let base = tmp.path().join("app");
    let resolution = resolve_content(&config, &base, &ResolveOptions::default());

    let canonical = tmp.path().canonicalize().unwrap();
    assert_eq!(
        resolution.files,
        vec![
            canonical.join("app/index.html"),
            canonical.join("shared/card.js"),
        ]
    );
}

#[test]
fn test_max_files_limit_reported() {
    let tmp = TempDir::new().unwrap();
    for idx in 0..5 {
        touch(tmp.path(), &format!("src/file{idx}.js"));
    }

    let config = ContentScanConfig::with_globs(["./src/*.js"]);
    let mut options = ResolveOptions::default();
    options.max_files = 3;
    let resolution = resolve_content(&config, tmp.path(), &options);

    assert_eq!(resolution.files.len(), 3);
    assert!(!resolution.ok());
    assert_eq!(resolution.scan_errors.len(), 1);
    assert_eq!(resolution.scan_errors[0].kind, ScanErrorKind::LimitExceeded);
}

#[test]
fn test_max_depth_limits_traversal() {
    let tmp = TempDir::new().unwrap();
    touch(tmp.path(), "src/a.js");
    touch(tmp.path(), "src/one/two/b.js");

    let config = ContentScanConfig::with_globs(["./src/**/*.js"]);
    let mut options = ResolveOptions::default();
    options.max_depth = 2;
    let resolution = resolve_content(&config, tmp.path(), &options);
    assert_eq!(resolution.relative_files(), relative(&["src/a.js"]));
}

#[test]
fn test_relative_content_resolves_against_config_dir() {
    let tmp = TempDir::new().unwrap();
    let web = tmp.path().join("web");
    fs::create_dir_all(&web).unwrap();
    fs::write(
        web.join("tailwind.config.json"),
        r#"{"content": {"files": ["./src/**/*.html"], "relative": true}}"#,
    )
    .unwrap();
    touch(&web, "src/index.html");
    touch(tmp.path(), "src/other.html");

    let (path, config) = load_project_config(&web).unwrap();
    let base = config.base_dir(&path, tmp.path());
    let resolution = resolve_content(&config, &base, &ResolveOptions::default());
    assert_eq!(resolution.relative_files(), relative(&["src/index.html"]));
    assert_eq!(resolution.base_dir, web.canonicalize().unwrap());
}
