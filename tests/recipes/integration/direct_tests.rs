//! File materializer behavior on a real filesystem

use crate::recipes::helpers::{
    assertions::*, builders::FileSpecBuilder, environment::TestEnvironment, root_or_skip,
    running_as_root,
};
use rustle_provision::modules::error::FileError;
use rustle_provision::modules::files::{FileChange, FileMaterializer};
use rustle_provision::types::{FileMode, FileSpec, RecipeConfig};
use std::os::unix::fs::PermissionsExt;

#[tokio::test]
async fn test_second_identical_run_changes_nothing() {
    let env = TestEnvironment::new();
    let path = env.target_path("motd");
    let spec = FileSpecBuilder::new(&path)
        .content("welcome\n")
        .mode(0o644)
        .build();
    let materializer = FileMaterializer::new();

    let first = materializer.converge(&spec).await.unwrap();
    let modified = std::fs::metadata(&path).unwrap().modified().unwrap();
    let second = materializer.converge(&spec).await.unwrap();

    assert!(first.changed);
    assert!(!second.changed);
    assert!(second.changes.is_empty());
    assert_eq!(first.checksum, second.checksum);
    assert_eq!(
        std::fs::metadata(&path).unwrap().modified().unwrap(),
        modified
    );
}

#[tokio::test]
async fn test_content_is_opaque_bytes() {
    let env = TestEnvironment::new();
    let path = env.target_path("blob.bin");
    let content: Vec<u8> = vec![0x00, 0xff, 0xfe, b'\r', b'\n', 0x80];
    let spec = FileSpecBuilder::new(&path).content(content.clone()).build();

    FileMaterializer::new().converge(&spec).await.unwrap();

    assert_file_bytes(&path, &content);
}

#[tokio::test]
async fn test_drifted_mode_is_restored() {
    let env = TestEnvironment::new();
    let path = env.target_path("app.conf");
    let spec = FileSpecBuilder::new(&path)
        .content("key=value")
        .mode(0o755)
        .build();
    let materializer = FileMaterializer::new();
    materializer.converge(&spec).await.unwrap();

    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o600)).unwrap();
    let report = materializer.converge(&spec).await.unwrap();

    assert!(report.changed);
    assert!(matches!(report.changes.as_slice(), [FileChange::Mode { .. }]));
    assert_file_mode(&path, 0o755);
}

#[tokio::test]
async fn test_drifted_content_is_replaced() {
    let env = TestEnvironment::new();
    let path = env.target_path("app.conf");
    let spec = FileSpecBuilder::new(&path).content("expected").build();
    std::fs::write(&path, "tampered").unwrap();

    let report = FileMaterializer::new().converge(&spec).await.unwrap();

    assert!(report
        .changes
        .iter()
        .any(|change| matches!(change, FileChange::Content { .. })));
    assert_file_bytes(&path, b"expected");
    assert_no_temp_files(env.target_dir());
}

#[tokio::test]
async fn test_why_run_touches_nothing() {
    let env = TestEnvironment::new();
    let path = env.target_path("planned.txt");

    let report = env
        .why_run_runner()
        .run(&RecipeConfig::Direct {
            path: path.clone(),
            content: "later".to_string(),
        })
        .await
        .unwrap();

    assert!(report.file.check_mode);
    assert!(!report.changed());
    assert_eq!(report.file.changes, vec![FileChange::Created]);
    assert_file_not_exists(&path);
}

#[tokio::test]
async fn test_root_recipe_second_run_is_up_to_date() {
    if !root_or_skip() {
        return;
    }
    let env = TestEnvironment::new();
    let recipe = RecipeConfig::Direct {
        path: env.target_path("hello.txt"),
        content: "hi".to_string(),
    };
    let runner = env.runner();

    assert!(runner.run(&recipe).await.unwrap().changed());
    assert!(!runner.run(&recipe).await.unwrap().changed());
}

#[tokio::test]
async fn test_directory_at_target_is_invalid_path() {
    let env = TestEnvironment::new();
    let path = env.target_path("conf.d");
    std::fs::create_dir(&path).unwrap();

    let err = FileMaterializer::new()
        .converge(&FileSpecBuilder::new(&path).content("x").build())
        .await
        .unwrap_err();

    assert!(matches!(err, FileError::InvalidPath { .. }));
}

#[tokio::test]
async fn test_missing_parent_is_invalid_path() {
    let env = TestEnvironment::new();
    let spec = FileSpec::new(env.target_path("missing/dir/file"), "x");

    let err = FileMaterializer::new().converge(&spec).await.unwrap_err();

    assert!(matches!(err, FileError::InvalidPath { .. }));
}

#[tokio::test]
async fn test_nul_byte_in_path_is_invalid_path() {
    let env = TestEnvironment::new();
    let spec = FileSpecBuilder::new(env.target_path("a\0b")).content("x").build();

    let err = FileMaterializer::new().converge(&spec).await.unwrap_err();

    assert!(matches!(err, FileError::InvalidPath { .. }));
    assert!(env.target_entries().is_empty());
}

#[tokio::test]
async fn test_trailing_separator_is_invalid_path() {
    let env = TestEnvironment::new();
    let path = env.target_path("hello.txt/");
    let spec = FileSpecBuilder::new(&path).content("x").build();

    let err = FileMaterializer::new().converge(&spec).await.unwrap_err();

    assert!(matches!(err, FileError::InvalidPath { .. }));
    assert!(env.target_entries().is_empty());
    assert_no_temp_files(env.target_dir());
}

#[tokio::test]
async fn test_chown_to_root_without_privileges_is_denied() {
    if running_as_root() {
        return;
    }
    let env = TestEnvironment::new();
    let path = env.target_path("root-owned");
    let spec = FileSpec::new(&path, "secret").with_mode(FileMode::new(0o600).unwrap());

    let err = FileMaterializer::new().converge(&spec).await.unwrap_err();

    assert!(matches!(err, FileError::PermissionDenied { .. }));
    assert_file_not_exists(&path);
    assert_no_temp_files(env.target_dir());
}

#[tokio::test]
async fn test_read_only_directory_is_denied() {
    if running_as_root() {
        return;
    }
    let env = TestEnvironment::new();
    let dir = env.target_dir();
    std::fs::set_permissions(&dir, std::fs::Permissions::from_mode(0o555)).unwrap();
    let spec = FileSpecBuilder::new(dir.join("file")).content("x").build();

    let result = FileMaterializer::new().converge(&spec).await;
    std::fs::set_permissions(&dir, std::fs::Permissions::from_mode(0o755)).unwrap();

    assert!(matches!(result, Err(FileError::PermissionDenied { .. })));
}
