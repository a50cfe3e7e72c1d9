//! End-to-end recipe scenarios

use crate::recipes::helpers::{
    assertions::*, builders::FileSpecBuilder, environment::TestEnvironment, root_or_skip,
    stores::UnreachableStore,
};
use rustle_provision::modules::error::ResolveError;
use rustle_provision::modules::files::FileMaterializer;
use rustle_provision::runtime::{RecipeRunner, RunError, RunState};
use rustle_provision::types::{ConfigReference, RecipeConfig};
use serde_json::json;

fn wp_reference() -> ConfigReference {
    ConfigReference::new("secrets", "wp", "dbpass").unwrap()
}

#[tokio::test]
async fn test_direct_recipe_creates_root_owned_file() {
    if !root_or_skip() {
        return;
    }
    let env = TestEnvironment::new();
    let path = env.target_path("hello.txt");
    let recipe = RecipeConfig::Direct {
        path: path.clone(),
        content: "hi".to_string(),
    };

    let report = env.runner().run(&recipe).await.unwrap();

    assert!(report.changed());
    assert_file_bytes(&path, b"hi");
    assert_file_mode(&path, 0o755);
    assert_file_ownership(&path, 0, 0);
}

#[tokio::test]
async fn test_direct_recipe_overwrites_on_rerun() {
    if !root_or_skip() {
        return;
    }
    let env = TestEnvironment::new();
    let path = env.target_path("hello.txt");
    let runner = env.runner();

    runner
        .run(&RecipeConfig::Direct {
            path: path.clone(),
            content: "hi".to_string(),
        })
        .await
        .unwrap();
    let report = runner
        .run(&RecipeConfig::Direct {
            path: path.clone(),
            content: "bye".to_string(),
        })
        .await
        .unwrap();

    assert!(report.changed());
    assert_file_bytes(&path, b"bye");
    assert_file_mode(&path, 0o755);
    assert_file_ownership(&path, 0, 0);
    assert_no_temp_files(env.target_dir());
}

#[tokio::test]
async fn test_create_then_overwrite_as_current_user() {
    let env = TestEnvironment::new();
    let path = env.target_path("hello.txt");
    let materializer = FileMaterializer::new();

    let first = FileSpecBuilder::new(&path).content("hi").mode(0o755).build();
    materializer.converge(&first).await.unwrap();
    assert_file_bytes(&path, b"hi");
    assert_file_mode(&path, 0o755);

    let metadata_before = std::fs::metadata(&path).unwrap();
    let second = FileSpecBuilder::new(&path).content("bye").mode(0o755).build();
    let report = materializer.converge(&second).await.unwrap();

    assert!(report.changed);
    assert_file_bytes(&path, b"bye");
    assert_file_mode(&path, 0o755);
    {
        use std::os::unix::fs::MetadataExt;
        assert_file_ownership(&path, metadata_before.uid(), metadata_before.gid());
    }
}

#[tokio::test]
async fn test_missing_item_is_not_found_and_nothing_is_written() {
    let env = TestEnvironment::new();
    env.write_data_bag_item("secrets", "db", json!({"id": "db", "dbpass": "x"}));
    let path = env.target_path("dbpass");
    let recipe = RecipeConfig::DataBag {
        path: path.clone(),
        reference: wp_reference(),
    };

    let err = env.runner().run(&recipe).await.unwrap_err();

    assert_eq!(err.failed_in(), RunState::Resolving);
    match err {
        RunError::Resolve(resolve) => {
            assert!(resolve.is_not_found());
            assert!(matches!(resolve, ResolveError::ItemNotFound { .. }));
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert_file_not_exists(&path);
}

#[tokio::test]
async fn test_unreachable_store_leaves_no_file() {
    let env = TestEnvironment::new();
    let path = env.target_path("dbpass");
    let runner = RecipeRunner::new(UnreachableStore);

    let err = runner
        .run(&RecipeConfig::DataBag {
            path: path.clone(),
            reference: wp_reference(),
        })
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        RunError::Resolve(ResolveError::StoreUnavailable { .. })
    ));
    assert_file_not_exists(&path);
    assert!(env.target_entries().is_empty());
}

#[tokio::test]
async fn test_missing_data_bag_directory_is_unavailable() {
    let env = TestEnvironment::new();
    std::fs::remove_dir_all(env.data_bag_path()).unwrap();
    let path = env.target_path("dbpass");

    let err = env
        .runner()
        .run(&RecipeConfig::DataBag {
            path: path.clone(),
            reference: wp_reference(),
        })
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        RunError::Resolve(ResolveError::StoreUnavailable { .. })
    ));
    assert!(env.target_entries().is_empty());
}
