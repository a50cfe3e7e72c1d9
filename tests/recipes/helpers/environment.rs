//! Test environment setup and management

use anyhow::Result;
use rustle_provision::modules::data_bag::DirectoryStore;
use rustle_provision::runtime::{RecipeRunner, RunnerOptions};
use serde_json::Value;
use std::path::PathBuf;
use tempfile::{tempdir, TempDir};

/// Isolated temp tree holding a target directory and a data bag directory
pub struct TestEnvironment {
    temp_dir: TempDir,
}

impl Default for TestEnvironment {
    fn default() -> Self {
        Self::new()
    }
}

impl TestEnvironment {
    pub fn new() -> Self {
        let temp_dir = tempdir().expect("Failed to create temporary directory");
        std::fs::create_dir_all(temp_dir.path().join("data_bags"))
            .expect("Failed to create data bag directory");
        std::fs::create_dir_all(temp_dir.path().join("target"))
            .expect("Failed to create target directory");
        Self { temp_dir }
    }

    /// Absolute path of a file inside the target directory
    pub fn target_path(&self, name: &str) -> PathBuf {
        self.temp_dir.path().join("target").join(name)
    }

    pub fn target_dir(&self) -> PathBuf {
        self.temp_dir.path().join("target")
    }

    pub fn data_bag_path(&self) -> PathBuf {
        self.temp_dir.path().join("data_bags")
    }

    pub fn temp_path(&self, relative_path: &str) -> PathBuf {
        self.temp_dir.path().join(relative_path)
    }

    /// Write `<data_bags>/<bag>/<item>.json`
    pub fn write_data_bag_item(&self, bag: &str, item: &str, fields: Value) -> PathBuf {
        let bag_dir = self.data_bag_path().join(bag);
        std::fs::create_dir_all(&bag_dir).expect("Failed to create data bag");
        let item_path = bag_dir.join(format!("{item}.json"));
        std::fs::write(
            &item_path,
            serde_json::to_string_pretty(&fields).expect("Failed to encode item"),
        )
        .expect("Failed to write data bag item");
        item_path
    }

    /// Write a node attributes file and return its path
    pub fn write_node_file(&self, name: &str, attributes: Value) -> PathBuf {
        let path = self.temp_path(name);
        std::fs::write(&path, attributes.to_string()).expect("Failed to write node file");
        path
    }

    pub fn directory_store(&self) -> DirectoryStore {
        DirectoryStore::new(self.data_bag_path())
    }

    pub fn runner(&self) -> RecipeRunner<DirectoryStore> {
        RecipeRunner::with_options(
            self.directory_store(),
            RunnerOptions {
                check_mode: false,
                node_name: Some("test-node".to_string()),
            },
        )
    }

    pub fn why_run_runner(&self) -> RecipeRunner<DirectoryStore> {
        RecipeRunner::with_options(
            self.directory_store(),
            RunnerOptions {
                check_mode: true,
                node_name: Some("test-node".to_string()),
            },
        )
    }

    pub fn read_target(&self, name: &str) -> Result<String> {
        Ok(std::fs::read_to_string(self.target_path(name))?)
    }

    /// Every entry in the target directory, sorted
    pub fn target_entries(&self) -> Vec<String> {
        let mut entries: Vec<String> = std::fs::read_dir(self.target_dir())
            .expect("Failed to list target directory")
            .map(|entry| {
                entry
                    .expect("Failed to read entry")
                    .file_name()
                    .to_string_lossy()
                    .to_string()
            })
            .collect();
        entries.sort();
        entries
    }
}
