//! Property tests for the feature store check

use bhd_ingest::config::DataValidationConfig;
use bhd_ingest::validation::{list_top_level, missing_files, DataValidation};
use bhd_ingest::DataIngestionArtifact;
use proptest::collection::{btree_set, vec};
use proptest::prelude::*;
use std::collections::BTreeSet;
use std::fs;
use tempfile::TempDir;

const NAMES: &[&str] = &["train", "valid", "test", "data.yaml", "README.txt", "labels.csv"];

fn name() -> impl Strategy<Value = String> {
    prop::sample::select(NAMES).prop_map(str::to_string)
}

fn run_check(present: &BTreeSet<String>, required: &[String]) -> (bool, String) {
    let temp = TempDir::new().unwrap();
    let store = temp.path().join("feature_store");
    fs::create_dir_all(&store).unwrap();
    for (i, entry) in present.iter().enumerate() {
        // Mix files and directories; both count as present
        if i % 2 == 0 {
            fs::create_dir(store.join(entry)).unwrap();
        } else {
            fs::write(store.join(entry), b"x").unwrap();
        }
    }

    let validation_dir = temp.path().join("data_validation");
    let validation = DataValidation::new(
        DataIngestionArtifact {
            data_zip_file_path: temp.path().join("data.zip"),
            feature_store_path: store,
        },
        DataValidationConfig {
            valid_status_file_dir: validation_dir.join("status.txt"),
            data_validation_dir: validation_dir.clone(),
            required_file_list: required.to_vec(),
        },
    );

    let status = validation.validate_all_files_exist().unwrap();
    let report = fs::read_to_string(validation_dir.join("status.txt")).unwrap();
    (status, report)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn status_is_true_iff_required_is_subset(
        present in btree_set(name(), 0..NAMES.len()),
        required in vec(name(), 0..5),
    ) {
        let expected = required.iter().all(|r| present.contains(r));
        let (status, report) = run_check(&present, &required);

        prop_assert_eq!(status, expected);
        let expected_report = if expected {
            "Validation status: True"
        } else {
            "Validation status: False"
        };
        prop_assert_eq!(report.as_str(), expected_report);
    }

    #[test]
    fn check_is_deterministic(
        present in btree_set(name(), 0..NAMES.len()),
        required in vec(name(), 0..5),
    ) {
        let first = run_check(&present, &required);
        let second = run_check(&present, &required);
        prop_assert_eq!(first, second);
    }

    #[test]
    fn missing_set_is_required_minus_present(
        present in btree_set(name(), 0..NAMES.len()),
        required in vec(name(), 0..5),
    ) {
        let temp = TempDir::new().unwrap();
        for entry in &present {
            fs::write(temp.path().join(entry), b"x").unwrap();
        }
        let listed = list_top_level(temp.path()).unwrap();

        let missing = missing_files(&listed, &required);
        let expected: BTreeSet<String> = required
            .iter()
            .filter(|r| !present.contains(*r))
            .cloned()
            .collect();
        prop_assert_eq!(missing, expected);
    }
}
