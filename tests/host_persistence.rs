mod support;

use classifier_panel::app_dirs;
use classifier_panel::binder::{NumberBinder, TextBinder, leaves};
use classifier_panel::config::ConfigurationTree;
use classifier_panel::host::{self, DesignerHost, FileHost};
use classifier_panel::settings::{self, PanelSettings};
use support::panel_env::PanelEnvGuard;

#[test]
fn settings_default_to_tool_config_under_config_home() {
    let temp = tempfile::tempdir().expect("create tempdir");
    let _env = PanelEnvGuard::set_config_home(temp.path().to_path_buf());

    let loaded = settings::load_or_default().expect("load settings");
    assert_eq!(loaded, PanelSettings::default());
    let tool_config = loaded.resolve_tool_config_path().expect("resolve path");
    assert_eq!(
        tool_config,
        temp.path()
            .join(app_dirs::APP_DIR_NAME)
            .join(app_dirs::TOOL_CONFIG_FILE_NAME)
    );

    let custom = PanelSettings {
        persist_on_update: false,
        ..PanelSettings::default()
    };
    settings::save(&custom).expect("save settings");
    assert_eq!(settings::load_or_default().expect("reload"), custom);
    assert!(app_dirs::settings_path().expect("settings path").is_file());
}

#[test]
fn edits_survive_a_remount() {
    let temp = tempfile::tempdir().expect("create tempdir");
    let path = temp.path().join("tool_config.json");

    let mut store = host::mount(FileHost::new(&path), true);
    let mut epochs = NumberBinder::new(leaves::EPOCHS, "Epochs");
    let mut model_name = TextBinder::new(leaves::MODEL_NAME, "Model Name");
    assert!(epochs.commit(&mut store, "12"));
    assert!(model_name.commit(&mut store, "imdb-sentiment".to_string()));
    assert!(!epochs.commit(&mut store, "twelve"));
    drop(store);

    let raw = std::fs::read_to_string(&path).expect("read tool config");
    let value: serde_json::Value = serde_json::from_str(&raw).expect("parse tool config");
    assert_eq!(value["Configuration"]["trainingConfig"]["epochs"], 12);

    let store = host::mount(FileHost::new(&path), true);
    let snapshot = store.read();
    assert_eq!(snapshot.training_config.epochs, 12);
    assert_eq!(snapshot.model_config.model_name, "imdb-sentiment");
    assert_eq!(snapshot.revision(), 0);
}

#[test]
fn unknown_keys_from_the_host_are_ignored() {
    let temp = tempfile::tempdir().expect("create tempdir");
    let path = temp.path().join("tool_config.json");
    let mut value = serde_json::json!({ "Configuration": ConfigurationTree::default().to_value() });
    value["Configuration"]["textVectorizationConfig"]["outputModeAnchorEl"] =
        serde_json::Value::Null;
    value["Configuration"]["datasetConfig"]["batchSize"] = serde_json::json!(64);
    std::fs::write(&path, value.to_string()).expect("write tool config");

    let loaded = FileHost::new(&path).load().expect("load");
    assert_eq!(loaded.map(|tree| tree.dataset_config.batch_size), Some(64));
}

#[test]
fn failed_writes_keep_the_in_memory_tree() {
    let temp = tempfile::tempdir().expect("create tempdir");
    let path = temp.path().join("tool_config.json");
    let mut store = host::mount(FileHost::new(&path), true);
    // A directory where the file should be makes every rename fail.
    std::fs::create_dir_all(path.join("blocker")).expect("create blocker");

    store
        .update(|tree| tree.dataset_config.seed = 7)
        .expect("update accepted");
    assert_eq!(store.read().dataset_config.seed, 7);
    assert!(path.is_dir());
}

#[test]
fn unreadable_tool_config_is_kept_after_an_edit() {
    let temp = tempfile::tempdir().expect("create tempdir");
    let path = temp.path().join("tool_config.json");
    let mut value = serde_json::json!({ "Configuration": ConfigurationTree::default().to_value() });
    value["Configuration"]["trainingConfig"]["epochs"] = serde_json::json!(40);
    value["Configuration"]
        .as_object_mut()
        .expect("configuration object")
        .remove("modelConfig");
    let original = serde_json::to_vec_pretty(&value).expect("encode tool config");
    std::fs::write(&path, &original).expect("write tool config");

    let mut store = host::mount(FileHost::new(&path), true);
    assert_eq!(*store.read(), ConfigurationTree::default());
    let mut epochs = NumberBinder::new(leaves::EPOCHS, "Epochs");
    assert!(epochs.commit(&mut store, "9"));
    drop(store);

    let kept = std::fs::read(temp.path().join("tool_config.json.invalid")).expect("read kept file");
    assert_eq!(kept, original);
    let reloaded = FileHost::new(&path).load().expect("load").expect("stored tree");
    assert_eq!(reloaded.training_config.epochs, 9);
}

#[test]
fn unreadable_tool_config_is_untouched_without_persistence() {
    let temp = tempfile::tempdir().expect("create tempdir");
    let path = temp.path().join("tool_config.json");
    std::fs::write(&path, "not json").expect("write tool config");

    let mut store = host::mount(FileHost::new(&path), false);
    store
        .update(|tree| tree.training_config.epochs = 3)
        .expect("update accepted");
    assert_eq!(std::fs::read_to_string(&path).expect("read"), "not json");
    assert!(!temp.path().join("tool_config.json.invalid").exists());
}
