use super::*;

// -- Test helpers --

fn write_settings(dir: &tempfile::TempDir, contents: &str) -> PathBuf {
    let path = dir.path().join("settings.toml");
    std::fs::write(&path, contents).unwrap();
    path
}

// -- Loading --

#[test]
fn test_settings_path_location() {
    let path = settings_path();
    assert!(path.ends_with("dvd-archive/settings.toml"));
}

#[test]
fn test_load_worker_settings() {
    let tmp = tempfile::tempdir().unwrap();
    let path = write_settings(
        &tmp,
        "[worker]\npath = \"/opt/worker\"\nidle_timeout_secs = 30\n",
    );
    assert_eq!(
        load_worker_settings(&path),
        WorkerSettings {
            path: Some(PathBuf::from("/opt/worker")),
            idle_timeout: Some(Duration::from_secs(30)),
        }
    );
}

#[test]
fn test_load_ignores_bad_values() {
    let tmp = tempfile::tempdir().unwrap();
    let path = write_settings(&tmp, "[worker]\npath = \"\"\nidle_timeout_secs = -5\n");
    assert_eq!(load_worker_settings(&path), WorkerSettings::default());

    let path = write_settings(&tmp, "not = [valid");
    assert_eq!(load_worker_settings(&path), WorkerSettings::default());

    assert_eq!(
        load_worker_settings(&tmp.path().join("missing.toml")),
        WorkerSettings::default()
    );
}

// -- Saving --

#[test]
fn test_save_keeps_other_settings() {
    let tmp = tempfile::tempdir().unwrap();
    let path = write_settings(&tmp, "[worker]\nidle_timeout_secs = 9\n\n[other]\nkey = 1\n");

    save_worker_path(&path, Some(Path::new("/usr/bin/worker"))).unwrap();
    let settings = load_worker_settings(&path);
    assert_eq!(settings.path, Some(PathBuf::from("/usr/bin/worker")));
    assert_eq!(settings.idle_timeout, Some(Duration::from_secs(9)));
    assert!(load_settings_string(&path).unwrap().contains("[other]"));
    assert!(!path.with_extension("toml.tmp").exists());

    save_worker_path(&path, None).unwrap();
    assert_eq!(load_worker_settings(&path).path, None);
}

#[test]
fn test_save_creates_file_and_directories() {
    let tmp = tempfile::tempdir().unwrap();
    let path = tmp.path().join("nested").join("settings.toml");
    save_worker_path(&path, Some(Path::new("w"))).unwrap();
    assert_eq!(load_worker_settings(&path).path, Some(PathBuf::from("w")));
}

#[test]
fn test_save_rejects_non_table_worker() {
    let tmp = tempfile::tempdir().unwrap();
    let path = write_settings(&tmp, "worker = 3\n");
    assert!(save_worker_path(&path, Some(Path::new("w"))).is_err());
}

// -- Worker discovery --

#[test]
fn test_worker_path_priority() {
    let tmp = tempfile::tempdir().unwrap();
    let sibling = tmp.path().join(WORKER_NAME);
    std::fs::write(&sibling, b"").unwrap();
    let configured = WorkerSettings {
        path: Some(PathBuf::from("/from/settings")),
        idle_timeout: None,
    };

    assert_eq!(
        worker_path_from(Some("/from/env".into()), &configured, Some(sibling.clone())),
        PathBuf::from("/from/env")
    );
    assert_eq!(
        worker_path_from(Some(OsString::new()), &configured, Some(sibling.clone())),
        PathBuf::from("/from/settings")
    );
    assert_eq!(
        worker_path_from(None, &WorkerSettings::default(), Some(sibling.clone())),
        sibling
    );
    assert_eq!(
        worker_path_from(
            None,
            &WorkerSettings::default(),
            Some(tmp.path().join("absent"))
        ),
        PathBuf::from(WORKER_NAME)
    );
}

#[test]
fn test_default_idle_timeout_matches_worker() {
    assert_eq!(
        Duration::from_secs(DEFAULT_IDLE_TIMEOUT_SECS),
        dvd_archive_worker::DEFAULT_IDLE_TIMEOUT
    );
}
