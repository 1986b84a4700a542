use scanpage::{FillStrategy, ListError, ListingConfig};
use std::sync::Mutex;

// Environment variables are process-wide; tests touching them take this lock.
static ENV_LOCK: Mutex<()> = Mutex::new(());

const VARS: [&str; 5] = [
    "SCANPAGE_CONFIG",
    "SCANPAGE_TABLE",
    "SCANPAGE_PAGE_SIZE",
    "SCANPAGE_OVERFETCH",
    "SCANPAGE_MAX_SCAN_CALLS",
];

fn clear_env() {
    for v in VARS {
        // SAFETY: callers hold ENV_LOCK and no other test thread reads these.
        unsafe { std::env::remove_var(v) };
    }
}

fn set_env(name: &str, value: &str) {
    // SAFETY: see clear_env.
    unsafe { std::env::set_var(name, value) };
}

#[test]
fn env_overrides_file_which_overrides_defaults() {
    let _g = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
    clear_env();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("scanpage.toml");
    std::fs::write(
        &path,
        "table_name = \"festivals\"\ndefault_page_size = 20\noverfetch_factor = 4\n",
    )
    .unwrap();
    set_env("SCANPAGE_PAGE_SIZE", "25");
    set_env("SCANPAGE_OVERFETCH", "not a number");
    let cfg = ListingConfig::load(Some(&path)).unwrap();
    clear_env();
    assert_eq!(cfg.table_name, "festivals");
    assert_eq!(cfg.default_page_size, 25);
    assert_eq!(cfg.overfetch_factor, 4);
    assert_eq!(cfg.max_scan_calls, 10_000);
}

#[test]
fn config_path_can_come_from_env() {
    let _g = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
    clear_env();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("other.toml");
    std::fs::write(&path, "fill_strategy = \"fixed\"\n").unwrap();
    set_env("SCANPAGE_CONFIG", path.to_str().unwrap());
    set_env("SCANPAGE_TABLE", "  from_env  ");
    let cfg = ListingConfig::load(None).unwrap();
    clear_env();
    assert_eq!(cfg.fill_strategy, FillStrategy::Fixed);
    assert_eq!(cfg.table_name, "from_env");
}

#[test]
fn env_can_make_config_invalid() {
    let _g = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
    clear_env();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("scanpage.toml");
    std::fs::write(&path, "max_page_size = 50\n").unwrap();
    set_env("SCANPAGE_PAGE_SIZE", "80");
    let err = ListingConfig::load(Some(&path)).unwrap_err();
    clear_env();
    assert!(matches!(err, ListError::Config(m) if m.contains("exceeds")));
}

#[test]
fn config_round_trips_through_toml() {
    let cfg = ListingConfig { overfetch_factor: 5, ..ListingConfig::default() };
    let text = toml::to_string(&cfg).unwrap();
    assert_eq!(ListingConfig::from_toml_str(&text).unwrap(), cfg);
}
