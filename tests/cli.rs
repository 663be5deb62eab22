use assert_cmd::Command;
use predicates::prelude::*;
use predicates::str::contains;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

struct TestEnv {
    _tmp: TempDir,
    home: PathBuf,
    site: PathBuf,
}

impl TestEnv {
    fn new() -> Self {
        let tmp = TempDir::new().expect("create temp dir");
        let home = tmp.path().join("home");
        fs::create_dir_all(&home).expect("create isolated home");
        let site = make_fixture_site(tmp.path());
        Self { _tmp: tmp, home, site }
    }

    fn cmd(&self) -> Command {
        let mut cmd = Command::cargo_bin("langpack").expect("binary built");
        cmd.env("HOME", &self.home)
            .env("LANG", "en_US.UTF-8")
            .env("NO_COLOR", "1")
            .env_remove("LANGPACK_ROOT")
            .env_remove("RUST_LOG")
            .arg("--root")
            .arg(&self.site);
        cmd
    }

    fn run_json(&self, args: &[&str]) -> Value {
        let out = self
            .cmd()
            .args(args)
            .arg("--format=json")
            .assert()
            .success()
            .get_output()
            .stdout
            .clone();
        serde_json::from_slice(&out).expect("valid json output")
    }

    fn languages_dir(&self) -> PathBuf {
        self.site.join("languages")
    }

    fn saved_locale(&self) -> String {
        let raw = fs::read_to_string(self.home.join(".langpack/config.toml")).expect("config written");
        let config: toml::Value = toml::from_str(&raw).expect("valid toml");
        config["site"]["locale"].as_str().unwrap_or_default().to_string()
    }
}

fn make_fixture_site(base: &Path) -> PathBuf {
    let site = base.join("site");
    let catalog = site.join("catalog");
    let pack = catalog.join("packs/de_DE");

    fs::create_dir_all(&pack).expect("create pack dir");
    fs::create_dir_all(site.join("languages")).expect("create languages dir");
    for name in ["de_DE.po", "de_DE.mo", "admin-de_DE.po", "admin-de_DE.mo"] {
        fs::write(pack.join(name), "msgid \"\"\nmsgstr \"\"\n").expect("write pack file");
    }
    fs::write(site.join("languages/es_ES.po"), "").expect("write unrelated pack");

    let core = serde_json::json!({
        "translations": [
            {
                "language": "fr_FR",
                "english_name": "French (France)",
                "native_name": "Français",
                "version": "6.4.2",
                "package": "packs/fr_FR",
                "updated": "2024-02-11 09:30:00"
            },
            {
                "language": "de_DE",
                "english_name": "German",
                "native_name": "Deutsch",
                "version": "6.4.2",
                "package": "packs/de_DE",
                "updated": "2024-03-01 08:15:00"
            },
            {
                "language": "es_ES",
                "english_name": "Spanish (Spain)",
                "native_name": "Español",
                "version": "6.4.2"
            }
        ]
    });
    fs::write(
        catalog.join("core.json"),
        serde_json::to_string_pretty(&core).expect("serialize catalog"),
    )
    .expect("write catalog");

    site
}

fn languages(listing: &Value) -> Vec<String> {
    listing
        .as_array()
        .expect("array output")
        .iter()
        .map(|r| r["language"].as_str().unwrap_or_default().to_string())
        .collect()
}

#[test]
fn list_merges_catalog_and_installed_state() {
    let env = TestEnv::new();
    let listing = env.run_json(&["core", "list"]);
    assert_eq!(languages(&listing), vec!["de_DE", "en_US", "es_ES", "fr_FR"]);
    assert_eq!(listing[0]["status"], "uninstalled");
    assert_eq!(listing[1]["status"], "installed");
    assert_eq!(listing[2]["status"], "installed");
    assert_eq!(listing[0]["updated"], "2024-03-01 08:15:00");
    assert!(listing[0].get("version").is_none());
}

#[test]
fn list_filters_and_field_selection() {
    let env = TestEnv::new();
    env.cmd()
        .args(["core", "list", "--status=installed", "--field=language"])
        .assert()
        .success()
        .stdout("en_US\nes_ES\n");

    env.cmd()
        .args(["core", "list", "--language=de_DE", "--fields=language,version", "--format=csv"])
        .assert()
        .success()
        .stdout("language,version\nde_DE,6.4.2\n");
}

#[test]
fn list_table_with_no_matches_prints_header_only() {
    let env = TestEnv::new();
    let out = env
        .cmd()
        .args(["core", "list", "--status=active"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let text = String::from_utf8(out).expect("utf8 output");
    assert_eq!(text.lines().count(), 3);
    assert!(text.contains("| language |"));
}

#[test]
fn list_rejects_unknown_fields() {
    let env = TestEnv::new();
    env.cmd()
        .args(["core", "list", "--fields=language,slug"])
        .assert()
        .failure()
        .stderr(contains("unknown field 'slug'"));
}

#[test]
fn install_then_reinstall_warns() {
    let env = TestEnv::new();
    env.cmd()
        .args(["core", "install", "de_DE"])
        .assert()
        .success()
        .stdout(contains("Success: Language installed."));
    assert!(env.languages_dir().join("de_DE.mo").exists());
    assert!(env.languages_dir().join("admin-de_DE.po").exists());

    env.cmd()
        .args(["core", "install", "de_DE"])
        .assert()
        .success()
        .stderr(contains("Warning: Language already installed."));
}

#[test]
fn install_failure_is_a_hard_error() {
    let env = TestEnv::new();
    env.cmd()
        .args(["core", "install", "fr_FR"])
        .assert()
        .failure()
        .stderr(contains("Error: Couldn't install language."));
    assert!(!env.languages_dir().join("fr_FR.po").exists());
}

#[test]
fn install_with_activate_sets_locale() {
    let env = TestEnv::new();
    env.cmd()
        .args(["core", "install", "de_DE", "--activate"])
        .assert()
        .success()
        .stdout(contains("Language activated."));
    assert_eq!(env.saved_locale(), "de_DE");

    let listing = env.run_json(&["core", "list", "--status=active"]);
    assert_eq!(languages(&listing), vec!["de_DE"]);
}

#[test]
fn install_with_activate_of_installed_language_keeps_locale() {
    let env = TestEnv::new();
    env.cmd()
        .args(["core", "install", "es_ES", "--activate"])
        .assert()
        .success()
        .stderr(contains("Warning: Language already installed."))
        .stdout(contains("Language activated.").not());
    assert_eq!(env.saved_locale(), "");
}

#[test]
fn pack_with_free_form_code_round_trips() {
    let env = TestEnv::new();
    let pack = env.site.join("catalog/packs/lang_10");
    fs::create_dir_all(&pack).expect("create pack dir");
    for name in ["lang_10.po", "lang_10.mo"] {
        fs::write(pack.join(name), "").expect("write pack file");
    }
    let theme = serde_json::json!({
        "translations": [
            {"language": "lang_10", "english_name": "Lang 10", "native_name": "Lang 10", "package": "packs/lang_10"}
        ]
    });
    fs::write(env.site.join("catalog/theme.json"), theme.to_string()).expect("write catalog");
    let themes = env.languages_dir().join("themes");

    env.cmd().args(["theme", "install", "lang_10"]).assert().success();
    env.cmd()
        .args(["theme", "install", "lang_10"])
        .assert()
        .success()
        .stderr(contains("Warning: Language already installed."));
    env.cmd().args(["theme", "activate", "lang_10"]).assert().success();
    assert_eq!(env.saved_locale(), "lang_10");

    env.cmd()
        .args(["theme", "uninstall", "lang_10"])
        .assert()
        .success()
        .stdout(contains("Success: Language uninstalled."));
    assert!(!themes.join("lang_10.po").exists());
    assert!(!themes.join("lang_10.mo").exists());
}

#[test]
fn invalid_display_format_in_config_falls_back_to_table() {
    let env = TestEnv::new();
    let config_dir = env.home.join(".langpack");
    fs::create_dir_all(&config_dir).expect("create config dir");
    fs::write(config_dir.join("config.toml"), "[display]\nformat = \"yaml\"\n").expect("write config");

    env.cmd()
        .args(["core", "list", "--field=language", "--language=de_DE"])
        .assert()
        .success()
        .stdout("de_DE\n")
        .stderr(contains("ignoring display.format from config"));
}

#[test]
fn redirected_error_output_has_no_color_codes() {
    let env = TestEnv::new();
    env.cmd()
        .env_remove("NO_COLOR")
        .args(["core", "activate", "xx_XX"])
        .assert()
        .failure()
        .stderr(contains("Error: Language not installed."))
        .stderr(contains("\u{1b}[").not());
}

#[test]
fn activate_rules() {
    let env = TestEnv::new();
    env.cmd()
        .args(["core", "activate", "es_ES"])
        .assert()
        .success()
        .stdout(contains("Success: Language activated."));
    assert_eq!(env.saved_locale(), "es_ES");

    env.cmd().args(["core", "activate", "en_US"]).assert().success();
    assert_eq!(env.saved_locale(), "");

    env.cmd()
        .args(["core", "activate", "xx_XX"])
        .assert()
        .failure()
        .stderr(contains("Error: Language not installed."));
    assert_eq!(env.saved_locale(), "");
}

#[test]
fn uninstall_removes_only_that_pack() {
    let env = TestEnv::new();
    env.cmd().args(["core", "install", "de_DE"]).assert().success();
    env.cmd().args(["core", "is-installed", "de_DE"]).assert().success();

    env.cmd()
        .args(["core", "uninstall", "de_DE"])
        .assert()
        .success()
        .stdout(contains("Success: Language uninstalled."));
    assert!(!env.languages_dir().join("de_DE.po").exists());
    assert!(!env.languages_dir().join("admin-de_DE.mo").exists());
    assert!(env.languages_dir().join("es_ES.po").exists());

    env.cmd().args(["core", "is-installed", "de_DE"]).assert().failure();
}

#[test]
fn uninstall_errors() {
    let env = TestEnv::new();
    env.cmd()
        .args(["core", "uninstall", "fr_FR"])
        .assert()
        .failure()
        .stderr(contains("Error: Language not installed."));

    env.cmd()
        .args(["plugin", "uninstall", "en_US"])
        .assert()
        .failure()
        .stderr(contains("Error: No files found in language directory."));

    env.cmd()
        .args(["core", "uninstall", "en_US"])
        .assert()
        .failure()
        .stderr(contains("Error: Couldn't uninstall language."));
}

#[test]
fn plugin_listing_without_catalog_has_only_en_us() {
    let env = TestEnv::new();
    let listing = env.run_json(&["plugin", "list"]);
    assert_eq!(languages(&listing), vec!["en_US"]);
    assert_eq!(listing[0]["status"], "installed");
}
