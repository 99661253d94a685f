//! The default reporter routes diagnostics through the `log` facade.
//!
//! Kept in its own binary: `logtest` installs a process-wide logger.

use logtest::Logger;
use phrasebook::{Config, Engine, MessageStore};
use rstest::rstest;

fn warnings_mentioning(logger: &mut Logger, needle: &str) -> usize {
    let mut matches = 0;
    while let Some(record) = logger.pop() {
        if record.level() == log::Level::Warn && record.args().to_string().contains(needle) {
            matches += 1;
        }
    }
    matches
}

#[rstest]
fn missing_keys_log_one_warning_only_in_debug_mode() {
    let mut logger = Logger::start();

    let debug = Engine::new(
        MessageStore::new(),
        Config {
            debug: true,
            ..Config::default()
        },
    );
    assert_eq!(debug.t("nope").text(), "[[nope]]");
    assert_eq!(
        warnings_mentioning(&mut logger, "translation key `nope` is missing"),
        1
    );

    let use_key = Engine::new(
        MessageStore::new(),
        Config {
            debug: true,
            use_key_for_missing_translation: true,
            ..Config::default()
        },
    );
    assert_eq!(use_key.t("absent").text(), "absent");
    assert_eq!(
        warnings_mentioning(&mut logger, "translation key `absent` is missing"),
        0
    );
}
