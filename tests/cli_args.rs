// tests/cli_args.rs

use std::path::{Path, PathBuf};

use clap::Parser;

use tiledash::cli::CliArgs;
use tiledash::logging::{LogTarget, parse_level_str};

#[test]
fn default_job_file_is_used_without_flags() {
    let args = CliArgs::try_parse_from(["tiledash"]).unwrap();
    assert_eq!(args.configs, vec![PathBuf::from("tiledash.toml")]);
    assert!(args.uses_dashboard());
}

#[test]
fn cfg_accepts_a_comma_separated_list() {
    let args = CliArgs::try_parse_from(["tiledash", "--cfg", "a.toml,b.yaml"]).unwrap();
    assert_eq!(
        args.configs,
        vec![PathBuf::from("a.toml"), PathBuf::from("b.yaml")]
    );
}

#[test]
fn headless_modes_do_not_use_the_dashboard() {
    let once = CliArgs::try_parse_from(["tiledash", "--once"]).unwrap();
    assert!(!once.uses_dashboard());

    let dry = CliArgs::try_parse_from(["tiledash", "--dry-run"]).unwrap();
    assert!(!dry.uses_dashboard());
}

#[test]
fn log_target_depends_on_mode() {
    let file = Path::new("dash.log");
    assert_eq!(LogTarget::select(Some(file), true), LogTarget::File(file));
    assert_eq!(LogTarget::select(None, true), LogTarget::Discard);
    assert_eq!(LogTarget::select(None, false), LogTarget::Stderr);
}

#[test]
fn log_levels_parse_case_insensitively() {
    assert_eq!(parse_level_str(" DEBUG "), Some(tracing::Level::DEBUG));
    assert_eq!(parse_level_str("warning"), Some(tracing::Level::WARN));
    assert_eq!(parse_level_str("loud"), None);
}
