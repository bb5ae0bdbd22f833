//! CLI help output tests for ct-core.
//!
//! These tests verify that all commands display their help text and that
//! argument errors use the documented exit code.

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;
use predicates::prelude::*;

/// Get a Command for the ct-core binary.
fn ct_core() -> Command {
    cargo_bin_cmd!("ct-core")
}

mod top_level {
    use super::*;

    #[test]
    fn help_flag_works() {
        ct_core()
            .arg("--help")
            .assert()
            .success()
            .stdout(predicate::str::contains("context-tree"));
    }

    #[test]
    fn version_flag_works() {
        ct_core()
            .arg("--version")
            .assert()
            .success()
            .stdout(predicate::str::contains("ct-core"));
    }

    #[test]
    fn help_shows_all_commands() {
        ct_core()
            .arg("--help")
            .assert()
            .success()
            .stdout(predicate::str::contains("estimate"))
            .stdout(predicate::str::contains("generate"))
            .stdout(predicate::str::contains("likelihood"))
            .stdout(predicate::str::contains("check"))
            .stdout(predicate::str::contains("version"));
    }

    #[test]
    fn help_shows_global_options() {
        ct_core()
            .arg("--help")
            .assert()
            .success()
            .stdout(predicate::str::contains("--format"))
            .stdout(predicate::str::contains("--settings"))
            .stdout(predicate::str::contains("--log-format"));
    }
}

mod subcommands {
    use super::*;

    #[test]
    fn estimate_help() {
        ct_core()
            .args(["estimate", "--help"])
            .assert()
            .success()
            .stdout(predicate::str::contains("--model"))
            .stdout(predicate::str::contains("--sequence"))
            .stdout(predicate::str::contains("--seed"));
    }

    #[test]
    fn likelihood_help() {
        ct_core()
            .args(["likelihood", "--help"])
            .assert()
            .success()
            .stdout(predicate::str::contains("--input"))
            .stdout(predicate::str::contains("--response"))
            .stdout(predicate::str::contains("--alignment"));
    }

    #[test]
    fn generate_help() {
        ct_core()
            .args(["generate", "--help"])
            .assert()
            .success()
            .stdout(predicate::str::contains("--length"));
    }
}

mod argument_errors {
    use super::*;

    #[test]
    fn unknown_command_exits_with_args_error() {
        ct_core()
            .arg("nonexistent-command")
            .assert()
            .code(10)
            .stderr(predicate::str::contains("error"));
    }

    #[test]
    fn missing_model_exits_with_args_error() {
        ct_core().arg("estimate").assert().code(10);
    }

    #[test]
    fn bad_alignment_exits_with_args_error() {
        ct_core()
            .args([
                "likelihood",
                "--model",
                "m.json",
                "--input",
                "x.txt",
                "--response",
                "y.txt",
                "--alignment",
                "sideways",
            ])
            .assert()
            .code(10);
    }
}
