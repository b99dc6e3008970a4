//! Tests for run.

use super::parse;
use crate::cli::{Cli, CliCommand};
use clap::Parser;

#[test]
fn cli_parse_run() {
    match parse(&["regimekit", "run", "explore_new_api", "--items", "250"]) {
        CliCommand::Run {
            task,
            items,
            keywords,
            fail_first,
            ..
        } => {
            assert_eq!(task, "explore_new_api");
            assert_eq!(items, 250);
            assert!(keywords.is_empty());
            assert_eq!(fail_first, 0);
        }
        _ => panic!("expected Run"),
    }
}

#[test]
fn cli_parse_run_fail_first() {
    match parse(&[
        "regimekit",
        "run",
        "t",
        "--items",
        "10",
        "--keyword",
        "benchmark",
        "--fail-first",
        "2",
    ]) {
        CliCommand::Run {
            keywords,
            fail_first,
            ..
        } => {
            assert_eq!(keywords, vec!["benchmark"]);
            assert_eq!(fail_first, 2);
        }
        _ => panic!("expected Run"),
    }
}

#[test]
fn cli_parse_run_requires_items() {
    assert!(Cli::try_parse_from(["regimekit", "run", "t"]).is_err());
}
