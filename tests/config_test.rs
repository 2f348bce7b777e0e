use clap::{CommandFactory, FromArgMatches, Parser};
use std::fs;
use tunnel_core::config::{CardSize, Config, GridOptions, ViewportParams};
use tunnel_core::TunnelError;

#[derive(Parser, Debug)]
struct Harness {
    #[command(flatten)]
    config: Config,
}

fn parse(args: &[&str]) -> (Config, clap::ArgMatches) {
    let matches = Harness::command()
        .try_get_matches_from(std::iter::once("tunnel").chain(args.iter().copied()))
        .unwrap();
    let harness = Harness::from_arg_matches(&matches).unwrap();
    (harness.config, matches)
}

#[test]
fn test_defaults_match_board_constants() {
    let config = Config::default();
    assert_eq!(
        config.grid,
        GridOptions {
            gap_x: 280.0,
            gap_y: 320.0,
            offset_x: 80.0,
            offset_y: 80.0,
        }
    );
    assert_eq!(config.card, CardSize::new(240.0, 320.0));
    assert_eq!(config.viewport.dpr, 1.0);
}

#[test]
fn test_cli_defaults_equal_struct_defaults() {
    let (config, _) = parse(&[]);
    assert_eq!(config, Config::default());
}

#[test]
fn test_partial_file_fills_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tunnel.json");
    fs::write(&path, r#"{"grid":{"gap_x":300.0},"viewport":{"dpr":2.0}}"#).unwrap();

    let config = Config::load_from_file(&path).unwrap();
    assert_eq!(config.grid.gap_x, 300.0);
    assert_eq!(config.grid.gap_y, 320.0);
    assert_eq!(config.card, CardSize::default());
    assert_eq!(
        config.viewport,
        ViewportParams {
            dpr: 2.0,
            ..ViewportParams::default()
        }
    );
}

#[test]
fn test_missing_file_is_config_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = Config::load_from_file(dir.path().join("nope.json")).unwrap_err();
    assert!(matches!(err, TunnelError::Config(_)));
}

#[test]
fn test_malformed_file_is_json_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bad.json");
    fs::write(&path, "{ grid: ").unwrap();
    let err = Config::load_from_file(&path).unwrap_err();
    assert!(matches!(err, TunnelError::Json(_)));
}

#[test]
fn test_explicit_flags_override_file() {
    let mut file_config = Config {
        grid: GridOptions {
            gap_x: 500.0,
            gap_y: 500.0,
            ..GridOptions::default()
        },
        ..Config::default()
    };
    let (cli, matches) = parse(&["--gap-y", "330", "--card-w", "200"]);
    file_config.merge_from_cli(&cli, &matches);

    // gap_x came only from the default, so the file value stays.
    assert_eq!(file_config.grid.gap_x, 500.0);
    assert_eq!(file_config.grid.gap_y, 330.0);
    assert_eq!(file_config.card.card_w, 200.0);
    assert_eq!(file_config.card.card_h, 320.0);
}
