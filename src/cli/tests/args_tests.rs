use clap::Parser;

use super::args::{CliArgs, Command, Mode, OutputFormat};
use psynth_common::SynthesisMode;

#[test]
fn parses_synthesize_with_defaults() {
    let args = CliArgs::try_parse_from([
        "psynth",
        "synthesize",
        "--model",
        "model.json",
        "--class",
        "FooDecorator",
    ])
    .expect("synthesize args should parse");

    let Command::Synthesize(synthesize) = args.command else {
        panic!("expected synthesize");
    };
    assert_eq!(synthesize.target.class, "FooDecorator");
    assert_eq!(synthesize.target.source.model.to_str(), Some("model.json"));
    assert_eq!(synthesize.target.source.format, OutputFormat::Csharp);
    assert!(synthesize.target.source.config.is_none());
    assert!(synthesize.interface.is_none());
    assert!(synthesize.mode.is_none());
}

#[test]
fn parses_synthesize_flags() {
    let args = CliArgs::try_parse_from([
        "psynth",
        "synthesize",
        "-m",
        "ws/model.json",
        "--config",
        "ws/psynth.json",
        "--class",
        "Acme.FooDecorator",
        "--interface",
        "IFoo",
        "--mode",
        "EXPLICIT",
        "--policy-type",
        "Polly.IAsyncPolicy",
        "--format",
        "json",
    ])
    .expect("flags should parse");

    let Command::Synthesize(synthesize) = args.command else {
        panic!("expected synthesize");
    };
    assert_eq!(synthesize.interface.as_deref(), Some("IFoo"));
    assert_eq!(synthesize.mode, Some(Mode::Explicit));
    assert_eq!(SynthesisMode::from(Mode::Explicit), SynthesisMode::Explicit);
    assert_eq!(synthesize.policy_type.as_deref(), Some("Polly.IAsyncPolicy"));
    assert_eq!(synthesize.target.source.format, OutputFormat::Json);
    assert!(synthesize.target.source.config.is_some());
}

#[test]
fn parses_check_and_actions() {
    let check = CliArgs::try_parse_from(["psynth", "check", "--model", "m.json", "--class", "C"])
        .expect("check should parse");
    assert!(matches!(check.command, Command::Check(ref args) if args.class == "C"));

    let actions = CliArgs::try_parse_from(["psynth", "actions", "--model", "m.json", "--class", "C"])
        .expect("actions should parse");
    assert!(matches!(actions.command, Command::Actions(_)));
}

#[test]
fn rejects_missing_class() {
    assert!(CliArgs::try_parse_from(["psynth", "check", "--model", "m.json"]).is_err());
}

#[test]
fn rejects_unknown_mode() {
    let result = CliArgs::try_parse_from([
        "psynth",
        "synthesize",
        "--model",
        "m.json",
        "--class",
        "C",
        "--mode",
        "lazy",
    ]);
    assert!(result.is_err());
}
