#![doc = include_str!("../README.md")]

use std::path::PathBuf;
use std::process::ExitCode;

use bpaf::{Bpaf, Parser};
use joist_parser::{Control, DupKey, Input, parse};
use joist_value::Format;
use tracing_subscriber::prelude::*;

mod diagnostics;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum InputMode {
    Mmap,
    Data,
}

impl core::str::FromStr for InputMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "mmap" => Ok(Self::Mmap),
            "data" | "string" => Ok(Self::Data),
            _ => Err(format!(
                "unknown input mode '{s}', expected: mmap, data, string"
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ShowOutput {
    No,
    Compact,
    Pretty,
}

impl core::str::FromStr for ShowOutput {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "no" | "false" => Ok(Self::No),
            "compact" => Ok(Self::Compact),
            "pretty" => Ok(Self::Pretty),
            _ => Err(format!(
                "unknown output format '{s}', expected: compact, pretty, no"
            )),
        }
    }
}

/// `--show-output` takes an optional value: the bare flag means compact.
/// The valued form is `=`-adjacent so it can never swallow the positional.
fn show_output() -> impl Parser<ShowOutput> {
    let valued = bpaf::long("show-output")
        .help("Print the parsed tree (compact, pretty, or no)")
        .argument::<ShowOutput>("FMT|no")
        .adjacent();
    let bare = bpaf::long("show-output").req_flag(ShowOutput::Compact);
    bpaf::construct!([valued, bare]).fallback(ShowOutput::No)
}

#[derive(Debug, Clone, Bpaf)]
#[bpaf(options, version)]
/// Parse a JSON document, print parse statistics, and optionally
/// re-serialize the tree
struct Cli {
    /// Duplicate-key policy: accept, ignore, append, or reject
    #[bpaf(long("dup"), long("duplicate"), argument("POLICY"), fallback(DupKey::Reject))]
    dup: DupKey,

    /// Accept single-quoted and unquoted object keys
    #[bpaf(long("allow-flex-keys"), long("allow-flexible-keys"), switch)]
    allow_flex_keys: bool,

    /// Accept single-quoted string values
    #[bpaf(long("allow-flex-strings"), long("allow-flexible-strings"), switch)]
    allow_flex_strings: bool,

    /// Accept true/false/null literals in any case
    #[bpaf(long("allow-nocase"), long("allow-nocase-values"), switch)]
    allow_nocase: bool,

    #[bpaf(external(show_output))]
    show_output: ShowOutput,

    /// Input mode: mmap the file or read it into memory
    #[bpaf(long("use"), argument("mmap|data"), fallback(InputMode::Mmap))]
    mode: InputMode,

    /// JSON document to parse
    #[bpaf(positional("PATH"))]
    path: PathBuf,
}

/// Routes `tracing` output to stderr when `JOIST_LOG` is set.
fn setup_tracing() {
    let Ok(filter) = tracing_subscriber::EnvFilter::try_from_env("JOIST_LOG") else {
        return;
    };
    tracing_subscriber::registry()
        .with(
            tracing_tree::HierarchicalLayer::new(2)
                .with_targets(true)
                .with_writer(std::io::stderr),
        )
        .with(filter)
        .init();
}

fn run(cli: &Cli) -> miette::Result<()> {
    let ctrl = Control {
        dup_key: cli.dup,
        allow_flexible_keys: cli.allow_flex_keys,
        allow_flexible_strings: cli.allow_flex_strings,
        allow_nocase_values: cli.allow_nocase,
    };

    let output = match cli.mode {
        InputMode::Mmap => {
            tracing::info!(path = %cli.path.display(), "using mmap input");
            let input = Input::map_file(&cli.path)
                .map_err(|e| diagnostics::render(&cli.path, &[], &e))?;
            parse(&input, &ctrl)
                .map_err(|e| diagnostics::render(&cli.path, input.bytes(), &e))?
        }
        InputMode::Data => {
            tracing::info!(path = %cli.path.display(), "using in-memory input");
            let data = std::fs::read(&cli.path)
                .map_err(|e| miette::Report::msg(format!("{}: {e}", cli.path.display())))?;
            parse(&Input::from_bytes(&data), &ctrl)
                .map_err(|e| diagnostics::render(&cli.path, &data, &e))?
        }
    };

    match cli.show_output {
        ShowOutput::No => {}
        ShowOutput::Compact => {
            let text = output.root.to_str().map_err(|e| miette::Report::msg(e.to_string()))?;
            println!("{text}");
        }
        ShowOutput::Pretty => {
            let text = output
                .root
                .to_str_fmt(&Format::pretty())
                .map_err(|e| miette::Report::msg(e.to_string()))?;
            println!("{text}");
        }
    }
    eprintln!("{}", output.stats);
    Ok(())
}

fn main() -> ExitCode {
    let cli = cli().run();
    setup_tracing();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(report) => {
            eprintln!("{report:?}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write as _;

    use super::*;

    #[test]
    fn cli_parses_defaults() -> anyhow::Result<()> {
        let cli = cli()
            .run_inner(&["data.json"])
            .map_err(|e| anyhow::anyhow!("{e:?}"))?;
        assert_eq!(cli.dup, DupKey::Reject);
        assert!(!cli.allow_flex_keys);
        assert!(!cli.allow_flex_strings);
        assert!(!cli.allow_nocase);
        assert_eq!(cli.show_output, ShowOutput::No);
        assert_eq!(cli.mode, InputMode::Mmap);
        assert_eq!(cli.path, PathBuf::from("data.json"));
        Ok(())
    }

    #[test]
    fn cli_parses_all_options() -> anyhow::Result<()> {
        let cli = cli()
            .run_inner(&[
                "--dup=append",
                "--allow-flex-keys",
                "--allow-flex-strings",
                "--allow-nocase",
                "--show-output=pretty",
                "--use=data",
                "in.json",
            ])
            .map_err(|e| anyhow::anyhow!("{e:?}"))?;
        assert_eq!(cli.dup, DupKey::Append);
        assert!(cli.allow_flex_keys);
        assert!(cli.allow_flex_strings);
        assert!(cli.allow_nocase);
        assert_eq!(cli.show_output, ShowOutput::Pretty);
        assert_eq!(cli.mode, InputMode::Data);
        Ok(())
    }

    #[test]
    fn cli_long_aliases_match_short_forms() -> anyhow::Result<()> {
        let cli = cli()
            .run_inner(&[
                "--duplicate=ignore",
                "--allow-flexible-keys",
                "--allow-nocase-values",
                "in.json",
            ])
            .map_err(|e| anyhow::anyhow!("{e:?}"))?;
        assert_eq!(cli.dup, DupKey::Ignore);
        assert!(cli.allow_flex_keys);
        assert!(cli.allow_nocase);
        Ok(())
    }

    #[test]
    fn cli_bare_show_output_means_compact() -> anyhow::Result<()> {
        let cli = cli()
            .run_inner(&["--show-output", "in.json"])
            .map_err(|e| anyhow::anyhow!("{e:?}"))?;
        assert_eq!(cli.show_output, ShowOutput::Compact);
        Ok(())
    }

    #[test]
    fn cli_show_output_no_disables_printing() -> anyhow::Result<()> {
        let cli = cli()
            .run_inner(&["--show-output=no", "in.json"])
            .map_err(|e| anyhow::anyhow!("{e:?}"))?;
        assert_eq!(cli.show_output, ShowOutput::No);
        Ok(())
    }

    #[test]
    fn cli_rejects_unknown_policy() {
        assert!(cli().run_inner(&["--dup=overwrite", "in.json"]).is_err());
        assert!(cli().run_inner(&["--use=tape", "in.json"]).is_err());
    }

    #[test]
    fn cli_requires_the_path() {
        assert!(cli().run_inner(&[] as &[&str]).is_err());
    }

    #[test]
    fn run_parses_a_real_file_in_both_modes() -> anyhow::Result<()> {
        let mut file = tempfile::NamedTempFile::new()?;
        file.write_all(br#"{"a":1,"b":[true,null,"x"]}"#)?;
        let path = file.path().display().to_string();

        for mode in ["mmap", "data"] {
            let cli = cli()
                .run_inner(&["--use", mode, path.as_str()] as &[&str])
                .map_err(|e| anyhow::anyhow!("{e:?}"))?;
            assert!(run(&cli).is_ok(), "mode {mode} failed");
        }
        Ok(())
    }

    #[test]
    fn run_fails_on_malformed_input() -> anyhow::Result<()> {
        let mut file = tempfile::NamedTempFile::new()?;
        file.write_all(b"[1,")?;
        let path = file.path().display().to_string();

        let cli = cli()
            .run_inner(&[path.as_str()] as &[&str])
            .map_err(|e| anyhow::anyhow!("{e:?}"))?;
        assert!(run(&cli).is_err());
        Ok(())
    }
}
