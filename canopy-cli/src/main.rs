//! Canopy CLI: parse HTML and print the resulting tree.
//!
//! Usage:
//!   canopy page.html                      Print the tree dump
//!   canopy --html '<p>Hi' --format html   Print the serialized document
//!   canopy page.html --errors             Also list parse errors on stderr
//!   cat page.html | canopy --format json  Read stdin, print JSON

mod output;

use std::fs;
use std::io::{self, IsTerminal};
use std::num::NonZeroUsize;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use canopy_dom::Namespace;
use canopy_html::{ParseError, ParserConfig};
use clap::{ArgAction, Parser, ValueEnum};
use env_logger::Env;
use log::debug;
use owo_colors::OwoColorize;

use output::{Format, Parsed};

/// Canopy: error-tolerant HTML parser
#[derive(Parser, Debug)]
#[command(name = "canopy")]
#[command(author, version, about, long_about = None)]
#[command(after_help = r#"EXAMPLES:
    # Dump the tree of a file
    canopy index.html

    # Parse a string and list the parse errors
    canopy --html '<b>1<i>2</b>3</i>' --errors

    # Parse table rows as the contents of a <tbody>
    canopy --fragment tbody --html '<tr><td>x'

    # Stream the input 16 characters at a time
    canopy index.html --chunk-size 16 --format html
"#)]
struct Cli {
    /// HTML file to parse; stdin is read when neither FILE nor --html is given
    #[arg(value_name = "FILE")]
    path: Option<PathBuf>,

    /// Parse this string instead of a file
    #[arg(long, value_name = "HTML", conflicts_with = "path")]
    html: Option<String>,

    /// Parse the input as the contents of a CONTEXT element
    #[arg(long, value_name = "CONTEXT")]
    fragment: Option<String>,

    /// Namespace of the --fragment context element
    #[arg(long, value_enum, default_value_t = NamespaceArg::Html)]
    namespace: NamespaceArg,

    /// Feed the parser N characters at a time
    #[arg(long, value_name = "N")]
    chunk_size: Option<NonZeroUsize>,

    /// Output format
    #[arg(long, value_enum, default_value_t = Format::Tree)]
    format: Format,

    /// List parse errors on stderr
    #[arg(long)]
    errors: bool,

    /// JSON file with parser options ({"scripting": true, "limits": {...}})
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Maximum depth of open elements
    #[arg(long, value_name = "N")]
    max_depth: Option<usize>,

    /// Maximum number of tokens
    #[arg(long, value_name = "N")]
    max_tokens: Option<usize>,

    /// Parse as if scripting were enabled (<noscript> becomes raw text)
    #[arg(long)]
    scripting: bool,

    /// Log more (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum NamespaceArg {
    Html,
    Svg,
    Math,
}

impl From<NamespaceArg> for Namespace {
    fn from(arg: NamespaceArg) -> Self {
        match arg {
            NamespaceArg::Html => Self::Html,
            NamespaceArg::Svg => Self::Svg,
            NamespaceArg::Math => Self::MathMl,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    env_logger::Builder::from_env(Env::default().default_filter_or(match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }))
    .format_timestamp(None)
    .init();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            if io::stderr().is_terminal() {
                eprintln!("{} {error:#}", "error:".red().bold());
            } else {
                eprintln!("error: {error:#}");
            }
            if error.downcast_ref::<ParseError>().is_some() {
                ExitCode::from(2)
            } else {
                ExitCode::FAILURE
            }
        }
    }
}

fn run(cli: &Cli) -> Result<()> {
    let config = load_config(cli)?;
    let input = read_input(cli)?;
    debug!(
        "parsing {} characters (scripting {}, depth limit {})",
        input.chars().count(),
        config.scripting,
        config.limits.max_nesting_depth
    );

    let parsed = parse(cli, config, &input)?;
    print!(
        "{}",
        output::render(&parsed, cli.format, io::stdout().is_terminal())?
    );
    if cli.errors {
        output::print_errors(parsed.errors(), io::stderr().is_terminal());
    }
    Ok(())
}

/// The config file, if any, with command-line overrides applied.
fn load_config(cli: &Cli) -> Result<ParserConfig> {
    let mut config = match &cli.config {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("failed to read config {}", path.display()))?;
            parse_config(&text)
                .with_context(|| format!("invalid config {}", path.display()))?
        }
        None => ParserConfig::default(),
    };
    if cli.scripting {
        config.scripting = true;
    }
    if let Some(depth) = cli.max_depth {
        config.limits.max_nesting_depth = depth;
    }
    if let Some(tokens) = cli.max_tokens {
        config.limits.max_tokens = tokens;
    }
    Ok(config)
}

fn parse_config(text: &str) -> Result<ParserConfig> {
    Ok(serde_json::from_str(text)?)
}

fn read_input(cli: &Cli) -> Result<String> {
    if let Some(html) = &cli.html {
        return Ok(html.clone());
    }
    match &cli.path {
        Some(path) => {
            fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
        }
        None => io::read_to_string(io::stdin()).context("failed to read stdin"),
    }
}

fn parse(cli: &Cli, config: ParserConfig, input: &str) -> Result<Parsed> {
    let mut parser = match &cli.fragment {
        Some(context) => canopy_html::Parser::for_fragment(config, context, cli.namespace.into()),
        None => canopy_html::Parser::new(config),
    };

    match cli.chunk_size {
        Some(size) => {
            for chunk in chunks(input, size) {
                parser.feed(chunk)?;
            }
        }
        None => parser.feed(input)?,
    }

    Ok(if cli.fragment.is_some() {
        Parsed::Fragment(parser.finish_fragment()?)
    } else {
        Parsed::Document(parser.finish()?)
    })
}

/// Split `input` into pieces of `size` characters (the last may be shorter).
fn chunks(input: &str, size: NonZeroUsize) -> impl Iterator<Item = &str> {
    let mut rest = input;
    std::iter::from_fn(move || {
        if rest.is_empty() {
            return None;
        }
        let end = rest
            .char_indices()
            .nth(size.get())
            .map_or(rest.len(), |(index, _)| index);
        let (chunk, tail) = rest.split_at(end);
        rest = tail;
        Some(chunk)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn size(n: usize) -> NonZeroUsize {
        NonZeroUsize::new(n).expect("non-zero")
    }

    #[test]
    fn test_chunks_respect_char_boundaries() {
        let pieces: Vec<&str> = chunks("a\u{e9}b\u{263a}c", size(2)).collect();
        assert_eq!(pieces, vec!["a\u{e9}", "b\u{263a}", "c"]);
        assert_eq!(chunks("", size(3)).count(), 0);
        assert_eq!(chunks("abc", size(10)).collect::<Vec<_>>(), vec!["abc"]);
    }

    #[test]
    fn test_flags_override_config_file() {
        let cli = Cli::parse_from(["canopy", "--max-depth", "8", "--scripting"]);
        let config = load_config(&cli).expect("no config file");
        assert!(config.scripting);
        assert_eq!(config.limits.max_nesting_depth, 8);
        assert_eq!(
            config.limits.max_tokens,
            ParserConfig::default().limits.max_tokens
        );
    }

    #[test]
    fn test_partial_config_keeps_defaults() {
        let config = parse_config(r#"{"limits": {"max_tokens": 100}}"#).expect("valid");
        assert_eq!(config.limits.max_tokens, 100);
        assert_eq!(
            config.limits.max_nesting_depth,
            ParserConfig::default().limits.max_nesting_depth
        );
        assert!(parse_config(r#"{"scripting": "yes"}"#).is_err());
    }

    #[test]
    fn test_resource_exhaustion_is_a_parse_error() {
        let cli = Cli::parse_from(["canopy", "--html", "<div><div><div>", "--max-depth", "3"]);
        let config = load_config(&cli).expect("no config file");
        let error = parse(&cli, config, "<div><div><div>")
            .err()
            .expect("depth limit exceeded");
        assert!(error.downcast_ref::<ParseError>().is_some());
    }

    #[test]
    fn test_fragment_output() {
        let cli = Cli::parse_from(["canopy", "--fragment", "tr", "--format", "html"]);
        let parsed = parse(&cli, ParserConfig::default(), "<td>x").expect("parses");
        let html = output::render(&parsed, cli.format, false).expect("renders");
        assert_eq!(html, "<td>x</td>\n");
    }
}
