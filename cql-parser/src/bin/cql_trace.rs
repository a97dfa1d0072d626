/// CQL Tracer - shows the flow through Lexer → Parser → AST
///
/// Usage: cql_trace [--tokens] [--config <parser.toml>] [file.cql | -]
///
/// Reads the script from the file (or stdin), prints the parsed script as
/// JSON on stdout and every diagnostic as `line:column: severity: message`
/// on stderr. Set RUST_LOG=cql_parser=debug to see per-statement events.

use cql_parser::{parse_script_with, Lexer, ParserConfig};
use std::io::Read;
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

struct Args {
    path: Option<String>,
    config: Option<String>,
    tokens: bool,
}

fn parse_args() -> Result<Args, String> {
    let mut args = Args {
        path: None,
        config: None,
        tokens: false,
    };
    let mut iter = std::env::args().skip(1);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--tokens" => args.tokens = true,
            "--config" => {
                args.config = Some(iter.next().ok_or("--config needs a file argument")?);
            }
            "-h" | "--help" => {
                return Err("Usage: cql_trace [--tokens] [--config <parser.toml>] [file.cql | -]".to_string())
            }
            "-" => args.path = None,
            other if other.starts_with("--") => return Err(format!("unknown flag {}", other)),
            other => args.path = Some(other.to_string()),
        }
    }
    Ok(args)
}

fn read_source(path: Option<&str>) -> Result<String, String> {
    match path {
        Some(path) => {
            std::fs::read_to_string(path).map_err(|e| format!("failed to read {}: {}", path, e))
        }
        None => {
            let mut source = String::new();
            std::io::stdin()
                .read_to_string(&mut source)
                .map_err(|e| format!("failed to read stdin: {}", e))?;
            Ok(source)
        }
    }
}

fn load_config(path: Option<&str>) -> Result<ParserConfig, String> {
    match path {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .map_err(|e| format!("failed to read {}: {}", path, e))?;
            ParserConfig::from_toml_str(&text).map_err(|e| format!("{}: {}", path, e))
        }
        None => Ok(ParserConfig::default()),
    }
}

fn run() -> Result<bool, String> {
    let args = parse_args()?;
    let config = load_config(args.config.as_deref())?;
    let source = read_source(args.path.as_deref())?;

    if args.tokens {
        for token in Lexer::new(&source).tokenize() {
            eprintln!(
                "{:>4}:{:<3} {:<14} {:?}",
                token.span.line,
                token.span.column,
                format!("{:?}", token.kind.category()),
                token.kind
            );
        }
    }

    let output = parse_script_with(&source, &config);
    tracing::info!(
        statements = output.script.statements.len(),
        empty = output.script.empty_statements,
        diagnostics = output.diagnostics.len(),
        "parsed script"
    );

    let json = serde_json::to_string_pretty(&output.script)
        .map_err(|e| format!("failed to serialize script: {}", e))?;
    println!("{}", json);

    for diagnostic in &output.diagnostics {
        eprintln!("{}", diagnostic);
    }
    Ok(!output.has_errors())
}

fn main() -> ExitCode {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init();

    match run() {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(1),
        Err(message) => {
            eprintln!("{}", message);
            ExitCode::from(2)
        }
    }
}
