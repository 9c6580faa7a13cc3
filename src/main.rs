mod debug_report;

use bcsl::{Model, Options, compile_verbose, eliminate_redundant, load_model, locate, reachable, reduce};
use std::fs;
use std::io::{self, IsTerminal};
use tracing_subscriber::EnvFilter;

fn main() {
    let config = match parse_args() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(2);
        }
    };

    let filter = EnvFilter::try_from_env("BCSL_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(io::stderr).init();

    if let Err(err) = run(&config) {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Method {
    Compile,
    Reduce,
    Eliminate,
    Reachable,
    Locate,
}

impl Method {
    fn parse(value: &str) -> Result<Self, String> {
        match value {
            "compile" => Ok(Method::Compile),
            "reduce" => Ok(Method::Reduce),
            "eliminate" => Ok(Method::Eliminate),
            "reachable" => Ok(Method::Reachable),
            "locate" => Ok(Method::Locate),
            other => Err(format!(
                "error: unknown method '{other}' (expected compile, reduce, eliminate, reachable or locate)"
            )),
        }
    }

    fn needs_complex(self) -> bool {
        matches!(self, Method::Reachable | Method::Locate)
    }
}

struct CliConfig {
    model: String,
    method: Method,
    complex: Option<String>,
    output: Option<String>,
    bound: Option<u32>,
    color: bool,
}

fn run(config: &CliConfig) -> bcsl::Result<()> {
    let model = load_model(&config.model)?;
    let options = Options { bound: config.bound, ..Options::default() };
    let complex = config.complex.as_deref().unwrap_or_default();

    match config.method {
        Method::Compile => {
            let report = compile_verbose(&model, &options)?;
            debug_report::print_compile(&config.model, &report, config.color);
            if let Some(path) = &config.output {
                fs::write(path, report.vector_model.to_string())?;
            }
        }
        Method::Reduce => emit_model(&reduce(&model), config.output.as_deref())?,
        Method::Eliminate => emit_model(&eliminate_redundant(&model), config.output.as_deref())?,
        Method::Reachable => debug_report::print_reachable(complex, reachable(&model, complex)?, config.color),
        Method::Locate => debug_report::print_located(complex, &locate(&model, complex)?, config.color),
    }
    Ok(())
}

fn emit_model(model: &Model, output: Option<&str>) -> bcsl::Result<()> {
    match output {
        Some(path) => fs::write(path, model.to_string())?,
        None => print!("{model}"),
    }
    Ok(())
}

fn parse_args() -> Result<CliConfig, String> {
    let mut model: Option<String> = None;
    let mut method: Option<Method> = None;
    let mut complex: Option<String> = None;
    let mut output: Option<String> = None;
    let mut bound: Option<u32> = None;
    let mut color = io::stdout().is_terminal();
    let mut args = std::env::args().skip(1);

    while let Some(arg) = args.next() {
        let (flag, inline) = match arg.split_once('=') {
            Some((flag, value)) if flag.starts_with("--") => (flag.to_string(), Some(value.to_string())),
            _ => (arg.clone(), None),
        };
        let mut value = |name: &str| -> Result<String, String> {
            inline.clone().or_else(|| args.next()).ok_or_else(|| format!("error: {name} expects a value"))
        };

        match flag.as_str() {
            "-h" | "--help" => {
                print_help();
                std::process::exit(0);
            }
            "-V" | "--version" => {
                println!("bcsl {}", env!("CARGO_PKG_VERSION"));
                std::process::exit(0);
            }
            "--color" => color = true,
            "--no-color" => color = false,
            "--model" | "-m" => model = Some(value("--model")?),
            "--method" => method = Some(Method::parse(&value("--method")?)?),
            "--complex" | "-c" => complex = Some(value("--complex")?),
            "--output" | "-o" => output = Some(value("--output")?),
            "--bound" => {
                let raw = value("--bound")?;
                let parsed =
                    raw.parse().map_err(|_| format!("error: invalid --bound '{raw}' (expected a non-negative integer)"))?;
                bound = Some(parsed);
            }
            _ => return Err(format!("error: unknown option '{arg}'\n\n{}", help_text())),
        }
    }

    let model = model.ok_or_else(|| format!("error: no model provided\n\n{}", help_text()))?;
    let method = method.ok_or_else(|| format!("error: no method provided\n\n{}", help_text()))?;
    if method.needs_complex() && complex.is_none() {
        return Err("error: this method expects --complex <literal>".to_string());
    }

    Ok(CliConfig { model, method, complex, output, bound, color })
}

fn print_help() {
    println!("{}", help_text());
}

fn help_text() -> String {
    format!(
        "bcsl {version}

Context completion and static analysis for BCSL models.

Usage:
  bcsl --model <file> --method <method> [OPTIONS]

Methods:
  compile      Expand and vectorize the model, print a report.
  reduce       Generalize rules and initial complexes to wildcard form.
  eliminate    Annotate (and in qualitative models, comment out) redundant rules.
  reachable    Check whether any rule can produce --complex.
  locate       Print the ordering coordinates of --complex.

Options:
  -m, --model <file>         JSON model file.
  --method <method>          One of the methods above.
  -c, --complex <literal>    Complex literal, e.g. 'A{{p}}.B{{_}}::cyt'.
  -o, --output <file>        Write the resulting model (or vector model) here.
  --bound <n>                Population bound carried into the vector model.
  --color                    Force ANSI color output.
  --no-color                 Disable ANSI color output.
  -h, --help                 Show this help message.
  -V, --version              Print version information.

Environment:
  BCSL_LOG                   Log filter, e.g. 'bcsl=debug'. Default: warn.

Exit codes:
  0  Success.
  1  Runtime error (unreadable model, out-of-scope complex, ...).
  2  Invalid arguments.
",
        version = env!("CARGO_PKG_VERSION"),
    )
}
