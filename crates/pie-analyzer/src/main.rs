//! Piethon analyzer - semantic checks and call graphs for Piethon scripts
//!
//! Usage: pie-analyzer [OPTIONS] <input> [-o <graph.dot>]

use anyhow::{bail, Context};
use clap::Parser as ClapParser;
use log::{info, LevelFilter};
use pie_analyzer::driver::{Options, PieAnalyzer};
use pie_analyzer::graph::to_dot;
use std::fs;
use std::path::PathBuf;
use std::process;

#[derive(ClapParser, Debug)]
#[command(name = "pie-analyzer")]
#[command(author = "Piethon Tools Team")]
#[command(version)]
#[command(about = "Semantic analyzer and call graph builder for Piethon scripts", long_about = None)]
struct Args {
    /// Input script (.pie)
    #[arg(required = true)]
    input: PathBuf,

    /// Write the call graph to this file (Graphviz DOT)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Title of the exported graph (defaults to the input file name)
    #[arg(long)]
    title: Option<String>,

    /// Do not print diagnostics
    #[arg(short, long)]
    silent: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Dump tokens (for debugging)
    #[arg(long)]
    dump_tokens: bool,

    /// Dump AST (for debugging)
    #[arg(long)]
    dump_ast: bool,

    /// Print the call graph as DOT to stdout
    #[arg(long)]
    dump_graph: bool,
}

fn main() {
    let args = Args::parse();
    init_logging(args.verbose);

    match run(&args) {
        Ok(true) => {}
        Ok(false) => process::exit(1),
        Err(e) => {
            eprintln!("error: {:#}", e);
            process::exit(1);
        }
    }
}

fn init_logging(verbose: bool) {
    let mut builder = env_logger::Builder::new();
    builder.filter_level(LevelFilter::Warn).parse_default_env();
    if verbose {
        builder.filter_level(LevelFilter::Debug);
    }
    builder.format_timestamp(None).init();
}

/// Returns `Ok(false)` when the script has diagnostics
fn run(args: &Args) -> anyhow::Result<bool> {
    let code = fs::read_to_string(&args.input)
        .with_context(|| format!("cannot read '{}'", args.input.display()))?;
    let name = args.input.display().to_string();

    let options = Options {
        run_silent: args.silent,
        dump_tokens: args.dump_tokens,
        dump_ast: args.dump_ast,
    };
    let mut analyzer = PieAnalyzer::with_options(options);
    analyzer.set_script_code(name, code);

    let checked = match analyzer.check()? {
        Ok(checked) => checked,
        Err(diagnostics) => {
            if args.silent {
                eprintln!("{}: {} diagnostic(s)", args.input.display(), diagnostics.len());
            }
            return Ok(false);
        }
    };
    info!(
        "{}: no errors in {} procedure(s)",
        args.input.display(),
        checked.script().procedures.len()
    );

    if args.output.is_none() && !args.dump_graph {
        return Ok(true);
    }

    let graph = pie_analyzer::build_call_graph(&checked);
    let title = match &args.title {
        Some(title) => title.clone(),
        None => match args.input.file_stem().and_then(|s| s.to_str()) {
            Some(stem) => stem.to_string(),
            None => bail!("cannot derive a graph title from '{}'", args.input.display()),
        },
    };

    if args.dump_graph {
        print!("{}", to_dot(&graph, &title));
    }
    if let Some(output) = &args.output {
        analyzer.export_graph(&graph, output, &title)?;
    }

    Ok(true)
}
