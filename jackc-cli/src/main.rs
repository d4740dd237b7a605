//! Entrypoint for CLI
mod error;

use std::{
    env,
    error::Error,
    fs,
    path::{Path, PathBuf},
    time::Instant,
};

use jackc::{parse_tree_xml, prelude::*, tokens_xml, IMPL_VERSION};
use log::{debug, error, info, warn};

use crate::error::{AppResult, InFile};

static USAGE: &str = r#"
usage: jackc [--conf FILE] [--annotate] CMD PATH

commands:
    build   Compile a .jack file, or every .jack file in a directory,
            into .vm files next to the sources
    tokens  Print the XML token listing of a .jack file
    parse   Print the XML parse tree of a .jack file

options:
    --conf FILE   Configuration file, defaults to jackc.yaml
                  in the working directory when present
    --annotate    Describe identifiers in the parse tree by category,
                  index and usage

examples:
    jackc build Square/
    jackc build Main.jack
    jackc tokens Main.jack
    jackc --annotate parse Main.jack
"#;

/// Configuration file looked up when none is given.
const DEFAULT_CONF: &str = "jackc.yaml";

const SOURCE_EXT: &str = "jack";
const OUTPUT_EXT: &str = "vm";

fn load_conf(filepath: Option<&str>) -> AppResult<JackConf> {
    let filepath = match filepath {
        Some(filepath) => filepath,
        None if Path::new(DEFAULT_CONF).is_file() => DEFAULT_CONF,
        None => return Ok(JackConf::default()),
    };

    debug!("loading configuration {filepath}");
    let text = fs::read_to_string(filepath).in_file(filepath)?;
    serde_yaml::from_str(&text).in_file(filepath)
}

/// Source files to compile, in a stable order.
fn collect_sources(path: &Path) -> AppResult<Vec<PathBuf>> {
    if !path.is_dir() {
        return Ok(vec![path.to_path_buf()]);
    }

    let entries = fs::read_dir(path).in_file(path)?;

    let mut sources = Vec::new();
    for entry in entries {
        let filepath = entry.in_file(path)?.path();
        if filepath.is_file() && filepath.extension().map_or(false, |ext| ext == SOURCE_EXT) {
            sources.push(filepath);
        }
    }
    sources.sort();

    Ok(sources)
}

/// Compile one source file into a sibling output file.
fn compile_file(filepath: &Path, conf: &JackConf) -> AppResult<PathBuf> {
    compile_file_inner(filepath, conf).in_file(filepath)
}

fn compile_file_inner(filepath: &Path, conf: &JackConf) -> AppResult<PathBuf> {
    let source_code = fs::read_to_string(filepath)?;

    let mut compiler = Compiler::new(Lexer::new(source_code.as_str()), conf);
    compiler.compile_class()?;

    if let Some(stem) = filepath.file_stem().and_then(|s| s.to_str()) {
        if stem != compiler.class_name() {
            warn!(
                "{}: class '{}' doesn't match the file name",
                filepath.display(),
                compiler.class_name()
            );
        }
    }

    let outpath = filepath.with_extension(OUTPUT_EXT);
    fs::write(&outpath, compiler.into_code()).in_file(&outpath)?;

    Ok(outpath)
}

/// Compile every source under the path, returning the number of
/// files that failed.
///
/// A failed file doesn't stop the batch.
fn run_build(path: impl AsRef<Path>, conf: &JackConf) -> AppResult<usize> {
    let sources = collect_sources(path.as_ref())?;
    if sources.is_empty() {
        warn!("no .{SOURCE_EXT} files in {}", path.as_ref().display());
    }

    let start = Instant::now();
    let mut failed = 0;

    for filepath in &sources {
        match compile_file(filepath, conf) {
            Ok(outpath) => info!("{} -> {}", filepath.display(), outpath.display()),
            Err(err) => {
                error!("{err}");
                failed += 1;
            }
        }
    }

    info!(
        "compiled {} of {} files in {}ms",
        sources.len() - failed,
        sources.len(),
        start.elapsed().as_nanos() as f64 / 1000000.0
    );

    Ok(failed)
}

fn read_source(filepath: &Path) -> AppResult<String> {
    fs::read_to_string(filepath).in_file(filepath)
}

fn run_tokens(filepath: impl AsRef<Path>) -> AppResult<()> {
    let filepath = filepath.as_ref();
    let source_code = read_source(filepath)?;
    let xml = tokens_xml(source_code.as_str()).in_file(filepath)?;
    print!("{xml}");
    Ok(())
}

fn run_parse(filepath: impl AsRef<Path>, annotate: bool) -> AppResult<()> {
    let filepath = filepath.as_ref();
    let source_code = read_source(filepath)?;
    let xml = parse_tree_xml(source_code.as_str(), annotate).in_file(filepath)?;
    print!("{xml}");
    Ok(())
}

fn main() -> Result<(), Box<dyn Error>> {
    simple_logger::SimpleLogger::new().env().init()?;

    let Some(args) = parse_args() else {
        print_usage();
        // FreeBSD EX_USAGE (64)
        std::process::exit(64)
    };

    let conf = load_conf(args.conf.as_deref())?;
    debug!("{conf:?}");

    match args.cmd {
        Cmd::Build { path } => {
            if run_build(path, &conf)? > 0 {
                std::process::exit(1)
            }
        }
        Cmd::Tokens { filepath } => run_tokens(filepath)?,
        Cmd::Parse { filepath } => run_parse(filepath, args.annotate)?,
    }

    Ok(())
}

struct Args {
    conf: Option<String>,
    annotate: bool,
    cmd: Cmd,
}

fn parse_args() -> Option<Args> {
    let mut conf = None;
    let mut annotate = false;
    let mut positional = Vec::new();

    let mut args = env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--conf" => conf = Some(consume_arg(&mut args)?),
            "--annotate" => annotate = true,
            "-h" | "--help" => return None,
            _ => positional.push(arg),
        }
    }

    let mut positional = positional.into_iter();
    let cmd = match positional.next()?.as_str() {
        "build" => Cmd::Build {
            path: consume_arg(&mut positional)?,
        },
        "tokens" => Cmd::Tokens {
            filepath: consume_arg(&mut positional)?,
        },
        "parse" => Cmd::Parse {
            filepath: consume_arg(&mut positional)?,
        },
        _ => return None,
    };

    // Trailing arguments are a usage error.
    if positional.next().is_some() {
        return None;
    }

    Some(Args {
        conf,
        annotate,
        cmd,
    })
}

/// Consumes the next argument, or `None` when it doesn't exist.
fn consume_arg(args: &mut impl Iterator<Item = String>) -> Option<String> {
    args.next()
}

fn print_usage() {
    println!("Jack compiler v{IMPL_VERSION}");
    println!("{USAGE}");
}

enum Cmd {
    /// Compile file or directory
    Build { path: String },
    /// Print tokens
    Tokens { filepath: String },
    /// Print parse tree
    Parse { filepath: String },
}
