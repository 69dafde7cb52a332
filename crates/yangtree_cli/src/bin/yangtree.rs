//! yangtree CLI entry point.

use std::env;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use tracing::Level;
use yangtree_compiler::{Input, ModuleRegistry, RegistryConfig};
use yangtree_foundation::Error;
use yangtree_schema::{CompiledBody, CompiledModule, CompiledNodeId, compiled_node_descendants};
use yangtree_syntax::SchemaFormat;

/// CLI configuration parsed from arguments.
#[derive(Default)]
struct CliConfig {
    files: Vec<PathBuf>,
    search_dirs: Vec<PathBuf>,
    parse_only: bool,
    all_implemented: bool,
    verbosity: u8,
    show_help: bool,
    show_version: bool,
}

fn main() -> ExitCode {
    let args: Vec<String> = env::args().collect();

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("\x1b[31mError: {e}\x1b[0m");
            ExitCode::FAILURE
        }
    }
}

fn parse_args(args: Vec<String>) -> Result<CliConfig, Box<dyn std::error::Error>> {
    let mut config = CliConfig::default();

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "-h" | "--help" => config.show_help = true,
            "-V" | "--version" => config.show_version = true,
            "-v" | "--verbose" => config.verbosity = config.verbosity.saturating_add(1),
            "-P" | "--parse-only" => config.parse_only = true,
            "-i" | "--implement-all" => config.all_implemented = true,
            "-p" | "--path" => {
                i += 1;
                if i >= args.len() {
                    return Err("--path requires a directory".into());
                }
                config.search_dirs.push(PathBuf::from(&args[i]));
            }
            arg if arg.starts_with('-') => {
                return Err(format!("unknown option: {arg}").into());
            }
            path => config.files.push(PathBuf::from(path)),
        }
        i += 1;
    }

    Ok(config)
}

fn init_logging(verbosity: u8) {
    let level = match verbosity {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(level)
        .with_target(false)
        .init();
}

fn run(args: Vec<String>) -> Result<(), Box<dyn std::error::Error>> {
    let config = parse_args(args)?;

    if config.show_help {
        print_help();
        return Ok(());
    }

    if config.show_version {
        println!("yangtree {}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    if config.files.is_empty() {
        return Err("no input files (see --help)".into());
    }

    init_logging(config.verbosity);

    let registry_config = RegistryConfig::default()
        .with_all_implemented(config.all_implemented);
    let registry_config = config
        .search_dirs
        .iter()
        .fold(registry_config, |cfg, dir| cfg.with_search_dir(dir));
    let mut registry = ModuleRegistry::new(registry_config);

    for file in &config.files {
        let format = schema_format(file)?;
        let id = registry.parse_module(Input::path(file), format, !config.parse_only)?;
        let Some(entry) = registry.get(id) else {
            continue;
        };
        match entry.compiled() {
            Some(module) => dump_module(module),
            None => println!(
                "module {}{} (parsed only)",
                entry.name(),
                entry.revision().map(|r| format!("@{r}")).unwrap_or_default()
            ),
        }
    }
    Ok(())
}

fn schema_format(path: &Path) -> Result<SchemaFormat, Error> {
    path.extension()
        .and_then(|ext| ext.to_str())
        .and_then(SchemaFormat::from_extension)
        .ok_or_else(|| {
            Error::invalid_argument(format!(
                "cannot tell the format of {} (expected .yang or .yin)",
                path.display()
            ))
        })
}

fn dump_module(module: &CompiledModule) {
    println!(
        "\x1b[1;36mmodule {}\x1b[0m{}",
        module.name,
        module
            .revision
            .as_deref()
            .map(|r| format!("@{r}"))
            .unwrap_or_default()
    );
    println!("  namespace {}", module.namespace);
    println!("  prefix {}", module.prefix);
    for &id in module
        .data
        .iter()
        .chain(&module.rpcs)
        .chain(&module.notifications)
    {
        dump_node(module, id, 1);
    }
    println!();
}

fn dump_node(module: &CompiledModule, id: CompiledNodeId, depth: usize) {
    let node = module.node(id);
    let indent = "  ".repeat(depth);
    let access = if node.config { "rw" } else { "ro" };
    let detail = match &node.body {
        CompiledBody::Leaf { ty, mandatory, .. } => {
            format!(" : {}{}", ty.name, if *mandatory { " (mandatory)" } else { "" })
        }
        CompiledBody::LeafList { ty, .. } => format!(" : {}*", ty.name),
        CompiledBody::List { keys, .. } => format!(" [{}]", keys.join(" ")),
        CompiledBody::Container {
            presence: Some(_), ..
        } => " (presence)".to_string(),
        _ => String::new(),
    };
    println!(
        "{indent}+--{access} {} {}{detail}",
        node.kind().keyword(),
        node.name
    );
    for child in compiled_node_descendants(node) {
        dump_node(module, child, depth + 1);
    }
}

fn print_help() {
    println!(
        "\x1b[1myangtree\x1b[0m - YANG schema compiler

\x1b[1mUSAGE:\x1b[0m
    yangtree [OPTIONS] FILES...

\x1b[1mARGUMENTS:\x1b[0m
    FILES...    Module files (.yang or .yin) to load and compile

\x1b[1mOPTIONS:\x1b[0m
    -h, --help            Print help information
    -V, --version         Print version information
    -p, --path DIR        Search DIR for imported modules (repeatable)
    -P, --parse-only      Parse the files without compiling them
    -i, --implement-all   Implement every imported module as well
    -v, --verbose         More log output on stderr (repeatable)

\x1b[1mEXAMPLES:\x1b[0m
    yangtree ietf-interfaces.yang
    yangtree -p ./modules -v example.yang
    yangtree -P broken.yin"
    );
}
