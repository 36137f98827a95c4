//! questlogic CLI entry point.

use std::env;
use std::path::PathBuf;
use std::process::ExitCode;

use questlogic_engine::QuestMap;
use questlogic_foundation::QuestId;
use questlogic_runtime::{LogSection, Repl, RuntimeConfig, Session};
use tracing_subscriber::EnvFilter;

/// CLI configuration parsed from arguments.
#[derive(Default)]
struct CliConfig {
    records: Option<PathBuf>,
    config: Option<PathBuf>,
    seeds: Vec<QuestId>,
    required_only: bool,
    no_reduce: bool,
    no_contract: bool,
    output: Option<PathBuf>,
    json: Option<PathBuf>,
    batch_mode: bool,
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

fn value<'a>(args: &'a [String], i: &mut usize, flag: &str) -> Result<&'a str, String> {
    *i += 1;
    args.get(*i)
        .map(String::as_str)
        .ok_or_else(|| format!("{flag} requires a value"))
}

fn parse_args(args: &[String]) -> Result<CliConfig, Box<dyn std::error::Error>> {
    let mut config = CliConfig::default();

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "-h" | "--help" => config.show_help = true,
            "-V" | "--version" => config.show_version = true,
            "-b" | "--batch" => config.batch_mode = true,
            "--required-only" => config.required_only = true,
            "--no-reduce" => config.no_reduce = true,
            "--no-contract" => config.no_contract = true,
            "--records" => config.records = Some(value(args, &mut i, "--records")?.into()),
            "--config" => config.config = Some(value(args, &mut i, "--config")?.into()),
            "--output" => config.output = Some(value(args, &mut i, "--output")?.into()),
            "--json" => config.json = Some(value(args, &mut i, "--json")?.into()),
            "--seed" => {
                let text = value(args, &mut i, "--seed")?;
                let id = QuestId::parse(text).ok_or_else(|| format!("invalid --seed value: {text}"))?;
                config.seeds.push(id);
            }
            "--achievement" => {
                let text = value(args, &mut i, "--achievement")?;
                let id: u32 = text
                    .parse()
                    .map_err(|_| format!("invalid --achievement value: {text}"))?;
                config.seeds.push(QuestId::Achievement(id));
            }
            arg => {
                return Err(format!("unknown option: {arg}").into());
            }
        }
        i += 1;
    }

    Ok(config)
}

fn init_logging(log: &LogSection) {
    let rust_log = env::var(EnvFilter::DEFAULT_ENV).ok();
    tracing_subscriber::fmt()
        .with_env_filter(log.env_filter(rust_log.as_deref()))
        .with_writer(std::io::stderr)
        .init();
}

fn run(args: Vec<String>) -> Result<(), Box<dyn std::error::Error>> {
    let cli = parse_args(&args)?;

    if cli.show_help {
        print_help();
        return Ok(());
    }

    if cli.show_version {
        println!("questlogic {}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    let file_config = match &cli.config {
        Some(path) => RuntimeConfig::load(path)?,
        None => RuntimeConfig::default(),
    };
    init_logging(&file_config.log);

    // Flags override the file
    let mut pipeline = file_config.pipeline();
    if cli.no_reduce {
        pipeline.reduce = false;
    }
    if cli.no_contract {
        pipeline.contract = false;
    }

    let mut session = Session::new().with_config(pipeline);
    if let Some(path) = &cli.records {
        session.load_records(path)?;
    }

    if cli.required_only {
        let [quest] = cli.seeds.as_slice() else {
            return Err("--required-only needs exactly one --seed or --achievement".into());
        };
        session.required(*quest)?;
    } else if !cli.seeds.is_empty() {
        session.seed(&cli.seeds)?;
        session.run()?;
    }

    if let Some(path) = &cli.output {
        session.save(path)?;
    }
    if let Some(path) = &cli.json {
        session.export(path)?;
    }

    if cli.batch_mode {
        print_map(session.map());
        return Ok(());
    }

    let mut repl = Repl::new()?.with_session(session);
    if !cli.seeds.is_empty() {
        repl = repl.without_banner();
    }
    repl.run()?;
    Ok(())
}

fn print_map(map: &QuestMap) {
    for quest in map.iter() {
        println!("\x1b[1m{}\x1b[0m  {}", quest.id, quest.display_name());
        if !quest.condition.is_empty() {
            println!("    {}", quest.condition);
        }
    }
}

fn print_help() {
    println!(
        "\x1b[1mquestlogic\x1b[0m - Quest prerequisite logic engine

\x1b[1mUSAGE:\x1b[0m
    questlogic [OPTIONS]

\x1b[1mOPTIONS:\x1b[0m
    -h, --help            Print help information
    -V, --version         Print version information
    -b, --batch           Build the map, print it and exit (no REPL)
    --records FILE        Quest and achievement records (JSON)
    --config FILE         Configuration file (TOML)
    --seed ID             Seed quest (42, a42); repeatable
    --achievement ID      Seed achievement; repeatable
    --required-only       Only what the single seed requires
    --no-reduce           Skip transitive reduction
    --no-contract         Skip class-cluster contraction
    --output FILE         Save the map (MessagePack)
    --json FILE           Export the map (JSON)

\x1b[1mEXAMPLES:\x1b[0m
    questlogic --records db.json                       Start interactive REPL
    questlogic --records db.json --seed 1205 -b        Complete around quest 1205
    questlogic --records db.json --achievement 9 \\
               --required-only --json path.json -b     Everything achievement 9 needs

\x1b[1mREPL COMMANDS:\x1b[0m
    :seed ID...          Add quests to the map
    :run                 Complete, reduce and contract
    :show ID             Show one quest
    Qf=1&(PG=2|PG=3)     Parse and show a start condition
    :help                All commands
    Ctrl+D               Exit REPL

Logging follows RUST_LOG, e.g. RUST_LOG=questlogic_engine=debug"
    );
}
