use chrono::Local;
use clap::Parser;
use log::*;
use simplelog::*;
use std::fs::File;
use std::process;
use trie_index::utils::cli::Cli;
use trie_index::utils::config::{apply_config_yaml, build_config_from_args};
use trie_index::utils::runner::{print_pairs, run_build};

fn main() {
    // parse the arguments from the command line
    let args = Cli::parse();
    // log filter
    let level_filter = match args.log_level.to_lowercase().as_str() {
        "trace" => LevelFilter::Trace,
        "debug" => LevelFilter::Debug,
        "info" => LevelFilter::Info,
        "warn" => LevelFilter::Warn,
        "error" => LevelFilter::Error,
        "off" => LevelFilter::Off,
        _ => {
            eprintln!(
                "Unknown log level, please set to one of \
                Trace, Debug, Info, Warn, Error, or Off (case insensitive)."
            );
            process::exit(1)
        }
    };
    // Set up the logger for the run
    CombinedLogger::init(vec![
        SimpleLogger::new(level_filter, Config::default()),
        WriteLogger::new(
            level_filter,
            Config::default(),
            File::create(&args.log_dest).unwrap_or_else(|e| {
                eprintln!("cannot open log destination {}: {}", args.log_dest, e);
                process::exit(1)
            }),
        ),
    ])
    .unwrap();

    info!("Begin processing at {}", Local::now().format("%Y-%m-%d %H:%M:%S"));

    // set up the config struct; a config file input overrides the flags
    let config = build_config_from_args(&args);
    let config = if !args.config.is_empty() {
        info!("Using configuration file input: {}", &args.config);
        match apply_config_yaml(config, &args.config) {
            Ok(c) => c,
            Err(e) => {
                error!("bad configuration file: {}", e);
                process::exit(1)
            }
        }
    } else {
        debug!("Command line args: {:?}", &args);
        config
    };
    config.print();

    let tg = match run_build(&config) {
        Ok(tg) => tg,
        Err(e) => {
            error!("build failed: {}", e);
            process::exit(1)
        }
    };

    if config.print_pairs {
        print_pairs(&tg);
    }

    let (nodes, edges, letters) = tg.graph_size();
    info!(
        "done: {} nodes / {} edge records / {} letters, trie depth {}",
        nodes,
        edges,
        letters,
        tg.trie_depth()
    );
}
