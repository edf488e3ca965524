use std::process;

use clap::{Arg, ArgMatches, Command};
use log::{debug, error, LevelFilter};

mod commands;
mod config;
mod utils;

use commands::*;
use config::Config;

fn main() {
    let matches = cli().get_matches();

    let level = if matches.get_flag("verbose") {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    env_logger::Builder::from_default_env()
        .filter_level(level)
        .init();

    if let Err(e) = run(&matches) {
        error!("Command failed: {:#}", e);
        process::exit(1);
    }
}

fn cli() -> Command {
    let input = Arg::new("input")
        .value_name("HEX")
        .help("Packet as hex; whitespace is ignored")
        .required_unless_present("file");
    let file = Arg::new("file")
        .short('f')
        .long("file")
        .value_name("FILE")
        .help("Read the raw packet from a file instead")
        .conflicts_with("input");

    Command::new("ndn")
        .version("0.1.0")
        .about("NDN packet codec tool")
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .help("Configuration file path")
                .global(true),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Verbose output")
                .action(clap::ArgAction::SetTrue)
                .global(true),
        )
        .arg(
            Arg::new("format")
                .long("format")
                .value_name("FORMAT")
                .help("Output format: text or json")
                .global(true),
        )
        .subcommand(
            Command::new("decode-interest")
                .about("Decode an Interest and print its fields")
                .arg(input.clone())
                .arg(file.clone()),
        )
        .subcommand(
            Command::new("decode-data")
                .about("Decode a Data packet and print its fields")
                .arg(input)
                .arg(file),
        )
        .subcommand(
            Command::new("encode-interest")
                .about("Build an Interest and print its encoding as hex")
                .arg(Arg::new("name").required(true).help("Interest name URI"))
                .arg(
                    Arg::new("lifetime")
                        .short('l')
                        .long("lifetime")
                        .value_name("MS")
                        .help("Interest lifetime in milliseconds"),
                )
                .arg(
                    Arg::new("exclude")
                        .short('x')
                        .long("exclude")
                        .value_name("ENTRIES")
                        .help("Exclude entries, such as abc,*"),
                )
                .arg(
                    Arg::new("scope")
                        .long("scope")
                        .value_name("SCOPE")
                        .help("Interest scope"),
                )
                .arg(
                    Arg::new("no-fresh")
                        .long("no-fresh")
                        .help("Do not set MustBeFresh")
                        .action(clap::ArgAction::SetTrue),
                )
                .arg(
                    Arg::new("nonce")
                        .short('n')
                        .long("nonce")
                        .value_name("HEX")
                        .help("4-byte nonce as hex; random when omitted"),
                ),
        )
        .subcommand(
            Command::new("digest-sign")
                .about("Build a Data packet with a SHA-256 digest signature")
                .arg(Arg::new("name").required(true).help("Data name URI"))
                .arg(Arg::new("content").required(true).help("Content as UTF-8 text"))
                .arg(
                    Arg::new("freshness")
                        .long("freshness")
                        .value_name("MS")
                        .help("Freshness period in milliseconds"),
                ),
        )
}

fn run(matches: &ArgMatches) -> anyhow::Result<()> {
    let mut config = match matches.get_one::<String>("config") {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };
    if let Some(format) = matches.get_one::<String>("format") {
        config.output.format = format.parse()?;
    }
    debug!("Using configuration {:?}", config);
    config.apply()?;

    match matches.subcommand() {
        Some(("decode-interest", sub_matches)) => handle_decode_interest(sub_matches, &config),
        Some(("decode-data", sub_matches)) => handle_decode_data(sub_matches, &config),
        Some(("encode-interest", sub_matches)) => handle_encode_interest(sub_matches, &config),
        Some(("digest-sign", sub_matches)) => handle_digest_sign(sub_matches, &config),
        _ => {
            println!("No command specified. Use --help for usage information.");
            Ok(())
        }
    }
}
