mod flight;
mod geo;
mod kml;
mod nmea;
mod relay;
mod ubx;

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::process::ExitCode;

use chrono::Utc;
use clap::{Parser, Subcommand};

use crate::flight::FixSink;
use crate::kml::CoordinateSource;
use crate::nmea::NmeaEncoder;
use crate::relay::{LiveKml, Relay};
use crate::ubx::UbxSink;

#[derive(Parser)]
#[command(name = "gps-sim")]
#[command(about = "Simulate a moving GPS receiver from a KML flight path")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Synthesize NMEA sentences from a KML trajectory
    Nmea {
        /// KML input file (stdin when omitted)
        input: Option<String>,
    },
    /// Synthesize UBX NAV-PVT frames from a KML trajectory
    Ubx {
        /// KML input file (stdin when omitted)
        input: Option<String>,
        /// Binary output file, appended to frame by frame
        #[arg(long, default_value = "ubx.bin")]
        out: String,
    },
    /// Re-checksum and re-pace a pre-recorded NMEA log
    Relay {
        /// NMEA log file (stdin when omitted)
        input: Option<String>,
        /// Maintain a live progress KML at this path
        #[arg(long)]
        kml: Option<String>,
    },
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Nmea { input } => {
            let mut sink = NmeaEncoder::new(io::stdout().lock());
            synthesize(input.as_deref(), &mut sink)
        }
        Commands::Ubx { input, out } => {
            let mut sink = UbxSink::new(out);
            synthesize(input.as_deref(), &mut sink)
        }
        Commands::Relay { input, kml } => relay(input.as_deref(), kml.map(LiveKml::new)),
    }
}

fn synthesize<S: FixSink>(input: Option<&str>, sink: &mut S) -> ExitCode {
    let reader = match open_input(input) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("Error reading input: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let mut source = CoordinateSource::new(reader);
    match flight::fly(&mut source, sink, Utc::now()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn relay(input: Option<&str>, kml: Option<LiveKml>) -> ExitCode {
    let reader = match open_input(input) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("Error reading input: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match Relay::new(kml).run(reader, &mut io::stdout().lock()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn open_input(path: Option<&str>) -> io::Result<Box<dyn BufRead>> {
    Ok(match path {
        Some(p) => Box::new(BufReader::new(File::open(p)?)),
        None => Box::new(BufReader::new(io::stdin())),
    })
}
