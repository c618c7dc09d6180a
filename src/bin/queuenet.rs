//! Command-line front end: load a model file, run it, print the report.

use std::env;
use std::error::Error;
use std::process::ExitCode;

use queuenet::Config;

fn main() -> ExitCode {
    env_logger::init();
    let mut args = env::args().skip(1);
    let Some(path) = args.next() else {
        eprintln!("usage: queuenet <model.json> [--json]");
        return ExitCode::FAILURE;
    };
    let json = args.next().as_deref() == Some("--json");
    match run(&path, json) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(path: &str, json: bool) -> Result<(), Box<dyn Error>> {
    let mut sim = Config::from_file(path)?.build()?;
    sim.run()?;
    let report = sim.report();
    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{report}");
    }
    Ok(())
}
