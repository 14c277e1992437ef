use std::io::Read;
use std::path::PathBuf;
use std::process::ExitCode;

use patch_relay::{logging, EnvConfig};

fn main() -> ExitCode {
    if let Err(error) = logging::init(&EnvConfig::from_env()) {
        eprintln!("apply_patch: logging disabled: {error}");
    }

    let mut args = std::env::args_os().skip(1);
    let (Some(path), None) = (args.next(), args.next()) else {
        eprintln!("Usage: apply_patch <file>  (model response is read from stdin)");
        return ExitCode::from(2);
    };

    let mut response = String::new();
    if let Err(error) = std::io::stdin().read_to_string(&mut response) {
        eprintln!("Failed to read response from stdin: {error}");
        return ExitCode::FAILURE;
    }

    let mut stdout = std::io::stdout();
    let mut stderr = std::io::stderr();
    match apply_patch_engine::apply_patch(&PathBuf::from(path), &response, &mut stdout, &mut stderr)
    {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("{error:#}");
            ExitCode::FAILURE
        }
    }
}
