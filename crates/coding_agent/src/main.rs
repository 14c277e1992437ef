use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use agent_provider::ChatMessage;
use anyhow::Context;
use coding_agent::app::{system_instructions_from_env, App, AppOptions};
use coding_agent::providers;
use patch_relay::display::render_labeled;
use patch_relay::{logging, EnvConfig};

const USAGE: &str = "Usage: coding_agent [program-file]";

fn main() -> ExitCode {
    let config = EnvConfig::from_env();
    if let Err(error) = logging::init(&config) {
        eprintln!("coding_agent: logging disabled: {error}");
    }

    match run(&config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            tracing::error!(error = %format!("{error:#}"), "coding_agent exited with an error");
            eprintln!("coding_agent: {error:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(config: &EnvConfig) -> anyhow::Result<()> {
    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut stdout = io::stdout().lock();

    let Some(path) = program_path(&mut input, &mut stdout)? else {
        return Ok(());
    };

    let backend = providers::provider_from_env().context("Failed to start provider")?;
    let mut app = App::open(
        &path,
        backend,
        AppOptions {
            system_instructions: Some(system_instructions_from_env()),
            clear_history: config.clear_history,
        },
    )
    .with_context(|| format!("Failed to open {}", path.display()))?;

    writeln!(stdout, "Editing {}. Type /help for commands.", path.display())?;
    print_messages(&mut stdout, &app.display_history(), config.wrap_width)?;

    let mut line = String::new();
    while !app.should_exit {
        write!(stdout, "> ")?;
        stdout.flush()?;

        line.clear();
        if input.read_line(&mut line)? == 0 {
            break;
        }
        let turn = app.on_submit(&line);
        print_messages(&mut stdout, &turn, config.wrap_width)?;
    }
    Ok(())
}

fn program_path(input: &mut impl BufRead, stdout: &mut impl Write) -> anyhow::Result<Option<PathBuf>> {
    let mut args = std::env::args_os().skip(1);
    let first = args.next();
    if args.next().is_some() {
        anyhow::bail!("too many arguments\n{USAGE}");
    }
    if let Some(path) = first {
        return Ok(Some(PathBuf::from(path)));
    }

    write!(stdout, "What would you like to name your program file? ")?;
    stdout.flush()?;
    let mut name = String::new();
    if input.read_line(&mut name)? == 0 {
        return Ok(None);
    }
    let name = name.trim();
    if name.is_empty() {
        anyhow::bail!("no program file given\n{USAGE}");
    }
    Ok(Some(PathBuf::from(name)))
}

fn print_messages(
    stdout: &mut impl Write,
    messages: &[ChatMessage],
    wrap_width: usize,
) -> io::Result<()> {
    for message in messages {
        writeln!(
            stdout,
            "{}\n",
            render_labeled(message.role.as_str(), &message.content, wrap_width)
        )?;
    }
    Ok(())
}
