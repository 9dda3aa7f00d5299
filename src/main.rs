// brainterm: Brainfuck interpreter with a terminal run console

use std::fs;
use std::io;
use std::path::Path;
use std::time::Duration;

use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};

use brainterm::interpreter::config::{EofBehavior, RunConfig, TapePolicy};
use brainterm::interpreter::engine::Interpreter;
use brainterm::interpreter::io::{ReaderInput, WriteSink};
use brainterm::parser::program::{diagnose, Program};
use brainterm::ui::App;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Tui,
    Run,
    Check,
    Dump,
}

struct CliArgs {
    mode: Mode,
    file: String,
    config: RunConfig,
}

fn print_usage(program_name: &str) {
    eprintln!("Usage: {} [--run|--check|--dump] [options] <file.b>", program_name);
    eprintln!();
    eprintln!("Modes:");
    eprintln!("  (default)          Open the terminal UI");
    eprintln!("  --run              Run headless: stdin feeds ',', stdout receives '.'");
    eprintln!("  --check            Report every bracket error");
    eprintln!("  --dump             Print the parsed instruction listing");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --max-steps N      Instruction budget (0 = unlimited)");
    eprintln!("  --timeout-ms N     Wall-clock budget in milliseconds");
    eprintln!("  --tape-cells N     Use a fixed tape of N cells");
    eprintln!("  --eof zero|unchanged|ones");
    eprintln!("                     What ',' stores when input runs out");
}

fn parse_number<T: std::str::FromStr>(flag: &str, value: Option<String>) -> Result<T, String> {
    let value = value.ok_or_else(|| format!("{} expects a value", flag))?;
    value
        .parse()
        .map_err(|_| format!("{} expects a number, got '{}'", flag, value))
}

fn parse_args(args: Vec<String>) -> Result<CliArgs, String> {
    let mut mode = Mode::Tui;
    let mut file = None;
    let mut config = RunConfig::default();
    let mut iter = args.into_iter();

    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--run" | "-r" => mode = Mode::Run,
            "--check" => mode = Mode::Check,
            "--dump" => mode = Mode::Dump,
            "--max-steps" => {
                let steps: u64 = parse_number(&arg, iter.next())?;
                config = config.with_max_steps(if steps == 0 { None } else { Some(steps) });
            }
            "--timeout-ms" => {
                let ms: u64 = parse_number(&arg, iter.next())?;
                config = config.with_deadline(Some(Duration::from_millis(ms)));
            }
            "--tape-cells" => {
                let cells: usize = parse_number(&arg, iter.next())?;
                if cells == 0 {
                    return Err("--tape-cells must be at least 1".to_string());
                }
                config = config.with_tape(TapePolicy::Fixed { cells });
            }
            "--eof" => {
                let name = iter.next().ok_or("--eof expects a value")?;
                let eof = EofBehavior::from_name(&name)
                    .ok_or_else(|| format!("unknown --eof behaviour '{}'", name))?;
                config = config.with_eof(eof);
            }
            flag if flag.starts_with('-') => return Err(format!("unknown option '{}'", flag)),
            other => {
                if file.replace(other.to_string()).is_some() {
                    return Err("only one input file may be given".to_string());
                }
            }
        }
    }

    let file = file.ok_or("no input file provided")?;
    Ok(CliArgs { mode, file, config })
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut args = std::env::args();
    let program_name = args.next().unwrap_or_else(|| "brainterm".to_string());

    let cli = match parse_args(args.collect()) {
        Ok(cli) => cli,
        Err(message) => {
            eprintln!("Error: {}", message);
            eprintln!();
            print_usage(&program_name);
            std::process::exit(1);
        }
    };

    if !Path::new(&cli.file).exists() {
        eprintln!("Error: File '{}' not found", cli.file);
        std::process::exit(1);
    }

    let source = fs::read_to_string(&cli.file)?;

    match cli.mode {
        Mode::Check => check(&source),
        Mode::Dump => dump(&source),
        Mode::Run => run_headless(&source, cli.config),
        Mode::Tui => run_tui(source, cli.config),
    }
}

fn check(source: &str) -> Result<(), Box<dyn std::error::Error>> {
    let errors = diagnose(source);
    if errors.is_empty() {
        eprintln!("No bracket errors found.");
        return Ok(());
    }

    for err in &errors {
        eprintln!("{}", err.render(source));
        eprintln!();
    }
    eprintln!("{} error(s) found.", errors.len());
    std::process::exit(1);
}

fn dump(source: &str) -> Result<(), Box<dyn std::error::Error>> {
    match Program::parse(source) {
        Ok(program) => {
            print!("{}", program.listing());
            eprintln!(
                "{} instructions, {} loop(s).",
                program.len(),
                program.jumps().pairs()
            );
            Ok(())
        }
        Err(err) => {
            eprintln!("{}", err.render(source));
            std::process::exit(1);
        }
    }
}

fn run_headless(source: &str, config: RunConfig) -> Result<(), Box<dyn std::error::Error>> {
    let interpreter = Interpreter::new(config);
    let mut sink = WriteSink::new(io::stdout().lock());
    let mut input = ReaderInput::new(io::stdin().lock());

    match interpreter.run(source, &mut sink, Some(&mut input)) {
        Ok(_) => Ok(()),
        Err(err) => {
            eprintln!();
            eprintln!("{}", err.render(source));
            std::process::exit(1);
        }
    }
}

fn run_tui(source: String, config: RunConfig) -> Result<(), Box<dyn std::error::Error>> {
    let errors = diagnose(&source);
    if !errors.is_empty() {
        eprintln!(
            "Warning: {} bracket error(s); runs will fail until they are fixed.",
            errors.len()
        );
    }

    // Set up terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(source, config);
    let res = app.run(&mut terminal);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        eprintln!("Error: {:?}", err);
    }

    Ok(())
}
