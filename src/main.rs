use atomsel::cli::{self, CheckOptions, CliError, SelectOptions};
use clap::{ArgAction, Parser as ClapParser, Subcommand};
use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;

#[derive(ClapParser)]
#[command(name = "atomsel")]
#[command(about = "atomsel - select atoms from structural models with boolean expressions")]
#[command(version)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug); ATOMSEL_LOG overrides
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compile a selection without applying it
    Check {
        /// The selection expression
        expression: String,

        /// Print the compiled program
        #[arg(long)]
        show_program: bool,
    },

    /// Apply a selection to a JSON array of atoms
    Select {
        /// The selection expression
        expression: String,

        /// Atom JSON file (reads from stdin if not provided)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Print positions of the selected atoms instead of the atoms
        #[arg(long)]
        indices: bool,

        /// Pretty-print the output
        #[arg(short, long)]
        pretty: bool,
    },

    /// Show reference documentation
    Docs {
        /// Topic name (omit to list topics)
        topic: Option<String>,
    },
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Check {
            expression,
            show_program,
        } => run_check(expression, show_program),
        Commands::Select {
            expression,
            input,
            indices,
            pretty,
        } => run_select(expression, input, indices, pretty),
        Commands::Docs { topic: None } => {
            print!("{}", cli::get_docs_overview());
            Ok(())
        }
        Commands::Docs { topic: Some(topic) } => cli::get_doc_topic(&topic).map(|content| {
            print!("{}", content);
        }),
    };

    if let Err(e) = result {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().filter_or("ATOMSEL_LOG", level))
        .init();
}

fn run_check(expression: String, show_program: bool) -> Result<(), CliError> {
    let options = CheckOptions {
        expression,
        show_program,
    };

    let result = cli::execute_check(&options)?;
    println!("Selection is valid ({} instructions)", result.instructions);
    if let Some(listing) = result.listing {
        print!("{}", listing);
    }
    Ok(())
}

fn run_select(
    expression: String,
    input: Option<PathBuf>,
    indices: bool,
    pretty: bool,
) -> Result<(), CliError> {
    let input = match input {
        Some(path) => Some(fs::read_to_string(path)?),
        None if !atty::is(atty::Stream::Stdin) => {
            let mut buffer = String::new();
            io::stdin().read_to_string(&mut buffer)?;
            Some(buffer)
        }
        None => None,
    };

    let options = SelectOptions {
        expression,
        input,
        indices,
    };

    let output = cli::execute_select(&options)?;
    let json = if pretty {
        serde_json::to_string_pretty(&output)
    } else {
        serde_json::to_string(&output)
    }?;
    println!("{}", json);
    Ok(())
}
