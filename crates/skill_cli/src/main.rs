use std::fmt::Display;
use std::fs;
use std::path::{Path, PathBuf};
use std::process;

use clap::{ArgAction, Parser, Subcommand};
use skill_core::core_api::{Engine, Session};
use skill_core::{Game, SkillError};
use skill_render::{
    JsonStyle, parse_table_json, render_layout_json, render_layout_text, render_listing_json,
    render_listing_text, render_table_json, write_json,
};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

const GAME_VALUES: &str = "EO3|EO4|EOU|EO2U|EO5|EON";

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Cli {
    /// Log more detail to stderr (-v debug, -vv trace). RUST_LOG overrides.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Convert a binary skill table and its name list to a JSON document.
    Decode {
        #[arg(value_name = "TABLE")]
        table: PathBuf,
        #[arg(long, value_name = "NAMES")]
        names: PathBuf,
        #[arg(long, value_name = GAME_VALUES, value_parser = parse_game)]
        game: Game,
        #[arg(long, value_name = "JSON", default_value = "Output.json")]
        output: PathBuf,
        /// Write the document on a single line.
        #[arg(long)]
        compact: bool,
    },
    /// Convert a JSON document back to a binary skill table and name list.
    Encode {
        #[arg(value_name = "JSON")]
        json: PathBuf,
        #[arg(long, value_name = GAME_VALUES, value_parser = parse_game)]
        game: Game,
        #[arg(long = "table-out", value_name = "TABLE")]
        table_out: PathBuf,
        #[arg(long = "names-out", value_name = "NAMES")]
        names_out: PathBuf,
        /// Replace the document's names with this name list.
        #[arg(long, value_name = "NAMES")]
        names: Option<PathBuf>,
    },
    /// List the records of a binary skill table.
    Show {
        #[arg(value_name = "TABLE")]
        table: PathBuf,
        #[arg(long, value_name = "NAMES")]
        names: Option<PathBuf>,
        #[arg(long, value_name = GAME_VALUES, value_parser = parse_game)]
        game: Game,
        #[arg(long)]
        json: bool,
    },
    /// Print the byte layout of a binary skill table.
    Layout {
        #[arg(value_name = "TABLE")]
        table: PathBuf,
        #[arg(long, value_name = GAME_VALUES, value_parser = parse_game)]
        game: Game,
        #[arg(long)]
        json: bool,
    },
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Command::Decode {
            table,
            names,
            game,
            output,
            compact,
        } => run_decode(&table, &names, game, &output, compact),
        Command::Encode {
            json,
            game,
            table_out,
            names_out,
            names,
        } => run_encode(&json, game, &table_out, &names_out, names.as_deref()),
        Command::Show {
            table,
            names,
            game,
            json,
        } => run_show(&table, names.as_deref(), game, json),
        Command::Layout { table, game, json } => run_layout(&table, game, json),
    }
}

fn init_tracing(verbose: u8) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(match verbose {
            0 => "warn",
            1 => "debug",
            _ => "trace",
        })
    });
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run_decode(table: &Path, names: &Path, game: Game, output: &Path, compact: bool) {
    let session = open_session(table, Some(names), game);
    let document = render_table_json(session.table())
        .unwrap_or_else(|e| fail("rendering JSON", e));
    let style = if compact {
        JsonStyle::Compact
    } else {
        JsonStyle::Pretty
    };
    let text = write_json(&document, style).unwrap_or_else(|e| fail("rendering JSON", e));

    fs::write(output, text)
        .unwrap_or_else(|e| fail(format_args!("writing {}", output.display()), e));
    info!(records = session.table().len(), path = %output.display(), "wrote JSON document");
    println!(
        "Decoded {} {} skills to {}",
        session.table().len(),
        game,
        output.display()
    );
}

fn run_encode(json: &Path, game: Game, table_out: &Path, names_out: &Path, names: Option<&Path>) {
    let text = read_text(json);
    let table = parse_table_json(&text)
        .unwrap_or_else(|e| fail(format_args!("parsing {}", json.display()), e));
    if table.game() != game {
        fail(
            format_args!("parsing {}", json.display()),
            SkillError::GameMismatch {
                expected: game,
                actual: table.game(),
            },
        );
    }

    let engine = Engine::new();
    let mut session = engine
        .open_records(game, table.into_skills())
        .unwrap_or_else(|e| fail(format_args!("loading {}", json.display()), e));
    if let Some(names) = names {
        let names_text = read_text(names);
        session
            .apply_names(&names_text)
            .unwrap_or_else(|e| fail(format_args!("applying {}", names.display()), e));
    }

    let (bytes, names_text) = session
        .encode()
        .unwrap_or_else(|e| fail("encoding skill table", e));
    fs::write(table_out, &bytes)
        .unwrap_or_else(|e| fail(format_args!("writing {}", table_out.display()), e));
    fs::write(names_out, names_text)
        .unwrap_or_else(|e| fail(format_args!("writing {}", names_out.display()), e));

    debug!(bytes = bytes.len(), "wrote skill table");
    println!(
        "Encoded {} {} skills to {}",
        session.table().len(),
        game,
        table_out.display()
    );
}

fn run_show(table: &Path, names: Option<&Path>, game: Game, json: bool) {
    let session = open_session(table, names, game);
    if json {
        let value = render_listing_json(&session).unwrap_or_else(|e| fail("rendering JSON", e));
        print_json(&value);
    } else {
        print!("{}", render_listing_text(&session));
    }
}

fn run_layout(table: &Path, game: Game, json: bool) {
    let session = open_session(table, None, game);
    let layout = session
        .layout()
        .unwrap_or_else(|e| fail(format_args!("checking layout of {}", table.display()), e));
    if json {
        let value = render_layout_json(&layout).unwrap_or_else(|e| fail("rendering JSON", e));
        print_json(&value);
    } else {
        print!("{}", render_layout_text(&layout));
    }
}

fn open_session(table: &Path, names: Option<&Path>, game: Game) -> Session {
    let bytes = fs::read(table).unwrap_or_else(|e| fail(format_args!("reading {}", table.display()), e));
    let engine = Engine::new();
    let opened = match names {
        Some(names) => engine.open_table(&bytes, &read_text(names), game),
        None => engine.open_table_unnamed(&bytes, game),
    };
    opened.unwrap_or_else(|e| fail(format_args!("decoding {}", table.display()), e))
}

fn read_text(path: &Path) -> String {
    fs::read_to_string(path).unwrap_or_else(|e| fail(format_args!("reading {}", path.display()), e))
}

fn print_json(value: &serde_json::Value) {
    let text = write_json(value, JsonStyle::Pretty).unwrap_or_else(|e| fail("rendering JSON", e));
    print!("{text}");
}

fn fail(context: impl Display, err: impl Display) -> ! {
    eprintln!("Error {context}: {err}");
    process::exit(1);
}

fn parse_game(value: &str) -> Result<Game, String> {
    value.parse::<Game>().map_err(|e| e.to_string())
}
