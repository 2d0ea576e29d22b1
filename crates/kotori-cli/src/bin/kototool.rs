use std::process;

use clap::{Parser, Subcommand};

use kotori_cli::commands::{convert_cmd, simulate_cmd};

#[derive(Parser)]
#[command(name = "kototool", about = "Kotori composition diagnostics")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run a key script through a session and print every step
    Simulate {
        /// Path to the reading table TOML
        dict_file: String,
        /// Key script, e.g. "kyouha<space><S-right><enter>"
        keys: String,
        /// Settings TOML (defaults to the embedded settings)
        #[arg(long)]
        settings: Option<String>,
        /// Emit one JSON object per step
        #[arg(long)]
        json: bool,
    },

    /// Print first-clause and main candidates for a reading
    Convert {
        /// Path to the reading table TOML
        dict_file: String,
        /// Kana reading to convert
        reading: String,
        /// Request rich candidates
        #[arg(long)]
        rich: bool,
        /// Include English prediction
        #[arg(long)]
        english: bool,
    },
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Command::Simulate {
            dict_file,
            keys,
            settings,
            json,
        } => simulate_cmd(&dict_file, &keys, settings.as_deref(), json),
        Command::Convert {
            dict_file,
            reading,
            rich,
            english,
        } => convert_cmd(&dict_file, &reading, rich, english),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}
