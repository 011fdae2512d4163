//! Génération d'une facture UBL depuis un fichier JSON

use clap::Parser;
use serde_json::Value;
use std::path::PathBuf;

use ubl_create::{logging, ubl, Error};

#[derive(Parser, Debug)]
#[command(name = "generate_ubl", version = ubl::VERSION, about = "Facture JSON vers XML UBL 2.1")]
struct Args {
    /// Fichier JSON de la facture
    input: PathBuf,

    /// Fichier XML de sortie (sortie standard si absent)
    #[arg(short, long)]
    output: Option<PathBuf>,
}

fn run(args: &Args) -> Result<(), Error> {
    let content = std::fs::read_to_string(&args.input)?;
    let invoice: Value = serde_json::from_str(&content)?;

    match args.output {
        Some(ref output) => {
            let path = ubl::generate_to_file(&invoice, output)?;
            println!("Facture générée : {}", path.display());
        }
        None => print!("{}", ubl::generate(&invoice)?),
    }
    Ok(())
}

fn main() {
    logging::init();
    let args = Args::parse();

    if let Err(e) = run(&args) {
        eprintln!("ERREUR: {}", e);
        std::process::exit(if e.is_validation() { 2 } else { 1 });
    }
}
