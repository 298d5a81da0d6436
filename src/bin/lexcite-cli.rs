use std::fs;
use std::io::{self, Read};

use clap::Parser;
use lexcite::tokenizers::extractors::EXTRACTORS;
use lexcite::{get_citations, Ahocorasick, GetCitationsOptions};

/// Extract legal citations from a text file (or stdin) and print them, one
/// per line, as `kind\tspan_start\tspan_end\ttext`.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Path to the file to scan. Reads stdin when omitted.
    file: Option<String>,

    /// Drop citations that remain ambiguous between multiple reporters
    /// after narrowing by year.
    #[arg(long)]
    remove_ambiguous: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args = Args::parse();

    let text = match &args.file {
        Some(path) => fs::read_to_string(path)?,
        None => {
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf)?;
            buf
        }
    };

    let tokenizer = Ahocorasick::new(EXTRACTORS.as_slice())?;
    let options = GetCitationsOptions {
        remove_ambiguous: args.remove_ambiguous,
        ..GetCitationsOptions::default()
    };
    let citations = get_citations(&text, options, &tokenizer);

    for citation in &citations {
        let span = citation.span();
        println!(
            "{}\t{}\t{}\t{}",
            kind_name(citation),
            span.start,
            span.end,
            span.text(&text)
        );
    }

    Ok(())
}

fn kind_name(citation: &lexcite::Citation) -> &'static str {
    use lexcite::Citation::*;
    match citation {
        FullCase { .. } => "FullCase",
        ShortCase { .. } => "ShortCase",
        FullLaw { .. } => "FullLaw",
        FullJournal { .. } => "FullJournal",
        Supra { .. } => "Supra",
        Id { .. } => "Id",
        IdLaw { .. } => "IdLaw",
        Reference { .. } => "Reference",
        Unknown { .. } => "Unknown",
    }
}
