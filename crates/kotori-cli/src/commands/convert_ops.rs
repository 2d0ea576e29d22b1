use kotori_core::conversion::{Candidate, ConversionEngine, ConvertOptions};

use super::{open_engine, CliError};

fn print_list(title: &str, candidates: &[Candidate]) {
    println!("{title}:");
    for (i, c) in candidates.iter().enumerate() {
        let segs: Vec<String> = c
            .associated_data
            .iter()
            .map(|s| format!("{}({})", s.surface, s.reading))
            .collect();
        println!(
            "#{:>2}: {} [count={} score={:.1}] {}",
            i + 1,
            c.text,
            c.corresponding_count,
            c.score,
            segs.join(" | ")
        );
    }
}

pub fn convert_cmd(dict_file: &str, reading: &str, rich: bool, english: bool) -> Result<(), CliError> {
    let engine = open_engine(dict_file)?;
    let options = ConvertOptions {
        rich_candidates: rich,
        english_prediction: english,
        ..ConvertOptions::default()
    };
    match engine.request_candidates(reading, &options) {
        Ok(results) => {
            print_list("first clause", &results.first_clause);
            print_list("main", &results.main);
        }
        Err(e) => println!("no results: {e}"),
    }
    Ok(())
}
