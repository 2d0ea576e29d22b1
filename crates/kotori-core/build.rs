use toml::Value;

const SETTINGS: &str = "src/default_settings.toml";
const ROMAJI: &str = "src/romaji/default_romaji.toml";

fn main() {
    let settings = parse(SETTINGS, include_str!("src/default_settings.toml"));
    for section in ["conversion", "input_mode"] {
        if !settings.get(section).is_some_and(Value::is_table) {
            panic!("{SETTINGS}: missing [{section}] table");
        }
    }

    let romaji = parse(ROMAJI, include_str!("src/romaji/default_romaji.toml"));
    let Some(mappings) = romaji.get("mappings").and_then(Value::as_table) else {
        panic!("{ROMAJI}: missing [mappings] table");
    };
    if let Some((key, _)) = mappings.iter().find(|(_, v)| !v.is_str()) {
        panic!("{ROMAJI}: mapping {key:?} is not a string");
    }

    println!("cargo:rerun-if-changed={SETTINGS}");
    println!("cargo:rerun-if-changed={ROMAJI}");
}

fn parse(path: &str, content: &str) -> toml::Table {
    content
        .parse::<toml::Table>()
        .unwrap_or_else(|e| panic!("{path} contains invalid TOML: {e}"))
}
