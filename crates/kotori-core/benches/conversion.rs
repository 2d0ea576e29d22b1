use criterion::{black_box, criterion_group, criterion_main, Criterion};
use kotori_core::composing::ComposingText;
use kotori_core::conversion::{ConversionEngine, ConvertOptions, ReadingTable, TableEngine};

fn bench_engine() -> TableEngine {
    let table = ReadingTable::from_entries([
        ("きょう".to_string(), vec!["今日".to_string(), "京".to_string()]),
        ("は".to_string(), vec!["は".to_string(), "葉".to_string()]),
        ("いい".to_string(), vec!["良い".to_string(), "いい".to_string()]),
        ("てんき".to_string(), vec!["天気".to_string()]),
        ("てん".to_string(), vec!["天".to_string(), "点".to_string()]),
        ("き".to_string(), vec!["木".to_string(), "気".to_string()]),
    ]);
    TableEngine::new(table)
}

fn bench_table_convert(c: &mut Criterion) {
    let engine = bench_engine();
    let options = ConvertOptions {
        rich_candidates: true,
        ..ConvertOptions::default()
    };
    c.bench_function("table_convert/きょうはいいてんき", |b| {
        b.iter(|| {
            let _ = engine.request_candidates(black_box("きょうはいいてんき"), &options);
            engine.reset_session();
        })
    });
}

fn bench_romaji_typing(c: &mut Criterion) {
    c.bench_function("composing/type_kyouhaiitenki", |b| {
        b.iter(|| {
            let mut text = ComposingText::new();
            for ch in black_box("kyouhaiitenki").chars() {
                text.insert_at_cursor(&ch.to_string());
            }
            text.flush_romaji();
            text
        })
    });
}

criterion_group!(benches, bench_table_convert, bench_romaji_typing);
criterion_main!(benches);
