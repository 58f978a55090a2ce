use pure_richtext::{CellMeasure, LayoutConfig, RendererRegistry, TextFormatter, layout};
use std::time::{Duration, Instant};

/// Performance benchmark suite for formatting and line layout
///
/// Run with: cargo test --release --bench performance -- --nocapture
///
/// This measures:
/// - Link formatting of raw text
/// - Line layout at different widths
/// - The full format + layout pipeline
const SMALL_TEXT_PARAGRAPHS: usize = 10;
const MEDIUM_TEXT_PARAGRAPHS: usize = 100;
const LARGE_TEXT_PARAGRAPHS: usize = 1000;

const ITERATIONS: usize = 100;

/// Create raw text with the specified number of paragraphs, every third
/// paragraph carrying links.
fn create_test_text(num_paragraphs: usize, avg_words_per_para: usize) -> String {
    let sample_words = [
        "Lorem",
        "ipsum",
        "dolor",
        "sit",
        "amet",
        "consectetur",
        "adipiscing",
        "elit",
        "sed",
        "do",
        "eiusmod",
        "tempor",
        "incididunt",
        "ut",
        "labore",
        "et",
        "dolore",
        "magna",
        "aliqua",
        "reprehenderit",
    ];

    let mut text = String::new();
    for i in 0..num_paragraphs {
        if i > 0 {
            text.push('\n');
        }
        for j in 0..avg_words_per_para {
            if j > 0 {
                text.push(' ');
            }
            if i % 3 == 0 && j % 7 == 3 {
                let label = sample_words[j % sample_words.len()];
                text.push_str(&format!("[{label}](https://example.com/{i}/{j})"));
            } else if i % 3 == 1 && j % 11 == 5 {
                text.push_str("https://example.org/some/longer/path?query=1");
            } else {
                text.push_str(sample_words[j % sample_words.len()]);
            }
        }
    }
    text
}

struct BenchmarkResult {
    name: String,
    iterations: usize,
    total_duration: Duration,
    avg_duration: Duration,
    min_duration: Duration,
    max_duration: Duration,
}

impl BenchmarkResult {
    fn print(&self) {
        println!("\n{}", "=".repeat(70));
        println!("Benchmark: {}", self.name);
        println!("{}", "=".repeat(70));
        println!("Iterations:     {}", self.iterations);
        println!("Total time:     {:?}", self.total_duration);
        println!("Average:        {:?}", self.avg_duration);
        println!("Min:            {:?}", self.min_duration);
        println!("Max:            {:?}", self.max_duration);
        println!(
            "Ops/sec:        {:.2}",
            1_000_000.0 / self.avg_duration.as_micros().max(1) as f64
        );

        if self.avg_duration.as_millis() > 100 {
            println!("\n⚠️  WARNING: Average duration > 100ms (user-perceptible lag)");
        } else if self.avg_duration.as_millis() > 16 {
            println!("\n⚠️  WARNING: Average duration > 16ms (may drop frames)");
        }
    }
}

fn benchmark<F>(name: &str, iterations: usize, mut f: F) -> BenchmarkResult
where
    F: FnMut(),
{
    let mut durations = Vec::with_capacity(iterations);

    // Warmup
    for _ in 0..10 {
        f();
    }

    for _ in 0..iterations {
        let start = Instant::now();
        f();
        durations.push(start.elapsed());
    }

    let total_duration: Duration = durations.iter().sum();
    let avg_duration = total_duration / iterations as u32;
    let min_duration = *durations.iter().min().unwrap();
    let max_duration = *durations.iter().max().unwrap();

    BenchmarkResult {
        name: name.to_string(),
        iterations,
        total_duration,
        avg_duration,
        min_duration,
        max_duration,
    }
}

fn sample_texts() -> Vec<(&'static str, String)> {
    vec![
        ("Small (10 paras)", create_test_text(SMALL_TEXT_PARAGRAPHS, 20)),
        ("Medium (100 paras)", create_test_text(MEDIUM_TEXT_PARAGRAPHS, 20)),
        ("Large (1000 paras)", create_test_text(LARGE_TEXT_PARAGRAPHS, 20)),
    ]
}

fn iterations_for(name: &str) -> usize {
    if name.contains("Large") { 10 } else { ITERATIONS }
}

#[test]
fn bench_formatting_performance() {
    println!("\n\n╔════════════════════════════════════════════════════════════════╗");
    println!("║           FORMATTING PERFORMANCE BENCHMARKS                    ║");
    println!("╚════════════════════════════════════════════════════════════════╝");

    let formatter = TextFormatter::default();
    for (name, text) in sample_texts() {
        let result = benchmark(&format!("format - {}", name), iterations_for(name), || {
            let tree = formatter.format(&text);
            assert!(!tree.contains_unparsed());
        });
        result.print();
    }
}

#[test]
fn bench_layout_performance() {
    println!("\n\n╔════════════════════════════════════════════════════════════════╗");
    println!("║              LAYOUT PERFORMANCE BENCHMARKS                     ║");
    println!("╚════════════════════════════════════════════════════════════════╝");

    let formatter = TextFormatter::default();
    let renderers = RendererRegistry::default();
    let config = LayoutConfig::new().with_max_width(Some(80.0)).unwrap();

    for (name, text) in sample_texts() {
        let tree = formatter.format(&text);
        let result = benchmark(&format!("layout - {}", name), iterations_for(name), || {
            let mut tree = tree.clone();
            let _ = layout(&mut tree, &renderers, &CellMeasure, &config);
        });
        result.print();
    }
}

#[test]
fn bench_wrap_width_impact() {
    println!("\n=== Wrap Width Impact ===\n");

    let formatter = TextFormatter::default();
    let renderers = RendererRegistry::default();
    let text = create_test_text(MEDIUM_TEXT_PARAGRAPHS, 20);

    for width in [20.0, 40.0, 80.0, 120.0] {
        let config = LayoutConfig::new().with_max_width(Some(width)).unwrap();
        let start = Instant::now();
        let mut lines = 0;
        for _ in 0..ITERATIONS {
            let mut tree = formatter.format(&text);
            lines = layout(&mut tree, &renderers, &CellMeasure, &config)
                .lines
                .len();
        }
        let avg = start.elapsed() / ITERATIONS as u32;
        println!(
            "Width {:>5}: {:>6} lines, {:.3}ms per format + layout",
            width,
            lines,
            avg.as_secs_f64() * 1000.0
        );
    }
}
