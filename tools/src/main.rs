//! txnscope: interactive console for sorting and searching
//! financial-transaction exports.
//!
//! Usage:
//!   txnscope --data financial_fraud_detection.csv
//!   txnscope --sample 50000 --seed 7 --capacity 20000
//!   txnscope --config txnscope.json

use anyhow::Result;
use std::env;
use std::io::{self, BufRead, Write};
use txnscope_core::{
    config::ScopeConfig,
    export, ingest,
    metrics::{self, Stopwatch},
    paginate::{Nav, NavigationSource, Page, PageRenderer, PageSize, Pager, View},
    sample::SampleGenerator,
    search::{self, Query, Window},
    sort::{Algorithm, Order, SortSpec},
    Backend, Channel, Field, IndexedStore, Record, RecordStore, Workspace,
};

/// Where records come from on load and reload.
enum Source {
    Csv(String),
    Sample { count: usize, seed: u64 },
}

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let mut config = match find_arg(&args, "--config") {
        Some(path) => ScopeConfig::load(path)?,
        None => ScopeConfig::default(),
    };
    if let Some(path) = find_arg(&args, "--data") {
        config.data_path = path.to_string();
    }
    if let Some(capacity) = find_arg(&args, "--capacity").and_then(|c| c.parse().ok()) {
        config.capacity = Some(capacity);
    }
    let sample = parse_arg(&args, "--sample", 0usize);
    let seed = parse_arg(&args, "--seed", 42u64);
    let source = if sample > 0 {
        Source::Sample { count: sample, seed }
    } else {
        Source::Csv(config.data_path.clone())
    };
    let (full, preview) = config.page_sizes()?;

    println!("txnscope");
    match &source {
        Source::Csv(path) => println!("  data:      {path}"),
        Source::Sample { count, seed } => println!("  sample:    {count} records (seed {seed})"),
    }
    match config.capacity {
        Some(c) => println!("  capacity:  {c} per store"),
        None => println!("  capacity:  unbounded"),
    }
    println!();

    let mut workspace = Workspace::with_limit(config.capacity);
    load(&mut workspace, &source)?;

    let stdin = io::stdin();
    let mut console = Console { input: stdin.lock() };
    let mut backend = config.default_backend;

    loop {
        print_menu(backend, config.search_field);
        let Some(choice) = console.ask("Choose an option: ")? else { break };
        match choice.as_str() {
            "1" => {
                if let Some(channel) = console.ask_channel()? {
                    let store = workspace.store(channel, backend);
                    let views = [View::of_store(channel.label(), store, full)];
                    page_views(&views, &mut console);
                }
            }
            "2" => {
                let views: Vec<View> = Channel::ALL
                    .iter()
                    .map(|c| View::of_store(c.label(), workspace.store(*c, backend), preview))
                    .collect();
                page_views(&views, &mut console);
            }
            "3" => sort_menu(&mut workspace, backend, &config, &mut console)?,
            "4" => {
                let term = console.ask("Search term (empty matches all): ")?.unwrap_or_default();
                let query = Query::new(config.search_field, &term);
                let watch = Stopwatch::start();
                let views = per_channel_views(&workspace, backend, preview, |store| {
                    search::linear_search(&[store], &query, Window::ALL)
                });
                report_hits(&views, watch);
                page_views(&views, &mut console);
            }
            "5" => {
                let Some(target) = console.ask("Exact value: ")? else { continue };
                let field = config.search_field;
                println!("Searching copies sorted by {} (stores keep their order)...", field.name());
                let copies: Vec<(Channel, IndexedStore)> = Channel::ALL
                    .iter()
                    .map(|c| (*c, search::sorted_copy(workspace.store(*c, backend), field).0))
                    .collect();
                let watch = Stopwatch::start();
                let views: Vec<View> = copies
                    .iter()
                    .filter_map(|(c, copy)| {
                        let stores: [&dyn RecordStore; 1] = [copy];
                        let hits = search::binary_then_scan(&stores, field, &target, Window::ALL);
                        (!hits.is_empty()).then(|| View::of_hits(c.label(), hits, preview))
                    })
                    .collect();
                report_hits(&views, watch);
                page_views(&views, &mut console);
            }
            "6" => {
                let Some(channel) = console.ask_channel()? else { continue };
                let default_path = format!("{}_transactions.json", channel.name());
                let path = console
                    .ask(&format!("Output file [{default_path}]: "))?
                    .filter(|p| !p.is_empty())
                    .unwrap_or(default_path);
                match export::export_path(workspace.store(channel, backend), &path) {
                    Ok(n) => println!("Exported {n} records to {path}"),
                    Err(e) => println!("Export failed: {e}"),
                }
            }
            "7" => print_footprint(&workspace),
            "8" => load(&mut workspace, &source)?,
            "9" => {
                backend = match backend {
                    Backend::Indexed    => Backend::Sequential,
                    Backend::Sequential => Backend::Indexed,
                };
                println!("Now using the {backend} stores.");
            }
            "0" => {
                println!("Exiting...");
                break;
            }
            _ => println!("Invalid choice. Try again."),
        }
    }
    Ok(())
}

fn load(workspace: &mut Workspace, source: &Source) -> Result<()> {
    let watch = Stopwatch::start();
    let records = match source {
        Source::Csv(path) => {
            let (records, ingest_report) = ingest::load_path(path)?;
            if ingest_report.short_rows > 0 {
                println!("Skipped {} short rows.", ingest_report.short_rows);
            }
            if ingest_report.lossy_rows > 0 {
                println!("Replaced invalid UTF-8 in {} rows.", ingest_report.lossy_rows);
            }
            records
        }
        Source::Sample { count, seed } => SampleGenerator::new(*seed)
            .with_unknown_channel_rate(0.02)
            .generate(*count),
    };
    let report = workspace.load(records);

    println!("\nLoaded Transactions ({:?}):", watch.elapsed());
    let counts: Vec<String> = Channel::ALL
        .iter()
        .map(|c| format!("{}: {}", c.label(), report.count(*c)))
        .collect();
    println!("{} | Unrecognized channel: {}", counts.join(" | "), report.unknown_channel);
    if report.dropped > 0 {
        println!("WARNING: {} records dropped by the capacity bound.", report.dropped);
    }

    println!("\nLast transaction parsed:");
    match workspace.last_loaded() {
        Some(record) => print_record(record),
        None => println!("No transactions loaded."),
    }
    Ok(())
}

fn print_menu(backend: Backend, search_field: Field) {
    println!("\n========= Transaction Menu ({backend}) =========");
    println!("1. Browse one channel");
    println!("2. Browse all channels");
    println!("3. Sort all channels by location");
    println!("4. Search {} (substring)", search_field.name());
    println!("5. Search {} (binary, exact)", search_field.name());
    println!("6. Export a channel to JSON");
    println!("7. Memory footprint");
    println!("8. Reload data");
    println!("9. Switch backend");
    println!("0. Exit");
}

fn sort_menu(
    workspace: &mut Workspace,
    backend: Backend,
    config: &ScopeConfig,
    console: &mut Console<impl BufRead>,
) -> Result<()> {
    println!("1. Bucket sort  2. Quicksort  3. Bubble sort");
    let algorithm = match console.ask("Algorithm: ")?.as_deref() {
        Some("1") => Algorithm::Bucket,
        Some("2") => Algorithm::QuickSort,
        Some("3") => Algorithm::Bubble,
        _ => {
            println!("Invalid choice.");
            return Ok(());
        }
    };
    let order = match console.ask("Order [a]scending / [d]escending: ")?.as_deref() {
        Some("d") | Some("D") => Order::Descending,
        _ => Order::Ascending,
    };

    let spec = SortSpec::new(algorithm, order).with_labels(config.label_set());
    for (channel, report) in workspace.sort_all(backend, &spec) {
        println!(
            "  {:<14} {:>8} records  {:?}",
            channel.label(),
            report.records,
            report.elapsed
        );
        if report.unmatched > 0 {
            println!("  WARNING: {} records outside the city list were moved to the end.", report.unmatched);
        }
    }
    println!("All groups sorted by location ({}, {}).", algorithm.name(), order.name());
    Ok(())
}

/// One view per channel that has hits.
fn per_channel_views<'a>(
    workspace: &'a Workspace,
    backend: Backend,
    size: PageSize,
    mut find: impl FnMut(&'a dyn RecordStore) -> Vec<search::Hit<'a>>,
) -> Vec<View<'a>> {
    Channel::ALL
        .iter()
        .filter_map(|c| {
            let hits = find(workspace.store(*c, backend));
            (!hits.is_empty()).then(|| View::of_hits(c.label(), hits, size))
        })
        .collect()
}

fn report_hits(views: &[View<'_>], watch: Stopwatch) {
    let total: usize = views.iter().map(View::len).sum();
    println!("Found {total} matching transactions in {:?}.", watch.elapsed());
}

fn page_views(views: &[View<'_>], console: &mut Console<impl BufRead>) {
    if views.is_empty() {
        println!("No transactions found.");
        return;
    }
    let outcome = Pager::run(views, &mut ConsoleRenderer, console);
    if outcome.aborted && outcome.views_skipped > 0 {
        println!("Skipped {} remaining groups.", outcome.views_skipped);
    }
}

fn print_footprint(workspace: &Workspace) {
    for backend in Backend::ALL {
        println!("{backend} stores:");
        let mut total = 0;
        for channel in Channel::ALL {
            let fp = metrics::footprint(workspace.store(channel, backend));
            total += fp.total_bytes();
            println!(
                "  {:<14} {:>8} records  {}",
                channel.label(),
                fp.records,
                metrics::format_bytes(fp.total_bytes())
            );
        }
        println!("  total: {}", metrics::format_bytes(total));
    }
}

fn print_record(t: &Record) {
    let mut line = format!(
        "ID: {} | Timestamp: {} | Sender: {} | Receiver: {} | Amount: {:.2} | Type: {} | Location: {} | Fraud: {} | Channel: {} | Fraud Type: {}",
        t.transaction_id,
        t.timestamp,
        t.sender_account,
        t.receiver_account,
        t.amount,
        t.transaction_type,
        t.location,
        if t.is_fraud { "YES" } else { "NO" },
        t.payment_channel,
        t.fraud_label().unwrap_or("N/A"),
    );
    if !t.time_since_last_transaction.is_empty() {
        match t.time_since_last_transaction.parse::<f64>() {
            Ok(v) => line.push_str(&format!(" | Time Since Last Txn: {v:.2}")),
            Err(_) => line.push_str(" | Time Since Last Txn: Invalid"),
        }
    }
    println!("{line}");
}

struct ConsoleRenderer;

impl PageRenderer for ConsoleRenderer {
    fn render(&mut self, page: &Page<'_>) {
        println!("\n--- {} (page {}) ---", page.title, page.number + 1);
        if page.is_no_more_data() {
            println!("No more data.");
            return;
        }
        for record in &page.records {
            print_record(record);
        }
        println!(
            "Showing {}-{} of {} (page {} of {})",
            page.first_index() + 1,
            page.first_index() + page.records.len(),
            page.total,
            page.number + 1,
            page.page_count()
        );
    }
}

struct Console<R: BufRead> {
    input: R,
}

impl<R: BufRead> Console<R> {
    /// Prompt and read one trimmed line; `None` on EOF.
    fn ask(&mut self, prompt: &str) -> io::Result<Option<String>> {
        print!("{prompt}");
        io::stdout().flush()?;
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    fn ask_channel(&mut self) -> io::Result<Option<Channel>> {
        let Some(answer) = self.ask("Channel (card/ach/upi/wire): ")? else {
            return Ok(None);
        };
        match answer.parse::<Channel>() {
            Ok(channel) => Ok(Some(channel)),
            Err(e) => {
                println!("{e}.");
                Ok(None)
            }
        }
    }
}

impl<R: BufRead> NavigationSource for Console<R> {
    fn next_nav(&mut self, page: &Page<'_>) -> Option<Nav> {
        loop {
            let prompt = if page.has_next() {
                "[n]ext, [p]revious, [b]ack, [q]uit all: "
            } else {
                "[p]revious, [b]ack, [q]uit all: "
            };
            let answer = match self.ask(prompt) {
                Ok(answer) => answer?,
                Err(e) => {
                    log::warn!("input error: {e}");
                    return None;
                }
            };
            match answer.as_str() {
                "n" | "N" => return Some(Nav::Next),
                "p" | "P" => return Some(Nav::Previous),
                "b" | "B" | "" => return Some(Nav::Back),
                "q" | "Q" => return Some(Nav::ExitEarly),
                other => println!("Unknown option '{other}'."),
            }
        }
    }
}

fn find_arg<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.windows(2).find(|w| w[0] == flag).map(|w| w[1].as_str())
}

fn parse_arg<T: std::str::FromStr + Copy>(args: &[String], flag: &str, default: T) -> T {
    find_arg(args, flag)
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
