// src/cli.rs
use std::io::{self, Write};
use std::path::PathBuf;

use clap::{ArgAction, Parser};
use color_eyre::eyre::{Result, WrapErr};

use crate::{
    catalog,
    config::consts::{
        CSV_SEP, DEFAULT_OUT_DIR, DEFAULT_RACES_CONFIG, DEFAULT_SLEEP_SECONDS, MAX_RETRIES, SLEEP_SECONDS_ENV,
    },
    config::options::{FailurePolicy, FetchOptions, RunOptions, interval_from_secs},
    csv::write_row,
    fetch::PcsFetcher,
    model::Race,
    progress::Progress,
    runner,
    store::FileStore,
};

/// Track race start lists: fetch, diff against the last run, write artifacts.
#[derive(Parser, Debug)]
#[command(name = "startlists", version, about)]
pub struct Args {
    /// Race configuration (JSON)
    #[arg(short, long, default_value = DEFAULT_RACES_CONFIG)]
    pub config: PathBuf,

    /// Directory for the snapshot, change log and matrix
    #[arg(short, long, default_value = DEFAULT_OUT_DIR)]
    pub out_dir: PathBuf,

    /// Pause between consecutive requests, in seconds
    #[arg(long, env = SLEEP_SECONDS_ENV, default_value_t = DEFAULT_SLEEP_SECONDS)]
    pub sleep_seconds: f64,

    /// Retries per request on transport errors, 429 and 5xx
    #[arg(long, default_value_t = MAX_RETRIES)]
    pub max_retries: u32,

    /// Keep last run's entrants for races whose fetch failed
    #[arg(long)]
    pub keep_on_failure: bool,

    /// Print the normalized race list and exit
    #[arg(long)]
    pub list_races: bool,

    /// Also append logs to this file
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// More output (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

impl Args {
    pub fn to_options(&self) -> RunOptions {
        RunOptions {
            races_config: self.config.clone(),
            out_dir: self.out_dir.clone(),
            fetch: FetchOptions {
                interval: interval_from_secs(self.sleep_seconds),
                max_retries: self.max_retries,
                ..FetchOptions::default()
            },
            on_failure: if self.keep_on_failure {
                FailurePolicy::KeepPrevious
            } else {
                FailurePolicy::TreatAsEmpty
            },
        }
    }
}

/// Console progress: one line per race.
struct ConsoleProgress {
    total: usize,
    seen: usize,
}

impl Progress for ConsoleProgress {
    fn begin(&mut self, total: usize) {
        self.total = total;
        println!("Fetching {total} start lists…");
    }
    fn log(&mut self, msg: &str) {
        println!("{msg}");
    }
    fn item_done(&mut self, race: &str, entrants: usize) {
        self.seen += 1;
        if entrants == 0 {
            println!("[{}/{}] {race}: no riders yet", self.seen, self.total);
        } else {
            println!("[{}/{}] {race}: {entrants} riders", self.seen, self.total);
        }
    }
    fn item_failed(&mut self, race: &str, reason: &str) {
        self.seen += 1;
        println!("[{}/{}] {race}: FAILED ({reason})", self.seen, self.total);
    }
}

/// One CSV line per race: name, locator.
fn print_races<W: Write>(mut out: W, races: &[Race]) -> io::Result<()> {
    for race in races {
        write_row(&mut out, &[&race.name, &race.locator], CSV_SEP)?;
    }
    out.flush()
}

pub fn run() -> Result<()> {
    let args = Args::parse();
    crate::log::init(args.verbose, args.log_file.as_deref()).wrap_err("cannot open log file")?;
    let opts = args.to_options();

    if args.list_races {
        let races = catalog::load(&opts.races_config)?;
        print_races(io::stdout().lock(), &races).wrap_err("cannot write race list")?;
        return Ok(());
    }

    let mut fetcher = PcsFetcher::new(&opts.fetch).wrap_err("cannot build HTTP client")?;
    let mut store = FileStore::new(&opts.out_dir);
    tracing::debug!(out_dir = %store.dir().display(), "output directory");
    let mut progress = ConsoleProgress { total: 0, seen: 0 };

    let summary = runner::run(&opts, &mut fetcher, &mut store, Some(&mut progress))?;

    println!(
        "{} riders across {} races: {} added, {} removed",
        summary.riders, summary.races, summary.added, summary.removed
    );
    if !summary.failed_races.is_empty() {
        println!("Failed: {}", summary.failed_races.join(", "));
    }
    for path in &summary.files_written {
        println!("Wrote {}", path.display());
    }
    Ok(())
}
