use anyhow::{bail, Context, Result};
use clap::Parser;
use reqwest::Client;
use simprov::{fetch::fetch_seed, merge::merge, table::Table};
use std::{fs, path::PathBuf};
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Merge work orders into a master customer file and assign ZIPs"
)]
struct Args {
    /// Master customer file (CSV or TSV)
    #[arg(long)]
    master: Option<PathBuf>,
    /// Work order file (CSV or TSV)
    #[arg(long)]
    work: Option<PathBuf>,
    /// ZIP reference file (zip,population)
    #[arg(long)]
    zips: Option<PathBuf>,
    /// Seed endpoint base URL; supplies master and zips when their paths
    /// are not given
    #[arg(long)]
    seed: Option<String>,
    #[arg(long, default_value = "updated_masterFile.csv")]
    out_master: PathBuf,
    #[arg(long, default_value = "updated_uszips.csv")]
    out_zips: PathBuf,
}

#[tokio::main]
async fn main() -> Result<()> {
    // ─── 1) init logging ─────────────────────────────────────────────
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder().with_env_filter(env).init();

    let args = Args::parse();

    // ─── 2) load the three tables ────────────────────────────────────
    let seed = match (&args.seed, &args.master, &args.zips) {
        (Some(base), master, zips) if master.is_none() || zips.is_none() => {
            let client = Client::new();
            Some(fetch_seed(&client, base).await?)
        }
        _ => None,
    };

    let master_text = match (&args.master, &seed) {
        (Some(path), _) => read_input(path, "master")?,
        (None, Some(seed)) => seed.master_csv.clone(),
        (None, None) => String::new(),
    };
    let zips_text = match (&args.zips, &seed) {
        (Some(path), _) => read_input(path, "zips")?,
        (None, Some(seed)) => seed.zips_csv.clone(),
        (None, None) => String::new(),
    };
    let work_text = match &args.work {
        Some(path) => read_input(path, "work")?,
        None => String::new(),
    };

    let problems = input_problems(&[
        (
            "master",
            args.master.is_some() || seed.is_some(),
            master_text.is_empty(),
        ),
        ("work", args.work.is_some(), work_text.is_empty()),
        (
            "zips",
            args.zips.is_some() || seed.is_some(),
            zips_text.is_empty(),
        ),
    ]);
    if let Some(problems) = problems {
        bail!("cannot merge without all three tables ({problems}); provide --master/--work/--zips paths or --seed");
    }

    let master = Table::parse(&master_text);
    let work = Table::parse(&work_text);
    let zips = Table::parse(&zips_text);
    info!(
        "loaded master={} work={} zips={} rows",
        master.rows.len(),
        work.rows.len(),
        zips.rows.len()
    );

    // ─── 3) merge and write outputs ──────────────────────────────────
    let out = merge(&master, &work, &zips);

    fs::write(&args.out_master, out.master_csv())
        .with_context(|| format!("writing {}", args.out_master.display()))?;
    fs::write(&args.out_zips, out.zips_csv())
        .with_context(|| format!("writing {}", args.out_zips.display()))?;

    info!(
        "wrote {} ({} rows, {} modified) and {} ({} rows)",
        args.out_master.display(),
        out.master.rows.len(),
        out.modified,
        args.out_zips.display(),
        out.zips.rows.len()
    );

    Ok(())
}

fn read_input(path: &PathBuf, label: &str) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("reading {} file {}", label, path.display()))
}

/// Describe which tables block the merge, keeping absent inputs (no path or
/// seed given) distinct from files that loaded but held no text. Returns
/// `None` when all three tables are usable.
fn input_problems(tables: &[(&str, bool, bool)]) -> Option<String> {
    let absent: Vec<&str> = tables
        .iter()
        .filter(|(_, provided, _)| !provided)
        .map(|(name, _, _)| *name)
        .collect();
    let empty: Vec<&str> = tables
        .iter()
        .filter(|(_, provided, is_empty)| *provided && *is_empty)
        .map(|(name, _, _)| *name)
        .collect();

    if absent.is_empty() && empty.is_empty() {
        return None;
    }
    let mut parts = Vec::new();
    if !absent.is_empty() {
        parts.push(format!("not provided: {}", absent.join(", ")));
    }
    if !empty.is_empty() {
        parts.push(format!("empty file: {}", empty.join(", ")));
    }
    Some(parts.join("; "))
}
