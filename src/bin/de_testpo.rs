//! de-testpo - run JPL `testpo` conformance files against DE binaries.
//!
//! Two modes:
//! - a single pair: `de-testpo --ephemeris jpleph.440 --testpo testpo.440`
//! - a JPL-style tree: `de-testpo --dir ephem/ --version 405 --version 440`, looking
//!   for `<dir>/de<v>/jpleph.<v>` and `<dir>/de<v>/testpo.<v>` (all known versions
//!   when `--version` is not given).

use std::error::Error;
use std::process::ExitCode;

use camino::{Utf8Path, Utf8PathBuf};
use clap::Parser;
use jplde::jpl_ephem::{
    de_byte_order::ByteOrder,
    de_ephemeris::{DeEphemeris, OpenOptions},
    de_version::DeVersion,
    testpo::{run_testpo_file, TestpoReport},
};
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser, Debug)]
#[command(name = "de-testpo")]
#[command(about = "Check JPL DE binary ephemerides against their testpo files")]
struct Args {
    /// Root directory holding one `de<v>/` directory per solution
    #[arg(long, conflicts_with_all = ["ephemeris", "testpo"])]
    dir: Option<Utf8PathBuf>,

    /// Solutions to test under --dir (e.g. 405, DE440, 430t); all known ones by default
    #[arg(long = "version", value_name = "V")]
    versions: Vec<DeVersion>,

    /// Binary ephemeris file
    #[arg(long, requires = "testpo")]
    ephemeris: Option<Utf8PathBuf>,

    /// testpo file to run against --ephemeris
    #[arg(long, requires = "ephemeris")]
    testpo: Option<Utf8PathBuf>,

    /// Byte order of the binaries (little, big, native); detected when omitted
    #[arg(long)]
    byte_order: Option<ByteOrder>,

    /// Log block reads and every failed case
    #[arg(long, short = 'v')]
    verbose: bool,
}

fn run_pair(
    ephemeris: &Utf8Path,
    testpo: &Utf8Path,
    expected: Option<DeVersion>,
    options: &OpenOptions,
) -> Result<TestpoReport, Box<dyn Error>> {
    let ephem = DeEphemeris::open_with(ephemeris, options)?;
    let header = ephem.header();
    info!(
        file = %ephemeris,
        version = header.version(),
        start = header.jd_start(),
        end = header.jd_end(),
        "opened ephemeris"
    );
    if let Some(solution) = expected.filter(|v| v.number() != header.version()) {
        warn!(
            file = %ephemeris,
            %solution,
            found = header.version(),
            "header DE number differs from the solution directory"
        );
    }
    Ok(run_testpo_file(&ephem, testpo)?)
}

fn main() -> Result<ExitCode, Box<dyn Error>> {
    let args = Args::parse();

    let log_level = if args.verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let options = OpenOptions {
        byte_order: args.byte_order,
        ..OpenOptions::default()
    };

    type Pair = (String, Option<DeVersion>, Utf8PathBuf, Utf8PathBuf);
    let pairs: Vec<Pair> = match (&args.dir, &args.ephemeris, &args.testpo) {
        (_, Some(ephemeris), Some(testpo)) => {
            vec![(ephemeris.to_string(), None, ephemeris.clone(), testpo.clone())]
        }
        (Some(dir), _, _) => {
            let versions = if args.versions.is_empty() {
                DeVersion::ALL.to_vec()
            } else {
                args.versions.clone()
            };
            versions
                .into_iter()
                .map(|v| {
                    let base = dir.join(v.directory());
                    (
                        v.to_string(),
                        Some(v),
                        base.join(v.ephemeris_filename()),
                        base.join(v.testpo_filename()),
                    )
                })
                .collect()
        }
        _ => return Err("either --dir or both --ephemeris and --testpo are required".into()),
    };

    let mut total = TestpoReport::default();
    let mut missing = 0usize;

    for (label, solution, ephemeris, testpo) in &pairs {
        if !ephemeris.exists() || !testpo.exists() {
            warn!(%label, %ephemeris, %testpo, "files not found, skipping");
            missing += 1;
            continue;
        }

        let report = run_pair(ephemeris, testpo, *solution, &options)?;
        println!("{label}: {report}");

        total.tests += report.tests;
        total.failed += report.failed;
        total.skipped += report.skipped;
    }

    if pairs.len() > 1 {
        println!();
        println!(
            "Total: {total} ({missing} of {} solutions not found)",
            pairs.len()
        );
    }

    Ok(if total.passed() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
