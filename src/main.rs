use clap::Parser;
use merge_tables::pipeline::{self, MergeConfig};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, info};
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(
    name = "merge-tables",
    about = "Merges a gene annotation table into a differential expression table",
    long_about = "Validates an annotation table (15 or 35 columns) and a differential expression \
                  table (6 columns), normalizes their identifiers to a shared ID and writes the \
                  expression table with matching annotation fields appended. Every expression \
                  row is kept; rows without an annotation get empty annotation fields. \
                  Annotation columns whose name is already used by the expression table get \
                  the suffix '_annotation', so the annotation 'old_ID' is written as \
                  'old_ID_annotation'.",
    version,
    after_help = "Example usage:\n    \
                  merge-tables -a annotations.tsv -c deseq_counts.csv -o results -n merged.csv",
    color = clap::ColorChoice::Always
)]
#[derive(Debug)]
struct Args {
    /// Path to the annotation table
    /// (15 columns with 'X ID', or 35 columns with 'ORF ID')
    #[arg(short = 'a', long = "annotations", value_name = "FILE")]
    annotations: PathBuf,

    /// Path to the differential expression (counts) table with 6 columns
    #[arg(short = 'c', long = "counts", value_name = "FILE")]
    counts: PathBuf,

    /// Directory in which the merged table is written
    #[arg(short = 'o', long = "outputdir", value_name = "DIR")]
    outputdir: PathBuf,

    /// Name of the merged output file, extension included
    #[arg(short = 'n', long = "name", value_name = "NAME")]
    name: String,
}

impl From<Args> for MergeConfig {
    fn from(args: Args) -> Self {
        MergeConfig {
            annotations: args.annotations,
            counts: args.counts,
            output_dir: args.outputdir,
            output_name: args.name,
        }
    }
}

fn main() -> ExitCode {
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder()
        .with_env_filter(env)
        .with_writer(std::io::stderr)
        .init();

    let start_time = std::time::Instant::now();
    let config = MergeConfig::from(Args::parse());

    match pipeline::run(&config) {
        Ok(merged) => {
            info!(
                rows = merged.height(),
                columns = merged.width(),
                "done in {:.3} seconds",
                start_time.elapsed().as_secs_f64()
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!(stage = e.stage(), "{}", e);
            ExitCode::FAILURE
        }
    }
}
