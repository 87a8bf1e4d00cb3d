mod corpus;

use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use nproj_deproj::{crossing_arcs, Deprojectifier};
use nproj_eval::{LabelScore, NonProjectiveEvaluator, ScoreReport};
use nproj_graph::ParseGraph;
use nproj_protocol::FlatteningLabel;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use crate::corpus::{read_corpus, write_json, Corpus};

#[derive(Parser)]
#[command(author, version, about = "Recovers and scores non-projective attachments")]
struct Cli {
    /// Label marking projectified attachments, e.g. Dep-nproj
    #[arg(long, env = "NPROJ_FLATTENING_LABEL", value_parser = parse_label)]
    flattening_label: FlatteningLabel,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Fill in the non-projective arcs of a projectified corpus
    Recover {
        #[arg(short, long, value_name = "FILE")]
        input: PathBuf,

        #[arg(short, long, value_name = "FILE")]
        output: PathBuf,

        /// Also write the outcome counts as JSON
        #[arg(long, value_name = "FILE")]
        histogram: Option<PathBuf>,
    },
    /// Score guessed parses against a gold corpus
    Evaluate {
        #[arg(long, value_name = "FILE")]
        gold: PathBuf,

        /// Guessed corpora, best first
        #[arg(long, value_name = "FILE", required = true)]
        guess: Vec<PathBuf>,

        #[arg(long, value_name = "DIR")]
        out_dir: PathBuf,

        #[arg(long, default_value = "nproj")]
        base_name: String,

        /// Stop at the first sentence that cannot be scored
        #[arg(long)]
        strict: bool,
    },
}

fn parse_label(value: &str) -> Result<FlatteningLabel, nproj_protocol::LabelError> {
    FlatteningLabel::new(value)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();
    info!("flattening label: {}", cli.flattening_label);

    match cli.command {
        Command::Recover {
            input,
            output,
            histogram,
        } => recover(cli.flattening_label, &input, &output, histogram.as_deref()).await,
        Command::Evaluate {
            gold,
            guess,
            out_dir,
            base_name,
            strict,
        } => evaluate(cli.flattening_label, &gold, &guess, &out_dir, &base_name, strict).await,
    }
}

async fn recover(
    label: FlatteningLabel,
    input: &Path,
    output: &Path,
    histogram_path: Option<&Path>,
) -> anyhow::Result<()> {
    let corpus = read_corpus(input).await?;
    info!("read {} sentences from {}", corpus.sentences.len(), input.display());

    let mut deproj = Deprojectifier::new(label);
    let mut crossing = 0;
    let mut sentences = Vec::with_capacity(corpus.sentences.len());
    for (i, record) in corpus.sentences.into_iter().enumerate() {
        let mut graph = record
            .to_graph()
            .with_context(|| format!("sentence {}", i + 1))?;
        deproj.recover(&mut graph);
        crossing += crossing_arcs(&graph).len();
        sentences.push(record.with_layer(&graph));
    }

    let histogram = deproj.finish();
    info!("{} crossing arcs in {} sentences", crossing, sentences.len());

    write_json(output, &Corpus { sentences }).await?;
    info!("corpus written to {}", output.display());

    if let Some(path) = histogram_path {
        write_json(path, histogram.as_map()).await?;
        info!("counts written to {}", path.display());
    }
    Ok(())
}

async fn evaluate(
    label: FlatteningLabel,
    gold_path: &Path,
    guess_paths: &[PathBuf],
    out_dir: &Path,
    base_name: &str,
    strict: bool,
) -> anyhow::Result<()> {
    let gold = read_corpus(gold_path).await?;
    let mut guesses = Vec::with_capacity(guess_paths.len());
    for path in guess_paths {
        let corpus = read_corpus(path).await?;
        if corpus.sentences.len() != gold.sentences.len() {
            bail!(
                "{} has {} sentences, gold has {}",
                path.display(),
                corpus.sentences.len(),
                gold.sentences.len()
            );
        }
        guesses.push(corpus);
    }

    let mut evaluator = NonProjectiveEvaluator::new(label);
    let mut rejected = 0;
    for (i, record) in gold.sentences.iter().enumerate() {
        let gold_graph = record
            .to_graph()
            .with_context(|| format!("gold sentence {}", i + 1))?;
        let guessed = guesses
            .iter()
            .map(|corpus| corpus.sentences[i].to_graph())
            .collect::<Result<Vec<ParseGraph>, _>>()
            .with_context(|| format!("guessed sentence {}", i + 1))?;

        if let Err(err) = evaluator.score(&gold_graph, &guessed) {
            if strict {
                return Err(err).with_context(|| format!("sentence {}: {}", i + 1, record.text));
            }
            error!("sentence {} not scored: {} ({})", i + 1, err, record.text);
            rejected += 1;
        }
    }

    let report = evaluator.finalize();
    if rejected > 0 {
        warn!("{} of {} sentences could not be scored", rejected, gold.sentences.len());
    }

    tokio::fs::create_dir_all(out_dir)
        .await
        .with_context(|| format!("creating {}", out_dir.display()))?;
    let path = out_dir.join(format!("{base_name}.nproj-fscores.csv"));
    write_scores(&path, &report, evaluator.table().total()).await?;
    info!("scores written to {}", path.display());
    Ok(())
}

async fn write_scores(path: &Path, report: &ScoreReport, total: u64) -> anyhow::Result<()> {
    let file = tokio::fs::File::create(path)
        .await
        .with_context(|| format!("creating {}", path.display()))?;
    let mut writer = csv_async::AsyncSerializer::from_writer(file);
    for row in &report.rows {
        writer.serialize(row).await?;
    }
    writer
        .serialize(LabelScore {
            label: "TOTAL".to_string(),
            precision: report.total_f_score,
            recall: report.total_f_score,
            f_score: report.total_f_score,
            support: total,
        })
        .await?;
    writer.flush().await?;
    Ok(())
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info"))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_level(true)
        .init();
}
