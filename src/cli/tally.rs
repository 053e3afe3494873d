use super::config::{parse_bucket, OutputFormat, ResultsConfig};
use super::logging;
use dao_results::results::{render_text, ResultsOptions, ResultsView};
use dao_results::serialization::{to_cbor, to_json};
use dao_results::source::{load_results, resolve_proposal_id, JsonFileSource, VoteSource};
use std::io::Write;
use std::path::Path;

/// Compute and print results for one proposal
///
/// ## Input
///
/// `--proposal` is a JSON export holding one proposal object or an array of
/// them; `--votes` is a JSON array of vote rows. When the proposal file
/// holds several proposals, `--proposal-id` selects one.
///
/// ## Settings
///
/// Bucket width and output format come from the flags if given, otherwise
/// from the config file (`--config`, or the default path if it exists),
/// otherwise from built-in defaults.
pub async fn execute(
    proposals_path: String,
    votes_path: String,
    proposal_id: Option<String>,
    format: Option<OutputFormat>,
    bucket: Option<String>,
    config_path: Option<String>,
    output: Option<String>,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = ResultsConfig::load_or_default(config_path.as_deref().map(Path::new))?;
    logging::init(&config.logging)?;

    let bucket = match bucket {
        Some(value) => parse_bucket(&value)?,
        None => config.results.bucket_duration()?,
    };
    let format = format.unwrap_or(config.results.format);

    let source = JsonFileSource::new(proposals_path, votes_path);
    let bytes = run(&source, proposal_id.as_deref(), &ResultsOptions { bucket }, format).await?;

    match output {
        Some(path) => {
            tokio::fs::write(&path, &bytes).await?;
            tracing::info!(path = %path, bytes = bytes.len(), "results written");
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(&bytes)?;
            stdout.flush()?;
        }
    }

    Ok(())
}

/// Load, aggregate and encode results from any vote source.
pub async fn run<S: VoteSource + ?Sized>(
    source: &S,
    proposal_id: Option<&str>,
    options: &ResultsOptions,
    format: OutputFormat,
) -> Result<Vec<u8>, Box<dyn std::error::Error>> {
    let proposal_id = resolve_proposal_id(source, proposal_id).await?;
    let (_, view) = load_results(source, &proposal_id, options).await?;
    encode(&view, format)
}

fn encode(view: &ResultsView, format: OutputFormat) -> Result<Vec<u8>, Box<dyn std::error::Error>> {
    Ok(match format {
        OutputFormat::Text => render_text(view).into_bytes(),
        OutputFormat::Json => to_json(view)?,
        OutputFormat::Cbor => to_cbor(view)?,
    })
}
