use anyhow::Context;
use kravinka::{HttpDataset, KravinkaConfig, KravinkaError, logging, run};
use std::process::ExitCode;
use tracing::error;

fn main() -> ExitCode {
    let config = match KravinkaConfig::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{e:#}");
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = logging::init(&config.logging) {
        eprintln!("{e:#}");
        return ExitCode::FAILURE;
    }

    match export(&config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e:#}");
            // Logging may be filtered out; stderr always gets the diagnostic
            eprintln!("{}", fatal_message(&e));
            ExitCode::FAILURE
        }
    }
}

fn export(config: &KravinkaConfig) -> anyhow::Result<()> {
    let source = HttpDataset::new(&config.dataset)?;
    let summary = run(config, &source)
        .with_context(|| format!("Export from {} failed", source.url()))?;

    println!(
        "Wrote {} waypoints to {}",
        summary.written,
        summary.output_path.display()
    );
    Ok(())
}

/// Full error chain, followed by a hint when the root cause is one of ours
fn fatal_message(err: &anyhow::Error) -> String {
    match err.downcast_ref::<KravinkaError>() {
        Some(cause) => format!("{err:#}\n{}", cause.user_message()),
        None => format!("{err:#}"),
    }
}
