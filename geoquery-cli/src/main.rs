use geoquery::{run, RunConfig, SpatialError};
use std::process::ExitCode;

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .format_timestamp(None)
        .init();

    match execute() {
        Ok(()) => ExitCode::SUCCESS,
        Err(SpatialError::SourceUnavailable { path, source }) => {
            eprintln!("Cannot open dataset {}: {}", path.display(), source);
            ExitCode::FAILURE
        }
        Err(e) => {
            eprintln!("geoquery: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn execute() -> Result<(), SpatialError> {
    let config = RunConfig::from_args(std::env::args_os())?;
    let report = run(&config)?;
    log::info!(
        "Wrote {} ids to {:?} ({}; tree height {})",
        report.matched,
        config.output_path(),
        report.indexing,
        report.tree.tree_height
    );
    Ok(())
}
