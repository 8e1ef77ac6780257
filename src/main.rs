use clap::Parser;
use squeezr::cli::Args;
use squeezr::constants::FINISH_MESSAGE;
use squeezr::orchestrator::{minify, RunSummary};
use squeezr::utils::create_progress_bar;
use squeezr::{logger, SqueezeError};
use std::process::ExitCode;

fn main() -> ExitCode {
    let args = Args::parse();

    if let Err(e) = logger::init(args.verbosity()) {
        eprintln!("Warning: failed to initialize logging: {}", e);
    }

    match run(&args) {
        Ok(summary) if summary.is_clean() => ExitCode::SUCCESS,
        Ok(_) => ExitCode::from(2),
        Err(e) => {
            match e.downcast_ref::<SqueezeError>() {
                Some(squeeze) => eprintln!("{}", squeeze.diagnostic()),
                None => eprintln!("squeezr:: {:#}", e),
            }
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> anyhow::Result<RunSummary> {
    let config = args.to_config()?;
    let progress = create_progress_bar(0);
    if args.quiet {
        progress.set_draw_target(indicatif::ProgressDrawTarget::hidden());
    }

    let summary = minify(&config, &progress)?;
    print_summary(&summary);
    Ok(summary)
}

fn print_summary(summary: &RunSummary) {
    println!("squeezr:: {}", summary.report);

    if !summary.is_clean() {
        println!("squeezr:: {} file(s) failed:", summary.failures().len());
        for failure in summary.failures() {
            println!("  {}: {}", failure.source.display(), failure.error);
        }
    }

    println!("{}", FINISH_MESSAGE);
}
