use anyhow::Context;
use clap::Parser;
use img_batch::cli::Args;
use img_batch::constants::PROGRESS_SPINNER_TEMPLATE;
use img_batch::logger;
use img_batch::pipeline::{BatchOutcome, ConversionPipeline};
use img_batch::report;
use indicatif::{ProgressBar, ProgressStyle};

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    logger::init(args.quiet, args.verbose);

    let input = args.command.input().clone();
    let options = args.command.to_options()?;

    if !args.quiet {
        println!("🚀 Converting images in {:?}", input);
        if options.target_format.uses_quality() {
            println!("🎨 Output format: {} (quality {})", options.target_format, options.quality);
        } else {
            println!("🎨 Output format: {} (lossless)", options.target_format);
        }
    }

    let pipeline = ConversionPipeline::new(options);
    let progress = if args.quiet {
        ProgressBar::hidden()
    } else {
        ProgressBar::new_spinner()
    };
    progress.set_style(
        ProgressStyle::default_spinner()
            .template(PROGRESS_SPINNER_TEMPLATE)
            .context("invalid progress template")?,
    );

    let outcome = pipeline
        .run_with_observer(&input, |result| {
            if !args.quiet || !result.is_success() {
                progress.suspend(|| println!("{}", report::file_line(result)));
            }
            progress.inc(1);
        })
        .with_context(|| format!("batch conversion of {:?} failed", input))?;
    progress.finish_and_clear();

    match outcome {
        BatchOutcome::NoImagesFound => {
            println!("⚠️  No image files found in {:?}", input);
        }
        BatchOutcome::Completed(report) => {
            if !args.quiet {
                println!();
                for line in report::report_lines(&report) {
                    println!("{}", line);
                }
            }
        }
    }

    Ok(())
}
