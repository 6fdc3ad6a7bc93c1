use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use data_guardian::services::{PipelineSession, RunState, TracingNotifier};
use data_guardian::views::{terminal, ReportSection, ReportView};
use data_guardian::{config, logging};

#[derive(Debug, Parser)]
#[command(name = "data-guardian", about = "Submit a dataset for data-governance analysis")]
struct Args {
    /// CSV or XLSX file to analyze
    file: PathBuf,

    /// Rows to sample (100-10000)
    #[arg(short, long, default_value = "1000")]
    sample_size: String,

    /// Directory to write the full JSON report into
    #[arg(short, long)]
    export: Option<PathBuf>,

    /// Sections to print (overview, quality, bias, privacy, recommendations)
    #[arg(long = "section", value_parser = parse_section)]
    sections: Vec<ReportSection>,
}

fn parse_section(s: &str) -> Result<ReportSection, String> {
    s.parse()
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let args = Args::parse();

    // Initialize logging
    logging::init_logging()?;

    // Load configuration
    let config = config::Config::new()?;

    let mut session = PipelineSession::from_config(&config, Arc::new(TracingNotifier))?;
    session.set_sample_size_from_text(&args.sample_size);
    if session.select_path(&args.file).await.is_err() {
        return Ok(ExitCode::FAILURE);
    }

    let mut updates = session.subscribe();
    let printer = tokio::spawn(async move {
        while updates.changed().await.is_ok() {
            let state = updates.borrow_and_update().clone();
            match state {
                RunState::Running(snapshot) => eprintln!("{}", terminal::progress_line(&snapshot)),
                RunState::Succeeded(_) | RunState::Failed(_) => break,
                RunState::Idle => {}
            }
        }
    });

    let outcome = session.run().await;
    printer.abort();

    let result = match outcome {
        Ok(result) => result,
        Err(_) => return Ok(ExitCode::FAILURE),
    };

    let view = ReportView::from_result(&result);
    let sections = if args.sections.is_empty() {
        ReportSection::ALL.to_vec()
    } else {
        args.sections
    };

    println!("Analysis Results");
    println!("{}", terminal::header(session.candidate(), &view));
    println!();
    println!("{}", terminal::render_all(&view, &sections)?);

    if let Some(dir) = args.export {
        let exported = session.export_report(&dir).await?;
        println!("Report saved to {}", exported.path.display());
    }

    Ok(ExitCode::SUCCESS)
}
