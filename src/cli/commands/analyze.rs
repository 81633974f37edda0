//! One-shot diagram analysis from the command line.

use std::path::Path;
use std::sync::Arc;

use console::style;

use crate::analysis::{AnalysisMethod, AnalysisRecord, AnalysisRequest, Pipeline};
use crate::config::Settings;
use crate::interpret::SectionCategory;
use crate::llm::OllamaClient;
use crate::ocr::TesseractBackend;

/// Analyze one diagram and print the review.
pub async fn cmd_analyze(
    settings: &Settings,
    image: &Path,
    method: AnalysisMethod,
    json: bool,
) -> anyhow::Result<()> {
    let bytes = tokio::fs::read(image)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to read {}: {}", image.display(), e))?;

    let client = OllamaClient::new(settings.llm.clone())?;
    let ocr = TesseractBackend::with_config(settings.ocr.clone());
    let pipeline = Pipeline::new(Arc::new(client), Arc::new(ocr), settings.llm.ocr_num_ctx)
        .with_ocr_timeout(settings.ocr.timeout());

    if !json {
        eprintln!(
            "{} Analyzing {} ({})",
            style("→").cyan(),
            image.display(),
            method.label()
        );
    }

    let record = pipeline
        .run_analysis(&AnalysisRequest::new(bytes.into(), method))
        .await;

    if json {
        println!("{}", serde_json::to_string_pretty(&record)?);
    } else {
        print_record(&record);
    }

    if record.result.failed {
        anyhow::bail!("Analysis failed");
    }
    Ok(())
}

fn print_record(record: &AnalysisRecord) {
    let result = &record.result;

    if result.failed {
        eprintln!("{} {}", style("✗").red(), result.summary_text);
        return;
    }
    eprintln!(
        "{} Analysis complete ({})",
        style("✓").green(),
        record.elapsed_display()
    );

    match result.band() {
        Some(band) => {
            let label = format!("{} ({})", band.label(), record.mode.label());
            let score = format!("{}/100", result.score.unwrap_or_default());
            println!("\n{} {}  {}", style("Score:").bold(), style(score).bold(), label);
            if !result.reasoning.is_empty() {
                println!("{}", style(&result.reasoning).dim());
            }
        }
        None => println!("\n{}", style("No score found in the response").yellow()),
    }

    if result.is_empty() {
        println!("\n{}", style("No analysis text returned.").yellow());
    } else if result.structured {
        for section in &result.sections {
            let title = match section.category {
                SectionCategory::Issue => style(&section.title).red().bold(),
                SectionCategory::Suggestion => style(&section.title).green().bold(),
                SectionCategory::Structural => style(&section.title).magenta().bold(),
                SectionCategory::Generic => style(&section.title).cyan().bold(),
            };
            println!("\n{} {}", section.category.icon(), title);
            println!("{}", section.body);
        }
    } else {
        println!(
            "\n{}",
            style("Section headers were missing; showing the raw response.").yellow()
        );
        println!("{}", result.summary_text);
    }

    if let Some(text) = record.raw_ocr_text.as_deref().filter(|t| !t.is_empty()) {
        println!("\n{}", style("Extracted text").bold());
        println!("{}", style(text).dim());
    }
}
