//! Collaborator availability check.

use console::style;

use crate::config::Settings;
use crate::llm::OllamaClient;
use crate::ocr::{OcrBackend, TesseractBackend};

/// Report whether the model endpoint and OCR engine can be used.
pub async fn cmd_check(settings: &Settings) -> anyhow::Result<()> {
    println!("\n{}", style("Collaborator Status").bold());
    println!("{}", "-".repeat(50));

    let client = OllamaClient::new(settings.llm.clone())?;
    let model_ok = client.is_available().await;
    let model_status = if model_ok {
        style("✓ reachable").green()
    } else {
        style("✗ unreachable").red()
    };
    println!(
        "  {:<15} {} ({}, model {})",
        "Model",
        model_status,
        settings.llm.endpoint,
        settings.llm.model
    );
    if !model_ok {
        println!(
            "                  {}",
            style("Start Ollama and pull the model, e.g. `ollama pull llava`").dim()
        );
    }

    let tesseract = TesseractBackend::with_config(settings.ocr.clone());
    let ocr_ok = tesseract.is_available();
    let ocr_status = if ocr_ok {
        style("✓ available").green()
    } else {
        style("✗ not available").red()
    };
    println!("  {:<15} {}", "Tesseract", ocr_status);
    if !ocr_ok {
        println!(
            "                  {}",
            style(tesseract.availability_hint()).dim()
        );
    }

    println!();
    if model_ok && ocr_ok {
        println!("{} All analysis methods are available", style("✓").green());
    } else if model_ok {
        println!(
            "{} Vision methods are available; OCR + LLM needs Tesseract",
            style("!").yellow()
        );
    } else {
        println!(
            "{} No analysis method can run until the model endpoint is reachable",
            style("✗").red()
        );
    }

    Ok(())
}
