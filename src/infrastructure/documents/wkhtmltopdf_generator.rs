use async_trait::async_trait;
use std::process::Stdio;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

use super::html_renderer::InvoiceHtmlRenderer;
use crate::domain::invoice::{InvoiceDetails, InvoiceError, PdfGenerator};

/// Converts rendered invoice HTML to PDF by piping it through `wkhtmltopdf`
pub struct WkHtmlToPdfGenerator {
  renderer: InvoiceHtmlRenderer,
  wkhtmltopdf_path: String,
  page_size: String,
}

impl WkHtmlToPdfGenerator {
  pub fn new(
    renderer: InvoiceHtmlRenderer,
    wkhtmltopdf_path: Option<String>,
    page_size: String,
  ) -> Self {
    let wkhtmltopdf_path = wkhtmltopdf_path.unwrap_or_else(|| "wkhtmltopdf".to_string());

    Self {
      renderer,
      wkhtmltopdf_path,
      page_size,
    }
  }

  async fn convert(&self, html: String) -> Result<Vec<u8>, InvoiceError> {
    let mut child = Command::new(&self.wkhtmltopdf_path)
      .args([
        "--quiet",
        "--encoding",
        "utf-8",
        "--page-size",
        &self.page_size,
        "--margin-top",
        "10mm",
        "--margin-bottom",
        "10mm",
        "--margin-left",
        "10mm",
        "--margin-right",
        "10mm",
        "-",
        "-",
      ])
      .stdin(Stdio::piped())
      .stdout(Stdio::piped())
      .stderr(Stdio::piped())
      .kill_on_drop(true)
      .spawn()
      .map_err(|e| {
        InvoiceError::PdfGenerationFailed(format!(
          "wkhtmltopdf not found at '{}': {}",
          self.wkhtmltopdf_path, e
        ))
      })?;

    let mut stdin = child.stdin.take().ok_or_else(|| {
      InvoiceError::PdfGenerationFailed("wkhtmltopdf stdin unavailable".to_string())
    })?;

    // Feed stdin concurrently with reading stdout so large documents cannot
    // deadlock on a full pipe
    let writer = tokio::spawn(async move {
      stdin.write_all(html.as_bytes()).await?;
      stdin.shutdown().await
    });

    let output = child.wait_with_output().await.map_err(|e| {
      InvoiceError::PdfGenerationFailed(format!("wkhtmltopdf execution failed: {}", e))
    })?;

    writer
      .await
      .map_err(|e| InvoiceError::PdfGenerationFailed(e.to_string()))?
      .map_err(|e| {
        InvoiceError::PdfGenerationFailed(format!("writing to wkhtmltopdf failed: {}", e))
      })?;

    if !output.status.success() {
      let stderr = String::from_utf8_lossy(&output.stderr);
      return Err(InvoiceError::PdfGenerationFailed(format!(
        "wkhtmltopdf failed: {}",
        stderr.trim()
      )));
    }

    if output.stdout.is_empty() {
      return Err(InvoiceError::PdfGenerationFailed(
        "wkhtmltopdf produced no output".to_string(),
      ));
    }

    Ok(output.stdout)
  }
}

#[async_trait]
impl PdfGenerator for WkHtmlToPdfGenerator {
  async fn generate(&self, invoices: &[InvoiceDetails]) -> Result<Vec<u8>, InvoiceError> {
    let html = self.renderer.render(invoices)?;
    tracing::debug!(
      invoices = invoices.len(),
      bytes = html.len(),
      "Converting invoice HTML to PDF"
    );

    let pdf = self.convert(html).await?;
    tracing::info!(invoices = invoices.len(), bytes = pdf.len(), "Generated invoice PDF");

    Ok(pdf)
  }
}
