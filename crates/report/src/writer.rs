//! Multi-page PDF report.
//!
//! Each chart becomes one 10×7 in page. The chart SVG is converted to a PDF
//! form XObject and stretched over the whole page.

use crate::chart::ChartHandle;
use crate::error::{ReportError, Result};
use pdf_writer::{Content, Finish, Name, Pdf, Rect, Ref};
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use svg2pdf::usvg;
use tracing::{debug, info};

/// Page width in points (10 in)
pub const PAGE_WIDTH: f32 = 720.0;
/// Page height in points (7 in)
pub const PAGE_HEIGHT: f32 = 504.0;

const CHART_NAME: Name<'static> = Name(b"Chart");

/// Writes rendered charts as successive pages of one PDF document.
#[derive(Debug, Default, Clone, Copy)]
pub struct ReportWriter;

impl ReportWriter {
    pub fn new() -> Self {
        Self
    }

    /// Build the PDF bytes. Pages keep the order of `charts`.
    pub fn render_document(&self, charts: &[ChartHandle]) -> Result<Vec<u8>> {
        if charts.is_empty() {
            return Err(ReportError::NoCharts);
        }

        // Chart text is laid out with the fonts installed on this machine
        let mut options = usvg::Options::default();
        options.fontdb_mut().load_system_fonts();

        let mut alloc = Ref::new(1);
        let catalog_id = alloc.bump();
        let page_tree_id = alloc.bump();
        let page_ids: Vec<Ref> = charts.iter().map(|_| alloc.bump()).collect();

        let mut pdf = Pdf::new();
        pdf.catalog(catalog_id).pages(page_tree_id);
        pdf.pages(page_tree_id)
            .kids(page_ids.iter().copied())
            .count(page_ids.len() as i32);

        for (chart, &page_id) in charts.iter().zip(&page_ids) {
            let tree = usvg::Tree::from_str(&chart.svg, &options).map_err(|e| {
                ReportError::Convert {
                    title: chart.title.clone(),
                    reason: e.to_string(),
                }
            })?;
            let (chunk, chart_ref) = svg2pdf::to_chunk(&tree, svg2pdf::ConversionOptions::default())
                .map_err(|e| ReportError::Convert {
                    title: chart.title.clone(),
                    reason: format!("{:?}", e),
                })?;

            // Move the chart's objects past everything allocated so far
            let mut renumbered = HashMap::new();
            let chunk = chunk.renumber(|old| *renumbered.entry(old).or_insert_with(|| alloc.bump()));
            let chart_id = renumbered.get(&chart_ref).copied().ok_or_else(|| ReportError::Convert {
                title: chart.title.clone(),
                reason: "converted chart has no form object".to_string(),
            })?;

            let content_id = alloc.bump();
            let mut page = pdf.page(page_id);
            page.media_box(Rect::new(0.0, 0.0, PAGE_WIDTH, PAGE_HEIGHT));
            page.parent(page_tree_id);
            page.contents(content_id);
            page.resources().x_objects().pair(CHART_NAME, chart_id);
            page.finish();

            // The form XObject spans the unit square
            let mut content = Content::new();
            content
                .save_state()
                .transform([PAGE_WIDTH, 0.0, 0.0, PAGE_HEIGHT, 0.0, 0.0])
                .x_object(CHART_NAME)
                .restore_state();
            pdf.stream(content_id, &content.finish());
            pdf.extend(&chunk);

            debug!("Added page for '{}'", chart.title);
        }

        Ok(pdf.finish())
    }

    /// Write the document to `path`, replacing any existing file.
    pub fn write(&self, charts: &[ChartHandle], path: &Path) -> Result<()> {
        let doc = self.render_document(charts)?;
        fs::write(path, doc).map_err(|source| ReportError::Write {
            path: path.display().to_string(),
            source,
        })?;

        info!("Wrote {} pages to {}", charts.len(), path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn chart(title: &str, fill: &str) -> ChartHandle {
        ChartHandle::new(
            title,
            format!(
                "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"1000\" height=\"700\" viewBox=\"0 0 1000 700\">\
                 <rect x=\"10\" y=\"10\" width=\"300\" height=\"200\" fill=\"{}\"/></svg>",
                fill
            ),
        )
    }

    fn page_count(doc: &[u8]) -> usize {
        let text = String::from_utf8_lossy(doc);
        text.matches("/Type /Page").count() - text.matches("/Type /Pages").count()
    }

    #[test]
    fn test_one_page_per_chart() {
        let charts = vec![chart("Fig 1: first", "red"), chart("Fig 2: second", "blue")];
        let doc = ReportWriter::default().render_document(&charts).unwrap();

        assert!(doc.starts_with(b"%PDF-"));
        assert_eq!(page_count(&doc), 2);
        assert!(String::from_utf8_lossy(&doc).contains("/Count 2"));
    }

    #[test]
    fn test_empty_chart_list_is_an_error() {
        let err = ReportWriter::default().render_document(&[]).unwrap_err();
        assert!(matches!(err, ReportError::NoCharts));
    }

    #[test]
    fn test_invalid_svg_names_chart() {
        let broken = ChartHandle::new("Fig 3: broken", "<svg".to_string());
        let err = ReportWriter::default().render_document(&[broken]).unwrap_err();
        match err {
            ReportError::Convert { title, .. } => assert_eq!(title, "Fig 3: broken"),
            other => panic!("expected a conversion error, got {:?}", other),
        }
    }

    #[test]
    fn test_write_to_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("report.pdf");

        ReportWriter::default().write(&[chart("Fig 1: only", "green")], &path).unwrap();

        let written = std::fs::read(&path).unwrap();
        assert!(written.starts_with(b"%PDF-"));
        assert_eq!(page_count(&written), 1);
    }

    #[test]
    fn test_write_failure_names_path() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing").join("report.pdf");

        let err = ReportWriter::default()
            .write(&[chart("Fig 1: only", "green")], &path)
            .unwrap_err();
        match err {
            ReportError::Write { path: p, .. } => assert!(p.ends_with("report.pdf")),
            other => panic!("expected a write error, got {:?}", other),
        }
    }
}
