use crate::config::{IngestConfig, StoreTarget};
use crate::pipeline::IngestSummary;
use std::fmt;

/// Text report of an ingest run
pub struct TextReport<'a> {
    config: &'a IngestConfig,
    summary: &'a IngestSummary,
    skipped: usize,
}

impl<'a> TextReport<'a> {
    /// Creates a new text report
    ///
    /// `skipped` counts files that could not be read as DICOM.
    pub fn new(config: &'a IngestConfig, summary: &'a IngestSummary, skipped: usize) -> Self {
        Self {
            config,
            summary,
            skipped,
        }
    }
}

impl<'a> fmt::Display for TextReport<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Ingest Summary")?;
        writeln!(f, "==============")?;
        writeln!(f)?;
        writeln!(f, "Source:         {}", self.config.data_path.display())?;
        match &self.config.store {
            StoreTarget::Sqlite(path) => writeln!(f, "Database:       {}", path.display())?,
            StoreTarget::Memory => writeln!(f, "Database:       memory (dry run)")?,
        }
        writeln!(
            f,
            "Images:         {} ({})",
            self.config.output_dir.display(),
            self.config.raster_size
        )?;
        writeln!(f)?;
        writeln!(f, "Records:        {}", self.summary.records)?;
        writeln!(f, "Studies:        {}", self.summary.facts)?;
        writeln!(f, "Unreadable:     {}", self.skipped)?;
        writeln!(f, "Not converted:  {}", self.summary.raster_failures)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_report_format() {
        let config = IngestConfig::default();
        let summary = IngestSummary {
            records: 3,
            facts: 2,
            raster_failures: 1,
        };

        let output = format!("{}", TextReport::new(&config, &summary, 4));

        assert!(output.contains("Ingest Summary"));
        assert!(output.contains("Source:         data/"));
        assert!(output.contains("Database:       dicomstar.sqlite3"));
        assert!(output.contains("Images:         converted_images (256x256)"));
        assert!(output.contains("Records:        3"));
        assert!(output.contains("Studies:        2"));
        assert!(output.contains("Unreadable:     4"));
        assert!(output.contains("Not converted:  1"));
    }

    #[test]
    fn test_text_report_dry_run() {
        let config = IngestConfig {
            store: StoreTarget::Memory,
            ..IngestConfig::default()
        };
        let output = format!("{}", TextReport::new(&config, &IngestSummary::default(), 0));
        assert!(output.contains("memory (dry run)"));
    }
}
