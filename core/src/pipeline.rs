//! Per-record ingestion into the star schema
//!
//! For each record the five dimensions are upserted first, then the image is
//! converted and, if that succeeds, the fact row is upserted with the raster
//! path and the dimension keys. Everything runs sequentially on the caller's
//! thread.

use crate::error::Result;
use crate::extraction::StudyRecord;
use crate::raster::RasterConverter;
use crate::warehouse::{upsert, DimensionKeys, KeyedStore, StudyFact};
use log::{info, warn};
use std::path::PathBuf;

/// What happened to a single record
#[derive(Debug, Clone, PartialEq)]
pub struct RecordOutcome {
    pub keys: DimensionKeys,
    /// Raster written for the record; `None` if conversion failed
    pub raster_path: Option<PathBuf>,
    /// Key of the fact row; `None` if conversion failed
    pub study_id: Option<String>,
}

/// Counters for a whole run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IngestSummary {
    /// Records handed to the pipeline
    pub records: usize,
    /// Records whose fact row was upserted
    pub facts: usize,
    /// Records whose raster conversion failed
    pub raster_failures: usize,
}

/// Drives records into a keyed store
pub struct Ingestor<'a, S: KeyedStore + ?Sized, R: RasterConverter + ?Sized> {
    store: &'a mut S,
    raster: &'a R,
}

impl<'a, S: KeyedStore + ?Sized, R: RasterConverter + ?Sized> Ingestor<'a, S, R> {
    pub fn new(store: &'a mut S, raster: &'a R) -> Self {
        Self { store, raster }
    }

    /// Upserts the dimensions of `record`, then its fact row
    ///
    /// # Errors
    ///
    /// Store errors abort immediately; rows already written stay. A failed
    /// raster conversion is not an error: the fact row is skipped.
    pub fn ingest_record(&mut self, record: &StudyRecord) -> Result<RecordOutcome> {
        let keys = DimensionKeys {
            patient_id: upsert(&mut *self.store, &record.patient)?,
            image_id: upsert(&mut *self.store, &record.image)?,
            station_id: upsert(&mut *self.store, &record.station)?,
            protocol_id: upsert(&mut *self.store, &record.protocol)?,
            study_date_id: upsert(&mut *self.store, &record.study_date)?,
        };

        let raster_path = match self.raster.convert(&record.file_path) {
            Ok(path) => path,
            Err(e) => {
                warn!(
                    "Failed to convert {} to a raster image: {}",
                    record.file_path.display(),
                    e
                );
                return Ok(RecordOutcome {
                    keys,
                    raster_path: None,
                    study_id: None,
                });
            }
        };

        let fact = StudyFact {
            exposure_time: record.exposure_time.clone(),
            tube_current: record.tube_current.clone(),
            file_path: raster_path.display().to_string(),
            keys: keys.clone(),
        };
        let study_id = upsert(&mut *self.store, &fact)?;
        info!("Stored {} as study {}", record.file_name(), study_id);

        Ok(RecordOutcome {
            keys,
            raster_path: Some(raster_path),
            study_id: Some(study_id),
        })
    }

    /// Ingests every record in order, stopping at the first store error
    pub fn ingest_all(&mut self, records: &[StudyRecord]) -> Result<IngestSummary> {
        let mut summary = IngestSummary::default();

        for record in records {
            let outcome = self.ingest_record(record)?;
            summary.records += 1;
            if outcome.study_id.is_some() {
                summary.facts += 1;
            } else {
                summary.raster_failures += 1;
            }
        }

        Ok(summary)
    }
}

/// Reads every path into a record, logging and skipping unreadable files
pub fn extract_records(paths: &[PathBuf]) -> Vec<StudyRecord> {
    let mut records = Vec::with_capacity(paths.len());
    for path in paths {
        match StudyRecord::from_file(path.clone()) {
            Ok(record) => {
                info!("Processed: {}", path.display());
                records.push(record);
            }
            Err(e) => {
                warn!("Skipping {}: {}", path.display(), e);
            }
        }
    }
    records
}
