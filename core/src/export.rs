//! Flat one-row-per-file view of extracted records
//!
//! Used by `dicomflat` to inspect what an ingest run would load, without
//! touching a database.

use crate::error::Result;
use crate::extraction::StudyRecord;
use crate::types::FieldValue;
use crate::warehouse::StarRow;
use serde::Serialize;
use std::io::Write;

/// Column order of the flat view
pub const FLAT_COLUMNS: [&str; 19] = [
    "patient_id",
    "patient_age",
    "patient_sex",
    "slice_thickness",
    "pixel_spacing_x",
    "pixel_spacing_y",
    "rows",
    "columns",
    "photometric_interpretation",
    "manufacturer",
    "model_name",
    "body_part_examined",
    "contrast_agent",
    "patient_position",
    "study_year",
    "study_month",
    "exposure_time",
    "tube_current",
    "file_path",
];

/// One record flattened across every table
///
/// `patient_id` here is the source PatientID, and `file_path` the DICOM file.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FlatRecord {
    pub patient_id: String,
    pub patient_age: Option<i64>,
    pub patient_sex: String,
    pub slice_thickness: String,
    pub pixel_spacing_x: FieldValue,
    pub pixel_spacing_y: FieldValue,
    pub rows: i64,
    pub columns: i64,
    pub photometric_interpretation: String,
    pub manufacturer: String,
    pub model_name: String,
    pub body_part_examined: String,
    pub contrast_agent: String,
    pub patient_position: String,
    pub study_year: Option<i64>,
    pub study_month: Option<i64>,
    pub exposure_time: String,
    pub tube_current: String,
    pub file_path: String,
}

impl From<&StudyRecord> for FlatRecord {
    fn from(record: &StudyRecord) -> Self {
        let image = record.image.fields();
        let spacing = |name: &str| image.get(name).cloned().unwrap_or(FieldValue::Int(0));

        Self {
            patient_id: record.patient.source_patient_id.clone(),
            patient_age: record.patient.patient_age,
            patient_sex: record.patient.patient_sex.clone(),
            slice_thickness: record.image.slice_thickness.clone(),
            pixel_spacing_x: spacing("pixel_spacing_x"),
            pixel_spacing_y: spacing("pixel_spacing_y"),
            rows: record.image.rows,
            columns: record.image.columns,
            photometric_interpretation: record.image.photometric_interpretation.clone(),
            manufacturer: record.station.manufacturer.clone(),
            model_name: record.station.model_name.clone(),
            body_part_examined: record.protocol.body_part_examined.clone(),
            contrast_agent: record.protocol.contrast_agent.clone(),
            patient_position: record.protocol.patient_position.clone(),
            study_year: record.study_date.year,
            study_month: record.study_date.month,
            exposure_time: record.exposure_time.clone(),
            tube_current: record.tube_current.clone(),
            file_path: record.file_path.display().to_string(),
        }
    }
}

/// Writes records as CSV with a header row in [`FLAT_COLUMNS`] order
pub fn write_csv<W: Write>(records: &[FlatRecord], writer: W) -> Result<()> {
    let mut csv = csv::Writer::from_writer(writer);
    for record in records {
        csv.serialize(record)?;
    }
    csv.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extraction::record::tests::create_test_dicom;
    use std::path::PathBuf;

    fn flat(path: &str) -> FlatRecord {
        let dcm = create_test_dicom("P001", "20230714");
        let record = StudyRecord::from_dicom(PathBuf::from(path), &dcm).unwrap();
        FlatRecord::from(&record)
    }

    #[test]
    fn test_flat_record_fields() {
        let row = flat("data/a.dcm");

        assert_eq!(row.patient_id, "P001");
        assert_eq!(row.patient_age, Some(45));
        assert_eq!(row.pixel_spacing_x, FieldValue::Float(0.6));
        assert_eq!(row.study_year, Some(2023));
        assert_eq!(row.study_month, Some(7));
        assert_eq!(row.contrast_agent, "iohexol");
        assert_eq!(row.file_path, "data/a.dcm");
    }

    #[test]
    fn test_write_csv() {
        let rows = vec![flat("data/a.dcm"), flat("data/b.dcm")];
        let mut out = Vec::new();

        write_csv(&rows, &mut out).unwrap();

        let text = String::from_utf8(out).unwrap();
        let mut lines = text.lines();
        assert_eq!(lines.next().unwrap(), FLAT_COLUMNS.join(","));
        let first = lines.next().unwrap();
        assert!(first.starts_with("P001,45,F,1.0,0.6,0.6,4096,3328,MONOCHROME2,"));
        assert!(first.ends_with(",2023,7,1186,100,data/a.dcm"));
        assert_eq!(lines.count(), 1);
    }

    #[test]
    fn test_write_csv_missing_values_are_empty() {
        let record = StudyRecord::from_dicom(
            PathBuf::from("empty.dcm"),
            &dicom_object::InMemDicomObject::new_empty(),
        )
        .unwrap();
        let mut out = Vec::new();

        write_csv(&[FlatRecord::from(&record)], &mut out).unwrap();

        let text = String::from_utf8(out).unwrap();
        let row = text.lines().nth(1).unwrap();
        assert_eq!(
            row,
            ",,Unknown,,0,0,0,0,Unknown,,,,No contrast agent,,,,,,empty.dcm"
        );
    }
}
