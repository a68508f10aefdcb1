use super::schema::Table;
use crate::types::{FieldValue, Fields, PixelSpacing};

/// A typed row of one of the star-schema tables
///
/// [`fields`](StarRow::fields) is what the surrogate key is derived from. On
/// insert the key column is set to the derived key, replacing any value of
/// the same name, and [`unkeyed_fields`](StarRow::unkeyed_fields) are added.
pub trait StarRow {
    /// Table this row belongs to
    const TABLE: Table;

    /// Fields the surrogate key is derived from
    fn fields(&self) -> Fields;

    /// Fields stored with the row but left out of its key
    fn unkeyed_fields(&self) -> Fields {
        Fields::new()
    }
}

/// Patient dimension
#[derive(Debug, Clone, PartialEq)]
pub struct PatientRow {
    /// PatientID as recorded in the source file
    pub source_patient_id: String,
    /// Age in the unit of the source AS value
    pub patient_age: Option<i64>,
    pub patient_sex: String,
}

impl StarRow for PatientRow {
    const TABLE: Table = Table::Patient;

    // PatientID is keyed as `patient_id`, which the derived key then replaces
    fn fields(&self) -> Fields {
        Fields::new()
            .with("patient_id", self.source_patient_id.as_str())
            .with("patient_age", self.patient_age)
            .with("patient_sex", self.patient_sex.as_str())
    }

    fn unkeyed_fields(&self) -> Fields {
        Fields::new().with("source_patient_id", self.source_patient_id.as_str())
    }
}

/// Image geometry dimension
#[derive(Debug, Clone, PartialEq)]
pub struct ImageRow {
    /// Raw SliceThickness text
    pub slice_thickness: String,
    /// Binned pixel spacing, `None` when the source has none
    pub pixel_spacing: Option<PixelSpacing>,
    pub rows: i64,
    pub columns: i64,
    pub photometric_interpretation: String,
}

impl StarRow for ImageRow {
    const TABLE: Table = Table::Image;

    fn fields(&self) -> Fields {
        // Missing spacing is keyed as integer 0, not 0.0
        let (x, y) = match self.pixel_spacing {
            Some(ps) => (FieldValue::Float(ps.row), FieldValue::Float(ps.col)),
            None => (FieldValue::Int(0), FieldValue::Int(0)),
        };

        Fields::new()
            .with("slice_thickness", self.slice_thickness.as_str())
            .with("pixel_spacing_x", x)
            .with("pixel_spacing_y", y)
            .with("rows", self.rows)
            .with("columns", self.columns)
            .with(
                "photometric_interpretation",
                self.photometric_interpretation.as_str(),
            )
    }
}

/// Acquisition station dimension
#[derive(Debug, Clone, PartialEq)]
pub struct StationRow {
    pub manufacturer: String,
    pub model_name: String,
}

impl StarRow for StationRow {
    const TABLE: Table = Table::Station;

    fn fields(&self) -> Fields {
        Fields::new()
            .with("manufacturer", self.manufacturer.as_str())
            .with("model_name", self.model_name.as_str())
    }
}

/// Acquisition protocol dimension
#[derive(Debug, Clone, PartialEq)]
pub struct ProtocolRow {
    pub body_part_examined: String,
    /// Normalized contrast agent
    pub contrast_agent: String,
    pub patient_position: String,
}

impl StarRow for ProtocolRow {
    const TABLE: Table = Table::Protocol;

    fn fields(&self) -> Fields {
        Fields::new()
            .with("body_part_examined", self.body_part_examined.as_str())
            .with("contrast_agent", self.contrast_agent.as_str())
            .with("patient_position", self.patient_position.as_str())
    }
}

/// Study date dimension, at month granularity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StudyDateRow {
    pub year: Option<i64>,
    pub month: Option<i64>,
}

impl StarRow for StudyDateRow {
    const TABLE: Table = Table::StudyDate;

    fn fields(&self) -> Fields {
        Fields::new()
            .with("year", self.year)
            .with("month", self.month)
    }
}

/// Surrogate keys of the dimension rows a study refers to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DimensionKeys {
    pub patient_id: String,
    pub image_id: String,
    pub station_id: String,
    pub protocol_id: String,
    pub study_date_id: String,
}

/// Study fact row
#[derive(Debug, Clone, PartialEq)]
pub struct StudyFact {
    /// Raw ExposureTime text
    pub exposure_time: String,
    /// Raw XRayTubeCurrent text
    pub tube_current: String,
    /// Path of the exported raster image
    pub file_path: String,
    pub keys: DimensionKeys,
}

impl StarRow for StudyFact {
    const TABLE: Table = Table::Study;

    fn fields(&self) -> Fields {
        Fields::new()
            .with("exposure_time", self.exposure_time.as_str())
            .with("tube_current", self.tube_current.as_str())
            .with("file_path", self.file_path.as_str())
            .with("patient_id", self.keys.patient_id.as_str())
            .with("image_id", self.keys.image_id.as_str())
            .with("station_id", self.keys.station_id.as_str())
            .with("protocol_id", self.keys.protocol_id.as_str())
            .with("study_date_id", self.keys.study_date_id.as_str())
    }
}
