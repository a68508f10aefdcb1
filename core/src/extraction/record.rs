use crate::error::Result;
use crate::extraction::normalize::{extract_year_month, format_age, normalize_contrast_agent};
use crate::extraction::tags::{
    get_int_value, get_string_or, get_string_value, BODY_PART_EXAMINED, COLUMNS,
    CONTRAST_BOLUS_AGENT, EXPOSURE_TIME, MANUFACTURER, MANUFACTURER_MODEL_NAME, PATIENT_AGE,
    PATIENT_ID, PATIENT_POSITION, PATIENT_SEX, PHOTOMETRIC_INTERPRETATION, PIXEL_SPACING, ROWS,
    SLICE_THICKNESS, STUDY_DATE, X_RAY_TUBE_CURRENT,
};
use crate::types::PixelSpacing;
use crate::warehouse::{ImageRow, PatientRow, ProtocolRow, StationRow, StudyDateRow};
use dicom_object::{open_file, InMemDicomObject};
use std::path::PathBuf;

/// Default for attributes whose absence is recorded explicitly
pub const UNKNOWN: &str = "Unknown";

/// Everything extracted from one DICOM file, split by star-schema table
///
/// # Defaults
///
/// Missing attributes map to `""`, except `patient_sex` and
/// `photometric_interpretation` (`"Unknown"`) and `rows`/`columns` (`0`).
#[derive(Debug, Clone, PartialEq)]
pub struct StudyRecord {
    /// Path to the DICOM file
    pub file_path: PathBuf,
    pub patient: PatientRow,
    pub image: ImageRow,
    pub station: StationRow,
    pub protocol: ProtocolRow,
    pub study_date: StudyDateRow,
    /// Raw ExposureTime text
    pub exposure_time: String,
    /// Raw XRayTubeCurrent text
    pub tube_current: String,
}

impl StudyRecord {
    /// Creates a record from a DICOM file path
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read as DICOM or carries a
    /// malformed PixelSpacing
    pub fn from_file(path: PathBuf) -> Result<Self> {
        let dcm = open_file(&path)?;
        Self::from_dicom(path, &dcm)
    }

    /// Creates a record from an already-opened DICOM object
    pub fn from_dicom(path: PathBuf, dcm: &InMemDicomObject) -> Result<Self> {
        let pixel_spacing = match get_string_value(dcm, PIXEL_SPACING) {
            Some(raw) if !raw.is_empty() => Some(PixelSpacing::parse(&raw)?.quantized()),
            _ => None,
        };

        let (year, month) = extract_year_month(&get_string_or(dcm, STUDY_DATE, ""));

        Ok(Self {
            file_path: path,
            patient: PatientRow {
                source_patient_id: get_string_or(dcm, PATIENT_ID, ""),
                patient_age: format_age(&get_string_or(dcm, PATIENT_AGE, "")),
                patient_sex: get_string_or(dcm, PATIENT_SEX, UNKNOWN),
            },
            image: ImageRow {
                slice_thickness: get_string_or(dcm, SLICE_THICKNESS, ""),
                pixel_spacing,
                rows: get_int_value(dcm, ROWS).unwrap_or(0),
                columns: get_int_value(dcm, COLUMNS).unwrap_or(0),
                photometric_interpretation: get_string_or(dcm, PHOTOMETRIC_INTERPRETATION, UNKNOWN),
            },
            station: StationRow {
                manufacturer: get_string_or(dcm, MANUFACTURER, ""),
                model_name: get_string_or(dcm, MANUFACTURER_MODEL_NAME, ""),
            },
            protocol: ProtocolRow {
                body_part_examined: get_string_or(dcm, BODY_PART_EXAMINED, ""),
                contrast_agent: normalize_contrast_agent(&get_string_or(
                    dcm,
                    CONTRAST_BOLUS_AGENT,
                    "",
                )),
                patient_position: get_string_or(dcm, PATIENT_POSITION, ""),
            },
            study_date: StudyDateRow { year, month },
            exposure_time: get_string_or(dcm, EXPOSURE_TIME, ""),
            tube_current: get_string_or(dcm, X_RAY_TUBE_CURRENT, ""),
        })
    }

    /// File name of the source, for log lines
    pub fn file_name(&self) -> String {
        self.file_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.file_path.display().to_string())
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use dicom_core::{DataElement, PrimitiveValue, Tag, VR};

    /// Builds a DICOM object carrying the attributes a study record reads
    pub(crate) fn create_test_dicom(patient_id: &str, study_date: &str) -> InMemDicomObject {
        let mut obj = InMemDicomObject::new_empty();
        let mut put = |tag: Tag, vr: VR, value: &str| {
            obj.put(DataElement::new(tag, vr, PrimitiveValue::from(value)));
        };

        put(PATIENT_ID, VR::LO, patient_id);
        put(PATIENT_AGE, VR::AS, "045Y");
        put(PATIENT_SEX, VR::CS, "F");
        put(SLICE_THICKNESS, VR::DS, "1.0");
        put(PIXEL_SPACING, VR::DS, "0.063\\0.072");
        put(PHOTOMETRIC_INTERPRETATION, VR::CS, "MONOCHROME2");
        put(MANUFACTURER, VR::LO, "HOLOGIC, Inc.");
        put(MANUFACTURER_MODEL_NAME, VR::LO, "Selenia Dimensions");
        put(BODY_PART_EXAMINED, VR::CS, "BREAST");
        put(CONTRAST_BOLUS_AGENT, VR::LO, "  IOHEXOL ");
        put(PATIENT_POSITION, VR::CS, "FFS");
        put(STUDY_DATE, VR::DA, study_date);
        put(EXPOSURE_TIME, VR::IS, "1186");
        put(X_RAY_TUBE_CURRENT, VR::IS, "100");

        obj.put(DataElement::new(ROWS, VR::US, PrimitiveValue::from(4096_u16)));
        obj.put(DataElement::new(COLUMNS, VR::US, PrimitiveValue::from(3328_u16)));
        obj
    }

    #[test]
    fn test_from_dicom_normalizes_fields() {
        let dcm = create_test_dicom("P001", "20230714");
        let record = StudyRecord::from_dicom(PathBuf::from("data/a.dcm"), &dcm).unwrap();

        assert_eq!(record.patient.source_patient_id, "P001");
        assert_eq!(record.patient.patient_age, Some(45));
        assert_eq!(record.patient.patient_sex, "F");
        assert_eq!(record.image.slice_thickness, "1.0");
        assert_eq!(record.image.pixel_spacing, Some(PixelSpacing::new(0.6, 0.6)));
        assert_eq!(record.image.rows, 4096);
        assert_eq!(record.image.columns, 3328);
        assert_eq!(record.station.model_name, "Selenia Dimensions");
        assert_eq!(record.protocol.contrast_agent, "iohexol");
        assert_eq!(record.study_date.year, Some(2023));
        assert_eq!(record.study_date.month, Some(7));
        assert_eq!(record.exposure_time, "1186");
        assert_eq!(record.tube_current, "100");
        assert_eq!(record.file_name(), "a.dcm");
    }

    #[test]
    fn test_pixel_spacing_binned() {
        let mut dcm = create_test_dicom("P001", "20230714");
        dcm.put(DataElement::new(
            PIXEL_SPACING,
            VR::DS,
            PrimitiveValue::from("0.63\\0.72"),
        ));

        let record = StudyRecord::from_dicom(PathBuf::from("a.dcm"), &dcm).unwrap();
        assert_eq!(record.image.pixel_spacing, Some(PixelSpacing::new(0.65, 0.7)));
    }

    #[test]
    fn test_defaults_for_missing_attributes() {
        let dcm = InMemDicomObject::new_empty();
        let record = StudyRecord::from_dicom(PathBuf::from("empty.dcm"), &dcm).unwrap();

        assert_eq!(record.patient.source_patient_id, "");
        assert_eq!(record.patient.patient_age, None);
        assert_eq!(record.patient.patient_sex, UNKNOWN);
        assert_eq!(record.image.slice_thickness, "");
        assert_eq!(record.image.pixel_spacing, None);
        assert_eq!(record.image.rows, 0);
        assert_eq!(record.image.columns, 0);
        assert_eq!(record.image.photometric_interpretation, UNKNOWN);
        assert_eq!(record.station.manufacturer, "");
        assert_eq!(record.protocol.contrast_agent, "No contrast agent");
        assert_eq!(record.study_date, StudyDateRow { year: None, month: None });
        assert_eq!(record.exposure_time, "");
    }

    #[test]
    fn test_padded_single_char_contrast_means_none() {
        let mut dcm = create_test_dicom("P001", "20230714");
        dcm.put(DataElement::new(
            CONTRAST_BOLUS_AGENT,
            VR::LO,
            PrimitiveValue::from("  X "),
        ));

        let record = StudyRecord::from_dicom(PathBuf::from("a.dcm"), &dcm).unwrap();
        assert_eq!(record.protocol.contrast_agent, "No contrast agent");
    }

    #[test]
    fn test_malformed_pixel_spacing_is_an_error() {
        let mut dcm = InMemDicomObject::new_empty();
        dcm.put(DataElement::new(
            PIXEL_SPACING,
            VR::DS,
            PrimitiveValue::from("abc"),
        ));

        assert!(StudyRecord::from_dicom(PathBuf::from("bad.dcm"), &dcm).is_err());
    }

    #[test]
    fn test_from_file_missing() {
        assert!(StudyRecord::from_file(PathBuf::from("/nonexistent/file.dcm")).is_err());
    }
}
