use dicom_core::Tag;
use dicom_object::InMemDicomObject;

// Patient Tags
pub const PATIENT_ID: Tag = Tag(0x0010, 0x0020);
pub const PATIENT_SEX: Tag = Tag(0x0010, 0x0040);
pub const PATIENT_AGE: Tag = Tag(0x0010, 0x1010);

// Image Geometry Tags
pub const SLICE_THICKNESS: Tag = Tag(0x0018, 0x0050);
pub const PIXEL_SPACING: Tag = Tag(0x0028, 0x0030);
pub const ROWS: Tag = Tag(0x0028, 0x0010);
pub const COLUMNS: Tag = Tag(0x0028, 0x0011);
pub const PHOTOMETRIC_INTERPRETATION: Tag = Tag(0x0028, 0x0004);

// Pixel Module Tags
pub const SAMPLES_PER_PIXEL: Tag = Tag(0x0028, 0x0002);
pub const BITS_ALLOCATED: Tag = Tag(0x0028, 0x0100);
pub const BITS_STORED: Tag = Tag(0x0028, 0x0101);
pub const HIGH_BIT: Tag = Tag(0x0028, 0x0102);
pub const PIXEL_REPRESENTATION: Tag = Tag(0x0028, 0x0103);
pub const PIXEL_DATA: Tag = Tag(0x7FE0, 0x0010);

// Device/Manufacturer Tags
pub const MANUFACTURER: Tag = Tag(0x0008, 0x0070);
pub const MANUFACTURER_MODEL_NAME: Tag = Tag(0x0008, 0x1090);

// Acquisition Protocol Tags
pub const BODY_PART_EXAMINED: Tag = Tag(0x0018, 0x0015);
pub const CONTRAST_BOLUS_AGENT: Tag = Tag(0x0018, 0x0010);
pub const PATIENT_POSITION: Tag = Tag(0x0018, 0x5100);
pub const EXPOSURE_TIME: Tag = Tag(0x0018, 0x1150);
pub const X_RAY_TUBE_CURRENT: Tag = Tag(0x0018, 0x1151);

// Study Tags
pub const STUDY_DATE: Tag = Tag(0x0008, 0x0020);

/// Helper to get string value from DICOM tag
///
/// Returns `None` if the tag is not present or cannot be converted to string
pub fn get_string_value(dcm: &InMemDicomObject, tag: Tag) -> Option<String> {
    dcm.element(tag)
        .ok()
        .and_then(|elem| elem.to_str().ok())
        .map(|s| s.trim().to_string())
}

/// Helper to get integer value from DICOM tag
///
/// Returns `None` if the tag is not present or cannot be converted to i64
pub fn get_int_value(dcm: &InMemDicomObject, tag: Tag) -> Option<i64> {
    dcm.element(tag)
        .ok()
        .and_then(|elem| elem.to_int::<i64>().ok())
}

/// Helper to get the raw string value of a tag, with a fallback when absent
pub fn get_string_or(dcm: &InMemDicomObject, tag: Tag, default: &str) -> String {
    get_string_value(dcm, tag).unwrap_or_else(|| default.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use dicom_core::{DataElement, PrimitiveValue, VR};

    #[test]
    fn test_tag_values() {
        assert_eq!(PATIENT_AGE, Tag(0x0010, 0x1010));
        assert_eq!(CONTRAST_BOLUS_AGENT, Tag(0x0018, 0x0010));
        assert_eq!(X_RAY_TUBE_CURRENT, Tag(0x0018, 0x1151));
        assert_eq!(STUDY_DATE, Tag(0x0008, 0x0020));
    }

    #[test]
    fn test_string_value_is_trimmed() {
        let mut dcm = InMemDicomObject::new_empty();
        dcm.put(DataElement::new(
            MANUFACTURER,
            VR::LO,
            PrimitiveValue::from("HOLOGIC, Inc. "),
        ));

        assert_eq!(
            get_string_value(&dcm, MANUFACTURER).as_deref(),
            Some("HOLOGIC, Inc.")
        );
        assert_eq!(get_string_or(&dcm, PATIENT_SEX, "Unknown"), "Unknown");
    }

    #[test]
    fn test_int_value() {
        let mut dcm = InMemDicomObject::new_empty();
        dcm.put(DataElement::new(ROWS, VR::US, PrimitiveValue::from(3328_u16)));

        assert_eq!(get_int_value(&dcm, ROWS), Some(3328));
        assert_eq!(get_int_value(&dcm, COLUMNS), None);
    }
}
