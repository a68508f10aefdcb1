use std::fmt;

/// Tables of the star schema
///
/// Five deduplicated dimensions and one fact table. The set is closed: there
/// is no way to register additional tables at runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Table {
    Patient,
    Image,
    Station,
    Protocol,
    StudyDate,
    Study,
}

impl Table {
    /// Every table, dimensions first
    pub const ALL: [Table; 6] = [
        Table::Patient,
        Table::Image,
        Table::Station,
        Table::Protocol,
        Table::StudyDate,
        Table::Study,
    ];

    /// Name of the table in the backing store
    pub fn name(&self) -> &'static str {
        match self {
            Table::Patient => "dim_patient",
            Table::Image => "dim_image",
            Table::Station => "dim_station",
            Table::Protocol => "dim_protocol",
            Table::StudyDate => "dim_study_date",
            Table::Study => "fact_study",
        }
    }

    /// Name of the surrogate key column
    pub fn key_column(&self) -> &'static str {
        match self {
            Table::Patient => "patient_id",
            Table::Image => "image_id",
            Table::Station => "station_id",
            Table::Protocol => "protocol_id",
            Table::StudyDate => "study_date_id",
            Table::Study => "study_id",
        }
    }

    /// Domain columns, in declaration order (key column excluded)
    pub fn domain_columns(&self) -> &'static [&'static str] {
        match self {
            Table::Patient => &["source_patient_id", "patient_age", "patient_sex"],
            Table::Image => &[
                "slice_thickness",
                "pixel_spacing_x",
                "pixel_spacing_y",
                "rows",
                "columns",
                "photometric_interpretation",
            ],
            Table::Station => &["manufacturer", "model_name"],
            Table::Protocol => &["body_part_examined", "contrast_agent", "patient_position"],
            Table::StudyDate => &["year", "month"],
            Table::Study => &[
                "exposure_time",
                "tube_current",
                "file_path",
                "patient_id",
                "image_id",
                "station_id",
                "protocol_id",
                "study_date_id",
            ],
        }
    }

    /// Returns whether `column` is the key column or a domain column
    pub fn has_column(&self, column: &str) -> bool {
        column == self.key_column() || self.domain_columns().contains(&column)
    }

    /// Whether this is a dimension table
    pub fn is_dimension(&self) -> bool {
        !matches!(self, Table::Study)
    }

    /// Parses a store table name
    pub fn from_name(name: &str) -> Option<Self> {
        Table::ALL.into_iter().find(|t| t.name() == name)
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// SQLite DDL for the star schema
///
/// Pixel spacing columns use NUMERIC affinity because an absent spacing is
/// stored as the integer 0 while binned spacings are reals.
pub(crate) const SQLITE_DDL: &str = r#"
CREATE TABLE IF NOT EXISTS dim_patient (
  patient_id TEXT PRIMARY KEY NOT NULL,
  source_patient_id TEXT,
  patient_age INTEGER,
  patient_sex TEXT
);

CREATE TABLE IF NOT EXISTS dim_image (
  image_id TEXT PRIMARY KEY NOT NULL,
  slice_thickness TEXT,
  pixel_spacing_x NUMERIC,
  pixel_spacing_y NUMERIC,
  "rows" INTEGER,
  "columns" INTEGER,
  photometric_interpretation TEXT
);

CREATE TABLE IF NOT EXISTS dim_station (
  station_id TEXT PRIMARY KEY NOT NULL,
  manufacturer TEXT,
  model_name TEXT
);

CREATE TABLE IF NOT EXISTS dim_protocol (
  protocol_id TEXT PRIMARY KEY NOT NULL,
  body_part_examined TEXT,
  contrast_agent TEXT,
  patient_position TEXT
);

CREATE TABLE IF NOT EXISTS dim_study_date (
  study_date_id TEXT PRIMARY KEY NOT NULL,
  year INTEGER,
  month INTEGER
);

CREATE TABLE IF NOT EXISTS fact_study (
  study_id TEXT PRIMARY KEY NOT NULL,
  exposure_time TEXT,
  tube_current TEXT,
  file_path TEXT,
  patient_id TEXT REFERENCES dim_patient(patient_id),
  image_id TEXT REFERENCES dim_image(image_id),
  station_id TEXT REFERENCES dim_station(station_id),
  protocol_id TEXT REFERENCES dim_protocol(protocol_id),
  study_date_id TEXT REFERENCES dim_study_date(study_date_id)
);
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_round_trip() {
        for table in Table::ALL {
            assert_eq!(Table::from_name(table.name()), Some(table));
        }
        assert_eq!(Table::from_name("dim_unknown"), None);
    }

    #[test]
    fn test_key_column_is_not_a_domain_column() {
        for table in Table::ALL {
            assert!(!table.domain_columns().contains(&table.key_column()));
            assert!(table.has_column(table.key_column()));
        }
    }

    #[test]
    fn test_fact_references_every_dimension() {
        let fact_columns = Table::Study.domain_columns();
        for table in Table::ALL.iter().filter(|t| t.is_dimension()) {
            assert!(fact_columns.contains(&table.key_column()), "{}", table);
        }
    }

    #[test]
    fn test_ddl_declares_every_column() {
        for table in Table::ALL {
            assert!(SQLITE_DDL.contains(&format!("CREATE TABLE IF NOT EXISTS {} (", table.name())));
            for column in table.domain_columns() {
                assert!(SQLITE_DDL.contains(column), "{}.{}", table, column);
            }
        }
    }
}
