pub mod normalize;
pub mod record;
pub mod tags;

pub use normalize::{
    extract_year_month, format_age, normalize_contrast_agent, round_to_nearest_bin,
    NO_CONTRAST_AGENT, PIXEL_SPACING_BINS,
};
pub use record::StudyRecord;
pub use tags::*;
