pub mod date;
pub mod geometry;
pub mod vocabulary;

pub use date::{DateMeta, DatePrecision, DateText, DateType, DateValue, ParsedDate, RANGE_SEPARATOR};
pub use geometry::{Coordinate, Geometry, GeometryType, ValidityMode};
pub use vocabulary::{ResearchArea, ResearchCategory, ResearchDiscipline};
