//! Wire codecs for metadata values
//!
//! `geometry` converts GeoJSON-style geometry objects, `date` converts the
//! `{dateType, value, dateInformation}` objects of metadata records.

pub mod date;
pub mod geometry;
