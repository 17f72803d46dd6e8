//! Utility modules: IRI shapes and date-time literals.

pub mod datetime;
pub mod iri;

pub use datetime::{
    format_datetime, parse_datetime, parse_datetime_stamp, DateTime, DateTimeParseError,
};
pub use iri::{is_blank_node, is_iri, BLANK_NODE_PREFIX};
