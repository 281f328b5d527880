//! Table module: reading, holding and writing the input records
//!
//! This module handles:
//! - Choosing and applying the input encoding
//! - Parsing and serializing delimited records
//! - Holding rows in their original order and layout while they are enriched

mod codec;
mod encoding;
mod store;

pub use codec::{escape_field, format_record, output_path_for, parse_records, write_records, BOM};
pub use encoding::{decode_bytes, EncodingDetector, SniffingDetector};
pub use store::{ColumnMap, HeaderPolicy, Row, RowJob, RowStore};
