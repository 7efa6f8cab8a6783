//! Dataset Codecs
//!
//! Wire encodings for tables exchanged over the API.

mod columns;
mod csv;

pub use self::columns::ColumnsCodec;
pub use self::csv::CsvCodec;
