//! CSV codec with per-column dtype inference.

use csv::{ReaderBuilder, WriterBuilder};

use crate::domain::gateways::DatasetCodec;
use crate::domain::models::dataset::DatasetFormat;
use crate::domain::models::frame::{Column, ColumnData, Frame};
use crate::domain::preprocessing::dtypes::parse_bool;
use crate::shared::errors::DatasetError;

/// Cells read as missing values
const MISSING_TOKENS: [&str; 7] = ["", "NA", "N/A", "NaN", "nan", "null", "NULL"];

fn is_missing(cell: &str) -> bool {
    MISSING_TOKENS.contains(&cell.trim())
}

fn parse_all<T>(cells: &[Option<String>], parse: impl Fn(&str) -> Option<T>) -> Option<Vec<Option<T>>> {
    cells
        .iter()
        .map(|cell| match cell {
            None => Some(None),
            Some(raw) => parse(raw.trim()).map(Some),
        })
        .collect()
}

/// Int when every value is an integer, float when every value is a number,
/// bool when every value is true/false, text otherwise
fn infer(name: &str, cells: Vec<Option<String>>) -> Column {
    let data = if let Some(ints) = parse_all(&cells, |s| s.parse::<i64>().ok()) {
        ColumnData::Int(ints)
    } else if let Some(floats) = parse_all(&cells, |s| s.parse::<f64>().ok()) {
        ColumnData::Float(floats)
    } else if let Some(bools) = parse_all(&cells, parse_bool) {
        ColumnData::Bool(bools)
    } else {
        ColumnData::Text(cells)
    };
    Column::new(name, data)
}

/// Comma-separated values with a header row
#[derive(Debug, Clone, Copy, Default)]
pub struct CsvCodec;

impl DatasetCodec for CsvCodec {
    fn format(&self) -> DatasetFormat {
        DatasetFormat::Csv
    }

    fn decode(&self, body: &[u8]) -> Result<Frame, DatasetError> {
        let mut reader = ReaderBuilder::new().has_headers(true).from_reader(body);

        let headers: Vec<String> = reader
            .headers()
            .map_err(|e| DatasetError::Malformed(e.to_string()))?
            .iter()
            .map(|h| h.trim().to_string())
            .collect();
        if headers.is_empty() || headers.iter().all(String::is_empty) {
            return Err(DatasetError::Empty);
        }

        let mut cells: Vec<Vec<Option<String>>> = vec![Vec::new(); headers.len()];
        for (line, record) in reader.records().enumerate() {
            let record = record.map_err(|e| DatasetError::Malformed(format!("line {}: {e}", line + 2)))?;
            for (column, cell) in cells.iter_mut().zip(record.iter()) {
                column.push((!is_missing(cell)).then(|| cell.to_string()));
            }
        }

        let columns = headers
            .iter()
            .zip(cells)
            .map(|(name, cells)| infer(name, cells))
            .collect();
        Ok(Frame::new(columns)?)
    }

    fn encode(&self, frame: &Frame) -> Result<Vec<u8>, DatasetError> {
        let mut writer = WriterBuilder::new().from_writer(Vec::new());
        let malformed = |e: csv::Error| DatasetError::Malformed(e.to_string());

        writer.write_record(frame.columns().iter().map(Column::name)).map_err(malformed)?;
        for row in 0..frame.n_rows() {
            let record: Vec<String> = frame
                .columns()
                .iter()
                .map(|c| c.render(row).unwrap_or_default())
                .collect();
            writer.write_record(&record).map_err(malformed)?;
        }

        writer
            .into_inner()
            .map_err(|e| DatasetError::Malformed(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::frame::DType;

    #[test]
    fn test_decode_infers_dtypes() {
        let body = b"id,n,f,b,c,d\n1,1,0.5,true,a,2017-06-14\n2,NA,1,False,b,\n3,3,,TRUE,NaN,2017-06-15\n";

        let frame = CsvCodec.decode(body).unwrap();

        assert_eq!(frame.n_rows(), 3);
        let dtypes: Vec<DType> = frame.columns().iter().map(Column::dtype).collect();
        assert_eq!(
            dtypes,
            vec![DType::Int, DType::Int, DType::Float, DType::Bool, DType::Text, DType::Text]
        );
        assert_eq!(frame.column("n").unwrap().data(), &ColumnData::Int(vec![Some(1), None, Some(3)]));
        assert_eq!(frame.column("c").unwrap().null_count(), 1);
        assert_eq!(frame.column("d").unwrap().null_count(), 1);
    }

    #[test]
    fn test_decode_rejects_ragged_rows() {
        let result = CsvCodec.decode(b"a,b\n1,2\n3\n");
        assert!(matches!(result, Err(DatasetError::Malformed(_))));
    }

    #[test]
    fn test_decode_rejects_duplicate_headers() {
        let result = CsvCodec.decode(b"a,a\n1,2\n");
        assert!(matches!(result, Err(DatasetError::Domain(_))));
    }

    #[test]
    fn test_decode_empty_body() {
        assert!(matches!(CsvCodec.decode(b""), Err(DatasetError::Empty)));
    }

    #[test]
    fn test_encode_writes_missing_as_empty() {
        let frame = Frame::new(vec![
            Column::int("k", vec![Some(1), Some(2)]),
            Column::float("x", vec![Some(0.5), None]),
            Column::text("c", vec![Some("a,b".to_string()), None]),
        ])
        .unwrap();

        let body = CsvCodec.encode(&frame).unwrap();

        assert_eq!(String::from_utf8(body).unwrap(), "k,x,c\n1,0.5,\"a,b\"\n2,,\n");
    }
}
