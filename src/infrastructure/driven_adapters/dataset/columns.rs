//! Column-oriented JSON codec: `{"column": [values...]}`.

use serde_json::{Map, Number, Value};

use crate::domain::gateways::DatasetCodec;
use crate::domain::models::dataset::DatasetFormat;
use crate::domain::models::frame::{Column, ColumnData, Frame};
use crate::shared::errors::DatasetError;

fn render(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

/// Infer a column from the kinds of its JSON values
///
/// Mixed kinds fall back to text.
fn infer(name: &str, values: &[Value]) -> Result<Column, DatasetError> {
    if let Some(bad) = values.iter().find(|v| v.is_array() || v.is_object()) {
        return Err(DatasetError::Malformed(format!(
            "column '{name}' holds a nested value: {bad}"
        )));
    }
    let present = || values.iter().filter(|v| !v.is_null());

    let data = if present().all(Value::is_boolean) {
        ColumnData::Bool(values.iter().map(Value::as_bool).collect())
    } else if present().all(|v| v.is_i64()) {
        ColumnData::Int(values.iter().map(Value::as_i64).collect())
    } else if present().all(Value::is_number) {
        ColumnData::Float(values.iter().map(Value::as_f64).collect())
    } else {
        ColumnData::Text(values.iter().map(render).collect())
    };
    Ok(Column::new(name, data))
}

fn to_json(data: &ColumnData, row: usize) -> Value {
    match data {
        ColumnData::Int(v) => v[row].map_or(Value::Null, Value::from),
        ColumnData::Float(v) => v[row].and_then(Number::from_f64).map_or(Value::Null, Value::Number),
        ColumnData::Bool(v) => v[row].map_or(Value::Null, Value::Bool),
        ColumnData::Text(_) | ColumnData::DateTime(_) => data.render(row).map_or(Value::Null, Value::String),
    }
}

/// JSON object mapping each column name to its array of values
#[derive(Debug, Clone, Copy, Default)]
pub struct ColumnsCodec;

impl DatasetCodec for ColumnsCodec {
    fn format(&self) -> DatasetFormat {
        DatasetFormat::Columns
    }

    fn decode(&self, body: &[u8]) -> Result<Frame, DatasetError> {
        let document: Map<String, Value> =
            serde_json::from_slice(body).map_err(|e| DatasetError::Malformed(e.to_string()))?;
        if document.is_empty() {
            return Err(DatasetError::Empty);
        }

        let columns = document
            .iter()
            .map(|(name, values)| match values {
                Value::Array(values) => infer(name, values),
                _ => Err(DatasetError::Malformed(format!("column '{name}' is not an array"))),
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Frame::new(columns)?)
    }

    fn encode(&self, frame: &Frame) -> Result<Vec<u8>, DatasetError> {
        let document: Map<String, Value> = frame
            .columns()
            .iter()
            .map(|c| {
                let values = (0..c.len()).map(|row| to_json(c.data(), row)).collect();
                (c.name().to_string(), Value::Array(values))
            })
            .collect();
        serde_json::to_vec(&document).map_err(|e| DatasetError::Malformed(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::domain::models::frame::DType;

    #[test]
    fn test_decode_infers_from_value_kinds() {
        let body = json!({
            "k": [1, 2, 3],
            "x": [0.5, null, 2],
            "b": [true, false, null],
            "c": ["a", null, "b"],
            "mixed": ["a", 1, true]
        })
        .to_string();

        let frame = ColumnsCodec.decode(body.as_bytes()).unwrap();

        assert_eq!(frame.column_names(), vec!["k", "x", "b", "c", "mixed"]);
        let dtypes: Vec<DType> = frame.columns().iter().map(Column::dtype).collect();
        assert_eq!(
            dtypes,
            vec![DType::Int, DType::Float, DType::Bool, DType::Text, DType::Text]
        );
        assert_eq!(
            frame.column("x").unwrap().data(),
            &ColumnData::Float(vec![Some(0.5), None, Some(2.0)])
        );
        assert_eq!(
            frame.column("mixed").unwrap().data(),
            &ColumnData::Text(vec![Some("a".to_string()), Some("1".to_string()), Some("true".to_string())])
        );
    }

    #[test]
    fn test_decode_rejects_bad_shapes() {
        assert!(matches!(ColumnsCodec.decode(b"[1, 2]"), Err(DatasetError::Malformed(_))));
        assert!(matches!(ColumnsCodec.decode(b"{\"a\": 1}"), Err(DatasetError::Malformed(_))));
        assert!(matches!(ColumnsCodec.decode(b"{\"a\": [[1]]}"), Err(DatasetError::Malformed(_))));
        assert!(matches!(ColumnsCodec.decode(b"{}"), Err(DatasetError::Empty)));
        assert!(matches!(
            ColumnsCodec.decode(b"{\"a\": [1, 2], \"b\": [1]}"),
            Err(DatasetError::Domain(_))
        ));
    }

    #[test]
    fn test_encode_keeps_column_order() {
        let frame = Frame::new(vec![
            Column::text("z", vec![Some("a".to_string()), None]),
            Column::float("a", vec![Some(1.5), Some(f64::NAN)]),
            Column::int("m", vec![Some(1), None]),
        ])
        .unwrap();

        let body = ColumnsCodec.encode(&frame).unwrap();

        assert_eq!(
            String::from_utf8(body).unwrap(),
            r#"{"z":["a",null],"a":[1.5,null],"m":[1,null]}"#
        );
    }
}
