//! 字段值及其纯文本表示（轮询接口）。

use std::fmt;

/// 设备字段值。
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Int(i64),
    Float(f64),
    Bool(bool),
    Text(String),
}

impl FieldValue {
    pub fn from_json(value: &serde_json::Value) -> Option<Self> {
        match value {
            serde_json::Value::Bool(v) => Some(FieldValue::Bool(*v)),
            serde_json::Value::Number(number) => {
                if let Some(v) = number.as_i64() {
                    Some(FieldValue::Int(v))
                } else {
                    number.as_f64().map(FieldValue::Float)
                }
            }
            serde_json::Value::String(v) => Some(FieldValue::Text(v.clone())),
            _ => None,
        }
    }
}

// 与既有网关集成保持一致：布尔为 `True`/`False`，浮点数总带小数部分。
impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Int(v) => write!(f, "{v}"),
            FieldValue::Float(v) if v.is_finite() && v.fract() == 0.0 => write!(f, "{v:.1}"),
            FieldValue::Float(v) => write!(f, "{v}"),
            FieldValue::Bool(true) => f.write_str("True"),
            FieldValue::Bool(false) => f.write_str("False"),
            FieldValue::Text(v) => f.write_str(v),
        }
    }
}
