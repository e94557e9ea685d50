use schemars::{JsonSchema, schema_for};
use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};

/// The object the model is asked to embed in its reply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct AnecdoteReply {
    /// Zero-based position in the submitted candidate list.
    #[serde(rename = "selectedIndex")]
    #[schemars(with = "i64")]
    pub selected_index: Number,
    pub event: String,
    pub year: i32,
    #[serde(default)]
    pub category: Option<String>,
}

impl AnecdoteReply {
    /// Maps the returned index onto a list of `len` candidates.
    ///
    /// Out-of-range, negative and whole-float indexes wrap instead of
    /// failing. Fractional indexes have no position.
    pub fn candidate_position(&self, len: usize) -> Option<usize> {
        if len == 0 {
            return None;
        }

        let index = &self.selected_index;
        let position = if let Some(value) = index.as_u64() {
            value % u64::try_from(len).ok()?
        } else if let Some(value) = index.as_i64() {
            value.rem_euclid(i64::try_from(len).ok()?).unsigned_abs()
        } else {
            let value = index.as_f64().filter(|value| value.fract() == 0.0)?;
            // `len` stays well inside f64's exact integer range.
            value.rem_euclid(len as f64) as u64
        };

        usize::try_from(position).ok()
    }
}

pub fn reply_schema() -> Result<Value, serde_json::Error> {
    serde_json::to_value(schema_for!(AnecdoteReply))
}

#[cfg(test)]
mod tests {
    use serde_json::{Number, json};

    use super::{AnecdoteReply, reply_schema};

    fn reply(selected_index: i64) -> AnecdoteReply {
        reply_with(Number::from(selected_index))
    }

    fn reply_with(selected_index: Number) -> AnecdoteReply {
        AnecdoteReply {
            selected_index,
            event: "Ay'a ilk insan ayak bastı".to_string(),
            year: 1969,
            category: None,
        }
    }

    #[test]
    fn candidate_position_wraps_out_of_range_indexes() {
        assert_eq!(reply(0).candidate_position(10), Some(0));
        assert_eq!(reply(9).candidate_position(10), Some(9));
        assert_eq!(reply(12).candidate_position(10), Some(2));
        assert_eq!(reply(-1).candidate_position(10), Some(9));
        assert_eq!(reply(3).candidate_position(0), None);
    }

    #[test]
    fn candidate_position_wraps_indexes_beyond_i64_and_whole_floats() {
        assert_eq!(
            reply_with(Number::from(u64::MAX)).candidate_position(10),
            Some(5)
        );

        let whole = |value: f64| Number::from_f64(value).expect("finite number");
        assert_eq!(reply_with(whole(3.0)).candidate_position(10), Some(3));
        assert_eq!(reply_with(whole(23.0)).candidate_position(10), Some(3));
        assert_eq!(reply_with(whole(-1.0)).candidate_position(10), Some(9));
        assert_eq!(reply_with(whole(1e20)).candidate_position(10), Some(0));
        assert_eq!(reply_with(whole(2.5)).candidate_position(10), None);
    }

    #[test]
    fn reply_decodes_unbounded_and_float_indexes() {
        let wide: AnecdoteReply = serde_json::from_value(json!({
            "selectedIndex": 18_446_744_073_709_551_615_u64,
            "event": "X",
            "year": 1969
        }))
        .expect("u64 index should decode");
        assert_eq!(wide.candidate_position(10), Some(5));

        let float: AnecdoteReply = serde_json::from_value(json!({
            "selectedIndex": 3.0,
            "event": "X",
            "year": 1969
        }))
        .expect("float index should decode");
        assert_eq!(float.candidate_position(10), Some(3));
    }

    #[test]
    fn reply_schema_requires_index_event_and_year() {
        let schema = reply_schema().expect("schema should serialize");
        let required = schema["required"]
            .as_array()
            .expect("required list")
            .iter()
            .filter_map(|value| value.as_str())
            .collect::<Vec<_>>();

        assert!(required.contains(&"selectedIndex"));
        assert!(required.contains(&"event"));
        assert!(required.contains(&"year"));
        assert!(!required.contains(&"category"));
    }
}
