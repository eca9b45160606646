//! Helpers shared by the handlers' view builders.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde_json::{Map, Value};

/// Reviewer view: the full definition with the answer schema attached.
pub fn with_answer_schema(definition: &Value, answer_schema: &Value) -> Value {
    let mut view = match definition {
        Value::Object(map) => map.clone(),
        _ => Map::new(),
    };
    view.insert("answer_schema".into(), answer_schema.clone());
    Value::Object(view)
}

/// Shuffle presentation order with a seed derived from the definition, so a
/// given question always renders the same way.
pub fn seeded_shuffle<T>(items: &mut [T], definition: &Value) {
    let mut hasher = DefaultHasher::new();
    definition.to_string().hash(&mut hasher);
    let mut rng = StdRng::seed_from_u64(hasher.finish());
    items.shuffle(&mut rng);
}

/// String field of `map`, or `default` when absent or not a string.
pub fn str_or<'a>(map: &'a Value, key: &str, default: &'a str) -> &'a str {
    map.get(key).and_then(Value::as_str).unwrap_or(default)
}

/// Boolean-like field of `map`, or `default` when absent.
pub fn flag_or(map: &Value, key: &str, default: bool) -> bool {
    map.get(key)
        .filter(|v| !v.is_null())
        .map(crate::values::is_truthy)
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn reviewer_view_keeps_everything() {
        let def = json!({"question_text": "Q", "correct_order": [1, 2]});
        let view = with_answer_schema(&def, &json!({"partial_credit": false}));
        assert_eq!(view["correct_order"], json!([1, 2]));
        assert_eq!(view["answer_schema"]["partial_credit"], false);
    }

    #[test]
    fn shuffle_is_stable_for_a_definition() {
        let def = json!({"items": ["a", "b", "c", "d", "e", "f"]});
        let mut first: Vec<u32> = (0..20).collect();
        let mut second = first.clone();
        seeded_shuffle(&mut first, &def);
        seeded_shuffle(&mut second, &def);
        assert_eq!(first, second);

        let mut sorted = first.clone();
        sorted.sort_unstable();
        assert_eq!(sorted, (0..20).collect::<Vec<_>>());
    }

    #[test]
    fn field_fallbacks() {
        let def = json!({"a": "x", "b": 3, "flag": "1"});
        assert_eq!(str_or(&def, "a", "d"), "x");
        assert_eq!(str_or(&def, "b", "d"), "d");
        assert!(flag_or(&def, "flag", false));
        assert!(flag_or(&def, "missing", true));
    }
}
