//! Random JSON documents.

use super::string::{generate_semantic, sentence, SemanticHint};
use load_core::GeneratedValue;
use rand::Rng;
use serde_json::{Map, Value};

/// Generate a one-field object: a word key mapped to a sentence.
pub fn generate_json<R: Rng + ?Sized>(rng: &mut R) -> GeneratedValue {
    let key = match generate_semantic(rng, SemanticHint::Word, 16) {
        GeneratedValue::String(s) if !s.is_empty() => s,
        _ => "key".to_string(),
    };

    let mut object = Map::new();
    object.insert(key, Value::String(sentence(rng)));
    GeneratedValue::Json(Value::Object(object))
}
