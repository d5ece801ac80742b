use serde::Deserialize;
use serde_aux::field_attributes::deserialize_number_from_string;

// the quiz frontend keeps ids it has seen as strings, so "1" and 1 must both work
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct LooseId(#[serde(deserialize_with = "deserialize_number_from_string")] pub i64);
