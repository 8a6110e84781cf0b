use serde::{Deserialize, Deserializer};

/// A number handed out by the backend for the operator to call.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct NumberAssignment {
    /// The backend stores numbers as integers but everything downstream
    /// treats them as display text, so both JSON forms normalize to a string.
    #[serde(deserialize_with = "string_or_number")]
    pub phone_number: String,
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Digits(i64),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Text(s) => s,
        Raw::Digits(n) => n.to_string(),
    })
}
