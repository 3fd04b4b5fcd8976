use serde::{Deserialize, Deserializer, Serialize, de};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Book {
    pub title: String,
    #[serde(deserialize_with = "finite_price")]
    pub price: f32,
    pub year: i64,
    pub author: String,
    pub id: String,
}

impl Book {
    /// The record every fresh store starts with.
    pub fn seed() -> Self {
        Book {
            title: "The Remains of the Day".to_string(),
            price: 100.0,
            year: 1989,
            author: "Kazuo Ishiguro".to_string(),
            id: "1".to_string(),
        }
    }
}

// serde_json narrows an out of range f64 to an infinite f32, which would then
// serialize as `null`.
fn finite_price<'de, D>(deserializer: D) -> Result<f32, D::Error>
where
    D: Deserializer<'de>,
{
    let price = f64::deserialize(deserializer)?;
    let narrowed = price as f32;
    if !narrowed.is_finite() {
        return Err(de::Error::custom(format!("price {} out of range", price)));
    }
    Ok(narrowed)
}
