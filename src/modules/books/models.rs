use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// A stored book. ISBN is the natural key and never changes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Book {
    #[serde(rename = "ISBN")]
    pub isbn: String,
    pub title: String,
    #[serde(rename = "Author")]
    pub author: String,
    pub description: String,
    pub genre: String,
    #[serde(serialize_with = "rust_decimal::serde::float::serialize")]
    pub price: Decimal,
    pub quantity: i32,
}

/// Unvalidated create/update request body.
///
/// Keys are matched case-insensitively, so `ISBN` and `isbn` (or `Author`
/// and `author`) are both accepted. Text fields take JSON strings only;
/// `price` and `quantity` also take numbers. Values are kept as text and
/// parsed by the validator, which reports format problems per field.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BookPayload {
    pub isbn: Option<String>,
    pub title: Option<String>,
    pub author: Option<String>,
    pub description: Option<String>,
    pub genre: Option<String>,
    pub price: Option<String>,
    pub quantity: Option<String>,
    /// Wire names of fields whose JSON type is wrong for the field.
    pub malformed: Vec<&'static str>,
}

impl BookPayload {
    pub fn from_object(object: &Map<String, Value>) -> Self {
        let mut malformed = Vec::new();
        let mut field = |name: &'static str, accepts_number: bool| {
            match lookup(object, name) {
                None | Some(Value::Null) => None,
                Some(Value::String(s)) => Some(s.clone()),
                Some(Value::Number(n)) if accepts_number => Some(n.to_string()),
                Some(_) => {
                    malformed.push(name);
                    None
                }
            }
        };

        let isbn = field("ISBN", false);
        let title = field("title", false);
        let author = field("Author", false);
        let description = field("description", false);
        let genre = field("genre", false);
        let price = field("price", true);
        let quantity = field("quantity", true);

        Self {
            isbn,
            title,
            author,
            description,
            genre,
            price,
            quantity,
            malformed,
        }
    }

    pub fn is_malformed(&self, field: &str) -> bool {
        self.malformed.iter().any(|f| *f == field)
    }
}

impl<'de> Deserialize<'de> for BookPayload {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let object = Map::<String, Value>::deserialize(deserializer)?;
        Ok(Self::from_object(&object))
    }
}

/// Exact spelling wins over a case-insensitive match.
fn lookup<'a>(object: &'a Map<String, Value>, name: &str) -> Option<&'a Value> {
    object.get(name).or_else(|| {
        object
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value)
    })
}
