use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::fmt;

/// What an hour was spent on.
///
/// The four named tags are the only ones the page offers. Anything else read
/// back from storage is kept verbatim in `Unknown` so it survives a
/// load/persist cycle.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Category {
    Deep,
    Social,
    Rest,
    Errands,
    Unknown(String),
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::Deep,
        Category::Social,
        Category::Rest,
        Category::Errands,
    ];

    /// Parses one of the four selectable tags. Used for user input, where an
    /// unrecognised tag is rejected rather than stored.
    pub fn parse_known(tag: &str) -> Option<Self> {
        Self::exact(tag.trim())
    }

    fn exact(tag: &str) -> Option<Self> {
        match tag {
            "deep" => Some(Self::Deep),
            "social" => Some(Self::Social),
            "rest" => Some(Self::Rest),
            "errands" => Some(Self::Errands),
            _ => None,
        }
    }

    pub fn tag(&self) -> &str {
        match self {
            Self::Deep => "deep",
            Self::Social => "social",
            Self::Rest => "rest",
            Self::Errands => "errands",
            Self::Unknown(tag) => tag,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Deep => "Deep work",
            Self::Social => "Social",
            Self::Rest => "Rest",
            Self::Errands => "Errands",
            Self::Unknown(_) => "Unknown",
        }
    }
}

impl From<String> for Category {
    fn from(tag: String) -> Self {
        match Self::exact(&tag) {
            Some(known) => known,
            None => Self::Unknown(tag),
        }
    }
}

impl From<Category> for String {
    fn from(category: Category) -> Self {
        match category {
            Category::Unknown(tag) => tag,
            known => known.tag().to_string(),
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// One recorded slice selection.
///
/// Reading never rejects a field: a value of the wrong JSON type reads as an
/// empty string, or as an untagged `Unknown` category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    #[serde(default, deserialize_with = "lenient_string")]
    pub date: String,
    #[serde(rename = "ts", default, deserialize_with = "lenient_string")]
    pub timestamp: String,
    #[serde(
        rename = "type",
        default = "untagged",
        deserialize_with = "lenient_category"
    )]
    pub category: Category,
}

impl Entry {
    fn placeholder() -> Self {
        Self {
            date: String::new(),
            timestamp: String::new(),
            category: untagged(),
        }
    }
}

/// The session's entries, oldest first. Only ever appended to.
///
/// An odd element is kept as a placeholder entry instead of failing the
/// whole document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Store {
    #[serde(default, deserialize_with = "lenient_entries")]
    pub entries: Vec<Entry>,
}

fn untagged() -> Category {
    Category::Unknown(String::new())
}

fn lenient_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::String(value) => value,
        _ => String::new(),
    })
}

fn lenient_category<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Category, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::String(tag) => Category::from(tag),
        _ => untagged(),
    })
}

fn lenient_entries<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<Entry>, D::Error> {
    let Value::Array(items) = Value::deserialize(deserializer)? else {
        return Ok(Vec::new());
    };
    Ok(items
        .into_iter()
        .map(|item| Entry::deserialize(item).unwrap_or_else(|_| Entry::placeholder()))
        .collect())
}

#[derive(Debug, Deserialize)]
pub struct SliceRequest {
    #[serde(rename = "type")]
    pub category: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SliceView {
    pub tiles: Vec<Option<Category>>,
    pub status: String,
    pub count_label: String,
    pub today_count: usize,
    pub hint: String,
    pub environment: String,
}
