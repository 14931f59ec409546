use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Named substitution data for a template.
///
/// Keys are unique within one map. Several maps may be handed to a single
/// display call; see [`crate::merge_maps`] for how they combine.
pub type SubstitutionMap = BTreeMap<String, Value>;

/// A substitution value.
///
/// Values are stringified exactly once, when a template is rendered, through
/// their [`Display`](fmt::Display) implementation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Bool(bool),
    Number(serde_json::Number),
    String(String),
    Map(SubstitutionMap),
}

impl Value {
    /// Returns the string payload, if this is a string value.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the nested map, if this is a map value.
    pub fn as_map(&self) -> Option<&SubstitutionMap> {
        match self {
            Value::Map(m) => Some(m),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Bool(b) => write!(f, "{}", b),
            Value::Number(n) => write!(f, "{}", n),
            Value::String(s) => f.write_str(s),
            Value::Map(map) => {
                f.write_str("map[")?;
                for (i, (key, value)) in map.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" ")?;
                    }
                    write!(f, "{}:{}", key, value)?;
                }
                f.write_str("]")
            }
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<&String> for Value {
    fn from(s: &String) -> Self {
        Value::String(s.clone())
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

macro_rules! impl_from_integer {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Value {
                fn from(n: $ty) -> Self {
                    Value::Number(serde_json::Number::from(n))
                }
            }
        )*
    };
}

impl_from_integer!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);

impl From<f64> for Value {
    /// Non-finite floats have no JSON number form and are kept as their text.
    fn from(n: f64) -> Self {
        match serde_json::Number::from_f64(n) {
            Some(num) => Value::Number(num),
            None => Value::String(n.to_string()),
        }
    }
}

impl From<SubstitutionMap> for Value {
    fn from(map: SubstitutionMap) -> Self {
        Value::Map(map)
    }
}

/// Builds a [`SubstitutionMap`] from `key => value` pairs.
///
/// ```rust
/// use termtext::subs;
///
/// let map = subs! { "AppName" => "dora", "Instances" => 3 };
/// assert_eq!(map["AppName"].to_string(), "dora");
/// assert_eq!(map["Instances"].to_string(), "3");
/// ```
#[macro_export]
macro_rules! subs {
    () => {
        $crate::SubstitutionMap::new()
    };
    ($($key:expr => $value:expr),+ $(,)?) => {{
        let mut map = $crate::SubstitutionMap::new();
        $(
            map.insert(::std::string::String::from($key), $crate::Value::from($value));
        )+
        map
    }};
}
