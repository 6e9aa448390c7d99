use indexmap::IndexMap;
use std::collections::BTreeMap;

/// Immutable tree value describing one version of an observed object
///
/// Equality is structural: records compare their kind and fields, sequences
/// compare position by position, mappings compare as key sets regardless of
/// how they were built.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum EntityValue {
    /// Absence of a value
    #[default]
    Null,
    Bool(bool),
    Number(serde_json::Number),
    String(String),
    /// Tag of an enumerated domain value (e.g. an execution state)
    Enum(String),
    Record(Record),
    Sequence(Vec<EntityValue>),
    Mapping(Mapping),
}

impl EntityValue {
    /// Build an enum tag value
    pub fn enum_tag(tag: impl Into<String>) -> Self {
        EntityValue::Enum(tag.into())
    }

    /// Build a sequence from anything convertible into entity values
    pub fn sequence<I, V>(items: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<EntityValue>,
    {
        EntityValue::Sequence(items.into_iter().map(Into::into).collect())
    }

    /// Check for absence
    pub fn is_null(&self) -> bool {
        matches!(self, EntityValue::Null)
    }

    /// Whether this value is a leaf (scalar or null)
    pub fn is_scalar(&self) -> bool {
        !matches!(
            self,
            EntityValue::Record(_) | EntityValue::Sequence(_) | EntityValue::Mapping(_)
        )
    }

    /// Short name of the value's shape, used in error messages and logs
    pub fn shape(&self) -> &'static str {
        match self {
            EntityValue::Null => "null",
            EntityValue::Bool(_) => "bool",
            EntityValue::Number(_) => "number",
            EntityValue::String(_) => "string",
            EntityValue::Enum(_) => "enum",
            EntityValue::Record(_) => "record",
            EntityValue::Sequence(_) => "sequence",
            EntityValue::Mapping(_) => "mapping",
        }
    }

    pub fn as_record(&self) -> Option<&Record> {
        match self {
            EntityValue::Record(r) => Some(r),
            _ => None,
        }
    }

    pub fn as_sequence(&self) -> Option<&[EntityValue]> {
        match self {
            EntityValue::Sequence(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_mapping(&self) -> Option<&Mapping> {
        match self {
            EntityValue::Mapping(m) => Some(m),
            _ => None,
        }
    }

    /// String content of a `String` or `Enum` value
    pub fn as_str(&self) -> Option<&str> {
        match self {
            EntityValue::String(s) | EntityValue::Enum(s) => Some(s),
            _ => None,
        }
    }
}

/// A domain object: a kind tag plus a fixed, ordered set of named fields
///
/// Every record of the same kind is expected to declare the same fields.
/// Optional fields are present with a `Null` value rather than left out;
/// the diff engine treats a missing field as a builder bug.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    kind: String,
    fields: IndexMap<String, EntityValue>,
}

impl Record {
    /// Create a record of the given kind with no fields yet
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            fields: IndexMap::new(),
        }
    }

    /// Declare a field (builder style); declaration order is emission order
    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<EntityValue>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    /// Kind tag of this record
    pub fn kind(&self) -> &str {
        &self.kind
    }

    /// Value of a field, if declared
    pub fn get(&self, name: &str) -> Option<&EntityValue> {
        self.fields.get(name)
    }

    /// Whether the field is declared on this record
    pub fn has_field(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    /// Fields in declaration order
    pub fn fields(&self) -> impl Iterator<Item = (&str, &EntityValue)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of declared fields
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub(crate) fn field_mut(&mut self, name: &str) -> Option<&mut EntityValue> {
        self.fields.get_mut(name)
    }
}

impl From<Record> for EntityValue {
    fn from(record: Record) -> Self {
        EntityValue::Record(record)
    }
}

/// Unordered string-keyed collection of entity values
///
/// A mapping never holds a null entry: inserting `Null` removes the key,
/// so "absent" and "null" cannot be told apart.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Mapping(BTreeMap<String, EntityValue>);

impl Mapping {
    pub fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Insert an entry; a `Null` value removes the key instead
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<EntityValue>) {
        let key = key.into();
        match value.into() {
            EntityValue::Null => {
                self.0.remove(&key);
            }
            value => {
                self.0.insert(key, value);
            }
        }
    }

    /// Builder-style insert
    pub fn with_entry(mut self, key: impl Into<String>, value: impl Into<EntityValue>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&EntityValue> {
        self.0.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Keys in sorted order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// Entries in sorted key order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &EntityValue)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub(crate) fn get_mut(&mut self, key: &str) -> Option<&mut EntityValue> {
        self.0.get_mut(key)
    }

    pub(crate) fn remove(&mut self, key: &str) -> Option<EntityValue> {
        self.0.remove(key)
    }
}

impl<K, V> FromIterator<(K, V)> for Mapping
where
    K: Into<String>,
    V: Into<EntityValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut mapping = Mapping::new();
        for (k, v) in iter {
            mapping.insert(k, v);
        }
        mapping
    }
}

impl From<Mapping> for EntityValue {
    fn from(mapping: Mapping) -> Self {
        EntityValue::Mapping(mapping)
    }
}

// Scalar conversions

impl From<bool> for EntityValue {
    fn from(v: bool) -> Self {
        EntityValue::Bool(v)
    }
}

macro_rules! impl_from_integer {
    ($($t:ty),*) => {
        $(
            impl From<$t> for EntityValue {
                fn from(v: $t) -> Self {
                    EntityValue::Number(serde_json::Number::from(v))
                }
            }
        )*
    };
}

impl_from_integer!(i32, i64, u32, u64, usize);

impl From<f64> for EntityValue {
    /// Non-finite floats have no JSON representation and become `Null`
    fn from(v: f64) -> Self {
        serde_json::Number::from_f64(v)
            .map(EntityValue::Number)
            .unwrap_or(EntityValue::Null)
    }
}

impl From<&str> for EntityValue {
    fn from(v: &str) -> Self {
        EntityValue::String(v.to_string())
    }
}

impl From<String> for EntityValue {
    fn from(v: String) -> Self {
        EntityValue::String(v)
    }
}

impl From<Vec<EntityValue>> for EntityValue {
    fn from(items: Vec<EntityValue>) -> Self {
        EntityValue::Sequence(items)
    }
}

impl<T: Into<EntityValue>> From<Option<T>> for EntityValue {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(EntityValue::Null)
    }
}
