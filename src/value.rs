use serde::{Deserialize, Serialize};
use std::fmt;

/// Represents a runtime value seen by an assertion: arguments, results and
/// expectations all share this model.
///
/// # Examples
///
/// ```rust
/// use verity::value::Value;
/// let n = Value::Int(3);
/// assert_eq!(n.type_name(), "Int");
/// let s = Value::from("hello");
/// assert_eq!(s.type_name(), "String");
/// let nil = Value::default();
/// assert!(nil.is_null());
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    /// Ordered key/value container. Entries keep insertion order.
    Array(Vec<(ArrayKey, Value)>),
    Object(Object),
}

/// Key of an [`Value::Array`] entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ArrayKey {
    Int(i64),
    Str(String),
}

impl fmt::Display for ArrayKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArrayKey::Int(i) => write!(f, "{}", i),
            ArrayKey::Str(s) => write!(f, "{}", s),
        }
    }
}

impl From<i64> for ArrayKey {
    fn from(i: i64) -> Self {
        ArrayKey::Int(i)
    }
}

impl From<&str> for ArrayKey {
    fn from(s: &str) -> Self {
        ArrayKey::Str(s.to_string())
    }
}

impl From<String> for ArrayKey {
    fn from(s: String) -> Self {
        ArrayKey::Str(s)
    }
}

/// An object-like value: a concrete type with optional string conversion.
///
/// Ancestors, methods and properties describe the object's shape for the
/// standard pipes (`is_a`, `method_exists`, ...). Equality never looks at
/// them, only at `class`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Object {
    pub class: String,
    #[serde(default)]
    pub ancestors: Vec<String>,
    #[serde(default)]
    pub methods: Vec<String>,
    #[serde(default)]
    pub properties: Vec<(String, Value)>,
    /// Output of the object's custom string conversion, if it has one.
    #[serde(default)]
    pub display: Option<String>,
}

impl Object {
    pub fn new(class: impl Into<String>) -> Self {
        Self {
            class: class.into(),
            ..Self::default()
        }
    }

    pub fn extends(mut self, parent: impl Into<String>) -> Self {
        self.ancestors.push(parent.into());
        self
    }

    pub fn with_method(mut self, name: impl Into<String>) -> Self {
        self.methods.push(name.into());
        self
    }

    pub fn with_property(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.properties.push((name.into(), value.into()));
        self
    }

    pub fn with_display(mut self, text: impl Into<String>) -> Self {
        self.display = Some(text.into());
        self
    }

    /// True if the object is `class` or inherits from it.
    pub fn is_a(&self, class: &str) -> bool {
        self.class == class || self.is_subclass_of(class)
    }

    pub fn is_subclass_of(&self, class: &str) -> bool {
        self.ancestors.iter().any(|a| a == class)
    }

    pub fn has_method(&self, name: &str) -> bool {
        self.methods.iter().any(|m| m == name)
    }

    pub fn has_property(&self, name: &str) -> bool {
        self.properties.iter().any(|(p, _)| p == name)
    }
}

impl Value {
    /// Returns the type name of the value as a string.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use verity::value::Value;
    /// let v = Value::Bool(true);
    /// assert_eq!(v.type_name(), "Bool");
    /// ```
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "Null",
            Value::Bool(_) => "Bool",
            Value::Int(_) => "Int",
            Value::Float(_) => "Float",
            Value::String(_) => "String",
            Value::Array(_) => "Array",
            Value::Object(_) => "Object",
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Returns the contained bool if this is a Bool value.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use verity::value::Value;
    /// assert_eq!(Value::Bool(false).as_bool(), Some(false));
    /// assert_eq!(Value::Null.as_bool(), None);
    /// ```
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&Object> {
        match self {
            Value::Object(o) => Some(o),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[(ArrayKey, Value)]> {
        match self {
            Value::Array(entries) => Some(entries),
            _ => None,
        }
    }

    /// Builds an ordered container from explicit key/value pairs.
    pub fn assoc<K, V, I>(entries: I) -> Self
    where
        K: Into<ArrayKey>,
        V: Into<Value>,
        I: IntoIterator<Item = (K, V)>,
    {
        Value::Array(
            entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    // ------------------------------------------------------------------------
    // Display formatting helpers
    // ------------------------------------------------------------------------

    fn fmt_float(f: &mut fmt::Formatter<'_>, n: f64) -> fmt::Result {
        if n.is_nan() {
            write!(f, "NAN")
        } else if n.is_infinite() {
            write!(f, "{}", if n > 0.0 { "INF" } else { "-INF" })
        } else if n.fract() == 0.0 && n.abs() < 1e15 {
            write!(f, "{}", n as i64)
        } else {
            write!(f, "{}", n)
        }
    }

    fn fmt_array(f: &mut fmt::Formatter<'_>, entries: &[(ArrayKey, Value)]) -> fmt::Result {
        write!(f, "array(")?;
        for (i, (key, entry)) in entries.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{} => {}", key, entry)?;
        }
        write!(f, ")")
    }
}

/// Renders a value the way diagnostics show it. Never fails.
///
/// ```rust
/// use verity::value::{render, Value};
/// assert_eq!(render(&Value::Null), "NULL");
/// assert_eq!(render(&Value::from(vec![1, 2])), "array(0 => 1, 1 => 2)");
/// ```
pub fn render(value: &Value) -> String {
    value.to_string()
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "NULL"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Int(i) => write!(f, "{}", i),
            Value::Float(n) => Value::fmt_float(f, *n),
            Value::String(s) => write!(f, "{}", s),
            Value::Array(entries) => Value::fmt_array(f, entries),
            Value::Object(o) => match &o.display {
                Some(text) => write!(f, "{}", text),
                None => write!(f, "{}", o.class),
            },
        }
    }
}

// ----------------------------------------------------------------------------
// Conversions
// ----------------------------------------------------------------------------

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Int(i64::from(i))
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Float(n)
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

impl From<Object> for Value {
    fn from(o: Object) -> Self {
        Value::Object(o)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Value::Array(
            items
                .into_iter()
                .enumerate()
                .map(|(i, v)| (ArrayKey::Int(i as i64), v.into()))
                .collect(),
        )
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(opt: Option<T>) -> Self {
        opt.map_or(Value::Null, Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scalars_render_naturally() {
        assert_eq!(render(&Value::Null), "NULL");
        assert_eq!(render(&Value::Bool(true)), "true");
        assert_eq!(render(&Value::Bool(false)), "false");
        assert_eq!(render(&Value::Int(-42)), "-42");
        assert_eq!(render(&Value::Float(3.0)), "3");
        assert_eq!(render(&Value::Float(2.5)), "2.5");
        assert_eq!(render(&Value::from("  raw ")), "  raw ");
    }

    #[test]
    fn non_finite_floats() {
        assert_eq!(render(&Value::Float(f64::NAN)), "NAN");
        assert_eq!(render(&Value::Float(f64::INFINITY)), "INF");
        assert_eq!(render(&Value::Float(f64::NEG_INFINITY)), "-INF");
    }

    #[test]
    fn nested_arrays_keep_key_order() {
        let v = Value::assoc([
            ("b", Value::from(vec![true, false])),
            ("a", Value::Null),
        ]);
        assert_eq!(
            render(&v),
            "array(b => array(0 => true, 1 => false), a => NULL)"
        );
        assert_eq!(render(&Value::Array(vec![])), "array()");
    }

    #[test]
    fn objects_use_conversion_or_class() {
        let plain = Value::from(Object::new("App\\Model"));
        assert_eq!(render(&plain), "App\\Model");
        let shown = Value::from(Object::new("App\\Money").with_display("EUR 3.50"));
        assert_eq!(render(&shown), "EUR 3.50");
    }

    #[test]
    fn object_shape_queries() {
        let o = Object::new("Child")
            .extends("Parent")
            .with_method("run")
            .with_property("id", 1);
        assert!(o.is_a("Child"));
        assert!(o.is_a("Parent"));
        assert!(!o.is_subclass_of("Child"));
        assert!(o.has_method("run"));
        assert!(o.has_property("id"));
        assert!(!o.has_property("run"));
    }
}
