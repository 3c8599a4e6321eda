//! Ready-made pipes, parameterized by the expected value.
//!
//! A runner that knows the expected result of a feature can attach one of
//! these instead of comparing the raw result: the pipe turns the actual
//! result into a `Bool` and the assertion then expects `true`.

use regex::Regex;

use crate::error::VerityError;
use crate::outcome::Pipe;
use crate::value::{render, Object, Value};

/// Names accepted by [`by_name`].
pub const PIPE_NAMES: &[&str] = &[
    "is_a",
    "is_subclass_of",
    "method_exists",
    "property_exists",
    "matches",
    "count",
];

fn object_check(check: impl Fn(&Object) -> bool + 'static) -> Pipe {
    Box::new(move |actual| Ok(Value::Bool(actual.as_object().is_some_and(&check))))
}

/// The actual result is an object of `class` or one of its subclasses.
pub fn is_a(class: impl Into<String>) -> Pipe {
    let class = class.into();
    object_check(move |o| o.is_a(&class))
}

/// The actual result is an object inheriting from `class`.
pub fn is_subclass_of(class: impl Into<String>) -> Pipe {
    let class = class.into();
    object_check(move |o| o.is_subclass_of(&class))
}

pub fn method_exists(method: impl Into<String>) -> Pipe {
    let method = method.into();
    object_check(move |o| o.has_method(&method))
}

pub fn property_exists(property: impl Into<String>) -> Pipe {
    let property = property.into();
    object_check(move |o| o.has_property(&property))
}

/// The rendered actual result matches `pattern`.
///
/// ```rust
/// use verity::pipes::matches;
/// use verity::value::Value;
/// let pipe = matches(r"^\d+ items$").unwrap();
/// assert_eq!(pipe(&Value::from("12 items")), Ok(Value::Bool(true)));
/// assert!(matches("(").is_err());
/// ```
pub fn matches(pattern: &str) -> Result<Pipe, VerityError> {
    let re = Regex::new(pattern).map_err(|source| VerityError::InvalidPattern {
        pattern: pattern.to_string(),
        source,
    })?;
    Ok(Box::new(move |actual| Ok(Value::Bool(re.is_match(&render(actual))))))
}

/// The actual result is a container with exactly `expected` entries.
pub fn count(expected: usize) -> Pipe {
    Box::new(move |actual| {
        Ok(Value::Bool(
            actual.as_array().is_some_and(|entries| entries.len() == expected),
        ))
    })
}

/// Builds a pipe by name, using `expected` as its parameter.
pub fn by_name(name: &str, expected: &Value) -> Result<Pipe, VerityError> {
    let text = render(expected);
    match name {
        "is_a" => Ok(is_a(text)),
        "is_subclass_of" => Ok(is_subclass_of(text)),
        "method_exists" => Ok(method_exists(text)),
        "property_exists" => Ok(property_exists(text)),
        "matches" => matches(&text),
        "count" => match expected {
            Value::Int(n) if *n >= 0 => Ok(count(*n as usize)),
            _ => text
                .trim()
                .parse::<usize>()
                .map(count)
                .map_err(|_| VerityError::InvalidPipeArgument {
                    pipe: name.to_string(),
                    argument: text.clone(),
                }),
        },
        _ => Err(VerityError::UnknownPipe {
            name: name.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn model() -> Value {
        Value::from(
            Object::new("App\\User")
                .extends("App\\Model")
                .with_method("save")
                .with_property("email", "a@b.c"),
        )
    }

    #[test]
    fn class_checks() {
        assert_eq!(is_a("App\\User")(&model()), Ok(Value::Bool(true)));
        assert_eq!(is_a("App\\Model")(&model()), Ok(Value::Bool(true)));
        assert_eq!(is_subclass_of("App\\User")(&model()), Ok(Value::Bool(false)));
        assert_eq!(is_subclass_of("App\\Model")(&model()), Ok(Value::Bool(true)));
        assert_eq!(is_a("App\\User")(&Value::from("App\\User")), Ok(Value::Bool(false)));
    }

    #[test]
    fn member_checks() {
        assert_eq!(method_exists("save")(&model()), Ok(Value::Bool(true)));
        assert_eq!(method_exists("email")(&model()), Ok(Value::Bool(false)));
        assert_eq!(property_exists("email")(&model()), Ok(Value::Bool(true)));
    }

    #[test]
    fn count_only_applies_to_containers() {
        assert_eq!(count(2)(&Value::from(vec![1, 2])), Ok(Value::Bool(true)));
        assert_eq!(count(3)(&Value::from(vec![1, 2])), Ok(Value::Bool(false)));
        assert_eq!(count(1)(&Value::from("x")), Ok(Value::Bool(false)));
    }

    #[test]
    fn lookup_by_name() {
        let pipe = by_name("count", &Value::Int(2)).unwrap();
        assert_eq!(pipe(&Value::from(vec![1, 2])), Ok(Value::Bool(true)));
        let pipe = by_name("matches", &Value::from("^a")).unwrap();
        assert_eq!(pipe(&Value::from("abc")), Ok(Value::Bool(true)));
        assert!(matches!(
            by_name("frobnicate", &Value::Null),
            Err(VerityError::UnknownPipe { .. })
        ));
        assert!(matches!(
            by_name("count", &Value::from("many")),
            Err(VerityError::InvalidPipeArgument { .. })
        ));
    }
}
