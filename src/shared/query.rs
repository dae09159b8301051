//! Strict reading of query-string parameters.
//!
//! Handlers take the raw query as a `HashMap<String, String>` and read each
//! parameter through [`ParamReader`], which collects one [`FieldError`] per
//! offending parameter instead of stopping at the first one. Parameters that
//! were never read are reported as not allowed.

use std::collections::{HashMap, HashSet};

use crate::core::error::{AppError, Result};
use crate::shared::types::FieldError;

pub struct ParamReader<'a> {
    params: &'a HashMap<String, String>,
    known: HashSet<&'static str>,
    errors: Vec<FieldError>,
}

impl<'a> ParamReader<'a> {
    pub fn new(params: &'a HashMap<String, String>) -> Self {
        Self {
            params,
            known: HashSet::new(),
            errors: Vec::new(),
        }
    }

    fn raw(&mut self, key: &'static str) -> Option<&'a str> {
        self.known.insert(key);
        self.params.get(key).map(|v| v.as_str())
    }

    /// Integer within `[min, max]`
    pub fn int(&mut self, key: &'static str, min: i64, max: i64) -> Option<i64> {
        let raw = self.raw(key)?;
        match parse_integer(key, raw, min, max) {
            Ok(value) => Some(value),
            Err(error) => {
                self.errors.push(error);
                None
            }
        }
    }

    /// Exact match against a list of allowed spellings
    pub fn one_of<T: Copy>(&mut self, key: &'static str, allowed: &[(&str, T)]) -> Option<T> {
        let raw = self.raw(key)?;
        match allowed.iter().find(|(name, _)| *name == raw) {
            Some((_, value)) => Some(*value),
            None => {
                let names: Vec<&str> = allowed.iter().map(|(name, _)| *name).collect();
                self.errors.push(FieldError::new(
                    key,
                    format!("{} must be one of [{}]", key, names.join(", ")),
                ));
                None
            }
        }
    }

    /// Trimmed, non-empty text of at most `max_len` characters
    pub fn text(&mut self, key: &'static str, max_len: usize) -> Option<String> {
        let trimmed = self.raw(key)?.trim();
        if trimmed.is_empty() {
            self.errors.push(FieldError::new(
                key,
                format!("{} is not allowed to be empty", key),
            ));
            return None;
        }
        if trimmed.chars().count() > max_len {
            self.errors.push(FieldError::new(
                key,
                format!(
                    "{} length must be less than or equal to {} characters long",
                    key, max_len
                ),
            ));
            return None;
        }
        Some(trimmed.to_string())
    }

    /// `true` / `false` (also `1` / `0`)
    pub fn boolean(&mut self, key: &'static str) -> Option<bool> {
        match self.raw(key)?.trim() {
            "true" | "1" => Some(true),
            "false" | "0" => Some(false),
            _ => {
                self.errors
                    .push(FieldError::new(key, format!("{} must be a boolean", key)));
                None
            }
        }
    }

    /// Report unknown parameters and return every collected error
    pub fn finish(mut self) -> std::result::Result<(), Vec<FieldError>> {
        let mut unknown: Vec<&String> = self
            .params
            .keys()
            .filter(|key| !self.known.contains(key.as_str()))
            .collect();
        unknown.sort();
        for key in unknown {
            self.errors
                .push(FieldError::new(key.clone(), format!("{} is not allowed", key)));
        }

        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(self.errors)
        }
    }
}

fn parse_integer(key: &str, raw: &str, min: i64, max: i64) -> std::result::Result<i64, FieldError> {
    let raw = raw.trim();
    // Integral decimals such as "2.0" are accepted as the integer they denote
    let value = match raw.parse::<i64>() {
        Ok(value) => value,
        Err(_) => match raw.parse::<f64>() {
            Ok(f) if f.is_finite() && f.fract() == 0.0 => f as i64,
            Ok(f) if f.is_finite() => {
                return Err(FieldError::new(key, format!("{} must be an integer", key)));
            }
            _ => return Err(FieldError::new(key, format!("{} must be a number", key))),
        },
    };

    if value < min {
        return Err(FieldError::new(
            key,
            format!("{} must be greater than or equal to {}", key, min),
        ));
    }
    if value > max {
        return Err(FieldError::new(
            key,
            format!("{} must be less than or equal to {}", key, max),
        ));
    }
    Ok(value)
}

/// Collapse raw query pairs into a map. A parameter given more than once is
/// an error rather than silently taking one of its values.
pub fn single_valued(
    pairs: Vec<(String, String)>,
) -> std::result::Result<HashMap<String, String>, Vec<FieldError>> {
    let mut params = HashMap::with_capacity(pairs.len());
    let mut repeated: Vec<String> = Vec::new();
    for (key, value) in pairs {
        if params.contains_key(&key) {
            if !repeated.contains(&key) {
                repeated.push(key);
            }
            continue;
        }
        params.insert(key, value);
    }

    if repeated.is_empty() {
        return Ok(params);
    }
    repeated.sort();
    Err(repeated
        .into_iter()
        .map(|key| {
            let message = format!("{} must be a single value", key);
            FieldError::new(key, message)
        })
        .collect())
}

/// Parse a record id taken from the URL path
pub fn parse_id(raw: &str) -> Result<i32> {
    parse_integer("id", raw, 1, i64::from(i32::MAX))
        .map(|id| id as i32)
        .map_err(|e| AppError::Validation(vec![e]))
}

/// `%term%` for ILIKE with the LIKE wildcards in `term` escaped
pub fn contains_pattern(term: &str) -> String {
    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for ch in term.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(ch);
    }
    pattern.push('%');
    pattern
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_int_bounds_and_format() {
        let p = params(&[("a", "5"), ("b", "0"), ("c", "101"), ("d", "1.5"), ("e", "abc")]);
        let mut reader = ParamReader::new(&p);
        assert_eq!(reader.int("a", 1, 100), Some(5));
        assert_eq!(reader.int("b", 1, 100), None);
        assert_eq!(reader.int("c", 1, 100), None);
        assert_eq!(reader.int("d", 1, 100), None);
        assert_eq!(reader.int("e", 1, 100), None);
        assert_eq!(reader.int("missing", 1, 100), None);

        let errors = reader.finish().unwrap_err();
        let messages: Vec<_> = errors.iter().map(|e| e.message.as_str()).collect();
        assert_eq!(
            messages,
            vec![
                "b must be greater than or equal to 1",
                "c must be less than or equal to 100",
                "d must be an integer",
                "e must be a number",
            ]
        );
    }

    #[test]
    fn test_unknown_params_are_rejected() {
        let p = params(&[("page", "1"), ("zeta", "x"), ("alpha", "y")]);
        let mut reader = ParamReader::new(&p);
        reader.int("page", 1, 10);
        let errors = reader.finish().unwrap_err();
        let fields: Vec<_> = errors.iter().map(|e| e.field.clone().unwrap()).collect();
        assert_eq!(fields, vec!["alpha", "zeta"]);
    }

    #[test]
    fn test_text_is_trimmed_and_bounded() {
        let long = "x".repeat(256);
        let p = params(&[("q", "  choc  "), ("blank", "   "), ("long", long.as_str())]);
        let mut reader = ParamReader::new(&p);
        assert_eq!(reader.text("q", 255), Some("choc".to_string()));
        assert_eq!(reader.text("blank", 255), None);
        assert_eq!(reader.text("long", 255), None);
        assert_eq!(reader.finish().unwrap_err().len(), 2);
    }

    #[test]
    fn test_one_of_is_case_sensitive() {
        let p = params(&[("dir", "asc")]);
        let mut reader = ParamReader::new(&p);
        assert_eq!(reader.one_of("dir", &[("ASC", 1), ("DESC", 2)]), None);
        let errors = reader.finish().unwrap_err();
        assert_eq!(errors[0].message, "dir must be one of [ASC, DESC]");
    }

    #[test]
    fn test_boolean() {
        let p = params(&[("a", "true"), ("b", "0"), ("c", "yes")]);
        let mut reader = ParamReader::new(&p);
        assert_eq!(reader.boolean("a"), Some(true));
        assert_eq!(reader.boolean("b"), Some(false));
        assert_eq!(reader.boolean("c"), None);
        assert!(reader.finish().is_err());
    }

    #[test]
    fn test_integral_decimals_are_integers() {
        let p = params(&[("page", "2.0"), ("limit", "1e1"), ("big", "1e300")]);
        let mut reader = ParamReader::new(&p);
        assert_eq!(reader.int("page", 1, 100), Some(2));
        assert_eq!(reader.int("limit", 1, 100), Some(10));
        assert_eq!(reader.int("big", 1, 100), None);
        let errors = reader.finish().unwrap_err();
        assert_eq!(errors[0].message, "big must be less than or equal to 100");
    }

    #[test]
    fn test_single_valued() {
        let pairs = |items: &[(&str, &str)]| -> Vec<(String, String)> {
            items
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect()
        };

        let map = single_valued(pairs(&[("page", "1"), ("limit", "5")])).unwrap();
        assert_eq!(map.get("limit").map(String::as_str), Some("5"));

        let errors = single_valued(pairs(&[
            ("limit", "abc"),
            ("limit", "500"),
            ("page", "1"),
            ("limit", "7"),
        ]))
        .unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field.as_deref(), Some("limit"));
        assert_eq!(errors[0].message, "limit must be a single value");
    }

    #[test]
    fn test_parse_id() {
        assert_eq!(parse_id("42").unwrap(), 42);
        assert_eq!(parse_id("7.0").unwrap(), 7);
        assert!(parse_id("0").is_err());
        assert!(parse_id("abc").is_err());
        assert!(parse_id("99999999999").is_err());
    }

    #[test]
    fn test_contains_pattern_escapes_wildcards() {
        assert_eq!(contains_pattern("choc"), "%choc%");
        assert_eq!(contains_pattern("100%_x"), "%100\\%\\_x%");
        assert_eq!(contains_pattern("a\\b"), "%a\\\\b%");
    }
}
