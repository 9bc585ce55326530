//! The small path language used to address document nodes.
//!
//! Supported forms:
//! - `./a/b` or `a/b` - child steps relative to a context node
//! - `/network-data/configuration` - steps from the document root
//! - `property[@name='mode']` - a step with an attribute predicate
//! - `.../@version` - a trailing attribute step (property lookups only)

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref STEP_RE: Regex =
        Regex::new(r"^([A-Za-z_][A-Za-z0-9_.\-]*|\*)(?:\[@([A-Za-z_][A-Za-z0-9_.\-]*)='([^']*)'\])?$")
            .expect("Invalid Regex");
    static ref ATTR_RE: Regex = Regex::new(r"^@([A-Za-z_][A-Za-z0-9_.\-]*)$")
        .expect("Invalid Regex");
}

/// One element step, optionally filtered by `[@attr='value']`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
    /// Element name, `*` matches any element.
    pub name: String,
    pub predicate: Option<(String, String)>,
}

impl Step {
    pub fn matches(&self, name: &str, attr: impl Fn(&str) -> Option<String>) -> bool {
        if self.name != "*" && self.name != name {
            return false;
        }
        match &self.predicate {
            Some((key, value)) => attr(key).as_deref() == Some(value.as_str()),
            None => true,
        }
    }
}

/// A parsed path expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Path {
    pub absolute: bool,
    pub steps: Vec<Step>,
    /// Trailing `@attr` step.
    pub attribute: Option<String>,
}

/// Split on `/`, ignoring separators inside quoted predicate values.
fn split_steps(expr: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut in_quote = false;
    let mut start = 0;
    for (i, c) in expr.char_indices() {
        match c {
            '\'' => in_quote = !in_quote,
            '/' if !in_quote => {
                parts.push(&expr[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    parts.push(&expr[start..]);
    parts
}

impl Path {
    /// Parse a path expression.
    ///
    /// # Returns
    /// * `Ok(Path)` - The parsed path
    /// * `Err(String)` - Description of the offending step
    pub fn parse(expr: &str) -> Result<Path, String> {
        let expr = expr.trim();
        if expr.is_empty() {
            return Err("empty path expression".to_string());
        }
        let absolute = expr.starts_with('/');
        let body = if absolute { &expr[1..] } else { expr };

        let mut steps = Vec::new();
        let mut attribute = None;
        let parts = split_steps(body);
        let last = parts.len() - 1;

        for (i, part) in parts.into_iter().enumerate() {
            if part == "." && i == 0 && !absolute {
                continue;
            }
            if let Some(caps) = ATTR_RE.captures(part) {
                if i != last {
                    return Err(format!("attribute step '{part}' must be last in '{expr}'"));
                }
                attribute = Some(caps[1].to_string());
                continue;
            }
            let caps = STEP_RE
                .captures(part)
                .ok_or_else(|| format!("invalid step '{part}' in '{expr}'"))?;
            let predicate = match (caps.get(2), caps.get(3)) {
                (Some(key), Some(value)) => Some((key.as_str().to_string(), value.as_str().to_string())),
                _ => None,
            };
            steps.push(Step {
                name: caps[1].to_string(),
                predicate,
            });
        }

        Ok(Path {
            absolute,
            steps,
            attribute,
        })
    }
}
