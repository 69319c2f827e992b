use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use thiserror::Error;

/// Substitution values keyed by placeholder name
pub type Variables = BTreeMap<String, String>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("no value for placeholder '{0}'")]
pub struct MissingVariable(pub String);

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Placeholder(String),
}

/// Prompt text with `{{name}}` placeholders.
///
/// `{{{name}}}` is accepted as an alias. Substitution is plain text
/// interpolation; substituted values are never re-scanned for placeholders.
/// A `{{` without a matching `}}` is kept as literal text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptTemplate {
    source: String,
    segments: Vec<Segment>,
    defaults: HashMap<String, String>,
}

impl PromptTemplate {
    pub fn new(source: impl Into<String>) -> Self {
        let source = source.into();
        let segments = parse(&source);
        Self {
            source,
            segments,
            defaults: HashMap::new(),
        }
    }

    /// Value used when the caller supplies none for `name`
    pub fn with_default(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.defaults.insert(name.into(), value.into());
        self
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// Placeholder names in order of first appearance
    pub fn placeholders(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        for segment in &self.segments {
            if let Segment::Placeholder(name) = segment {
                if !names.contains(&name.as_str()) {
                    names.push(name);
                }
            }
        }
        names
    }

    pub fn render(&self, variables: &Variables) -> Result<String, MissingVariable> {
        let mut out = String::with_capacity(self.source.len());
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Placeholder(name) => {
                    let value = variables
                        .get(name)
                        .or_else(|| self.defaults.get(name))
                        .ok_or_else(|| MissingVariable(name.clone()))?;
                    out.push_str(value);
                }
            }
        }
        Ok(out)
    }
}

fn parse(source: &str) -> Vec<Segment> {
    let mut segments = Vec::new();
    let mut literal = String::new();
    let mut rest = source;

    while let Some(start) = rest.find("{{") {
        let triple = rest[start..].starts_with("{{{");
        let (open_len, close) = if triple { (3, "}}}") } else { (2, "}}") };
        let after_open = &rest[start + open_len..];
        let found = after_open
            .find(close)
            .map(|end| (end, after_open[..end].trim()))
            .filter(|(_, name)| is_placeholder_name(name));

        let Some((end, name)) = found else {
            // `{{{x}}` reads as a literal `{` followed by `{{x}}`
            let skip = if triple { start + 1 } else { start + open_len };
            literal.push_str(&rest[..skip]);
            rest = &rest[skip..];
            continue;
        };

        literal.push_str(&rest[..start]);
        if !literal.is_empty() {
            segments.push(Segment::Literal(std::mem::take(&mut literal)));
        }
        segments.push(Segment::Placeholder(name.to_string()));
        rest = &after_open[end + close.len()..];
    }

    literal.push_str(rest);
    if !literal.is_empty() {
        segments.push(Segment::Literal(literal));
    }
    segments
}

fn is_placeholder_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-' || c == '.')
}

/// Flatten the top-level fields of a JSON object into template variables.
///
/// Strings are used as-is, string arrays are joined one item per line, and
/// anything else is rendered as compact JSON. Nulls are skipped so template
/// defaults can apply.
pub fn variables_from(input: &Value) -> Variables {
    let mut variables = Variables::new();
    if let Some(object) = input.as_object() {
        for (key, value) in object {
            let text = match value {
                Value::Null => continue,
                Value::String(s) => s.clone(),
                Value::Array(items) if items.iter().all(Value::is_string) => items
                    .iter()
                    .filter_map(Value::as_str)
                    .collect::<Vec<_>>()
                    .join("\n"),
                other => other.to_string(),
            };
            variables.insert(key.clone(), text);
        }
    }
    variables
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn vars(pairs: &[(&str, &str)]) -> Variables {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn renders_double_and_triple_braces() {
        let template = PromptTemplate::new("Objective: {{{objective}}}\nContext: {{ context }}");
        let out = template
            .render(&vars(&[("objective", "Metadata Discovery"), ("context", "acme.com")]))
            .unwrap();
        assert_eq!(out, "Objective: Metadata Discovery\nContext: acme.com");
        assert_eq!(template.placeholders(), vec!["objective", "context"]);
    }

    #[test]
    fn missing_variable_names_the_placeholder() {
        let template = PromptTemplate::new("Term: {{searchTerm}}");
        assert_eq!(
            template.render(&Variables::new()),
            Err(MissingVariable("searchTerm".to_string()))
        );
    }

    #[test]
    fn default_fills_missing_variable() {
        let template = PromptTemplate::new("Engines: {{engines}}").with_default("engines", "Google");
        assert_eq!(template.render(&Variables::new()).unwrap(), "Engines: Google");
    }

    #[test]
    fn substituted_values_are_not_rescanned() {
        let template = PromptTemplate::new("Q: {{query}}");
        let out = template.render(&vars(&[("query", "{{secret}}")])).unwrap();
        assert_eq!(out, "Q: {{secret}}");
    }

    #[test]
    fn unterminated_and_non_identifier_braces_stay_literal() {
        let template = PromptTemplate::new(r#"Format: {{"a": 1}} then {{open"#);
        assert!(template.placeholders().is_empty());
        assert_eq!(
            template.render(&Variables::new()).unwrap(),
            r#"Format: {{"a": 1}} then {{open"#
        );
    }

    #[test]
    fn unbalanced_triple_brace_does_not_hide_later_placeholders() {
        let template = PromptTemplate::new("Term: {{{searchTerm}} Context: {{context}}");
        assert_eq!(template.placeholders(), vec!["searchTerm", "context"]);
        assert_eq!(
            template.render(&Variables::new()),
            Err(MissingVariable("searchTerm".to_string()))
        );
        let out = template
            .render(&vars(&[("searchTerm", "aurora"), ("context", "NY")]))
            .unwrap();
        assert_eq!(out, "Term: {aurora Context: NY");
    }

    #[test]
    fn unterminated_brace_does_not_stop_scanning() {
        let template = PromptTemplate::new("{{open then {{query}}");
        assert_eq!(template.placeholders(), vec!["query"]);
        assert_eq!(
            template.render(&vars(&[("query", "q")])).unwrap(),
            "{{open then q"
        );
    }

    #[test]
    fn rendering_is_deterministic() {
        let template = PromptTemplate::new("{{a}}-{{b}}-{{a}}");
        let v = vars(&[("a", "1"), ("b", "2")]);
        assert_eq!(template.render(&v).unwrap(), template.render(&v).unwrap());
        assert_eq!(template.render(&v).unwrap(), "1-2-1");
    }

    #[test]
    fn variables_from_flattens_json_fields() {
        let v = variables_from(&json!({"a": "x", "b": ["1", "2"], "c": null, "d": 3}));
        assert_eq!(v.get("a").map(String::as_str), Some("x"));
        assert_eq!(v.get("b").map(String::as_str), Some("1\n2"));
        assert!(!v.contains_key("c"));
        assert_eq!(v.get("d").map(String::as_str), Some("3"));
    }
}
