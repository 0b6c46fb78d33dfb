use std::borrow::Cow;
use std::sync::LazyLock;

use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::profile::AggregateProfile;

/// `{{key}}`, shortest match, never across a line break.
static PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{\{([^\r\n\x{2028}\x{2029}]*?)\}\}").expect("placeholder pattern is valid")
});

/// How values that are present but falsy (`0`, `false`) are rendered.
///
/// `Blank` matches the page's historical behavior and is lossy: a legitimate
/// rating of `0` renders as nothing. `Literal` keeps `0` and `false` and only
/// blanks null and empty strings.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FalsyPolicy {
    #[default]
    Blank,
    Literal,
}

/// Flat `{{key}}` substitution against an [`AggregateProfile`].
#[derive(Clone, Copy, Debug, Default)]
pub struct TemplateRenderer {
    policy: FalsyPolicy,
}

impl TemplateRenderer {
    pub fn new(policy: FalsyPolicy) -> Self {
        Self { policy }
    }

    /// Replace every placeholder in one pass. Text outside placeholders and
    /// unterminated `{{` sequences are kept verbatim.
    pub fn render<'t>(&self, template: &'t str, profile: &AggregateProfile) -> Cow<'t, str> {
        PLACEHOLDER.replace_all(template, |caps: &Captures<'_>| {
            self.resolve(profile, caps[1].trim()).unwrap_or_default()
        })
    }

    /// Text substituted for `key`, or `None` when it renders empty.
    pub fn resolve(&self, profile: &AggregateProfile, key: &str) -> Option<String> {
        let value = profile.get(key)?;
        let shown = match self.policy {
            FalsyPolicy::Blank => is_truthy(value),
            FalsyPolicy::Literal => !value.is_null() && value.as_str() != Some(""),
        };
        shown.then(|| stringify(value))
    }
}

/// Render with the default [`FalsyPolicy::Blank`].
pub fn render<'t>(template: &'t str, profile: &AggregateProfile) -> Cow<'t, str> {
    TemplateRenderer::default().render(template, profile)
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn stringify(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Number(n) if n.is_f64() => n.as_f64().map(|f| f.to_string()).unwrap_or_default(),
        Value::Array(items) => items.iter().map(stringify).collect::<Vec<_>>().join(","),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn profile(pairs: &[(&str, Value)]) -> AggregateProfile {
        pairs.iter().cloned().collect()
    }

    #[test]
    fn substitutes_single_placeholder() {
        let p = profile(&[("name", json!("Ann"))]);
        assert_eq!(render("Hi {{name}}!", &p), "Hi Ann!");
    }

    #[test]
    fn repeated_key_resolves_each_time() {
        let p = profile(&[("a", json!("x"))]);
        assert_eq!(render("{{a}}{{a}}", &p), "xx");
    }

    #[test]
    fn missing_key_renders_empty() {
        assert_eq!(render("{{missing}}", &AggregateProfile::default()), "");
    }

    #[test]
    fn inner_whitespace_is_trimmed() {
        let p = profile(&[("x", json!("y"))]);
        assert_eq!(render("{{ x }}", &p), "y");
        assert_eq!(render("{{\tx  }}", &p), "y");
    }

    #[test]
    fn no_placeholders_borrows_input() {
        let out = render("plain <b>text</b>\n", &AggregateProfile::default());
        assert!(matches!(out, Cow::Borrowed(_)));
        assert_eq!(out, "plain <b>text</b>\n");
    }

    #[test]
    fn surrounding_text_and_newlines_preserved() {
        let p = profile(&[("name", json!("Ann")), ("surname", json!("Lee"))]);
        let tpl = "<div>\n  <h1>{{name}} {{surname}}</h1>\n\n  <p>{{ role }}</p>\n</div>\n";
        assert_eq!(
            render(tpl, &p),
            "<div>\n  <h1>Ann Lee</h1>\n\n  <p></p>\n</div>\n"
        );
    }

    #[test]
    fn unterminated_placeholder_left_verbatim() {
        let p = profile(&[("a", json!("x"))]);
        assert_eq!(render("{{a}} and {{a", &p), "x and {{a");
        assert_eq!(render("{{a}", &p), "{{a}");
    }

    #[test]
    fn placeholder_does_not_span_lines() {
        let p = profile(&[("a", json!("x"))]);
        assert_eq!(render("{{a\n}}", &p), "{{a\n}}");
    }

    #[test]
    fn shortest_match_wins() {
        let p = profile(&[("a", json!("1")), ("b", json!("2"))]);
        assert_eq!(render("{{a}}}}{{b}}", &p), "1}}2");
    }

    #[test]
    fn falsy_values_blank_by_default() {
        let p = profile(&[
            ("zero", json!(0)),
            ("no", json!(false)),
            ("null", Value::Null),
            ("empty", json!("")),
        ]);
        assert_eq!(render("[{{zero}}|{{no}}|{{null}}|{{empty}}]", &p), "[|||]");
    }

    #[test]
    fn literal_policy_keeps_zero_and_false() {
        let p = profile(&[
            ("zero", json!(0)),
            ("no", json!(false)),
            ("null", Value::Null),
            ("empty", json!("")),
        ]);
        let renderer = TemplateRenderer::new(FalsyPolicy::Literal);
        assert_eq!(
            renderer.render("[{{zero}}|{{no}}|{{null}}|{{empty}}]", &p),
            "[0|false||]"
        );
    }

    #[test]
    fn stringifies_numbers_and_collections() {
        let p = profile(&[
            ("ncoins", json!(120)),
            ("rating", json!(4.5)),
            ("whole", json!(5.0)),
            ("tags", json!(["a", 1, null])),
            ("obj", json!({"k": "v"})),
        ]);
        assert_eq!(
            render("{{ncoins}} {{rating}} {{whole}} {{tags}} {{obj}}", &p),
            "120 4.5 5 a,1, {\"k\":\"v\"}"
        );
    }

    #[test]
    fn empty_key_looks_up_empty_string() {
        let p = profile(&[("", json!("odd"))]);
        assert_eq!(render("{{}}|{{  }}", &p), "odd|odd");
    }

    #[test]
    fn resolve_reports_absence() {
        let p = profile(&[("a", json!("x"))]);
        let r = TemplateRenderer::default();
        assert_eq!(r.resolve(&p, "a").as_deref(), Some("x"));
        assert_eq!(r.resolve(&p, "b"), None);
    }
}
