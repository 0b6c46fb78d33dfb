use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Language of the user-visible messages written into the content area.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    Ru,
    En,
}

impl Locale {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ru => "ru",
            Self::En => "en",
        }
    }

    /// Text shown for sections without dynamic content.
    pub fn placeholder(&self, title: &str) -> String {
        match self {
            Self::Ru => format!("Раздел \"{title}\" еще в разработке"),
            Self::En => format!("Section \"{title}\" is under construction"),
        }
    }

    /// Description used when the template itself could not be fetched.
    pub fn template_failure(&self) -> &'static str {
        match self {
            Self::Ru => "Ошибка загрузки шаблона",
            Self::En => "Failed to load template",
        }
    }

    /// Markup shown when a content load fails.
    pub fn error(&self, description: &str) -> String {
        match self {
            Self::Ru => format!("<p class=\"text-danger\">Ошибка: {description}</p>"),
            Self::En => format!("<p class=\"text-danger\">Error: {description}</p>"),
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Locale {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "ru" | "ru-ru" => Ok(Self::Ru),
            "en" | "en-us" | "en-gb" => Ok(Self::En),
            other => Err(format!("unsupported locale: {other}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn russian_is_default() {
        assert_eq!(Locale::default(), Locale::Ru);
        assert_eq!(
            Locale::Ru.placeholder("Новости"),
            "Раздел \"Новости\" еще в разработке"
        );
    }

    #[test]
    fn error_markup_wraps_description() {
        assert_eq!(
            Locale::En.error("HTTP 500"),
            "<p class=\"text-danger\">Error: HTTP 500</p>"
        );
        assert!(Locale::Ru.error("x").contains("Ошибка: x"));
    }

    #[test]
    fn template_failure_is_localized() {
        assert_eq!(
            Locale::Ru.error(Locale::Ru.template_failure()),
            "<p class=\"text-danger\">Ошибка: Ошибка загрузки шаблона</p>"
        );
        assert_eq!(Locale::En.template_failure(), "Failed to load template");
    }

    #[test]
    fn parse_locale() {
        assert_eq!("EN".parse::<Locale>().unwrap(), Locale::En);
        assert_eq!("ru-RU".parse::<Locale>().unwrap(), Locale::Ru);
        assert!("de".parse::<Locale>().is_err());
    }

    #[test]
    fn serde_lowercase() {
        assert_eq!(serde_json::to_string(&Locale::En).unwrap(), "\"en\"");
        let parsed: Locale = serde_json::from_str("\"ru\"").unwrap();
        assert_eq!(parsed, Locale::Ru);
    }
}
