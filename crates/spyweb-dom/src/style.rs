//! Inline style declarations and color helpers.

use serde::{Deserialize, Serialize};

/// Ordered property/value declarations, as in a `style` attribute.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StyleMap {
    declarations: Vec<(String, String)>,
}

impl StyleMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse `prop: value; prop: value` text. Malformed declarations are skipped.
    pub fn parse(css_text: &str) -> Self {
        let mut map = Self::new();
        for declaration in css_text.split(';') {
            let Some((prop, value)) = declaration.split_once(':') else {
                continue;
            };
            let prop = prop.trim();
            let value = value.trim();
            if !prop.is_empty() && !value.is_empty() {
                map.set(prop, value);
            }
        }
        map
    }

    pub fn get(&self, prop: &str) -> Option<&str> {
        let prop = prop.to_ascii_lowercase();
        self.declarations
            .iter()
            .find(|(p, _)| *p == prop)
            .map(|(_, v)| v.as_str())
    }

    /// Set a property, replacing any previous value in place.
    pub fn set(&mut self, prop: &str, value: &str) {
        let prop = prop.to_ascii_lowercase();
        match self.declarations.iter_mut().find(|(p, _)| *p == prop) {
            Some(entry) => entry.1 = value.to_string(),
            None => self.declarations.push((prop, value.to_string())),
        }
    }

    pub fn remove(&mut self, prop: &str) -> Option<String> {
        let prop = prop.to_ascii_lowercase();
        let index = self.declarations.iter().position(|(p, _)| *p == prop)?;
        Some(self.declarations.remove(index).1)
    }

    pub fn is_empty(&self) -> bool {
        self.declarations.is_empty()
    }

    pub fn len(&self) -> usize {
        self.declarations.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.declarations.iter().map(|(p, v)| (p.as_str(), v.as_str()))
    }

    /// Serialize back to `style` attribute text.
    pub fn to_css_text(&self) -> String {
        self.declarations
            .iter()
            .map(|(p, v)| format!("{}: {};", p, v))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Whether a computed color value paints nothing.
///
/// Treats empty values, `transparent`, `initial`/`inherit`-style keywords and
/// any `rgba()`/`hsla()` with a zero alpha channel as transparent.
pub fn is_transparent(value: &str) -> bool {
    let value = value.trim().to_ascii_lowercase();
    if value.is_empty()
        || matches!(
            value.as_str(),
            "transparent" | "none" | "initial" | "inherit" | "unset" | "currentcolor"
        )
    {
        return true;
    }

    let Some(open) = value.find('(') else {
        return false;
    };
    let func = &value[..open];
    if !matches!(func, "rgba" | "hsla" | "rgb" | "hsl") {
        return false;
    }
    let inner = value[open + 1..].trim_end_matches(')');

    // Alpha is the 4th comma argument or follows a slash in space syntax.
    let alpha = if let Some((_, a)) = inner.split_once('/') {
        Some(a.trim())
    } else {
        inner.split(',').nth(3).map(str::trim)
    };

    match alpha {
        Some(a) => {
            let parsed = match a.strip_suffix('%') {
                Some(pct) => pct.trim().parse::<f64>().map(|p| p / 100.0),
                None => a.parse::<f64>(),
            };
            parsed.map(|alpha| alpha <= 0.0).unwrap_or(false)
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_and_serialize() {
        let map = StyleMap::parse("color: red; Background-Color : blue;;  bogus ; width:10px");
        assert_eq!(map.len(), 3);
        assert_eq!(map.get("background-color"), Some("blue"));
        assert_eq!(map.get("COLOR"), Some("red"));
        assert_eq!(
            map.to_css_text(),
            "color: red; background-color: blue; width: 10px;"
        );
    }

    #[test]
    fn test_set_replaces_in_place() {
        let mut map = StyleMap::parse("a: 1; b: 2");
        map.set("a", "3");
        assert_eq!(map.to_css_text(), "a: 3; b: 2;");
    }

    #[test]
    fn test_remove() {
        let mut map = StyleMap::parse("a: 1; b: 2");
        assert_eq!(map.remove("a"), Some("1".to_string()));
        assert_eq!(map.remove("a"), None);
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn test_is_transparent() {
        assert!(is_transparent(""));
        assert!(is_transparent("transparent"));
        assert!(is_transparent("rgba(0, 0, 0, 0)"));
        assert!(is_transparent("rgba(255,255,255,0.0)"));
        assert!(is_transparent("rgb(0 0 0 / 0%)"));
        assert!(is_transparent("hsla(10, 50%, 50%, 0)"));
        assert!(!is_transparent("rgba(0, 0, 0, 0.5)"));
        assert!(!is_transparent("rgb(255, 255, 255)"));
        assert!(!is_transparent("#fff"));
        assert!(!is_transparent("white"));
    }
}
