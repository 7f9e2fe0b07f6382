//! DOM errors.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomError {
    #[error("Invalid selector '{selector}': {reason}")]
    InvalidSelector { selector: String, reason: String },
}

impl DomError {
    pub(crate) fn invalid_selector(selector: &str, reason: impl Into<String>) -> Self {
        DomError::InvalidSelector {
            selector: selector.to_string(),
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_selector_display() {
        let err = DomError::invalid_selector("div >", "dangling combinator");
        let display = err.to_string();
        assert!(display.contains("div >"));
        assert!(display.contains("dangling combinator"));
    }
}
