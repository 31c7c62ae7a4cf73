use thiserror::Error;

/// Authoring defects reported by [`AnswerSpec::validate`](super::spec::AnswerSpec::validate).
///
/// These are load-time errors for content authors; the evaluation path never
/// produces them (a defective node simply never matches).
#[derive(Debug, Error)]
pub enum SpecError {
    #[error("invalid regex '{pattern}'")]
    InvalidRegex {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("empty numeric range: min {min} is greater than max {max}")]
    EmptyRange { min: f64, max: f64 },

    #[error("cross-reference lists no targets")]
    NoTargets,

    #[error("union lists no alternatives")]
    EmptyUnion,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_range_message() {
        let err = SpecError::EmptyRange {
            min: 10.0,
            max: 0.0,
        };
        assert_eq!(
            err.to_string(),
            "empty numeric range: min 10 is greater than max 0"
        );
    }

    #[test]
    fn no_targets_message() {
        assert_eq!(
            SpecError::NoTargets.to_string(),
            "cross-reference lists no targets"
        );
    }

    #[test]
    fn invalid_regex_message_names_the_pattern() {
        let err = SpecError::InvalidRegex {
            pattern: "(bad".into(),
            source: regex::Regex::new("(bad").unwrap_err(),
        };
        assert_eq!(err.to_string(), "invalid regex '(bad'");
    }
}
