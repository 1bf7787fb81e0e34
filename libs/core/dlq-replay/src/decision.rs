//! Operator decisions

/// What the operator chose to do with a well-formed record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// Re-publish the decoded payload to the original topic
    Retry,
    /// Leave the record alone
    Skip,
}

impl Decision {
    /// Interpret one line of operator input.
    ///
    /// Only `r` (any case, surrounding whitespace ignored) means retry.
    pub fn parse(input: &str) -> Self {
        if input.trim().eq_ignore_ascii_case("r") {
            Decision::Retry
        } else {
            Decision::Skip
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retry_inputs() {
        for input in ["r", "R", " r ", "\tR\n", "r\r\n"] {
            assert_eq!(Decision::parse(input), Decision::Retry, "input {:?}", input);
        }
    }

    #[test]
    fn test_everything_else_skips() {
        for input in ["", "\n", "s", "retry", "rr", "yes", "r r"] {
            assert_eq!(Decision::parse(input), Decision::Skip, "input {:?}", input);
        }
    }
}
