//! Test case definitions and output normalization

use serde::{Deserialize, Serialize};

/// One input/expected-output pair of a problem
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestCase {
    /// Lines fed to the program, in order
    pub input: Vec<String>,
    /// Output the program must print
    pub expected_output: String,
}

impl TestCase {
    pub fn new<I, S>(input: I, expected_output: &str) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            input: input.into_iter().map(Into::into).collect(),
            expected_output: expected_output.to_string(),
        }
    }

    /// Standard input for this case: the input lines joined with newlines
    pub fn stdin(&self) -> String {
        self.input.join("\n")
    }
}

/// Strip every whitespace character so formatting differences do not matter.
///
/// `"[0, 1]"` and `"[0,1]\n"` compare equal. Outputs that differ only by
/// whitespace placement between tokens also compare equal; that is accepted.
pub fn normalize_output(output: &str) -> String {
    output.chars().filter(|c| !c.is_whitespace()).collect()
}

/// Whether `actual` matches `expected` after normalization
pub fn outputs_match(actual: &str, expected: &str) -> bool {
    normalize_output(actual) == normalize_output(expected)
}
