//! Verdict types and determination logic

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use arena_common::{ExecutionResult, FailureKind, Language, ProblemId};

/// Verdict for a single test case or entire submission
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Verdict {
    /// Output matched after normalization
    Accepted,
    /// Output does not match expected
    WrongAnswer,
    /// Compiler rejected the source
    CompileError,
    /// Program crashed or exited non-zero
    RuntimeError,
    /// Exceeded time limit
    TimeLimitExceeded,
    /// The engine could not set the run up
    SetupError,
}

impl Verdict {
    /// Get short code for verdict
    pub fn code(&self) -> &'static str {
        match self {
            Verdict::Accepted => "AC",
            Verdict::WrongAnswer => "WA",
            Verdict::CompileError => "CE",
            Verdict::RuntimeError => "RE",
            Verdict::TimeLimitExceeded => "TLE",
            Verdict::SetupError => "SE",
        }
    }

    /// Check if verdict is a failure (not accepted)
    pub fn is_failure(&self) -> bool {
        !matches!(self, Verdict::Accepted)
    }
}

impl From<FailureKind> for Verdict {
    fn from(kind: FailureKind) -> Self {
        match kind {
            FailureKind::CompileError => Verdict::CompileError,
            FailureKind::RuntimeError => Verdict::RuntimeError,
            FailureKind::Timeout => Verdict::TimeLimitExceeded,
            FailureKind::SetupError => Verdict::SetupError,
        }
    }
}

impl std::fmt::Display for Verdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Result of running a single test case
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestCaseResult {
    /// Stdin the program received
    pub input: String,

    /// Expected output (trimmed)
    pub expected: String,

    /// Program output, or `"Error: <message>"` when execution failed
    pub actual: String,

    /// Whether normalized output matched
    pub passed: bool,

    /// Classification of this case
    pub verdict: Verdict,
}

impl TestCaseResult {
    /// Judge an execution result against the expected output
    pub fn judge(input: String, expected: &str, result: &ExecutionResult) -> Self {
        let expected = expected.trim().to_string();

        match result {
            ExecutionResult::Success { stdout, .. } => {
                let actual = stdout.trim().to_string();
                let passed = crate::testcase::outputs_match(&actual, &expected);
                Self {
                    input,
                    expected,
                    actual,
                    passed,
                    verdict: if passed {
                        Verdict::Accepted
                    } else {
                        Verdict::WrongAnswer
                    },
                }
            }
            ExecutionResult::Failure { kind, message } => Self {
                input,
                expected,
                actual: format!("Error: {}", message),
                passed: false,
                verdict: Verdict::from(*kind),
            },
        }
    }
}

/// Aggregated result for an entire test suite
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuiteReport {
    /// Overall verdict
    pub verdict: Verdict,

    /// Results for each test case, in problem order
    pub test_results: Vec<TestCaseResult>,

    /// Every case passed
    pub all_passed: bool,

    /// Total number of test cases
    pub total_tests: usize,

    /// Number of passed test cases
    pub passed_tests: usize,
}

impl SuiteReport {
    /// Create suite report from test case results
    pub fn from_testcases(results: Vec<TestCaseResult>) -> Self {
        let total_tests = results.len();
        let passed_tests = results.iter().filter(|r| r.passed).count();
        let all_passed = results.iter().all(|r| r.passed);

        // The first failing case decides the overall verdict
        let verdict = results
            .iter()
            .find(|r| !r.passed)
            .map(|r| r.verdict)
            .unwrap_or(Verdict::Accepted);

        Self {
            verdict,
            test_results: results,
            all_passed,
            total_tests,
            passed_tests,
        }
    }

    /// Score (0-100)
    pub fn score(&self) -> f64 {
        if self.total_tests > 0 {
            (self.passed_tests as f64 / self.total_tests as f64) * 100.0
        } else {
            0.0
        }
    }
}

/// One judged submission, handed to the caller. Not persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Submission {
    pub id: Uuid,
    pub problem_id: ProblemId,
    pub language: Language,
    pub submitted_at: DateTime<Utc>,
    /// Time the candidate spent, as reported by the caller
    pub time_taken_seconds: u64,
    #[serde(flatten)]
    pub report: SuiteReport,
}

impl Submission {
    pub fn new(
        problem_id: ProblemId,
        language: Language,
        report: SuiteReport,
        time_taken_seconds: u64,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            problem_id,
            language,
            submitted_at: Utc::now(),
            time_taken_seconds,
            report,
        }
    }

    pub fn all_passed(&self) -> bool {
        self.report.all_passed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn case(actual: &ExecutionResult, expected: &str) -> TestCaseResult {
        TestCaseResult::judge("in".to_string(), expected, actual)
    }

    #[test]
    fn test_judge_ignores_whitespace() {
        let result = case(&ExecutionResult::success("[0, 1]"), "[0,1]");
        assert!(result.passed);
        assert_eq!(result.verdict, Verdict::Accepted);
        assert_eq!(result.actual, "[0, 1]");
    }

    #[test]
    fn test_judge_wrong_answer_keeps_actual() {
        let result = case(&ExecutionResult::success("[1,0]"), "[0,1]\n");
        assert!(!result.passed);
        assert_eq!(result.verdict, Verdict::WrongAnswer);
        assert_eq!(result.actual, "[1,0]");
        assert_eq!(result.expected, "[0,1]");
    }

    #[test]
    fn test_judge_failure_is_prefixed() {
        let failed = ExecutionResult::failure(FailureKind::Timeout, "Time Limit Exceeded (> 5 seconds)");
        let result = case(&failed, "true");
        assert!(!result.passed);
        assert_eq!(result.verdict, Verdict::TimeLimitExceeded);
        assert_eq!(result.actual, "Error: Time Limit Exceeded (> 5 seconds)");
    }

    #[test]
    fn test_report_aggregation() {
        let results = vec![
            case(&ExecutionResult::success("true"), "true"),
            case(&ExecutionResult::failure(FailureKind::RuntimeError, "boom"), "true"),
            case(&ExecutionResult::success("false"), "true"),
        ];
        let report = SuiteReport::from_testcases(results);

        assert_eq!(report.total_tests, 3);
        assert_eq!(report.passed_tests, 1);
        assert!(!report.all_passed);
        assert_eq!(report.verdict, Verdict::RuntimeError);
        assert!((report.score() - 100.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_report_all_passed() {
        let report = SuiteReport::from_testcases(vec![case(&ExecutionResult::success("1"), "1")]);
        assert!(report.all_passed);
        assert_eq!(report.verdict, Verdict::Accepted);
        assert_eq!(report.score(), 100.0);
    }

    #[test]
    fn test_submission_serializes_flat() {
        let report = SuiteReport::from_testcases(vec![case(&ExecutionResult::success("1"), "1")]);
        let submission = Submission::new(1, Language::Python, report, 42);
        let json = serde_json::to_value(&submission).unwrap();

        assert_eq!(json["problem_id"], 1);
        assert_eq!(json["language"], "python");
        assert_eq!(json["all_passed"], true);
        assert_eq!(json["total_tests"], 1);
        assert_eq!(json["verdict"], "ACCEPTED");
        assert!(submission.all_passed());
    }
}
