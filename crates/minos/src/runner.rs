//! Drives a sandbox through a problem's test cases

use serde::Serialize;

use arena_common::{ArenaError, ArenaResult, ExecutionRequest, ExecutionResult, Language};
use charon::Sandbox;

use crate::problems::Problem;
use crate::testcase::TestCase;
use crate::verdict::{Submission, SuiteReport, TestCaseResult};

/// Output of the try-it path: no judging, just what the program did
#[derive(Debug, Clone, Serialize)]
pub struct AdhocRun {
    pub output: Option<String>,
    pub error: Option<String>,
    pub test_input: String,
    pub result: ExecutionResult,
}

impl AdhocRun {
    fn new(result: ExecutionResult, test_input: String) -> Self {
        Self {
            output: result.output().map(str::to_string),
            error: result.error().map(str::to_string),
            test_input,
            result,
        }
    }
}

/// Run `code` against one test case without judging it.
pub async fn run_single_case<S>(
    sandbox: &S,
    code: &str,
    language: &str,
    test_case: &TestCase,
) -> ArenaResult<AdhocRun>
where
    S: Sandbox + ?Sized,
{
    let stdin = test_case.stdin();
    let request = ExecutionRequest::parse(code, language, &stdin)?;
    let result = sandbox.run(&request).await;
    Ok(AdhocRun::new(result, stdin))
}

/// Try-it path: run against the problem's first test case only.
pub async fn run_sample<S>(
    sandbox: &S,
    code: &str,
    language: &str,
    problem: &Problem,
) -> ArenaResult<AdhocRun>
where
    S: Sandbox + ?Sized,
{
    let test_case = problem
        .first_test_case()
        .ok_or(ArenaError::NoTestCases(problem.id))?;
    run_single_case(sandbox, code, language, test_case).await
}

/// Judge `code` against every test case of `problem`, in order.
///
/// The sandbox is consumed and released exactly once, whatever happens.
/// A failed execution never stops the suite: it is recorded as a failed
/// case and the next case runs.
pub async fn run_full_suite<S>(
    mut sandbox: S,
    code: &str,
    language: &str,
    problem: &Problem,
) -> ArenaResult<SuiteReport>
where
    S: Sandbox,
{
    let report = judge_all(&sandbox, code, language, problem).await;
    sandbox.release();
    report
}

/// Run the full suite and wrap the outcome as a [`Submission`].
pub async fn judge_submission<S>(
    sandbox: S,
    code: &str,
    language: &str,
    problem: &Problem,
    time_taken_seconds: u64,
) -> ArenaResult<Submission>
where
    S: Sandbox,
{
    // Unknown tags are rejected inside the suite, after the sandbox is released
    let report = run_full_suite(sandbox, code, language, problem).await?;
    let language: Language = language.parse()?;
    Ok(Submission::new(problem.id, language, report, time_taken_seconds))
}

async fn judge_all<S>(
    sandbox: &S,
    code: &str,
    language: &str,
    problem: &Problem,
) -> ArenaResult<SuiteReport>
where
    S: Sandbox,
{
    let language: Language = language.parse()?;
    let mut results = Vec::with_capacity(problem.test_cases.len());

    for (index, test_case) in problem.test_cases.iter().enumerate() {
        let stdin = test_case.stdin();
        let request = ExecutionRequest::new(code, language, stdin.clone());
        let execution = sandbox.run(&request).await;
        let result = TestCaseResult::judge(stdin, &test_case.expected_output, &execution);

        tracing::debug!(
            problem_id = problem.id,
            case = index + 1,
            verdict = %result.verdict,
            "Test case judged"
        );
        results.push(result);
    }

    let report = SuiteReport::from_testcases(results);
    tracing::info!(
        problem_id = problem.id,
        language = %language,
        passed = report.passed_tests,
        total = report.total_tests,
        verdict = %report.verdict,
        "Suite finished"
    );

    Ok(report)
}
