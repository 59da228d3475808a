//! Minos - verdict layer for Arena
//!
//! Owns the problem bank and judges candidate code against it, driving a
//! [`charon::Sandbox`] one test case at a time.

pub mod config;
pub mod problems;
pub mod runner;
pub mod testcase;
pub mod verdict;

pub use config::{Config, LogFormat};
pub use problems::{Problem, ProblemSummary, get_all_problems, get_problem, get_random_problem};
pub use runner::{AdhocRun, judge_submission, run_full_suite, run_sample, run_single_case};
pub use testcase::{TestCase, normalize_output};
pub use verdict::{Submission, SuiteReport, TestCaseResult, Verdict};
