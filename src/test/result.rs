use std::time::Duration;

use serde::Serialize;

use crate::exception::Exception;
use crate::test::case::Location;
use crate::test::resolver::WrapperConflict;
use crate::value::{CallArgs, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Verdict {
    Passed,
    Failed,
    Skipped,
}

/// Outcome of one invocation. Built by the executor and read-only afterwards.
#[derive(Debug, Clone)]
pub struct TestResult {
    name: String,
    args: CallArgs,
    verdict: Verdict,
    returned: Option<Value>,
    raised: Option<Exception>,
    elapsed: Duration,
    message: Option<String>,
    redundant_of: Option<usize>,
}

impl TestResult {
    pub(crate) fn passed(name: String, args: CallArgs, elapsed: Duration) -> Self {
        Self {
            name,
            args,
            verdict: Verdict::Passed,
            returned: None,
            raised: None,
            elapsed,
            message: None,
            redundant_of: None,
        }
    }

    pub(crate) fn with_outcome(mut self, outcome: Result<Value, Exception>) -> Self {
        match outcome {
            Ok(value) => self.returned = Some(value),
            Err(exception) => self.raised = Some(exception),
        }
        self
    }

    pub(crate) fn failed(mut self, message: impl Into<String>) -> Self {
        self.verdict = Verdict::Failed;
        self.message = Some(message.into());
        self
    }

    pub(crate) fn redundant_of(mut self, first: Option<usize>) -> Self {
        self.redundant_of = first;
        self
    }

    /// Case name plus the invocation suffix, e.g. `adds[1-0]`.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn args(&self) -> &CallArgs {
        &self.args
    }

    pub fn verdict(&self) -> Verdict {
        self.verdict
    }

    pub fn is_passed(&self) -> bool {
        self.verdict == Verdict::Passed
    }

    pub fn is_failed(&self) -> bool {
        self.verdict == Verdict::Failed
    }

    pub fn returned(&self) -> Option<&Value> {
        self.returned.as_ref()
    }

    pub fn raised(&self) -> Option<&Exception> {
        self.raised.as_ref()
    }

    /// Time spent inside the callable only.
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// Rendered failure message; `None` unless failed.
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    /// Index of an earlier invocation with identical arguments.
    pub fn redundant(&self) -> Option<usize> {
        self.redundant_of
    }
}

#[derive(Debug, Clone)]
enum GroupState {
    Collecting(Vec<TestResult>),
    Conflicted(WrapperConflict),
    Skipped(String),
}

/// Aggregated verdict for every invocation of one test case.
///
/// A conflicted group is failed and holds no results. A skipped group is
/// passed and holds no results. Otherwise the group fails iff any result
/// failed. Every transition consumes the group and returns the next one, so a
/// group can never be conflicted and skipped at once.
#[derive(Debug, Clone)]
pub struct ResultGroup {
    name: String,
    location: Location,
    state: GroupState,
}

impl ResultGroup {
    pub fn new(name: impl Into<String>, location: Location) -> Self {
        Self {
            name: name.into(),
            location,
            state: GroupState::Collecting(Vec::new()),
        }
    }

    /// Appends a finished result. Ignored once the group is conflicted or
    /// skipped.
    pub fn with_result(mut self, result: TestResult) -> Self {
        if let GroupState::Collecting(results) = &mut self.state {
            results.push(result);
        }
        self
    }

    pub fn with_conflict(mut self, conflict: WrapperConflict) -> Self {
        self.state = GroupState::Conflicted(conflict);
        self
    }

    pub fn as_skipped(mut self, reason: impl Into<String>) -> Self {
        self.state = GroupState::Skipped(reason.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn location(&self) -> &Location {
        &self.location
    }

    pub fn results(&self) -> &[TestResult] {
        match &self.state {
            GroupState::Collecting(results) => results,
            _ => &[],
        }
    }

    pub fn conflict(&self) -> Option<&WrapperConflict> {
        match &self.state {
            GroupState::Conflicted(conflict) => Some(conflict),
            _ => None,
        }
    }

    pub fn skip_reason(&self) -> Option<&str> {
        match &self.state {
            GroupState::Skipped(reason) => Some(reason),
            _ => None,
        }
    }

    pub fn is_skipped(&self) -> bool {
        matches!(self.state, GroupState::Skipped(_))
    }

    pub fn is_failed(&self) -> bool {
        match &self.state {
            GroupState::Collecting(results) => results.iter().any(TestResult::is_failed),
            GroupState::Conflicted(_) => true,
            GroupState::Skipped(_) => false,
        }
    }

    pub fn is_passed(&self) -> bool {
        !self.is_failed()
    }

    pub fn verdict(&self) -> Verdict {
        if self.is_skipped() {
            Verdict::Skipped
        } else if self.is_failed() {
            Verdict::Failed
        } else {
            Verdict::Passed
        }
    }

    /// The conflict reason if any, then each failed result's message.
    pub fn iter_failure_messages(&self) -> impl Iterator<Item = String> + '_ {
        let conflict = self.conflict().map(ToString::to_string);
        let failures = self
            .results()
            .iter()
            .filter(|r| r.is_failed())
            .map(|r| format!("{}: {}", r.name(), r.message().unwrap_or_default()));
        conflict.into_iter().chain(failures)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::wrapper::Wrapper;

    fn group() -> ResultGroup {
        ResultGroup::new(
            "t",
            Location {
                file: "suite.rs".into(),
                line: 1,
            },
        )
    }

    fn ok(name: &str) -> TestResult {
        TestResult::passed(name.into(), CallArgs::new(), Duration::ZERO).with_outcome(Ok(Value::Nil))
    }

    #[test]
    fn empty_group_passes() {
        let g = group();
        assert!(g.is_passed());
        assert!(!g.is_skipped());
        assert_eq!(g.iter_failure_messages().count(), 0);
    }

    #[test]
    fn any_failed_result_fails_the_group() {
        let g = group()
            .with_result(ok("t[0]"))
            .with_result(ok("t[1]").failed("expected 2, got 3"));
        assert!(g.is_failed());
        assert_eq!(g.verdict(), Verdict::Failed);
        let messages: Vec<_> = g.iter_failure_messages().collect();
        assert_eq!(messages, ["t[1]: expected 2, got 3"]);
    }

    #[test]
    fn conflict_clears_results_and_fails() {
        let g = group().with_result(ok("t")).with_conflict(WrapperConflict::new(
            Wrapper::mock_global("m.x", 1),
            Wrapper::mock_global("m.x", 2),
            "ambiguous",
        ));
        assert!(g.is_failed());
        assert!(g.results().is_empty());
        assert_eq!(g.iter_failure_messages().count(), 1);
    }

    #[test]
    fn skipped_group_is_passed_and_ignores_results() {
        let g = group()
            .as_skipped("not today")
            .with_result(ok("t").failed("nope"));
        assert!(g.is_skipped());
        assert!(g.is_passed());
        assert!(g.results().is_empty());
        assert_eq!(g.skip_reason(), Some("not today"));
    }
}
