// Shared helpers for casework integration tests.
#![allow(dead_code)]

use std::cell::Cell;
use std::rc::Rc;

use casework::test::{CaseReport, RunReport};
use casework::{ResultGroup, RunConfig, Runner, TestCase};

pub fn run_one(case: TestCase) -> ResultGroup {
    Runner::new(RunConfig::default())
        .unwrap()
        .run_case(&case)
        .unwrap()
}

pub fn run_all(cases: &[TestCase]) -> RunReport {
    Runner::new(RunConfig::default()).unwrap().run(cases).unwrap()
}

pub fn finished(report: &CaseReport) -> &ResultGroup {
    report.group().expect("case should have finished")
}

/// A counter the callable under test can bump to prove it ran.
#[derive(Clone, Default)]
pub struct Counter(Rc<Cell<usize>>);

impl Counter {
    pub fn bump(&self) {
        self.0.set(self.0.get() + 1);
    }

    pub fn get(&self) -> usize {
        self.0.get()
    }
}
