use crate::{DiagnosticKind, Diagnostics};
use std::fmt::Debug;

/// A wrapper around `syn::Result` for fluent assertions in tests.
pub struct TestResult<T> {
    inner: syn::Result<T>,
}

impl<T: Debug> TestResult<T> {
    pub fn new(result: syn::Result<T>) -> Self {
        Self { inner: result }
    }

    /// Asserts success and returns the value.
    pub fn assert_success(self) -> T {
        match self.inner {
            Ok(val) => val,
            Err(e) => {
                let messages: Vec<String> = e.into_iter().map(|e| e.to_string()).collect();
                panic!(
                    "\n🔴 TEST FAILED (Expected Success, but got Error):\nMessages: {:#?}\n",
                    messages
                );
            }
        }
    }

    /// Asserts success and compares the value.
    pub fn assert_success_is<E>(self, expected: E) -> T
    where
        T: PartialEq<E>,
        E: Debug,
    {
        let val = self.assert_success();
        if val != expected {
            panic!(
                "\n🔴 TEST FAILED (Value Mismatch):\nExpected: {:?}\nGot:      {:?}\n",
                expected, val
            );
        }
        val
    }

    /// Asserts failure and returns the error.
    pub fn assert_failure(self) -> syn::Error {
        match self.inner {
            Ok(val) => {
                panic!(
                    "\n🔴 TEST FAILED (Expected Failure, but got Success):\nValue: {:?}\n",
                    val
                );
            }
            Err(e) => e,
        }
    }

    /// Asserts failure and that one of the combined messages contains the text.
    pub fn assert_failure_contains(self, expected_msg_part: &str) -> syn::Error {
        let err = self.assert_failure();
        let messages: Vec<String> = err.clone().into_iter().map(|e| e.to_string()).collect();
        if !messages.iter().any(|m| m.contains(expected_msg_part)) {
            panic!(
                "\n🔴 TEST FAILED (Error Message Mismatch):\nExpected part: {:?}\nActual msgs:   {:#?}\n",
                expected_msg_part, messages
            );
        }
        err
    }
}

pub trait Testable<T> {
    fn test(self) -> TestResult<T>;
}

impl<T: Debug> Testable<T> for syn::Result<T> {
    fn test(self) -> TestResult<T> {
        TestResult::new(self)
    }
}

/// Assertions over the diagnostics a builder collected.
pub trait DiagnosticsExt {
    /// Asserts nothing was reported.
    fn assert_clean(&self);

    /// Asserts exactly one diagnostic of `kind` mentions `msg_part`.
    fn assert_reported(&self, kind: DiagnosticKind, msg_part: &str);
}

impl DiagnosticsExt for Diagnostics {
    fn assert_clean(&self) {
        if !self.is_empty() {
            let rendered: Vec<String> = self.iter().map(|d| d.to_string()).collect();
            panic!(
                "\n🔴 TEST FAILED (Expected no diagnostics):\n{:#?}\n",
                rendered
            );
        }
    }

    fn assert_reported(&self, kind: DiagnosticKind, msg_part: &str) {
        let hits = self
            .iter()
            .filter(|d| d.kind == kind && d.message.contains(msg_part))
            .count();
        if hits != 1 {
            let rendered: Vec<String> = self
                .iter()
                .map(|d| format!("[{}] {}", d.kind, d))
                .collect();
            panic!(
                "\n🔴 TEST FAILED (Expected one {} mentioning {:?}, found {}):\n{:#?}\n",
                kind, msg_part, hits, rendered
            );
        }
    }
}
