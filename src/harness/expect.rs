//! `expect(actual).to_contain(expected)` style assertions

#[cfg(feature = "query")]
use std::borrow::Borrow;
use std::fmt::Debug;

use thiserror::Error;

use crate::RenderSnapshot;

/// A failed expectation, recorded against the test case that raised it
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct AssertionFailure {
    pub message: String,
}

impl AssertionFailure {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Values that can be searched by [`Expectation::to_contain`]
///
/// Strings match substrings, collections match items, and snapshots match
/// substrings of their markup.
pub trait Contains<N: ?Sized> {
    fn contains_expected(&self, expected: &N) -> bool;
}

impl<N: AsRef<str> + ?Sized> Contains<N> for str {
    fn contains_expected(&self, expected: &N) -> bool {
        self.contains(expected.as_ref())
    }
}

impl<N: AsRef<str> + ?Sized> Contains<N> for String {
    fn contains_expected(&self, expected: &N) -> bool {
        self.as_str().contains(expected.as_ref())
    }
}

impl<T: PartialEq> Contains<T> for [T] {
    fn contains_expected(&self, expected: &T) -> bool {
        self.contains(expected)
    }
}

impl<T: PartialEq> Contains<T> for Vec<T> {
    fn contains_expected(&self, expected: &T) -> bool {
        self.as_slice().contains(expected)
    }
}

impl<N: AsRef<str> + ?Sized> Contains<N> for RenderSnapshot {
    fn contains_expected(&self, expected: &N) -> bool {
        self.markup().contains(expected.as_ref())
    }
}

impl<'a, N: ?Sized, C: Contains<N> + ?Sized> Contains<N> for &'a C {
    fn contains_expected(&self, expected: &N) -> bool {
        (**self).contains_expected(expected)
    }
}

/// Pending assertion on `actual`; see [`expect`]
#[derive(Debug)]
#[must_use = "an expectation does nothing until a matcher is called"]
pub struct Expectation<A> {
    actual: A,
    negated: bool,
}

/// Start an assertion on `actual`
///
/// # Examples
///
/// ```
/// use rfsnap::harness::expect;
///
/// assert!(expect("footestbutton").to_contain("test").is_ok());
/// assert!(expect(vec![1, 2, 3]).not().to_contain(4).is_ok());
/// assert!(expect("foo").to_contain("bar").is_err());
/// ```
pub fn expect<A>(actual: A) -> Expectation<A> {
    Expectation {
        actual,
        negated: false,
    }
}

impl<A: Debug> Expectation<A> {
    /// Invert the next matcher
    pub fn not(mut self) -> Self {
        self.negated = !self.negated;
        self
    }

    fn check(&self, passed: bool, matcher: &str, expected: &dyn Debug) -> Result<(), AssertionFailure> {
        if passed != self.negated {
            return Ok(());
        }
        let not = if self.negated { "not " } else { "" };
        Err(AssertionFailure::new(format!(
            "expected {:?} {}{} {:?}",
            self.actual, not, matcher, expected
        )))
    }

    pub fn to_contain<N>(self, expected: N) -> Result<(), AssertionFailure>
    where
        A: Contains<N>,
        N: Debug,
    {
        let passed = self.actual.contains_expected(&expected);
        self.check(passed, "to contain", &expected)
    }

    pub fn to_equal<E>(self, expected: E) -> Result<(), AssertionFailure>
    where
        A: PartialEq<E>,
        E: Debug,
    {
        let passed = self.actual == expected;
        self.check(passed, "to equal", &expected)
    }
}

#[cfg(feature = "query")]
impl<A> Expectation<A>
where
    A: Borrow<RenderSnapshot> + Debug,
{
    /// Passes when the snapshot markup has an element matching `selector`
    pub fn to_match_selector(self, selector: &str) -> super::TestResult {
        let passed = Borrow::<RenderSnapshot>::borrow(&self.actual).contains_element(selector)?;
        self.check(passed, "to match selector", &selector)?;
        Ok(())
    }
}
