//! Calculator service.
//!
//! The [`Calculator`] interface is shared by both binaries: the server exposes
//! [`CalculatorImpl`] through [`registry`], the client calls it through the
//! generated [`CalculatorClient`]. `multiply` is declared but not
//! exposed, so calling it remotely always fails with `NotExposed`.

use lpfcp::{ExposureRegistry, Processor};
use thiserror::Error;

lpfcp::interface! {
    /// Integer arithmetic plus a few string and list helpers.
    pub interface Calculator => CalculatorClient {
        fn hello() -> String;
        fn add(a: i32, b: i32) -> i32;
        /// Concatenation; shares the wire name `add` with the integer overload.
        fn add_strings(a: String, b: String) -> String as "add";
        fn subtract(a: i32, b: i32) -> i32;
        fn multiply(a: i32, b: i32) -> i32;
        fn divide(a: i32, b: i32) -> i32;
        /// Like `divide`, but `None` instead of an error when `b` is zero.
        fn divide_safely(a: i32, b: i32) -> Option<i32>;
        /// Mean of the values, or `None` for an empty list. Fails if the mean is not finite.
        fn average(values: Vec<f64>) -> Option<f64>;
    }
}

/// Errors raised by calculator operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CalcError {
    #[error("Division by zero")]
    DivisionByZero,

    #[error("Integer overflow in {operation}")]
    Overflow { operation: &'static str },

    #[error("Result of {operation} is not a finite number")]
    NotFinite { operation: &'static str },
}

/// Calculator implementation served by `calculator-server`.
#[derive(Debug, Default, Clone, Copy)]
pub struct CalculatorImpl;

impl CalculatorImpl {
    pub fn hello(&self) -> String {
        "Hello, World!".to_string()
    }

    pub fn add(&self, a: i32, b: i32) -> Result<i32, CalcError> {
        a.checked_add(b)
            .ok_or(CalcError::Overflow { operation: "add" })
    }

    pub fn add_strings(&self, a: String, b: String) -> String {
        a + &b
    }

    pub fn subtract(&self, a: i32, b: i32) -> Result<i32, CalcError> {
        a.checked_sub(b)
            .ok_or(CalcError::Overflow { operation: "subtract" })
    }

    /// Not exposed remotely.
    pub fn multiply(&self, a: i32, b: i32) -> Result<i32, CalcError> {
        a.checked_mul(b)
            .ok_or(CalcError::Overflow { operation: "multiply" })
    }

    pub fn divide(&self, a: i32, b: i32) -> Result<i32, CalcError> {
        if b == 0 {
            return Err(CalcError::DivisionByZero);
        }
        a.checked_div(b)
            .ok_or(CalcError::Overflow { operation: "divide" })
    }

    pub fn divide_safely(&self, a: i32, b: i32) -> Option<i32> {
        a.checked_div(b)
    }

    pub fn average(&self, values: &[f64]) -> Result<Option<f64>, CalcError> {
        if values.is_empty() {
            return Ok(None);
        }
        // JSON has no infinity or NaN; they would arrive as null.
        let mean = values.iter().sum::<f64>() / values.len() as f64;
        if mean.is_finite() {
            Ok(Some(mean))
        } else {
            Err(CalcError::NotFinite { operation: "average" })
        }
    }
}

/// Exposure registry for [`CalculatorImpl`]. Everything except `multiply` is exposed.
pub fn registry() -> lpfcp::Result<ExposureRegistry<CalculatorImpl>> {
    ExposureRegistry::new()
        .declare::<Calculator>()
        .expose("hello", |c: &CalculatorImpl, ()| c.hello())?
        .expose_fallible("add", |c: &CalculatorImpl, (a, b): (i32, i32)| c.add(a, b))?
        .expose("add", |c: &CalculatorImpl, (a, b): (String, String)| {
            c.add_strings(a, b)
        })?
        .expose_fallible("subtract", |c: &CalculatorImpl, (a, b): (i32, i32)| {
            c.subtract(a, b)
        })?
        .expose_fallible("divide", |c: &CalculatorImpl, (a, b): (i32, i32)| {
            c.divide(a, b)
        })?
        .expose("divide_safely", |c: &CalculatorImpl, (a, b): (i32, i32)| {
            c.divide_safely(a, b)
        })?
        .expose_fallible("average", |c: &CalculatorImpl, (values,): (Vec<f64>,)| {
            c.average(&values)
        })
}

/// Processor serving a fresh [`CalculatorImpl`].
pub fn processor() -> lpfcp::Result<Processor<CalculatorImpl>> {
    Ok(Processor::new(CalculatorImpl, registry()?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use lpfcp::{Interface, Proxy};
    use std::sync::Arc;

    fn client() -> CalculatorClient {
        CalculatorClient::new(Proxy::local(Arc::new(processor().unwrap())))
    }

    #[test]
    fn test_checked_arithmetic() {
        let calc = CalculatorImpl;
        assert_eq!(calc.add(3, 5), Ok(8));
        assert_eq!(
            calc.add(i32::MAX, 1),
            Err(CalcError::Overflow { operation: "add" })
        );
        assert_eq!(calc.divide(1, 0), Err(CalcError::DivisionByZero));
        assert_eq!(
            calc.divide(i32::MIN, -1),
            Err(CalcError::Overflow { operation: "divide" })
        );
        assert_eq!(calc.multiply(6, 7), Ok(42));
        assert_eq!(calc.divide_safely(5, 0), None);
        assert_eq!(calc.average(&[]), Ok(None));
        assert_eq!(
            calc.average(&[f64::MAX, f64::MAX]),
            Err(CalcError::NotFinite { operation: "average" })
        );
    }

    #[test]
    fn test_every_declared_method_but_multiply_is_exposed() {
        let registry = registry().unwrap();
        for method in Calculator::methods() {
            let exposed = registry.is_exposed(&method.name, &method.parameter_types);
            assert_eq!(exposed, method.name != "multiply", "{}", method);
        }
    }

    #[tokio::test]
    async fn test_local_calls() {
        let client = client();
        assert_eq!(client.hello().await.unwrap(), "Hello, World!");
        assert_eq!(client.add(1, 2).await.unwrap(), 3);
        assert_eq!(client.subtract(5, 3).await.unwrap(), 2);
        assert_eq!(client.average(vec![1.0, 2.0, 3.0]).await.unwrap(), Some(2.0));
        assert_eq!(client.average(Vec::new()).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_overflow_is_reported_with_kind() {
        let err = client().add(i32::MAX, 1).await.unwrap_err();
        assert!(err.is_invocation_failure());
        let cause = err.failure().unwrap().root_cause();
        assert_eq!(cause.kind, "CalcError");
        assert_eq!(cause.message, "Integer overflow in add");
    }

    #[tokio::test]
    async fn test_infinite_average_is_an_error_not_null() {
        let err = client()
            .average(vec![f64::MAX, f64::MAX])
            .await
            .unwrap_err();
        assert!(err.is_invocation_failure());
        let cause = err.failure().unwrap().root_cause();
        assert_eq!(cause.kind, "CalcError");
        assert_eq!(cause.message, "Result of average is not a finite number");
    }

    #[tokio::test]
    async fn test_remote_error_text_names_the_cause() {
        let err = client().divide(5, 0).await.unwrap_err();
        assert!(err.to_string().contains("Division by zero"), "{}", err);
    }
}
