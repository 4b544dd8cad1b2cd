//! Typed wrappers over decoded values.
//!
//! Every wrapper owns a [`Chain`] node and a plain value. Each assertion
//! enters a child node, does nothing when that child starts failed, and
//! reports at most once. Extractors (`value`, `element`, `number`, ...) hand
//! out wrappers over the child node, so a failed extraction silences
//! everything downstream; the extracted value is then the type's default.

mod array;
mod boolean;
mod number;
mod object;
mod string;
mod value;

pub use array::Array;
pub use boolean::Boolean;
use httpexpect_chain::{AssertionFailure, Chain, FailureKind, Value};
pub use number::Number;
pub use object::Object;
use serde::Serialize;
pub use string::Str;
pub use value::ValueAssert;

/// Canonicalize a caller-supplied value, failing `chain` on error.
pub(crate) fn canonical<T: Serialize + ?Sized>(chain: &Chain, input: &T) -> Option<Value> {
    match Value::canonical(input) {
        Ok(value) => Some(value),
        Err(e) => {
            chain.fail(AssertionFailure::new(FailureKind::Usage).error(e.to_string()));
            None
        }
    }
}

/// Fail `chain` with "expected X, got Y" when the kinds differ.
pub(crate) fn kind_mismatch(chain: &Chain, expected: &str, actual: &Value) {
    chain.fail(
        AssertionFailure::assertion(format!("expected {expected}, got {}", actual.kind()))
            .actual(actual.clone()),
    );
}

/// Render a label argument the way it appears in failure paths.
pub(crate) fn label(name: &str, arg: impl std::fmt::Debug) -> String { format!("{name}({arg:?})") }
