//! Execution of planned conversion chains.
//!
//! The driver resolves a planned node path into executable steps, then
//! applies them in order, threading the options record through every
//! converter. A `many -> many` hop with no direct edge is executed as a lazy
//! lift: the single-value converter is mapped over the sequence, one element
//! per pull. A hop with neither a direct nor a liftable edge is an invariant
//! error, since the planner only proposes edges it found in the registry.

use crate::error::ConvertError;
use crate::kind::{Kind, Shape};
use crate::options::Options;
use crate::registry::{ConversionRegistry, ConvertFn};
use crate::value::Value;

/// One executable hop of a conversion chain.
pub enum Step {
  /// Apply a registered converter to the value.
  Direct(ConvertFn),
  /// Map a registered single-value converter over a lazy sequence.
  Lifted {
    /// The converter for the element kinds.
    converter: ConvertFn,
    /// The element shape of the resulting sequence.
    dst: Shape,
  },
}

/// Resolves a planned node path into executable steps.
///
/// Called under the registry lock; the returned steps hold cloned converter
/// handles and run without touching the registry again.
pub fn plan_steps(registry: &ConversionRegistry, path: &[Kind]) -> Result<Vec<Step>, ConvertError> {
  let mut steps = Vec::with_capacity(path.len().saturating_sub(1));
  for pair in path.windows(2) {
    let (from, to) = (pair[0], pair[1]);
    if let Some(converter) = registry.conversion(from, to) {
      steps.push(Step::Direct(converter));
      continue;
    }
    if let (Kind::Many(x), Kind::Many(y)) = (from, to) {
      if let Some(converter) = registry.conversion(Kind::One(x), Kind::One(y)) {
        steps.push(Step::Lifted { converter, dst: y });
        continue;
      }
    }
    return Err(ConvertError::missing_edge(from, to));
  }
  Ok(steps)
}

/// Applies a resolved chain to an input value.
///
/// An empty chain is the identity pass: the input is returned untouched, not
/// copied. Lifted steps wrap the sequence lazily and return immediately; the
/// element conversions run as the caller pulls.
pub async fn run(steps: Vec<Step>, input: Value, options: &Options) -> Result<Value, ConvertError> {
  let mut value = input;
  for step in steps {
    value = match step {
      Step::Direct(converter) => converter(value, options.clone()).await?,
      Step::Lifted { converter, dst } => {
        let seq = value.into_many()?;
        Value::Many(seq.map_converted(dst, converter, options.clone()))
      }
    };
  }
  Ok(value)
}
