//! The conversion and transfer registries.
//!
//! [`ConversionRegistry`] stores direct single-step converters keyed by
//! `(source kind, destination kind)`, plus a parallel table of specialized
//! transfer functions. Registration is append-only with replacement semantics:
//! registering the same key twice keeps the later entry. No ordering among
//! distinct entries is observable; the shortest-path planner is the only
//! resolver.
//!
//! The registry also answers the graph questions the planner asks: the
//! neighbors of a node (including `many`-lifted edges), the kinds a value can
//! act as, and the kinds a destination expands to.

use crate::error::ConvertError;
use crate::kind::{assignable, Kind};
use crate::options::Options;
use crate::value::Value;
use futures::future::BoxFuture;
use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;

/// A registered single-step converter.
pub type ConvertFn =
  Arc<dyn Fn(Value, Options) -> BoxFuture<'static, Result<Value, ConvertError>> + Send + Sync>;

/// A registered specialized transfer.
pub type TransferFn = Arc<
  dyn Fn(Value, Value, Options) -> BoxFuture<'static, Result<(), ConvertError>> + Send + Sync,
>;

/// The direct-converter and direct-transfer tables.
#[derive(Default)]
pub struct ConversionRegistry {
  conversions: HashMap<Kind, HashMap<Kind, ConvertFn>>,
  transfers: HashMap<Kind, HashMap<Kind, TransferFn>>,
}

impl ConversionRegistry {
  /// Creates an empty registry.
  pub fn new() -> Self {
    Self::default()
  }

  /// Registers a direct converter from `src` to `dst`.
  ///
  /// Registering an identical `(src, dst)` pair again replaces the earlier
  /// entry.
  pub fn register<F, Fut>(&mut self, src: impl Into<Kind>, dst: impl Into<Kind>, converter: F)
  where
    F: Fn(Value, Options) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Value, ConvertError>> + Send + 'static,
  {
    let converter: ConvertFn = Arc::new(move |value, options| Box::pin(converter(value, options)));
    self
      .conversions
      .entry(src.into())
      .or_default()
      .insert(dst.into(), converter);
  }

  /// Registers a specialized transfer from `src` to `dst`.
  ///
  /// A registered transfer owns the whole move, including the closing
  /// discipline: it must close both endpoints on normal completion.
  pub fn register_transfer<F, Fut>(
    &mut self,
    src: impl Into<Kind>,
    dst: impl Into<Kind>,
    transfer: F,
  ) where
    F: Fn(Value, Value, Options) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<(), ConvertError>> + Send + 'static,
  {
    let transfer: TransferFn =
      Arc::new(move |source, sink, options| Box::pin(transfer(source, sink, options)));
    self
      .transfers
      .entry(src.into())
      .or_default()
      .insert(dst.into(), transfer);
  }

  /// Looks up the direct converter for an exact `(src, dst)` edge.
  pub fn conversion(&self, src: Kind, dst: Kind) -> Option<ConvertFn> {
    self.conversions.get(&src)?.get(&dst).cloned()
  }

  /// Enumerates every registered transfer edge.
  pub fn transfer_entries(&self) -> impl Iterator<Item = (Kind, Kind, TransferFn)> + '_ {
    self.transfers.iter().flat_map(|(src, dsts)| {
      dsts
        .iter()
        .map(move |(dst, transfer)| (*src, *dst, transfer.clone()))
    })
  }

  /// The neighbors of `from` in the conversion graph.
  ///
  /// These are the destinations of direct edges out of `from`, plus, when
  /// `from` is `many(v)`, the destinations of direct edges out of `v` lifted
  /// into `many(...)`.
  pub fn neighbors(&self, from: Kind) -> Vec<Kind> {
    let mut out: Vec<Kind> = Vec::new();
    if let Some(dsts) = self.conversions.get(&from) {
      out.extend(dsts.keys().copied());
    }
    if let Kind::Many(inner) = from {
      if let Some(dsts) = self.conversions.get(&Kind::One(inner)) {
        for dst in dsts.keys() {
          if let Kind::One(shape) = dst {
            let lifted = Kind::Many(*shape);
            if !out.contains(&lifted) {
              out.push(lifted);
            }
          }
        }
      }
    }
    out
  }

  /// Enumerates the registered kinds a value of kind `k` can act as.
  ///
  /// Always includes `k` itself, then every registered source kind assignable
  /// from `k`, including `many` liftings of registered single-value source
  /// kinds.
  pub fn valid_sources(&self, k: Kind) -> Vec<Kind> {
    let mut out = vec![k];
    for src in self.conversions.keys() {
      if *src != k && assignable(k, *src) {
        out.push(*src);
      }
    }
    if let Kind::Many(inner) = k {
      for src in self.conversions.keys() {
        if let Kind::One(shape) = src {
          let lifted = Kind::Many(*shape);
          if inner.subtype_of(*shape) && !out.contains(&lifted) {
            out.push(lifted);
          }
        }
      }
    }
    out
  }

  /// Expands a destination kind into the concrete kinds that satisfy it.
  ///
  /// A concrete tag maps to itself, a capability expands to its implementing
  /// shapes, and a `many` stays a `many`.
  pub fn valid_destinations(&self, k: Kind) -> Vec<Kind> {
    match k {
      Kind::One(shape) => vec![Kind::One(shape)],
      Kind::Many(shape) => vec![Kind::Many(shape)],
      Kind::Cap(capability) => capability
        .implementors()
        .iter()
        .map(|shape| Kind::One(*shape))
        .collect(),
    }
  }
}
