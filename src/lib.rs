/*!
`bimatch` is a library for **bi**partite **match**ing and the classification scores built on top
of it, designed for comparing localisations in microscopy images:
- match two point sets by an arbitrary distance under a threshold,
- score a predicted set against the ground truth (precision, recall, Jaccard, RMSD),
- score ranked predictions and compare clusterings (Rand index).

# Representation

Both sides `A` and `B` of a matching problem are plain slices of arbitrary elements; vertices are
addressed by their position as [`Node`](crate::node::Node) (`u32`) in the range `0..n`. The
relation between both sides is provided as a closure: either a predicate deciding whether two
elements may be paired, or a distance.

# Design

All algorithms are provided as configurable structs that one can alter to their needs using
the *Builder* / *Setter* pattern before calling the configured algorithm on the input.
Alternatively, the common use cases are covered by free functions that report the result
element-wise to a list of callbacks.

# Usage

There are *4* core submodules you probably want to interact with:
- [`prelude`] includes vertex definitions, coordinates, assignments and the error type,
- [`algo`] includes the matchers ([`MaximumCardinality`](crate::algo::MaximumCardinality),
  [`NearestNeighbour`](crate::algo::NearestNeighbour),
  [`MinimumDistance`](crate::algo::MinimumDistance)) and the decomposition of a problem into
  connected components,
- [`score`] includes the classification statistics,
- [`gens`] includes random point sets and simulated predictions to exercise the matchers.

In most use-cases, `use bimatch::{prelude::*, algo::*, score::*};` suffices for your needs.

```
use bimatch::{prelude::*, score::*};

let actual = [BasePoint::new(0.0, 0.0)];
let predicted = [BasePoint::new(5.0, 5.0)];

let result = MatchCalculator::new(1.0)?.analyse_2d(&actual, &predicted, &mut MatchOutputs::new())?;
assert_eq!((result.tp(), result.fp(), result.fn_()), (0, 1, 1));
assert_eq!(result.jaccard(), 0.0);
# Ok::<(), MatchError>(())
```

# Logging

The library emits [`tracing`] events (`debug` for problem sizes and results, `trace` for
intermediate steps) and never installs a subscriber itself.
*/

pub mod algo;
pub mod assignment;
pub mod coord;
pub mod error;
pub mod gens;
pub mod node;
pub mod score;
#[cfg(test)]
pub(crate) mod testing;
pub mod utils;

/// `bimatch::prelude` includes vertex definitions, coordinates, assignments and the error type.
pub mod prelude {
    pub use super::{assignment::*, coord::*, error::*, node::*};
}
