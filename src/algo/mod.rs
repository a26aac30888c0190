/*!
# Bipartite Matching Algorithms

This module provides the matching algorithms of this crate. A problem consists of two sides `A`
and `B` given as slices of arbitrary elements, plus a function that relates elements of both
sides: either a predicate (*may `a` and `b` be paired?*) or a distance.

All algorithms are re-exported at the top level of this module, so you can simply do:
```rust
use bimatch::algo::*;
```

Available matchers:
- [`MaximumCardinality`]: largest possible matching (Hopcroft–Karp),
- [`NearestNeighbour`]: greedy matching of the closest pairs first,
- [`MinimumDistance`]: matching minimizing the sum of distances (Kuhn–Munkres),

and [`extract_bipartite_subgraphs`] to split a large problem into its connected components.
All matchers are configured as structs before being run on an input; the façade functions in
[`matching`] cover the common case in a single call.
*/

pub mod hopcroft_karp;
pub mod kuhn_munkres;
pub mod matching;
pub mod minimum_distance;
pub mod nearest_neighbour;
pub mod subgraphs;

use crate::{error::*, node::*};

pub use hopcroft_karp::*;
pub use kuhn_munkres::*;
pub use matching::*;
pub use minimum_distance::*;
pub use nearest_neighbour::*;
pub use subgraphs::*;
