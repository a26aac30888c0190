/*!
# Scoring

Turns matchings and labelings into summary statistics:
- [`MatchCalculator`] matches predicted against actual localisations and reports a
  [`MatchResult`] (true/false positives, false negatives, precision, recall, Jaccard, RMSD),
- [`RankedScoreCalculator`] scores ranked predictions truncated after any rank and computes
  precision-recall curves,
- [`RandIndex`] compares two clusterings of the same elements.

```rust
use bimatch::score::*;
```
*/

pub mod match_calculator;
pub mod rand_index;
pub mod ranked;
pub mod result;

pub use match_calculator::*;
pub use rand_index::*;
pub use ranked::*;
pub use result::*;
