/// Smallest order that still lets a full node split into two valid halves.
pub const MIN_ORDER: usize = 2;
/// Order used by `Default`, `FromIterator` and `From<[T; N]>`.
pub const DEFAULT_ORDER: usize = 32;
