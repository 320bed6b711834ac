//! Value object trait: equality by value, not identity.

/// Marker trait for value objects.
///
/// Value objects are immutable and compared by their attribute values; two
/// `Money` amounts of `10.00` are the same amount. To "modify" one, build a
/// new one.
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
