//! Field access for row types.

use crate::value::Value;

/// A row whose fields can be read by name.
///
/// Implement this for record types shown in tables so columns can be
/// declared by key instead of by closure.
///
/// ```
/// use paygrid_seeker::{Number, Seekable, Value};
///
/// struct ApiKey {
///     name: String,
///     requests: u64,
///     revoked: bool,
/// }
///
/// impl Seekable for ApiKey {
///     fn field_value(&self, field: &str) -> Value<'_> {
///         match field {
///             "name" => Value::text(&self.name),
///             "requests" => Value::Number(Number::U64(self.requests)),
///             "revoked" => Value::Bool(self.revoked),
///             _ => Value::None,
///         }
///     }
/// }
/// ```
pub trait Seekable {
    /// Value of `field`, or [`Value::None`] when there is no such field.
    fn field_value(&self, field: &str) -> Value<'_>;

    /// Accessor with the signature the query executors expect.
    fn accessor<'a>(item: &'a Self, field: &str) -> Value<'a>
    where
        Self: Sized,
    {
        item.field_value(field)
    }
}
