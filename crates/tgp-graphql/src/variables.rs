//! GraphQL variable bindings.

use serde::Serialize;
use serde_json::{Map, Value};

/// Variable name used for the page-size limit of paginated queries.
pub const PAGE_LIMIT: &str = "pageLimit";

/// Variable bindings for one GraphQL operation.
///
/// Built once per call; paginated reads clone it and swap the cursor for
/// every follow-up page.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Variables(Map<String, Value>);

impl Variables {
    /// Empty bindings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `id`.
    #[must_use]
    pub fn id(self, value: impl Into<String>) -> Self {
        self.id_named("id", value)
    }

    /// Bind an id under a custom variable name.
    #[must_use]
    pub fn id_named(mut self, name: &str, value: impl Into<String>) -> Self {
        self.0.insert(name.to_string(), Value::String(value.into()));
        self
    }

    /// Bind a list of ids.
    #[must_use]
    pub fn ids<I, S>(mut self, name: &str, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let ids = values
            .into_iter()
            .map(|value| Value::String(value.into()))
            .collect();
        self.0.insert(name.to_string(), Value::Array(ids));
        self
    }

    /// Bind a value unconditionally.
    #[must_use]
    pub fn value(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.0.insert(name.to_string(), value.into());
        self
    }

    /// Bind `value` when present; a `None` leaves the variable unset.
    #[must_use]
    pub fn var<V: Into<Value>>(self, name: &str, value: Option<V>) -> Self {
        match value {
            Some(value) => self.value(name, value),
            None => self,
        }
    }

    /// Bind `value`, sending an explicit `null` for the type's zero value.
    #[must_use]
    pub fn nullable<V>(mut self, name: &str, value: V) -> Self
    where
        V: Into<Value> + Default + PartialEq,
    {
        let value = if value == V::default() {
            Value::Null
        } else {
            value.into()
        };
        self.0.insert(name.to_string(), value);
        self
    }

    /// Bind a cursor variable to `null`, requesting the first page.
    #[must_use]
    pub fn cursor(mut self, name: &str) -> Self {
        self.0.insert(name.to_string(), Value::Null);
        self
    }

    /// Bind the page-size limit.
    #[must_use]
    pub fn page_limit(self, limit: usize) -> Self {
        self.value(PAGE_LIMIT, limit)
    }

    /// Point a cursor variable at the page after `cursor`.
    pub fn set_cursor(&mut self, name: &str, cursor: &str) {
        self.0
            .insert(name.to_string(), Value::String(cursor.to_string()));
    }

    /// Look up a bound value.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    /// Number of bound variables.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` when nothing is bound.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Consume into a JSON object.
    #[must_use]
    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn optional_values_are_skipped() {
        let vars = Variables::new()
            .var("name", Some("alpha"))
            .var::<String>("alias", None);
        assert_eq!(vars.into_value(), json!({"name": "alpha"}));
    }

    #[test]
    fn zero_values_become_null() {
        let vars = Variables::new()
            .nullable("alias", String::new())
            .nullable("isVisible", false)
            .nullable("count", 0_i64)
            .nullable("name", "beta".to_string());
        assert_eq!(
            vars.into_value(),
            json!({"alias": null, "isVisible": null, "count": null, "name": "beta"})
        );
    }

    #[test]
    fn page_variables() {
        let mut vars = Variables::new()
            .id("R1")
            .cursor("accessEndCursor")
            .page_limit(50);
        assert_eq!(vars.get("accessEndCursor"), Some(&Value::Null));

        vars.set_cursor("accessEndCursor", "c1");
        assert_eq!(
            vars.into_value(),
            json!({"id": "R1", "accessEndCursor": "c1", "pageLimit": 50})
        );
    }

    #[test]
    fn ids_are_bound_as_list() {
        let vars = Variables::new().ids("groupIds", ["g1", "g2"]);
        assert_eq!(vars.into_value(), json!({"groupIds": ["g1", "g2"]}));
    }
}
