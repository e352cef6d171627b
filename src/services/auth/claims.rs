use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Decoded token claims.
///
/// An open mapping: unknown claims are kept and passed through untouched.
/// Typed accessors cover the claims this service issues and reads.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Claims(Map<String, Value>);

impl Claims {
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    pub fn sub(&self) -> Option<&str> {
        self.get("sub").and_then(Value::as_str)
    }

    pub fn iat(&self) -> Option<i64> {
        self.get("iat").and_then(Value::as_i64)
    }

    pub fn exp(&self) -> Option<i64> {
        self.get("exp").and_then(Value::as_i64)
    }

    /// Space-separated `scope` claim, when it is a string.
    pub fn scope(&self) -> Option<&str> {
        self.get("scope").and_then(Value::as_str)
    }

    /// Every scope granted by this claim set.
    ///
    /// Union of the whitespace-split `scope` string and the string elements
    /// of a `scopes` array. Non-string entries are skipped.
    pub fn granted_scopes(&self) -> impl Iterator<Item = &str> {
        let from_scope = self.scope().into_iter().flat_map(str::split_whitespace);
        let from_list = self
            .get("scopes")
            .and_then(Value::as_array)
            .into_iter()
            .flatten()
            .filter_map(Value::as_str);

        from_scope.chain(from_list)
    }
}

impl From<Map<String, Value>> for Claims {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}
