//! Cooperative resource entities.
//!
//! Business fields are opaque to the client: each entity exposes its `id`
//! and keeps every other field verbatim in `fields`.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A REST collection served under a fixed path.
pub trait Resource: Serialize + DeserializeOwned + Send + Sync + 'static {
    /// Collection path, with leading and trailing slash.
    const PATH: &'static str;
    /// Singular name used in logs and CLI output.
    const NAME: &'static str;

    /// Server-assigned identifier, once persisted.
    fn id(&self) -> Option<i64>;
}

macro_rules! resource {
    ($(#[$meta:meta])* $name:ident, $path:literal, $label:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
        pub struct $name {
            #[serde(default, skip_serializing_if = "Option::is_none")]
            pub id: Option<i64>,
            #[serde(flatten)]
            pub fields: Map<String, Value>,
        }

        impl $name {
            /// Build a new (unsaved) entity from a JSON object's fields.
            pub fn from_fields(fields: Map<String, Value>) -> Self {
                Self { id: None, fields }
            }

            /// Read one field by name.
            pub fn field(&self, name: &str) -> Option<&Value> {
                self.fields.get(name)
            }
        }

        impl Resource for $name {
            const PATH: &'static str = $path;
            const NAME: &'static str = $label;

            fn id(&self) -> Option<i64> {
                self.id
            }
        }
    };
}

resource!(
    /// Agricultural campaign (campaña).
    Campaign,
    "/api/campanias/",
    "campaña"
);

resource!(
    /// Field labor record (labor).
    Labor,
    "/api/labores/",
    "labor"
);

resource!(
    /// Plot of land (parcela).
    Plot,
    "/api/parcelas/",
    "parcela"
);

resource!(
    /// Cooperative member (socio).
    Member,
    "/api/socios/",
    "socio"
);
