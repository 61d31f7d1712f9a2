//! Authority (namespace + code) pairs such as `EPSG:4326`.

use serde::{Deserialize, Serialize};
use std::fmt;

pub const EPSG: &str = "EPSG";
pub const ESRI: &str = "ESRI";

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Authority {
    pub name: String,
    pub code: String,
}

impl Authority {
    pub fn new(name: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            code: code.into(),
        }
    }

    pub fn epsg(id: i32) -> Self {
        Self::new(EPSG, id.to_string())
    }

    pub fn esri(id: i32) -> Self {
        Self::new(ESRI, id.to_string())
    }

    /// Numeric EPSG code, if this is an EPSG authority.
    pub fn epsg_id(&self) -> Option<i32> {
        if self.name == EPSG {
            self.code.parse().ok()
        } else {
            None
        }
    }
}

impl fmt::Display for Authority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.name, self.code)
    }
}
