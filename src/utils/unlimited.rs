//! Serialization of unlimited values
//!
//! Infinite focal lengths, radii and clear apertures are written as `null` (JSON has no representation of
//! infinity). A `null` is read back as `f64::INFINITY`.
use serde::{Deserialize, Deserializer, Serializer};

/// Serialize a finite value as is and a non-finite value as `None`.
///
/// # Errors
///
/// This function will return an error if the underlying serializer fails.
pub fn serialize<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    if value.is_finite() {
        serializer.serialize_some(value)
    } else {
        serializer.serialize_none()
    }
}
/// Deserialize a value written by [`serialize`]. `None` yields `f64::INFINITY`.
///
/// # Errors
///
/// This function will return an error if the input is neither a number nor `null`.
pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or(f64::INFINITY))
}

#[cfg(test)]
mod test {
    use serde::{Deserialize, Serialize};

    #[derive(Serialize, Deserialize, Debug, PartialEq)]
    struct Extent {
        #[serde(with = "super")]
        diameter: f64,
    }
    #[test]
    fn json() {
        let unlimited = Extent {
            diameter: f64::INFINITY,
        };
        let json = serde_json::to_string(&unlimited).unwrap();
        assert_eq!(json, r#"{"diameter":null}"#);
        assert_eq!(serde_json::from_str::<Extent>(&json).unwrap(), unlimited);
        let limited = Extent { diameter: 2.5 };
        let json = serde_json::to_string(&limited).unwrap();
        assert_eq!(json, r#"{"diameter":2.5}"#);
        assert_eq!(serde_json::from_str::<Extent>(&json).unwrap(), limited);
        assert!(serde_json::from_str::<Extent>(r#"{"diameter":"wide"}"#).is_err());
    }
    #[test]
    fn yaml() {
        let yaml = serde_yaml::to_string(&Extent {
            diameter: f64::INFINITY,
        })
        .unwrap();
        assert_eq!(yaml, "diameter: null\n");
        assert_eq!(
            serde_yaml::from_str::<Extent>("diameter: 3.0").unwrap().diameter,
            3.0
        );
    }
}
