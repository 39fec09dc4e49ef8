#![allow(clippy::missing_inline_in_public_items)]

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::math::{Angle, LayerMask, Positive, PositiveSign, ZeroOne};

/// Restricted numbers are written as their plain value and checked when read back.
macro_rules! restricted_serde {
    ($wrapper:ident, $what:literal) => {
        impl Serialize for $wrapper<f64> {
            fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
            where
                S: Serializer,
            {
                self.into_inner().serialize(serializer)
            }
        }

        impl<'de> Deserialize<'de> for $wrapper<f64> {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: Deserializer<'de>,
            {
                let value = f64::deserialize(deserializer)?;
                $wrapper::<f64>::try_new(value).map_err(|e| {
                    serde::de::Error::custom(format_args!(concat!("invalid ", $what, ": {}"), e))
                })
            }
        }
    };
}

restricted_serde!(PositiveSign, "non-negative number");
restricted_serde!(ZeroOne, "number between 0 and 1");
restricted_serde!(Positive, "positive number");

/// Angles are written in radians; any finite value is accepted and wrapped.
impl Serialize for Angle {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.radians().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Angle {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let radians = f64::deserialize(deserializer)?;
        if radians.is_finite() {
            Ok(Angle::from_radians(radians))
        } else {
            Err(serde::de::Error::custom("angle must be finite"))
        }
    }
}

impl Serialize for LayerMask {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.bits().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for LayerMask {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(LayerMask::from_bits_retain(u64::deserialize(deserializer)?))
    }
}
