//! Macros for declaring decimal-coded wire enums.

/// Declare a closed enumeration whose external form is its decimal id.
///
/// Every variant carries an explicit id. The generated type is `Copy`,
/// totally ordered by declaration id, prints as the decimal id through
/// `Display`, parses back through `FromStr`, and serializes as a decimal
/// string so the same text is used for persistence and for the payload wire
/// format.
///
/// # Example
///
/// ```
/// use chatflow::wire_enum;
///
/// wire_enum! {
///     pub enum Light {
///         Red = 0,
///         Amber = 1,
///         Green = 2,
///     }
/// }
///
/// assert_eq!(Light::Amber.to_string(), "1");
/// assert_eq!("2".parse::<Light>().unwrap(), Light::Green);
/// assert!("7".parse::<Light>().is_err());
/// assert_eq!(Light::Green.name(), "Green");
/// ```
#[macro_export]
macro_rules! wire_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident = $id:literal
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
        #[repr(u16)]
        $vis enum $name {
            $(
                $(#[$variant_meta])*
                $variant = $id
            ),*
        }

        impl $name {
            /// Every variant in declaration order.
            pub const ALL: &'static [$name] = &[$(Self::$variant),*];

            /// Decimal identifier used on the wire and in storage.
            pub fn id(self) -> u16 {
                self as u16
            }

            /// Look up a variant by its decimal identifier.
            pub fn from_id(id: u16) -> Option<Self> {
                match id {
                    $($id => Some(Self::$variant),)*
                    _ => None,
                }
            }

            /// Variant name for logs.
            pub fn name(self) -> &'static str {
                match self {
                    $(Self::$variant => stringify!($variant)),*
                }
            }
        }

        impl ::std::fmt::Display for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                write!(f, "{}", self.id())
            }
        }

        impl ::std::str::FromStr for $name {
            type Err = $crate::core::ParseError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let id: u64 = s.parse().map_err(|_| $crate::core::ParseError::NotDecimal {
                    kind: stringify!($name),
                    input: s.to_string(),
                })?;
                u16::try_from(id)
                    .ok()
                    .and_then(Self::from_id)
                    .ok_or($crate::core::ParseError::Unknown {
                        kind: stringify!($name),
                        id,
                    })
            }
        }

        impl $crate::__serde::Serialize for $name {
            fn serialize<Ser: $crate::__serde::Serializer>(&self, serializer: Ser) -> Result<Ser::Ok, Ser::Error> {
                serializer.collect_str(self)
            }
        }

        impl<'de> $crate::__serde::Deserialize<'de> for $name {
            fn deserialize<D: $crate::__serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let raw = <::std::string::String as $crate::__serde::Deserialize>::deserialize(deserializer)?;
                raw.parse().map_err($crate::__serde::de::Error::custom)
            }
        }
    };
}
