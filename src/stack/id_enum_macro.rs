/// Defines a catalog identifier enum.
///
/// Each variant has a serde key (stable, lowercase, used in catalogs and JSON output) and a
/// display name. Unknown keys deserialize into `Custom(String)` so catalog-defined entries
/// stay representable without code changes.
#[macro_export]
macro_rules! define_id_enum {
    (
        $(#[$enum_meta:meta])*
        $enum_name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident => $key:literal : $display_name:literal
                $( | $alias:literal )*
            ),* $(,)?
        }
    ) => {
        $(#[$enum_meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub enum $enum_name {
            $(
                $(#[$variant_meta])*
                $variant,
            )*
            Custom(String),
        }

        impl serde::Serialize for $enum_name {
            fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
            where
                S: serde::Serializer,
            {
                serializer.serialize_str(self.key())
            }
        }

        impl<'de> serde::Deserialize<'de> for $enum_name {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: serde::Deserializer<'de>,
            {
                let s = String::deserialize(deserializer)?;
                Ok(Self::parse(&s))
            }
        }

        impl $enum_name {
            /// Stable catalog key, e.g. `"nodejs"`.
            pub fn key(&self) -> &str {
                match self {
                    $(
                        Self::$variant => $key,
                    )*
                    Self::Custom(name) => name,
                }
            }

            /// Human-readable name, e.g. `"Node.js"`.
            pub fn name(&self) -> String {
                match self {
                    $(
                        Self::$variant => $display_name.to_string(),
                    )*
                    Self::Custom(name) => name.clone(),
                }
            }

            /// Resolves a key, display name or alias (case-insensitive) to a known variant.
            pub fn from_name(name: &str) -> Option<Self> {
                let needle = name.trim().to_lowercase();
                $(
                    if needle == $key
                        || needle == $display_name.to_lowercase()
                        $( || needle == $alias )*
                    {
                        return Some(Self::$variant);
                    }
                )*
                None
            }

            /// Like [`Self::from_name`], falling back to `Custom` for unknown names.
            pub fn parse(name: &str) -> Self {
                Self::from_name(name).unwrap_or_else(|| Self::Custom(name.trim().to_string()))
            }

            pub fn is_custom(&self) -> bool {
                matches!(self, Self::Custom(_))
            }

            pub fn all_variants() -> &'static [Self] {
                &[
                    $(
                        Self::$variant,
                    )*
                ]
            }
        }

        impl std::fmt::Display for $enum_name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.name())
            }
        }

        impl std::str::FromStr for $enum_name {
            type Err = std::convert::Infallible;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Ok(Self::parse(s))
            }
        }
    };
}
