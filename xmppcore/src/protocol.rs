use anyhow::Result;
use thiserror::Error;
use xmppcore_xml::builder::NodeBuilder;
use xmppcore_xml::node::Node;

/// Represents a type that maps to an XMPP protocol element.
pub trait ProtocolNode: Sized {
    /// The XML tag name (e.g., "message", "error").
    fn tag(&self) -> &'static str;

    /// Convert the struct into a protocol `Node`.
    fn into_node(self) -> Node;

    /// Parse a protocol `Node` into the struct.
    fn try_from_node(node: &Node) -> Result<Self>;
}

/// A closed set of payload-less elements that share one namespace, where the
/// element name itself carries the value (`<composing/>`, `<no-store/>`, ...).
///
/// `ORDER` is the priority used when decoding: the first variant whose
/// element is present in the right namespace wins.
pub trait ElementEnum: Copy + 'static {
    const NAMESPACE: &'static str;
    const ORDER: &'static [Self];

    fn element_name(&self) -> &'static str;

    fn to_node(self) -> Node {
        NodeBuilder::new(self.element_name())
            .attr("xmlns", Self::NAMESPACE)
            .build()
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown {kind} value '{value}'")]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
}

/// Defines a unit-variant enum together with its wire names.
///
/// Generates `as_str()`, `from_wire()`, `TryFrom<&str>`, `Display`, an `ALL` slice in
/// declaration order, and serde impls that use the wire names. Mark a variant
/// `#[default]` and derive `Default` through the outer attributes to pick the
/// fallback used for unrecognised input.
///
/// ```ignore
/// string_enum! {
///     #[derive(Default)]
///     pub enum ErrorType {
///         #[default]
///         Cancel = "cancel",
///         Modify = "modify",
///     }
/// }
/// ```
#[macro_export]
macro_rules! string_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident = $wire:literal
            ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ::serde::Serialize, ::serde::Deserialize)]
        $vis enum $name {
            $(
                $(#[$variant_meta])*
                #[serde(rename = $wire)]
                $variant,
            )+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $wire,)+
                }
            }

            pub fn from_wire(value: &str) -> Option<Self> {
                match value {
                    $($wire => Some($name::$variant),)+
                    _ => None,
                }
            }
        }

        impl TryFrom<&str> for $name {
            type Error = $crate::protocol::UnknownVariant;

            fn try_from(value: &str) -> ::std::result::Result<Self, $crate::protocol::UnknownVariant> {
                $name::from_wire(value).ok_or_else(|| $crate::protocol::UnknownVariant {
                    kind: stringify!($name),
                    value: value.to_string(),
                })
            }
        }

        impl ::std::fmt::Display for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}
