//! Shared vocabulary of the PayzCore API.
//!
//! Every enum here is forward compatible: a value the server introduces
//! after this crate was released is kept verbatim in an `Other` variant
//! instead of failing deserialization.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Declares a string-backed enum with a catch-all `Other(String)` variant.
macro_rules! open_enum {
    (
        $(#[$meta:meta])*
        pub enum $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident => $text:literal, )+
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash)]
        pub enum $name {
            $( $(#[$vmeta])* $variant, )+
            /// A value not known to this version of the crate.
            Other(String),
        }

        impl $name {
            /// All values known to this version of the crate.
            pub const KNOWN: &'static [&'static str] = &[$($text),+];

            /// The wire representation.
            #[must_use]
            pub fn as_str(&self) -> &str {
                match self {
                    $( Self::$variant => $text, )+
                    Self::Other(raw) => raw,
                }
            }

            /// Parses a wire value, keeping unknown values as [`Self::Other`].
            #[must_use]
            pub fn from_wire(raw: &str) -> Self {
                match raw {
                    $( $text => Self::$variant, )+
                    other => Self::Other(other.to_string()),
                }
            }

            /// Returns true if the value is one of [`Self::KNOWN`].
            #[must_use]
            pub const fn is_known(&self) -> bool {
                !matches!(self, Self::Other(_))
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.as_str())
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let raw = String::deserialize(deserializer)?;
                Ok(Self::from_wire(&raw))
            }
        }
    };
}

open_enum! {
    /// Blockchain network a payment is monitored on.
    pub enum Network {
        /// Tron.
        Trc20 => "TRC20",
        /// BNB Smart Chain.
        Bep20 => "BEP20",
        /// Ethereum.
        Erc20 => "ERC20",
        /// Polygon PoS.
        Polygon => "POLYGON",
        /// Arbitrum One.
        Arbitrum => "ARBITRUM",
    }
}

open_enum! {
    /// Stablecoin a payment is denominated in.
    ///
    /// Defaults to USDT, matching the server.
    #[derive(Default)]
    pub enum Token {
        /// Tether.
        #[default]
        Usdt => "USDT",
        /// USD Coin.
        Usdc => "USDC",
    }
}

open_enum! {
    /// Lifecycle state of a payment.
    pub enum PaymentStatus {
        Pending => "pending",
        Confirming => "confirming",
        Partial => "partial",
        Paid => "paid",
        Overpaid => "overpaid",
        Expired => "expired",
        Cancelled => "cancelled",
    }
}

open_enum! {
    /// Kind of webhook notification.
    pub enum WebhookEventKind {
        Completed => "payment.completed",
        Overpaid => "payment.overpaid",
        Partial => "payment.partial",
        Expired => "payment.expired",
        Cancelled => "payment.cancelled",
    }
}

/// Network names known to this version of the crate.
pub const SUPPORTED_NETWORKS: &[&str] = Network::KNOWN;

/// Token symbols known to this version of the crate.
pub const SUPPORTED_TOKENS: &[&str] = Token::KNOWN;
