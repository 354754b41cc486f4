use aliri_braid::braid;
use std::fmt;

macro_rules! masked {
    ($ty:ty: $hidden:literal) => {
        impl fmt::Debug for $ty {
            fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str(concat!("***", $hidden, "***"))
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str(concat!("***", $hidden, "***"))
            }
        }
    };
}

/// A bearer session token issued by the platform's authentication service
///
/// The value is the session: anyone holding it can act as the session's
/// identity until it expires or is revoked. It is masked in `Debug` and
/// `Display` output; the raw value is only reachable through
/// [`as_str`][BearerTokenRef::as_str].
#[braid(serde, debug = "owned", display = "owned")]
pub struct BearerToken;

masked!(BearerTokenRef: "SESSION TOKEN");

/// A platform account name
#[braid(serde)]
pub struct Username;

/// A platform account password
#[braid(serde, debug = "owned", display = "owned")]
pub struct Password;

masked!(PasswordRef: "PASSWORD");

/// Identifies a single sign-on provider registered with the platform
#[braid(serde)]
pub struct ProviderKey;

/// An assertion minted by a single sign-on provider
#[braid(serde, debug = "owned", display = "owned")]
pub struct ProviderToken;

masked!(ProviderTokenRef: "PROVIDER TOKEN");

/// Names a reservation server within the platform
#[braid(serde)]
pub struct ServerId;

/// A key under which the credential store files an entry
#[braid]
pub struct CacheKey;
