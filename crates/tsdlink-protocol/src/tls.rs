//! Per-connection TLS trust policy.

use reqwest::ClientBuilder;
use tracing::warn;
use tsdlink_types::ContentDescription;

/// How server certificates are validated for one description's requests.
///
/// The policy is applied to the client built for that description only; it
/// never leaks into other clients in the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TrustPolicy {
    /// Regular certificate chain and host name validation.
    #[default]
    Verify,
    /// Accept any certificate chain and any host name.
    ///
    /// This is a trust-everything mode for development servers and
    /// self-signed certificates. It removes the protection TLS gives against
    /// impersonation and must be opted in explicitly per connection.
    ///
    /// Host name mismatches are accepted silently: the rustls verifier skips
    /// the host name check together with chain validation, so no mismatch is
    /// ever observed or logged. Only the switch to this mode is logged.
    TrustAll,
}

impl TrustPolicy {
    /// Selects the policy for a description: trust-all only for `https`
    /// endpoints explicitly marked as trusted.
    #[must_use]
    pub const fn for_description(description: &ContentDescription) -> Self {
        if description.is_ssl() && description.is_trusted() {
            Self::TrustAll
        } else {
            Self::Verify
        }
    }

    /// Returns true for [`TrustPolicy::TrustAll`].
    #[must_use]
    pub const fn is_trust_all(&self) -> bool {
        matches!(self, Self::TrustAll)
    }

    /// Applies the policy to a client builder.
    ///
    /// With rustls, accepting invalid certificates also disables the host name
    /// check, so a mismatching host is accepted as well.
    #[must_use]
    pub fn apply(self, builder: ClientBuilder) -> ClientBuilder {
        match self {
            Self::Verify => builder,
            Self::TrustAll => {
                warn!("certificate and host name verification disabled, mismatches are not reported");
                builder.danger_accept_invalid_certs(true)
            }
        }
    }
}
