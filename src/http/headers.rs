//! Security header set module
//!
//! The server attaches one fixed set of security headers to every response
//! it writes, regardless of status. The set is compiled from configuration
//! once at startup so per-request work is a plain iteration.

use hyper::header::{HeaderMap, HeaderName, HeaderValue, InvalidHeaderValue};
use thiserror::Error;

use crate::config::HeadersConfig;

/// A configured header value failed validation
#[derive(Debug, Error)]
#[error("invalid value for {name}: {source}")]
pub struct HeaderSetError {
    pub name: &'static str,
    #[source]
    source: InvalidHeaderValue,
}

/// Precompiled response header set
#[derive(Debug, Clone)]
pub struct SecurityHeaders {
    pairs: Vec<(HeaderName, HeaderValue)>,
}

impl SecurityHeaders {
    /// Compile the header set from configuration
    ///
    /// Fails if any configured value is not a valid HTTP header value, so a
    /// bad deployment is caught at startup rather than at response time.
    pub fn from_config(config: &HeadersConfig) -> Result<Self, HeaderSetError> {
        let mut pairs = Vec::with_capacity(7);

        let mut push = |name: HeaderName, field: &'static str, value: &str| {
            HeaderValue::from_str(value)
                .map(|v| pairs.push((name, v)))
                .map_err(|source| HeaderSetError {
                    name: field,
                    source,
                })
        };

        push(
            HeaderName::from_static("referrer-policy"),
            "referrer_policy",
            &config.referrer_policy,
        )?;
        push(
            HeaderName::from_static("x-xss-protection"),
            "xss_protection",
            &config.xss_protection,
        )?;
        push(
            HeaderName::from_static("x-content-type-options"),
            "content_type_options",
            &config.content_type_options,
        )?;
        push(
            HeaderName::from_static("content-security-policy"),
            "content_security_policy",
            &config.content_security_policy,
        )?;
        push(
            HeaderName::from_static("x-frame-options"),
            "frame_options",
            &config.frame_options,
        )?;

        if let Some(origin) = &config.access_control_allow_origin {
            push(
                HeaderName::from_static("access-control-allow-origin"),
                "access_control_allow_origin",
                origin,
            )?;
        }
        if let Some(compat) = &config.ua_compatible {
            push(
                HeaderName::from_static("x-ua-compatible"),
                "ua_compatible",
                compat,
            )?;
        }

        Ok(Self { pairs })
    }

    /// Insert every header of the set into the given map
    pub fn apply(&self, headers: &mut HeaderMap) {
        for (name, value) in &self.pairs {
            headers.insert(name.clone(), value.clone());
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Iterate over the compiled pairs
    pub fn iter(&self) -> impl Iterator<Item = (&HeaderName, &HeaderValue)> + '_ {
        self.pairs.iter().map(|(n, v)| (n, v))
    }
}
