//! Backend API client

pub mod api;
pub mod client;
pub mod components;
pub mod deployments;
pub mod jobs;
pub mod manifests;
pub mod models;
pub mod usecases;

/// Percent-encode one path segment. Form encoding writes spaces as `+`,
/// which means a literal plus inside a path, so those become `%20`.
pub(crate) fn segment(value: &str) -> String {
    url::form_urlencoded::byte_serialize(value.as_bytes())
        .collect::<String>()
        .replace('+', "%20")
}
