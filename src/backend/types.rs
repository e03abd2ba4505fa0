use serde::{Deserialize, Serialize};

use crate::view::{DetailsReply, DetailsView, Mode, NodeRef, PropertyRow};

/// Body of `GET /details/`.
///
/// `id` and `properties` are absent when the backend rejects the request
/// with an `error`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DetailsPayload {
    /// Resource the details describe.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Application-level failure message.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Property rows, in backend order.
    #[serde(default)]
    pub properties: Vec<PropertyPayload>,
}

/// One entry of [`DetailsPayload::properties`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PropertyPayload {
    /// Predicate URI.
    pub predicate: String,
    /// Human label for the predicate.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub predicate_label: Option<String>,
    /// Object value, a URI or a literal.
    pub object: String,
    /// Human label for a URI object.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub object_label: Option<String>,
    /// Whether `object` names a resource.
    #[serde(default)]
    pub is_uri: bool,
}

impl From<PropertyPayload> for PropertyRow {
    fn from(p: PropertyPayload) -> Self {
        Self {
            predicate_id: p.predicate,
            predicate_label: p.predicate_label,
            object_value: p.object,
            object_label: p.object_label,
            is_uri_value: p.is_uri,
        }
    }
}

impl DetailsPayload {
    /// Interpret the payload of a request for `requested`.
    ///
    /// A non-empty `error` field wins over any properties sent alongside
    /// it. An empty one counts as no error.
    pub fn into_reply(self, requested: &NodeRef) -> DetailsReply {
        let id = self
            .id
            .map(NodeRef::from)
            .unwrap_or_else(|| requested.clone());

        match self.error.filter(|message| !message.is_empty()) {
            Some(message) => DetailsReply::Error { id, message },
            None => DetailsReply::View(DetailsView {
                id,
                properties: self.properties.into_iter().map(PropertyRow::from).collect(),
            }),
        }
    }
}

/// Backend routes, relative to the configured base URL.
#[derive(Debug, Clone)]
pub struct Endpoints {
    base_url: String,
}

impl Endpoints {
    /// Routes under `base_url`.
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Base URL without trailing slash.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `/navigation/?inferred={true|false}`
    pub fn navigation(&self, mode: Mode) -> String {
        format!(
            "{}/navigation/?inferred={}",
            self.base_url,
            mode.is_inferred()
        )
    }

    /// `/details/?id={urlencoded}[&inferred=true]`
    ///
    /// Asserted mode is expressed by leaving `inferred` out.
    pub fn details(&self, id: &NodeRef, mode: Mode) -> String {
        let inferred = if mode.is_inferred() { "&inferred=true" } else { "" };
        format!(
            "{}/details/?id={}{}",
            self.base_url,
            urlencoding::encode(id.as_str()),
            inferred
        )
    }
}
