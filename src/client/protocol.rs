use std::{collections::BTreeMap, fmt};

use serde::de::{Deserializer, MapAccess, Visitor};

use crate::foundation::error::{SpriteError, SpriteResult};

#[derive(Clone, Debug, PartialEq, serde::Deserialize)]
/// Acknowledgment returned by `POST /prompt`.
pub struct PromptAck {
    /// Backend-assigned job id.
    pub prompt_id: String,
    /// Queue position, when reported.
    #[serde(default)]
    pub number: Option<u64>,
    /// Per-node validation errors; non-empty means the graph was rejected.
    #[serde(default)]
    pub node_errors: serde_json::Value,
}

impl PromptAck {
    /// Parse an acknowledgment body, rejecting missing ids and reported node errors.
    pub fn parse(body: &str) -> SpriteResult<Self> {
        let ack: PromptAck = serde_json::from_str(body)
            .map_err(|e| SpriteError::submission(format!("malformed acknowledgment: {e}")))?;
        if ack.prompt_id.trim().is_empty() {
            return Err(SpriteError::submission(
                "malformed acknowledgment: empty prompt_id",
            ));
        }
        let has_node_errors = match &ack.node_errors {
            serde_json::Value::Null => false,
            serde_json::Value::Object(m) => !m.is_empty(),
            serde_json::Value::Array(a) => !a.is_empty(),
            _ => true,
        };
        if has_node_errors {
            return Err(SpriteError::submission(format!(
                "backend rejected workflow: {}",
                ack.node_errors
            )));
        }
        Ok(ack)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
/// Descriptor of one image emitted by an output node.
pub struct ImageRef {
    /// File name on the backend.
    pub filename: String,
    /// Subfolder below the backend's output root.
    #[serde(default)]
    pub subfolder: String,
    /// Storage area (`output`, `temp`, ...).
    #[serde(default = "default_image_type", rename = "type")]
    pub kind: String,
}

fn default_image_type() -> String {
    "output".to_string()
}

#[derive(Clone, Debug, Default, PartialEq, serde::Deserialize)]
/// Artifacts emitted by one output node. Non-image outputs are ignored.
pub struct NodeOutput {
    /// Images in emission order.
    #[serde(default)]
    pub images: Vec<ImageRef>,
}

/// Node outputs in the order the backend wrote them.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct OrderedOutputs(pub Vec<(String, NodeOutput)>);

impl<'de> serde::Deserialize<'de> for OrderedOutputs {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct OrderedVisitor;

        impl<'de> Visitor<'de> for OrderedVisitor {
            type Value = OrderedOutputs;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of node id to node output")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
                let mut out = Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some((k, v)) = map.next_entry::<String, NodeOutput>()? {
                    out.push((k, v));
                }
                Ok(OrderedOutputs(out))
            }
        }

        deserializer.deserialize_map(OrderedVisitor)
    }
}

#[derive(Clone, Debug, Default, PartialEq, serde::Deserialize)]
/// One job's history record.
pub struct HistoryRecord {
    /// Outputs keyed by node id, in backend order.
    #[serde(default)]
    pub outputs: OrderedOutputs,
}

impl HistoryRecord {
    /// Every image descriptor: output nodes in backend order, images in emission order.
    pub fn images(&self) -> impl Iterator<Item = (&str, &ImageRef)> {
        self.outputs
            .0
            .iter()
            .flat_map(|(node, out)| out.images.iter().map(move |img| (node.as_str(), img)))
    }
}

/// Extract `job_id`'s record from a `GET /history/{id}` body.
pub fn parse_history(body: &str, job_id: &str) -> SpriteResult<Option<HistoryRecord>> {
    let mut all: BTreeMap<String, HistoryRecord> = serde_json::from_str(body)
        .map_err(|e| SpriteError::artifact_not_found(format!("malformed history body: {e}")))?;
    Ok(all.remove(job_id))
}

#[derive(Clone, Debug, PartialEq)]
/// Structured event delivered over the session's event channel.
pub enum ServerEvent {
    /// A node started executing; `node == None` means the job's pipeline drained.
    Executing {
        /// Node id, or `None` for the drain sentinel.
        node: Option<String>,
        /// Job the event belongs to.
        prompt_id: Option<String>,
    },
    /// Backend-side execution failure with its raw payload.
    ExecutionError {
        /// Job the error belongs to, when reported.
        prompt_id: Option<String>,
        /// Error details as sent by the backend.
        data: serde_json::Value,
    },
    /// Any other event type (status, progress, cached, ...).
    Other(String),
}

#[derive(serde::Deserialize)]
struct RawEvent {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    data: serde_json::Value,
}

impl ServerEvent {
    /// Parse one text message from the event channel.
    pub fn parse(text: &str) -> SpriteResult<Self> {
        let raw: RawEvent = serde_json::from_str(text)?;
        let prompt_id = str_field(&raw.data, "prompt_id");
        Ok(match raw.kind.as_str() {
            "executing" => ServerEvent::Executing {
                node: str_field(&raw.data, "node"),
                prompt_id,
            },
            "execution_error" => ServerEvent::ExecutionError {
                prompt_id,
                data: raw.data,
            },
            _ => ServerEvent::Other(raw.kind.clone()),
        })
    }
}

fn str_field(data: &serde_json::Value, key: &str) -> Option<String> {
    data.get(key)
        .and_then(serde_json::Value::as_str)
        .map(str::to_string)
}

#[cfg(test)]
#[path = "../../tests/unit/client/protocol.rs"]
mod tests;
