// Cache codecs.
// Encodes and decodes cached values for each supported format.

use std::path::Path;

use bincode::Options;
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::{Map, Number, Value};

use crate::config::Format;
use crate::error::{Result, StoreError};

/// Leading bytes of every native-format file.
pub(crate) const NATIVE_MAGIC: &[u8; 8] = b"FCNATIVE";

/// Magic plus little-endian u64 payload length.
const NATIVE_HEADER_LEN: usize = NATIVE_MAGIC.len() + 8;

/// Tagged value tree written by the binary and native formats.
///
/// bincode alone is not self-describing, so a stored `serde_json::Value` or
/// a map of mixed values could not be read back. Going through this tree
/// keeps the variant tags in the file and accepts the same values as JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
enum Node {
    Null,
    Bool(bool),
    Int(i64),
    UInt(u64),
    Float(f64),
    Str(String),
    Seq(Vec<Node>),
    Map(Vec<(String, Node)>),
}

impl From<Value> for Node {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => Node::Null,
            Value::Bool(b) => Node::Bool(b),
            Value::Number(n) => {
                if let Some(u) = n.as_u64() {
                    Node::UInt(u)
                } else if let Some(i) = n.as_i64() {
                    Node::Int(i)
                } else {
                    Node::Float(n.as_f64().unwrap_or(f64::NAN))
                }
            }
            Value::String(s) => Node::Str(s),
            Value::Array(items) => Node::Seq(items.into_iter().map(Node::from).collect()),
            Value::Object(map) => {
                Node::Map(map.into_iter().map(|(k, v)| (k, Node::from(v))).collect())
            }
        }
    }
}

impl From<Node> for Value {
    fn from(node: Node) -> Self {
        match node {
            Node::Null => Value::Null,
            Node::Bool(b) => Value::Bool(b),
            Node::Int(i) => Value::from(i),
            Node::UInt(u) => Value::from(u),
            // Non-finite floats have no JSON form; the JSON format stores them as null too.
            Node::Float(f) => Number::from_f64(f).map_or(Value::Null, Value::Number),
            Node::Str(s) => Value::String(s),
            Node::Seq(items) => Value::Array(items.into_iter().map(Value::from).collect()),
            Node::Map(entries) => Value::Object(
                entries
                    .into_iter()
                    .map(|(k, v)| (k, Value::from(v)))
                    .collect::<Map<String, Value>>(),
            ),
        }
    }
}

/// Fixed-width integers, and a file with bytes past the encoded tree is rejected.
fn bincode_options() -> impl Options {
    bincode::DefaultOptions::new()
        .with_fixint_encoding()
        .reject_trailing_bytes()
}

fn encode_tree<T: Serialize + ?Sized>(value: &T) -> Result<Vec<u8>> {
    let tree = serde_json::to_value(value)
        .map(Node::from)
        .map_err(|e| StoreError::Encode(e.to_string()))?;
    bincode_options()
        .serialize(&tree)
        .map_err(|e| StoreError::Encode(e.to_string()))
}

fn decode_tree<T: DeserializeOwned>(bytes: &[u8]) -> std::result::Result<T, String> {
    let tree: Node = bincode_options()
        .deserialize(bytes)
        .map_err(|e| e.to_string())?;
    serde_json::from_value(Value::from(tree)).map_err(|e| e.to_string())
}

/// Encode a value for the given format.
///
/// `minify` only affects JSON output. Every format accepts the values JSON
/// accepts, so maps need string keys.
pub(crate) fn encode<T: Serialize + ?Sized>(
    format: Format,
    value: &T,
    minify: bool,
) -> Result<Vec<u8>> {
    match format {
        Format::Json => {
            let encoded = if minify {
                serde_json::to_vec(value)
            } else {
                serde_json::to_vec_pretty(value)
            };
            encoded.map_err(|e| StoreError::Encode(e.to_string()))
        }
        Format::Binary => encode_tree(value),
        Format::Native => {
            let payload = encode_tree(value)?;
            let mut framed = Vec::with_capacity(NATIVE_HEADER_LEN + payload.len());
            framed.extend_from_slice(NATIVE_MAGIC);
            framed.extend_from_slice(&(payload.len() as u64).to_le_bytes());
            framed.extend_from_slice(&payload);
            Ok(framed)
        }
    }
}

/// Decode non-empty file content. `path` is only used for error reporting.
pub(crate) fn decode<T: DeserializeOwned>(format: Format, bytes: &[u8], path: &Path) -> Result<T> {
    let corrupt = |reason: String| StoreError::CorruptCache {
        path: path.to_path_buf(),
        reason,
    };

    match format {
        Format::Json => serde_json::from_slice(bytes).map_err(|e| corrupt(e.to_string())),
        Format::Binary => decode_tree(bytes).map_err(corrupt),
        Format::Native => {
            let payload = native_payload(bytes).map_err(corrupt)?;
            decode_tree(payload).map_err(corrupt)
        }
    }
}

/// Strip and check the native frame header, returning the payload.
fn native_payload(bytes: &[u8]) -> std::result::Result<&[u8], String> {
    if bytes.len() < NATIVE_HEADER_LEN {
        return Err(format!(
            "native header truncated: {} of {} bytes",
            bytes.len(),
            NATIVE_HEADER_LEN
        ));
    }

    let (magic, rest) = bytes.split_at(NATIVE_MAGIC.len());
    if magic != NATIVE_MAGIC {
        return Err("missing native magic".to_string());
    }

    let (len_bytes, payload) = rest.split_at(8);
    let mut len = [0u8; 8];
    len.copy_from_slice(len_bytes);
    let expected = u64::from_le_bytes(len);

    if payload.len() as u64 != expected {
        return Err(format!(
            "native payload length mismatch: header says {}, found {}",
            expected,
            payload.len()
        ));
    }

    Ok(payload)
}
