//! The JSON envelope around every RPC call.
//!
//! Requests are `{"method", "arguments", "tag"}` and responses are `{"result", "arguments",
//! "tag"}`. A response is a success exactly when `result` is the string `success`; anything
//! else is the daemon's own error message.

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use transrpc_types::{RpcError, RpcResult};

use crate::requests::RpcMethod;

const SUCCESS: &str = "success";

#[derive(Serialize)]
struct RequestEnvelope<'a, M> {
    method: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    arguments: Option<&'a M>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tag: Option<u64>,
}

/// Encodes `request` into a request body.
pub(crate) fn encode_request<M: RpcMethod>(request: &M, tag: Option<u64>) -> RpcResult<Vec<u8>> {
    let envelope = RequestEnvelope {
        method: request.method(),
        arguments: M::TAKES_ARGUMENTS.then_some(request),
        tag,
    };
    serde_json::to_vec(&envelope)
        .map_err(|e| RpcError::Encoding(format!("{}: {e}", request.method())))
}

/// Decodes a response body, returning the decoded `arguments` on success.
pub(crate) fn decode_response<T: DeserializeOwned>(body: &[u8]) -> RpcResult<T> {
    let value: Value = serde_json::from_slice(body)
        .map_err(|e| RpcError::protocol(format!("response is not JSON: {e}")))?;
    let Value::Object(mut envelope) = value else {
        return Err(RpcError::protocol("response is not a JSON object"));
    };
    match envelope.remove("result") {
        Some(Value::String(result)) if result == SUCCESS => {}
        Some(Value::String(result)) => return Err(RpcError::OperationFailed(result)),
        Some(other) => {
            return Err(RpcError::protocol(format!(
                "response `result` is not a string: {other}"
            )));
        }
        None => return Err(RpcError::protocol("response has no `result`")),
    }
    let arguments = envelope
        .remove("arguments")
        .unwrap_or_else(|| Value::Object(Map::new()));
    serde_json::from_value(arguments)
        .map_err(|e| RpcError::protocol(format!("malformed response arguments: {e}")))
}
