use bevy::diagnostic::DiagnosticsStore;
use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::engine::camera::orbit_controller::{OrbitController, Spherical};
use crate::engine::camera::viewer_camera::ViewerCamera;
use crate::engine::core::app_state::{ModelLoadState, ResetSceneRequested, RetryModelLoad};
use crate::engine::systems::fps_tracking::smoothed_fps;

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::JsValue;

#[cfg(target_arch = "wasm32")]
use web_sys::{MessageEvent, window};

/// JSON-RPC 2.0 request structure.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct RpcRequest {
    pub jsonrpc: String,
    pub method: String,
    #[serde(default)]
    pub params: Value,
    pub id: Option<Value>,
}

/// JSON-RPC 2.0 response structure.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct RpcResponse {
    pub jsonrpc: String,
    pub result: Option<Value>,
    pub error: Option<RpcError>,
    pub id: Option<Value>,
}

/// JSON-RPC 2.0 notification structure for one-way communication.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct RpcNotification {
    pub jsonrpc: String,
    pub method: String,
    pub params: Value,
}

/// JSON-RPC 2.0 error object.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct RpcError {
    pub code: i32,
    pub message: String,
    pub data: Option<Value>,
}

/// Standard RPC error codes and constructors.
impl RpcError {
    pub const METHOD_NOT_FOUND: i32 = -32601;
    pub const INVALID_PARAMS: i32 = -32602;
    pub const INTERNAL_ERROR: i32 = -32603;

    pub fn method_not_found(method: &str) -> Self {
        Self {
            code: Self::METHOD_NOT_FOUND,
            message: "Method not found".to_string(),
            data: Some(json!({ "method": method })),
        }
    }

    pub fn invalid_params(message: &str) -> Self {
        Self {
            code: Self::INVALID_PARAMS,
            message: message.to_string(),
            data: None,
        }
    }

    pub fn internal_error(message: &str) -> Self {
        Self {
            code: Self::INTERNAL_ERROR,
            message: message.to_string(),
            data: None,
        }
    }
}

/// Resource managing bidirectional RPC communication between the host page and Bevy.
/// Handles both request-response patterns and notification broadcasting.
#[derive(Resource, Default)]
pub struct WebRpcInterface {
    outgoing_notifications: Vec<RpcNotification>,
    outgoing_responses: Vec<RpcResponse>,
}

impl WebRpcInterface {
    /// Send notification to the host page without expecting response.
    pub fn send_notification(&mut self, method: &str, params: Value) {
        self.outgoing_notifications.push(RpcNotification {
            jsonrpc: "2.0".to_string(),
            method: method.to_string(),
            params,
        });
    }

    /// Queue response for transmission to the host page.
    fn queue_response(&mut self, response: RpcResponse) {
        self.outgoing_responses.push(response);
    }
}

/// Side effect requested through the bridge, applied as an ECS event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RpcCommand {
    ResetScene,
    RetryModelLoad,
}

/// Read-only view of the viewer that requests are answered from.
pub struct RpcContext<'a> {
    pub load_state: &'a ModelLoadState,
    pub fps: Option<f64>,
    pub camera: Option<Spherical>,
}

#[derive(Debug, Clone)]
pub struct RpcOutcome {
    /// `None` for notifications (requests without an id).
    pub response: Option<RpcResponse>,
    pub command: Option<RpcCommand>,
}

/// Plugin establishing the WebRPC communication layer for iframe-based deployment.
pub struct WebRpcPlugin;

impl Plugin for WebRpcPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<WebRpcInterface>()
            .add_event::<IncomingRpcMessage>()
            .add_systems(
                Update,
                (
                    process_incoming_messages,
                    handle_rpc_messages,
                    notify_load_state.run_if(resource_changed::<ModelLoadState>),
                    send_outgoing_messages,
                )
                    .chain(),
            );

        #[cfg(target_arch = "wasm32")]
        app.add_systems(Startup, setup_message_listener);
    }
}

#[cfg(target_arch = "wasm32")]
fn setup_message_listener(mut commands: Commands) {
    use std::sync::Arc;
    use std::sync::Mutex;

    // Thread-safe message queue for cross-thread communication.
    let message_queue: Arc<Mutex<Vec<String>>> = Arc::new(Mutex::new(Vec::new()));
    let queue_clone = message_queue.clone();

    let closure = Closure::wrap(Box::new(move |event: MessageEvent| {
        if let Ok(data) = event.data().dyn_into::<js_sys::JsString>() {
            let message_str: String = data.into();

            if message_str.contains("jsonrpc") {
                if let Ok(mut queue) = queue_clone.lock() {
                    queue.push(message_str);
                }
            }
        }
    }) as Box<dyn FnMut(MessageEvent)>);

    if let Some(window) = window() {
        if let Err(e) =
            window.add_event_listener_with_callback("message", closure.as_ref().unchecked_ref())
        {
            error!("Failed to register message listener: {:?}", e);
            return;
        }
    }

    // Prevent closure from being dropped by transferring ownership to JS.
    closure.forget();
    commands.insert_resource(MessageQueue(message_queue));
}

/// Resource wrapping thread-safe message queue for WASM event handling.
#[derive(Resource)]
struct MessageQueue(std::sync::Arc<std::sync::Mutex<Vec<String>>>);

/// Event representing an incoming RPC message from the host page.
#[derive(Event)]
pub struct IncomingRpcMessage {
    pub content: String,
}

fn process_incoming_messages(
    message_queue: Option<Res<MessageQueue>>,
    mut message_events: EventWriter<IncomingRpcMessage>,
) {
    let Some(queue_res) = message_queue else {
        return;
    };

    let messages = if let Ok(mut queue) = queue_res.0.lock() {
        std::mem::take(&mut *queue)
    } else {
        Vec::new()
    };

    for message_str in messages {
        message_events.write(IncomingRpcMessage {
            content: message_str,
        });
    }
}

fn handle_rpc_messages(
    mut events: EventReader<IncomingRpcMessage>,
    diagnostics: Res<DiagnosticsStore>,
    load_state: Res<ModelLoadState>,
    cameras: Query<&OrbitController, With<ViewerCamera>>,
    mut rpc_interface: ResMut<WebRpcInterface>,
    mut resets: EventWriter<ResetSceneRequested>,
    mut retries: EventWriter<RetryModelLoad>,
) {
    for event in events.read() {
        let request = match serde_json::from_str::<RpcRequest>(&event.content) {
            Ok(request) => request,
            Err(parse_error) => {
                warn!("Ignoring malformed RPC message: {}", parse_error);
                continue;
            }
        };

        let context = RpcContext {
            load_state: &load_state,
            fps: smoothed_fps(&diagnostics),
            camera: cameras.iter().next().and_then(|c| c.spherical()),
        };
        let outcome = handle_rpc_request(&request, &context);

        match outcome.command {
            Some(RpcCommand::ResetScene) => {
                resets.write(ResetSceneRequested);
            }
            Some(RpcCommand::RetryModelLoad) => {
                retries.write(RetryModelLoad);
            }
            None => {}
        }
        if let Some(response) = outcome.response {
            rpc_interface.queue_response(response);
        }
    }
}

/// Dispatch a request by method. Commands run for notifications too, but only
/// requests with an id get a response.
pub fn handle_rpc_request(request: &RpcRequest, context: &RpcContext) -> RpcOutcome {
    let mut command = None;

    let result = match request.method.as_str() {
        "reset_scene" => expect_no_params(&request.params).map(|()| {
            command = Some(RpcCommand::ResetScene);
            json!({ "success": true })
        }),
        "retry_model_load" => expect_no_params(&request.params).map(|()| {
            let retrying = matches!(context.load_state, ModelLoadState::Failed(_));
            if retrying {
                command = Some(RpcCommand::RetryModelLoad);
            }
            json!({ "success": true, "retrying": retrying })
        }),
        "get_load_state" => {
            expect_no_params(&request.params).map(|()| load_state_json(context.load_state))
        }
        "get_fps" => expect_no_params(&request.params)
            .map(|()| json!({ "fps": context.fps.unwrap_or(0.0) as f32 })),
        "get_camera" => expect_no_params(&request.params).and_then(|()| {
            context
                .camera
                .map(|s| json!({ "radius": s.radius, "polar": s.polar, "azimuth": s.azimuth }))
                .ok_or_else(|| RpcError::internal_error("Camera not initialised"))
        }),
        _ => {
            warn!("Unknown RPC method: {}", request.method);
            Err(RpcError::method_not_found(&request.method))
        }
    };

    if let Err(error) = &result {
        debug!("RPC {} failed: {}", request.method, error.message);
    }

    let response = request.id.clone().map(|id| match result {
        Ok(result_value) => RpcResponse {
            jsonrpc: "2.0".to_string(),
            result: Some(result_value),
            error: None,
            id: Some(id),
        },
        Err(error) => RpcResponse {
            jsonrpc: "2.0".to_string(),
            result: None,
            error: Some(error),
            id: Some(id),
        },
    });

    RpcOutcome { response, command }
}

/// Parameterless methods accept a missing, null, empty object or empty array `params`.
fn expect_no_params(params: &Value) -> Result<(), RpcError> {
    let empty = match params {
        Value::Null => true,
        Value::Object(map) => map.is_empty(),
        Value::Array(items) => items.is_empty(),
        _ => false,
    };
    if empty {
        Ok(())
    } else {
        Err(RpcError::invalid_params("Method takes no parameters"))
    }
}

pub fn load_state_json(state: &ModelLoadState) -> Value {
    match state {
        ModelLoadState::Failed(error) => json!({
            "state": state.label(),
            "error": {
                "kind": error.kind(),
                "path": error.path(),
                "message": error.to_string(),
            }
        }),
        _ => json!({ "state": state.label(), "error": Value::Null }),
    }
}

fn notify_load_state(state: Res<ModelLoadState>, mut rpc_interface: ResMut<WebRpcInterface>) {
    rpc_interface.send_notification("model_load_state", load_state_json(&state));
}

/// Send queued notifications and responses to the host page.
fn send_outgoing_messages(mut rpc_interface: ResMut<WebRpcInterface>) {
    // Notifications first, responses second.
    for notification in rpc_interface.outgoing_notifications.drain(..) {
        send_message_to_parent(&notification);
    }

    for response in rpc_interface.outgoing_responses.drain(..) {
        send_message_to_parent(&response);
    }
}

/// Send serialized message to the parent window.
fn send_message_to_parent<T: Serialize>(message: &T) {
    #[cfg(target_arch = "wasm32")]
    {
        match serde_json::to_string(message) {
            Ok(json) => {
                if let Some(window) = window() {
                    if let Some(parent) = window.parent().ok().flatten() {
                        if let Err(e) = parent.post_message(&JsValue::from_str(&json), "*") {
                            error!("Failed to send message to parent: {:?}", e);
                        }
                    } else {
                        warn!("No parent window available for message transmission");
                    }
                } else {
                    error!("Window object not available");
                }
            }
            Err(e) => {
                error!("Failed to serialize message: {}", e);
            }
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    {
        // No-op for non-WASM targets.
        let _ = message;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ModelLoadError;

    fn request(method: &str, params: Value, id: Option<i64>) -> RpcRequest {
        RpcRequest {
            jsonrpc: "2.0".to_string(),
            method: method.to_string(),
            params,
            id: id.map(Value::from),
        }
    }

    fn idle_context(state: &ModelLoadState) -> RpcContext<'_> {
        RpcContext {
            load_state: state,
            fps: Some(59.5),
            camera: Some(Spherical {
                radius: 15.0,
                polar: 1.0,
                azimuth: 0.5,
            }),
        }
    }

    #[test]
    fn reset_scene_issues_command() {
        let state = ModelLoadState::Idle;
        let outcome = handle_rpc_request(&request("reset_scene", Value::Null, Some(1)), &idle_context(&state));
        assert_eq!(outcome.command, Some(RpcCommand::ResetScene));
        let response = outcome.response.unwrap();
        assert_eq!(response.result, Some(json!({ "success": true })));
        assert_eq!(response.id, Some(json!(1)));
    }

    #[test]
    fn notifications_run_commands_without_responding() {
        let state = ModelLoadState::Idle;
        let outcome = handle_rpc_request(&request("reset_scene", json!({}), None), &idle_context(&state));
        assert_eq!(outcome.command, Some(RpcCommand::ResetScene));
        assert!(outcome.response.is_none());
    }

    #[test]
    fn unknown_method_is_reported() {
        let state = ModelLoadState::Idle;
        let outcome = handle_rpc_request(&request("explode", Value::Null, Some(2)), &idle_context(&state));
        let error = outcome.response.unwrap().error.unwrap();
        assert_eq!(error.code, RpcError::METHOD_NOT_FOUND);
        assert_eq!(error.data, Some(json!({ "method": "explode" })));
        assert!(outcome.command.is_none());
    }

    #[test]
    fn unexpected_params_are_rejected() {
        let state = ModelLoadState::Idle;
        let outcome = handle_rpc_request(
            &request("reset_scene", json!({ "hard": true }), Some(3)),
            &idle_context(&state),
        );
        assert_eq!(outcome.response.unwrap().error.unwrap().code, RpcError::INVALID_PARAMS);
        assert!(outcome.command.is_none());
    }

    #[test]
    fn retry_only_when_failed() {
        let idle = ModelLoadState::Idle;
        let outcome = handle_rpc_request(&request("retry_model_load", Value::Null, Some(4)), &idle_context(&idle));
        assert!(outcome.command.is_none());
        assert_eq!(outcome.response.unwrap().result.unwrap()["retrying"], json!(false));

        let failed = ModelLoadState::Failed(ModelLoadError::Unreachable {
            path: "models/model.glb".into(),
            reason: "404".into(),
        });
        let outcome = handle_rpc_request(&request("retry_model_load", Value::Null, Some(5)), &idle_context(&failed));
        assert_eq!(outcome.command, Some(RpcCommand::RetryModelLoad));
    }

    #[test]
    fn load_state_reports_failure_details() {
        let failed = ModelLoadState::Failed(ModelLoadError::Invalid {
            path: "models/model.glb".into(),
            reason: "bad magic".into(),
        });
        let value = load_state_json(&failed);
        assert_eq!(value["state"], json!("failed"));
        assert_eq!(value["error"]["kind"], json!("invalid"));
        assert_eq!(value["error"]["path"], json!("models/model.glb"));

        assert_eq!(load_state_json(&ModelLoadState::Idle)["error"], Value::Null);
    }

    #[test]
    fn camera_and_fps_queries() {
        let state = ModelLoadState::Idle;
        let context = idle_context(&state);
        let camera = handle_rpc_request(&request("get_camera", Value::Null, Some(6)), &context)
            .response
            .unwrap()
            .result
            .unwrap();
        assert_eq!(camera["radius"], json!(15.0));

        let fps = handle_rpc_request(&request("get_fps", Value::Null, Some(7)), &context)
            .response
            .unwrap()
            .result
            .unwrap();
        assert_eq!(fps["fps"], json!(59.5));

        let no_camera = RpcContext {
            camera: None,
            ..idle_context(&state)
        };
        let error = handle_rpc_request(&request("get_camera", Value::Null, Some(8)), &no_camera)
            .response
            .unwrap()
            .error
            .unwrap();
        assert_eq!(error.code, RpcError::INTERNAL_ERROR);
    }

    #[test]
    fn missing_params_deserialise_as_null() {
        let parsed: RpcRequest =
            serde_json::from_str(r#"{"jsonrpc":"2.0","method":"get_fps","id":1}"#).unwrap();
        assert_eq!(parsed.params, Value::Null);
    }
}
