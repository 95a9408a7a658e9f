//! JSON-RPC 2.0 communication layer for the embedding host page.
//!
//! Implements bidirectional messaging between the viewer and the page that
//! embeds it via iframe postMessage, supporting both request-response and
//! notification patterns. Native builds compile the layer but never receive
//! messages.
//!
//! ## Architecture
//!
//! The RPC system uses standard JSON-RPC 2.0 protocol with:
//! - **Requests**: Expect responses with matching IDs
//! - **Notifications**: One-way messages without responses
//! - **Responses**: Reply to requests with results or errors
//!
//! ## Message Flow
//!
//! ```text
//! Host (Parent Window)   <──postMessage──>  Bevy (iframe)
//!        │                                        │
//!        ├─ Request (with ID) ──────────────────> │
//!        │                                        ├─ Process request
//!        │ <───────────────── Response (with ID) ─┤
//!        │                                        │
//!        │ <────────── Notification (no ID) ─────┤
//! ```
//!
//! ## Adding New RPC Methods
//!
//! Add a method case in `handle_rpc_request()`. Handlers read from the
//! `RpcContext` snapshot and may set an `RpcCommand`, which is turned into an
//! ECS event after dispatch:
//!
//! ```rust,ignore
//! let result = match request.method.as_str() {
//!     "your_method_name" => expect_no_params(&request.params).map(|()| {
//!         command = Some(RpcCommand::YourCommand);
//!         json!({ "success": true })
//!     }),
//!     // ... existing methods
//!     _ => Err(RpcError::method_not_found(&request.method)),
//! };
//! ```
//!
//! From the host page:
//!
//! ```typescript
//! iframe.contentWindow.postMessage(JSON.stringify({
//!   jsonrpc: "2.0",
//!   method: "get_load_state",
//!   id: 1
//! }), "*");
//! ```
//!
//! ## Sending Notifications from Bevy
//!
//! Use `WebRpcInterface::send_notification()` to push updates to the host page:
//!
//! ```rust,ignore
//! fn your_system(mut rpc: ResMut<WebRpcInterface>) {
//!     rpc.send_notification("event_name", json!({
//!         "data": "value",
//!         "timestamp": 123456
//!     }));
//! }
//! ```
//!
//! ## Error Handling
//!
//! Standard JSON-RPC 2.0 error codes:
//! - `-32601`: Method not found
//! - `-32602`: Invalid params
//! - `-32603`: Internal error
//!
//! ## Existing Methods
//!
//! ### Scene Control
//! - `reset_scene`: Reload the page (web) or re-mount the viewer (native)
//! - `retry_model_load`: Re-issue the model load after a failure
//!
//! ### Queries
//! - `get_load_state`: `idle | loading | ready | failed`, with error details
//! - `get_fps`: Retrieve current frame rate
//! - `get_camera`: Orbit radius, polar and azimuth angles
//!
//! ### Notifications
//! - `model_load_state`: Sent on every load state change
//! - `fps_update`: Sent every 0.5 s

/// JSON-RPC 2.0 bidirectional communication system for React integration.
///
/// Handles request-response patterns, notifications and the WASM message listener.
pub mod web_rpc;
