//! メッセージ送信（通知）の実装
//!
//! ## 概要
//!
//! このモジュールは `MessagePusher` trait の具体的な実装を提供します。
//!
//! ## 実装
//!
//! - `websocket`: WebSocket を使った実装
//! - 複数インスタンス構成が必要になった場合は共有ブローカー版を追加する

pub mod websocket;

pub use websocket::WebSocketMessagePusher;
