//! Gemini conversational engine adapter.

mod client;
mod dto;

pub use client::{GeminiChatClient, system_instruction};
