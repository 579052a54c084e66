//! Render gateway writing plain text to an async writer such as stdout.

use crate::chat::ports::{
    Markup, MessageRef, OutboundMessage, RenderError, RenderGateway, RenderResult,
};
use async_trait::async_trait;
use std::sync::atomic::{AtomicI64, Ordering};
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio::sync::Mutex;

/// Gateway printing every message with its controls.
///
/// Inline actions are printed with the callback data to type back after a
/// `!` prefix.
pub struct ConsoleGateway<W> {
    writer: Mutex<W>,
    next_message_id: AtomicI64,
}

impl<W> ConsoleGateway<W>
where
    W: AsyncWrite + Unpin + Send,
{
    /// Creates a gateway over `writer`.
    #[must_use]
    pub fn new(writer: W) -> Self {
        Self {
            writer: Mutex::new(writer),
            next_message_id: AtomicI64::new(0),
        }
    }

    /// Returns the underlying writer.
    #[must_use]
    pub fn into_inner(self) -> W {
        self.writer.into_inner()
    }

    async fn emit(&self, header: &str, message: Option<&OutboundMessage>) -> RenderResult<()> {
        let mut block = format!("{header}\n");
        if let Some(outbound) = message {
            block.push_str(&format_message(outbound));
        }
        let mut writer = self.writer.lock().await;
        writer
            .write_all(block.as_bytes())
            .await
            .map_err(RenderError::transport)?;
        writer.flush().await.map_err(RenderError::transport)
    }
}

fn format_message(message: &OutboundMessage) -> String {
    let body = message.text.lines().map(|line| format!("  {line}\n"));
    let controls: Vec<String> = match &message.markup {
        Markup::None => Vec::new(),
        Markup::Menu(rows) => rows
            .iter()
            .map(|row| format!("  [ {} ]\n", row.join(" | ")))
            .collect(),
        Markup::Actions(actions) => actions
            .iter()
            .map(|action| format!("  ( {} -> !{} )\n", action.label, action.data))
            .collect(),
    };
    body.chain(controls).collect()
}

#[async_trait]
impl<W> RenderGateway for ConsoleGateway<W>
where
    W: AsyncWrite + Unpin + Send,
{
    async fn send_message(
        &self,
        chat_id: i64,
        message: OutboundMessage,
    ) -> RenderResult<MessageRef> {
        let message_id = self.next_message_id.fetch_add(1, Ordering::Relaxed) + 1;
        self.emit(&format!("[chat {chat_id} #{message_id}]"), Some(&message))
            .await?;
        Ok(MessageRef {
            chat_id,
            message_id,
        })
    }

    async fn edit_message(&self, target: MessageRef, message: OutboundMessage) -> RenderResult<()> {
        self.emit(
            &format!("[chat {} #{} edited]", target.chat_id, target.message_id),
            Some(&message),
        )
        .await
    }

    async fn delete_message(&self, target: MessageRef) -> RenderResult<()> {
        self.emit(
            &format!("[chat {} #{} deleted]", target.chat_id, target.message_id),
            None,
        )
        .await
    }
}
