//! Session runner: pumps one channel through the assistant.

use std::future::Future;
use std::sync::Arc;

use budgetsplit_core::channel::Channel;
use budgetsplit_core::error::ChannelError;
use tracing::{info, warn};

use crate::assistant::BudgetAssistant;

/// Run until the channel closes or Ctrl-C is pressed.
pub async fn run_session(
    channel: Arc<dyn Channel>,
    assistant: Arc<BudgetAssistant>,
) -> Result<(), ChannelError> {
    run_session_until(channel, assistant, async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    })
    .await
}

/// Run until the channel closes or `shutdown` resolves.
///
/// Messages are handled one at a time in arrival order. Failed deliveries
/// are logged and do not end the session; an error from the channel's
/// inbound stream does.
pub async fn run_session_until<F>(
    channel: Arc<dyn Channel>,
    assistant: Arc<BudgetAssistant>,
    shutdown: F,
) -> Result<(), ChannelError>
where
    F: Future<Output = ()>,
{
    let mut inbound = channel.start().await?;
    info!(channel = channel.name(), "Session started");

    tokio::pin!(shutdown);
    let result = loop {
        tokio::select! {
            next = inbound.recv() => match next {
                Some(Ok(msg)) => {
                    for reply in assistant.handle(&msg).await {
                        if let Err(e) = channel.send(&reply.chat_id, &reply.text).await {
                            warn!(
                                channel = channel.name(),
                                chat_id = %reply.chat_id,
                                error = %e,
                                "Failed to deliver reply"
                            );
                        }
                    }
                }
                Some(Err(e)) => {
                    warn!(channel = channel.name(), error = %e, "Channel stream failed");
                    break Err(e);
                }
                None => {
                    info!(channel = channel.name(), "Channel closed");
                    break Ok(());
                }
            },
            _ = &mut shutdown => {
                info!("Shutdown requested");
                break Ok(());
            }
        }
    };

    if let Err(e) = channel.stop().await {
        warn!(channel = channel.name(), error = %e, "Failed to stop channel");
    }
    result
}
