#[cfg(test)]
#[path = "clipboard_test.rs"]
mod tests;

use anyhow::anyhow;
use anyhow::bail;
use anyhow::Result;
use once_cell::sync::OnceCell;
use tokio::sync::mpsc;
use tokio::sync::oneshot;

type ClipboardRequest = (String, oneshot::Sender<Result<()>>);

static SENDER: OnceCell<mpsc::UnboundedSender<ClipboardRequest>> = OnceCell::new();

/// Owns the system clipboard for the lifetime of the process. Some platforms
/// drop clipboard contents together with the handle that set them.
pub struct ClipboardService {}

impl ClipboardService {
    pub async fn start() -> Result<()> {
        let (tx, mut rx) = mpsc::unbounded_channel::<ClipboardRequest>();
        if SENDER.set(tx).is_err() {
            bail!("Clipboard service is already running.");
        }
        let mut clipboard = arboard::Clipboard::new()?;

        while let Some((text, reply)) = rx.recv().await {
            let res = clipboard
                .set_text(text)
                .map_err(|err| return anyhow!(err));
            if let Err(err) = &res {
                tracing::error!(error = ?err, "Failed to write to clipboard");
            }
            let _ = reply.send(res);
        }

        return Ok(());
    }

    pub fn healthcheck() -> Result<()> {
        if SENDER.get().is_some() {
            return Ok(());
        }

        arboard::Clipboard::new()?;
        return Ok(());
    }

    /// Writes `text` to the clipboard, resolving once it has been written.
    pub async fn set(text: String) -> Result<()> {
        let Some(tx) = SENDER.get() else {
            bail!("Clipboard service is not initialized.");
        };

        let (reply_tx, reply_rx) = oneshot::channel::<Result<()>>();
        if tx.send((text, reply_tx)).is_err() {
            bail!("Clipboard service has stopped.");
        }

        return reply_rx.await?;
    }
}
