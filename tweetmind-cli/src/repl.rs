use thiserror::Error;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{debug, info, warn};
use tweetmind_core::agent::Agent;
use tweetmind_core::model::ModelProvider;

#[derive(Debug, Error)]
pub enum ReplError {
    #[error("stdin/stdout I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Line-oriented chat loop. Each line is one agent input; `exit` or
/// `quit` (or end of input) stops the loop. Agent failures are printed
/// and the loop keeps going.
pub async fn run_repl<P, R, W>(agent: &mut Agent<P>, input: R, mut output: W) -> Result<(), ReplError>
where
    P: ModelProvider,
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut lines = input.lines();
    loop {
        output.write_all(b"You: ").await?;
        output.flush().await?;

        let Some(line) = lines.next_line().await? else {
            debug!("Input closed");
            break;
        };
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if is_exit(line) {
            info!("Exiting on user request");
            break;
        }

        let reply = match agent.handle_input(line).await {
            Ok(answer) => answer,
            Err(err) => {
                warn!(%err, "Agent could not answer");
                err.user_message()
            }
        };
        output.write_all(format!("AI: {reply}\n").as_bytes()).await?;
        output.flush().await?;
    }
    Ok(())
}

fn is_exit(line: &str) -> bool {
    line.eq_ignore_ascii_case("exit") || line.eq_ignore_ascii_case("quit")
}
