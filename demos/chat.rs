//! Sends one chat turn and one responses turn using `OPENAI_API_KEY`.
//!
//! Run with `cargo run --example chat -- "your question"`.

use anyhow::Result;
use futures_util::StreamExt;
use llm_wire::chat::{ChatMessage, CreateChatRequest};
use llm_wire::responses::{CreateResponseRequest, ReasoningEffort};
use llm_wire::Client;
use std::io::Write;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "llm_wire=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let question = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "Name three rivers in Europe.".to_string());
    let client = Client::from_env()?;

    info!("Streaming chat completion");
    let request = CreateChatRequest::new(
        "gpt-4o-mini",
        vec![
            ChatMessage::system("Answer in one short paragraph."),
            ChatMessage::user(question.as_str()),
        ],
    );
    let mut stream = client.chats.stream(&request).await?;
    while let Some(chunk) = stream.next().await {
        match chunk {
            Ok(chunk) => {
                print!("{}", chunk.delta_text().unwrap_or_default());
                std::io::stdout().flush()?;
            }
            Err(e) => tracing::warn!("Dropped chunk: {}", e),
        }
    }
    println!();

    info!("Creating response");
    let mut request = CreateResponseRequest::new("o4-mini", question);
    request.reasoning_effort = Some(ReasoningEffort::Low);
    let response = client.responses.create(&request).await?;
    println!("{}", response.output_text());

    if let Some(usage) = response.usage {
        info!(
            input = usage.input_tokens,
            output = usage.output_tokens,
            "Response {} used {} tokens",
            response.id,
            usage.total_tokens
        );
    }

    Ok(())
}
