//! Quizrace server binary.
//!
//! Serves the demo question deck on port 3000. Log verbosity follows
//! `RUST_LOG`; the default is `info`.

use quizrace::prelude::*;
use tracing_subscriber::EnvFilter;

fn demo_deck() -> Vec<Question> {
    vec![
        Question::new("q1", "What is 12 + 30?", "42"),
        Question::new("q2", "What is the capital of Norway?", "oslo"),
        Question::new("q3", "What is 9 * 9?", "81"),
    ]
}

#[tokio::main]
async fn main() -> Result<(), QuizraceError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let server = QuizraceServer::builder()
        .bind("0.0.0.0:3000")
        .questions(demo_deck())
        .build()
        .await?;

    tracing::info!(addr = "0.0.0.0:3000", "quizrace listening");
    server.run().await
}
