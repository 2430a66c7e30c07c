//! Chat command implementation

use crate::chat::{ChatRequest, ChatService, StreamEvent};
use crate::error::{Error, Result};
use std::io::Write;

/// Options for a one-shot chat turn
#[derive(Debug, Clone, Default)]
pub struct ChatOptions {
    pub translation: Option<String>,
    pub no_search: bool,
    pub stream: bool,
    pub show_sources: bool,
}

/// Run a single chat turn, printing the answer to stdout
pub async fn cmd_chat(service: &ChatService, message: &str, options: &ChatOptions) -> Result<()> {
    let mut request = ChatRequest::new(message);
    request.include_search = !options.no_search;
    request.preferred_translation = options.translation.clone();

    if options.stream {
        return chat_streaming(service, &request, options).await;
    }

    let response = service.chat(&request).await?;
    println!("{}", response.message);
    if options.show_sources {
        print_sources(response.scripture_context.as_ref());
    }
    Ok(())
}

async fn chat_streaming(
    service: &ChatService,
    request: &ChatRequest,
    options: &ChatOptions,
) -> Result<()> {
    let mut stream = service.chat_stream(request).await?;
    let mut stdout = std::io::stdout();

    while let Some(event) = stream.events.recv().await {
        match event {
            StreamEvent::Content(chunk) => {
                write!(stdout, "{chunk}")?;
                stdout.flush()?;
            }
            StreamEvent::Done => break,
            StreamEvent::Error(e) => {
                writeln!(stdout)?;
                return Err(Error::Provider(e));
            }
        }
    }
    writeln!(stdout)?;

    if options.show_sources {
        print_sources(stream.scripture_context.as_ref());
    }
    Ok(())
}

fn print_sources(context: Option<&crate::search::SearchResults>) {
    let Some(results) = context else {
        println!("\n(no scripture context)");
        return;
    };
    if results.is_empty() {
        println!("\n(no verses above the similarity threshold)");
        return;
    }
    println!("\nSources:");
    for v in &results.verses {
        println!("  {}", v.reference);
    }
    for p in &results.passages {
        println!("  {} ({})", p.title, p.reference);
    }
}
