use anyhow::{Context, Result};
use graphwise::prelude::*;
use graphwise_core::{Document, SharedSession};
use graphwise_types::SessionRecord;
use std::path::Path;
use tokio::io::{AsyncBufReadExt, BufReader};

const HELP: &str = "\
Commands:
  <text>        explore a topic (follow-ups expand the graph)
  /node ID      expand the graph from one of its nodes
  /file PATH    explore the contents of a text file
  /new          start over with an empty graph
  /history      list stored sessions
  /load N       reopen session N from /history
  /quit         exit";

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .init();

    println!("Graphwise - Explore");
    println!("===================\n");

    let mut builder = ExplorerBuilder::new();
    if let Ok(url) = std::env::var("GRAPHWISE_API_URL") {
        println!("Using graphwise-api at {}\n", url);
        builder = builder.remote(url);
    } else {
        let api_key = std::env::var("LLM_API_KEY")
            .context("LLM_API_KEY is required (or set GRAPHWISE_API_URL)")?;
        builder = builder.api_key(api_key);
        if let Ok(base_url) = std::env::var("LLM_BASE_URL") {
            builder = builder.base_url(base_url);
        }
    }
    let explorer = builder.build().await?;

    let user_id = std::env::var("GRAPHWISE_USER").unwrap_or_else(|_| "local".to_string());
    let session = Session::shared();
    let mut history: Vec<SessionRecord> = Vec::new();

    println!("{}\n", HELP);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print_prompt();
        let Some(line) = lines.next_line().await? else {
            break;
        };
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let (command, arg) = match line.split_once(' ') {
            Some((command, arg)) => (command, arg.trim()),
            None => (line, ""),
        };

        match command {
            "/quit" => break,
            "/help" => println!("{}", HELP),
            "/new" => {
                explorer.reset(&session).await;
                println!("   ✓ New session\n");
            }
            "/history" => {
                history = explorer.history(&user_id, Some(20)).await?;
                if history.is_empty() {
                    println!("   No stored sessions\n");
                }
                for (i, record) in history.iter().enumerate() {
                    println!("   [{}] {} ({})", i + 1, record.prompt, record.created_at);
                }
                println!();
            }
            "/load" => {
                let record = arg
                    .parse::<usize>()
                    .ok()
                    .and_then(|n| n.checked_sub(1))
                    .and_then(|i| history.get(i));
                match record {
                    Some(record) => match explorer.load(&session, record).await {
                        Ok(()) => {
                            println!("   ✓ Loaded: {}\n", record.prompt);
                            print_graph(&session).await;
                        }
                        Err(e) => println!("   ✗ {}\n", e),
                    },
                    None => println!("   Run /history first and pick a listed number\n"),
                }
            }
            "/file" => match read_document(arg).await {
                Ok(document) => {
                    run_turn(&explorer, &session, &user_id, TurnInput::Document(document)).await
                }
                Err(e) => println!("   ✗ {}\n", e),
            },
            "/node" => {
                let node = {
                    let guard = session.read().await;
                    guard
                        .current_graph()
                        .and_then(|graph| graph.node(arg))
                        .cloned()
                };
                match node {
                    Some(node) => {
                        run_turn(&explorer, &session, &user_id, TurnInput::from_node(&node)).await
                    }
                    None => println!("   No node `{}` in the current graph\n", arg),
                }
            }
            _ if command.starts_with('/') => println!("   Unknown command\n{}\n", HELP),
            _ => run_turn(&explorer, &session, &user_id, TurnInput::text(line)).await,
        }
    }

    println!("Bye!");
    Ok(())
}

async fn run_turn(explorer: &Orchestrator, session: &SharedSession, user_id: &str, input: TurnInput) {
    let request = TurnRequest::new(input).with_user(user_id);
    let mut events = explorer.spawn_submit(session.clone(), request);

    let mut failed = false;
    while let Some(event) = events.recv().await {
        match event {
            TurnEvent::TurnStarted { turn, mode } => {
                println!("\n-> Turn {} ({:?})", turn, mode);
            }
            TurnEvent::SummaryDelta { content } => {
                print!("{}", content);
                flush();
            }
            TurnEvent::GraphUpdated { nodes, links, .. } => {
                println!("\n   ✓ Graph: {} nodes, {} links", nodes, links);
            }
            TurnEvent::Persisted { intent, .. } => {
                println!("   ✓ Saved ({:?})", intent);
            }
            TurnEvent::TurnFailed { message, .. } => {
                println!("\n   ✗ {}", message);
                failed = true;
            }
            TurnEvent::TurnCompleted { total_duration_ms, .. } => {
                println!("   Done in {}ms", total_duration_ms);
            }
        }
    }
    println!();

    if !failed {
        print_graph(session).await;
    }
}

async fn print_graph(session: &SharedSession) {
    let guard = session.read().await;
    let Some(graph) = guard.current_graph() else {
        return;
    };

    for node in &graph.nodes {
        let group = node.group.map(|g| g.to_string()).unwrap_or_else(|| "-".into());
        println!("   [{}] {} ({})", group, node.name, node.id);
    }
    for link in &graph.links {
        match &link.description {
            Some(description) => println!("   {} -> {}: {}", link.source, link.target, description),
            None => println!("   {} -> {}", link.source, link.target),
        }
    }
    println!();
}

async fn read_document(path: &str) -> Result<Document> {
    let path = Path::new(path);
    let bytes = tokio::fs::read(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let content_type = match path.extension().and_then(|e| e.to_str()) {
        Some("md") | Some("markdown") => "text/markdown",
        Some("txt") => "text/plain",
        _ => "application/octet-stream",
    };
    Ok(Document::new(name, content_type, bytes))
}

fn print_prompt() {
    print!("> ");
    flush();
}

fn flush() {
    use std::io::Write;
    let _ = std::io::stdout().flush();
}
