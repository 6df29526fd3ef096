//! Chat command: conversational REPL driving the dashboard

use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use canvas_stock::chat::{ChatEntry, ERROR_REPLY, MessageKind, MessageStatus};
use canvas_stock::{
    AggregatorEvent, AnalysisAggregator, AppStore, CanvasConfig, ChatApiClient, ChatSession,
    ChartPeriod, Command, Dashboard, InvestmentApiClient, SendOutcome, export,
};
use clap::Args;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::broadcast::{self, error::RecvError};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use super::report_event;
use crate::output;

#[derive(Args, Debug)]
pub struct ChatArgs {
    /// Stock to load before the first message
    #[arg(long)]
    pub stock: Option<String>,
}

/// Print aggregator events until the channel closes
fn spawn_event_printer(mut events: broadcast::Receiver<AggregatorEvent>) -> JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            match events.recv().await {
                Ok(event) => {
                    report_event(&event);
                }
                Err(RecvError::Lagged(skipped)) => warn!(skipped, "missed aggregator events"),
                Err(RecvError::Closed) => break,
            }
        }
        debug!("event printer stopped");
    })
}

fn print_reply(entry: &ChatEntry) {
    match entry.status {
        Some(MessageStatus::Error) => println!("AI ✗ {}", entry.content),
        _ => println!("AI  {}", entry.content),
    }
    println!("    ({})", entry.id);
}

fn last_ai_message(session: &ChatSession) -> Option<ChatEntry> {
    session
        .messages()
        .iter()
        .rev()
        .find(|entry| entry.kind == MessageKind::Ai && !entry.is_typing)
        .cloned()
}

fn find_message(session: &ChatSession, message_id: &str) -> Option<ChatEntry> {
    session
        .messages()
        .iter()
        .find(|entry| entry.id == message_id)
        .cloned()
}

fn report_outcome(session: &ChatSession, outcome: &SendOutcome) {
    match outcome {
        SendOutcome::Replied { message_id, stock } => {
            if let Some(entry) = find_message(session, message_id) {
                print_reply(&entry);
            }
            if let Some(stock) = stock {
                let name = stock.name.as_deref().unwrap_or(&stock.code);
                println!("→ {name} ({}) 대시보드를 불러옵니다", stock.code);
            }
        }
        SendOutcome::Failed { reason } => {
            println!("AI ✗ {ERROR_REPLY}");
            debug!(%reason, "chat backend reported failure");
        }
        SendOutcome::Duplicate => println!("같은 메시지를 방금 보냈습니다."),
    }
}

pub async fn execute(args: ChatArgs, config: CanvasConfig) -> Result<()> {
    let store = AppStore::new();
    let session = ChatSession::new(
        Arc::new(ChatApiClient::new(&config)?),
        store.clone(),
        config.max_chat_history,
    );
    let aggregator = AnalysisAggregator::new(Arc::new(InvestmentApiClient::new(config)?));
    let dashboard = Dashboard::new(store, aggregator.clone());

    let listener = dashboard.spawn_selection_listener();
    let printer = spawn_event_printer(aggregator.events());

    if let Some(code) = args.stock {
        dashboard.select(code, None);
    }

    let mut period = ChartPeriod::default();
    println!("Stock Canvas - /help 로 명령어를 확인하세요.");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("> ");
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        if line.trim().is_empty() {
            continue;
        }

        let command = match Command::parse(&line) {
            Ok(command) => command,
            Err(e) => {
                println!("{e}");
                continue;
            }
        };

        match command {
            Command::Query { text } => {
                match session.send_message(&text).await {
                    Ok(outcome) => report_outcome(&session, &outcome),
                    Err(e) => println!("{e}"),
                }
            }
            Command::Analyze { stock_code } => {
                if !dashboard.select(stock_code.clone(), None) {
                    println!("{stock_code}는 이미 선택되어 있습니다. /refresh 로 다시 불러오세요.");
                }
            }
            Command::Refresh => {
                if dashboard.refresh().is_none() {
                    println!("선택된 종목이 없습니다.");
                }
            }
            Command::Chart { period: next } => {
                period = next;
                let stock_code = aggregator.snapshot().stock_code().to_string();
                if stock_code.is_empty() {
                    println!("선택된 종목이 없습니다.");
                    continue;
                }
                match aggregator.load_chart_period(&stock_code, period).await {
                    Ok(true) => {
                        if let Some(chart) = aggregator.snapshot().view_model.chart() {
                            output::print_chart(chart, period, 10);
                        }
                    }
                    Ok(false) => debug!(%stock_code, "chart arrived after the selection changed"),
                    Err(e) => println!("차트를 불러오지 못했습니다: {e}"),
                }
            }
            Command::Regenerate => match last_ai_message(&session) {
                Some(entry) => match session.regenerate_message(&entry.id).await {
                    Ok(outcome) => report_outcome(&session, &outcome),
                    Err(e) => println!("{e}"),
                },
                None => println!("재생성할 답변이 없습니다."),
            },
            Command::Delete { message_id } => {
                if !session.delete_message(&message_id) {
                    println!("메시지를 찾을 수 없습니다: {message_id}");
                }
            }
            Command::Canvas => output::print_dashboard(&aggregator.snapshot(), period),
            Command::Export { dir } => {
                let state = aggregator.snapshot();
                if state.view_model.is_empty() {
                    println!("내보낼 분석 데이터가 없습니다.");
                    continue;
                }
                let dir = dir.unwrap_or_else(|| PathBuf::from("."));
                let path = export::write(&dir, &state.view_model).await?;
                println!("저장됨: {}", path.display());
            }
            Command::Clear => {
                session.clear().await;
                println!("대화를 초기화했습니다.");
            }
            Command::Help => println!("{}", Command::help_text()),
            Command::Exit => break,
        }
    }

    listener.abort();
    printer.abort();
    Ok(())
}
