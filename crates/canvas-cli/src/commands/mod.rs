//! CLI command implementations

pub mod analyze;
pub mod chart;
pub mod chat;

pub use analyze::AnalyzeArgs;
pub use chart::ChartArgs;
pub use chat::ChatArgs;

use canvas_stock::{AggregatorEvent, LoadSummary, Section, SectionOutcome};

use crate::output;

/// Print one aggregator event; returns the summary once the load completed
pub fn report_event(event: &AggregatorEvent) -> Option<&LoadSummary> {
    match event {
        AggregatorEvent::SectionSettled {
            stock_code,
            section,
            outcome,
            ..
        } => {
            output::print_settled(stock_code, *section, *outcome);
            if *section == Section::Risk {
                match outcome {
                    SectionOutcome::Ready => println!("AI 리스크 분석 완료"),
                    SectionOutcome::Failed(_) => println!("AI 리스크 분석 실패 - 기본 데이터 사용"),
                    SectionOutcome::Pending => {}
                }
            }
            None
        }
        AggregatorEvent::LoadComplete(summary) => {
            if !summary.all_failed() {
                println!("{} 데이터 로딩 완료", summary.stock_code);
            }
            Some(summary)
        }
    }
}
