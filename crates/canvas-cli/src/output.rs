//! Terminal rendering of the dashboard panels

use canvas_stock::engine::SectionOutcome;
use canvas_stock::model::{
    AnalystNews, ChartData, CompanyInfo, DividendInfo, FinancialStatements, MetricsBundle,
    RiskAnalysis,
};
use canvas_stock::present::{
    AltmanZone, ChartSeries, StatementView, chart::ChartPoint, financial, format, metrics, risk,
};
use canvas_stock::{ChartPeriod, DashboardState, PanelView, Section, SectionData};
use comfy_table::{ContentArrangement, Table, modifiers::UTF8_ROUND_CORNERS, presets::UTF8_FULL};

/// Number of news items and analyst reports listed
const NEWS_LIMIT: usize = 5;

fn table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

fn heading(title: &str) {
    println!();
    println!("── {title} ──");
}

/// One line per settled section
pub fn print_settled(stock_code: &str, section: Section, outcome: SectionOutcome) {
    match outcome {
        SectionOutcome::Ready => println!("  ✓ [{stock_code}] {}", section.title()),
        SectionOutcome::Failed(_) => println!("  ✗ [{stock_code}] {} 불러오기 실패", section.title()),
        SectionOutcome::Pending => {}
    }
}

/// Every panel of the snapshot, in display order
pub fn print_dashboard(state: &DashboardState, period: ChartPeriod) {
    if let Some(message) = state.page_error() {
        println!("{message}");
        return;
    }

    let vm = &state.view_model;
    if vm.stock_code().is_empty() {
        println!("선택된 종목이 없습니다.");
        return;
    }
    println!("{} ({})", vm.display_name(), vm.stock_code());

    for section in Section::ALL {
        heading(section.title());
        match state.panel(section) {
            PanelView::Loading(text) | PanelView::Unavailable(text) => println!("{text}"),
            PanelView::Ready(data) => print_section(&data, state, period),
        }
    }
}

fn print_section(data: &SectionData, state: &DashboardState, period: ChartPeriod) {
    match data {
        SectionData::Chart(chart) => print_chart(chart, period, 10),
        SectionData::Company(company) => print_company(company),
        SectionData::Metrics(bundle) => {
            let dividend_yield = state
                .view_model
                .dividend()
                .and_then(|dividend| dividend.dividend_yield);
            print_metrics(bundle, dividend_yield);
        }
        SectionData::Financial(statements) => print_financial(statements),
        SectionData::Dividend(dividend) => print_dividend(dividend),
        SectionData::News(news) => print_news(news),
        SectionData::Risk(analysis) => print_risk(analysis),
    }
}

/// Price statistics plus the most recent `bars` points
pub fn print_chart(chart: &ChartData, period: ChartPeriod, bars: usize) {
    let series = ChartSeries::build(chart, period);
    if series.is_empty() {
        println!("{}", Section::Chart.unavailable_text());
        return;
    }

    let stats = &series.stats;
    let sign = if stats.is_positive { "+" } else { "" };
    println!(
        "현재가 {}  {sign}{} ({sign}{})  고가 {}  저가 {}  거래량 {} (평균 {})",
        format::krw(stats.current),
        format::krw(stats.change),
        format::percent(stats.change_percent),
        format::krw(stats.high),
        format::krw(stats.low),
        format::volume(stats.volume as f64),
        format::volume(stats.avg_volume),
    );

    let mut table = table();
    table.set_header(vec!["일자", "종가", "MA20", "MA60", "거래량"]);
    let start = series.points.len().saturating_sub(bars);
    for point in &series.points[start..] {
        table.add_row(chart_row(point));
    }
    println!("{table}");
}

fn chart_row(point: &ChartPoint) -> Vec<String> {
    let average = |value: Option<f64>| value.map_or_else(|| "-".to_string(), format::krw);
    vec![
        point.label.clone(),
        format::krw(point.close),
        average(point.ma20),
        average(point.ma60),
        format::volume(point.volume as f64),
    ]
}

fn print_company(company: &CompanyInfo) {
    let mut table = table();
    table.add_row(vec!["업종".to_string(), company.industry.clone()]);
    table.add_row(vec![
        "상장일".to_string(),
        format::korean_date(Some(company.listing_date.as_str())),
    ]);
    table.add_row(vec![
        "시가총액".to_string(),
        company
            .market_cap
            .map_or_else(|| "-".to_string(), format::market_cap),
    ]);
    table.add_row(vec!["대표이사".to_string(), company.ceo.clone()]);
    table.add_row(vec!["웹사이트".to_string(), company.website.clone()]);
    println!("{table}");
    if !company.description.is_empty() {
        println!("{}", company.description);
    }
}

fn print_metrics(bundle: &MetricsBundle, dividend_yield: Option<f64>) {
    let investment = bundle.investment_metrics.clone().unwrap_or_default();

    let mut cards = table();
    cards.set_header(vec!["지표", "값", "평가", "설명"]);
    for card in metrics::metric_cards(&investment) {
        cards.add_row(vec![
            card.title.to_string(),
            card.display,
            card.indicator.symbol().to_string(),
            card.description.to_string(),
        ]);
    }
    println!("{cards}");

    if let Some(peers) = &bundle.peer_comparison {
        let mut rows = table();
        rows.set_header(vec!["항목", "회사", "업종 평균", "상대값"]);
        for row in metrics::peer_rows(&investment, dividend_yield, peers) {
            rows.add_row(vec![
                row.label.to_string(),
                format::group_digits(row.company, 2),
                format::group_digits(row.industry, 2),
                format::percent(row.relative),
            ]);
        }
        println!("{rows}");

        let ranking = &peers.ranking;
        if ranking.total_companies > 0 {
            println!(
                "시가총액 {}위 / 매출 {}위 / 이익 {}위 (총 {}개사)",
                ranking.by_market_cap,
                ranking.by_revenue,
                ranking.by_profit,
                ranking.total_companies
            );
        }
    }

    if let Some(consensus) = bundle
        .performance_consensus
        .as_ref()
        .and_then(|p| p.consensus.as_ref())
    {
        println!(
            "컨센서스: 목표가 {} · {} ({}명)",
            format::krw(consensus.target_price),
            consensus.recommendation,
            consensus.number_of_analysts
        );
    }
}

fn print_financial(statements: &FinancialStatements) {
    let view = StatementView::Quarterly;
    let rows = financial::recent(&statements.income_statement, view);

    let mut table = table();
    table.set_header(vec!["기간", "매출액", "영업이익", "순이익"]);
    for row in &rows {
        table.add_row(vec![
            row.period.clone(),
            format::financial_value(row.revenue),
            format::financial_value(row.operating_income),
            format::financial_value(row.net_income),
        ]);
    }
    println!("{table}");

    if let Some(summary) = financial::income_summary(&statements.income_statement, view) {
        println!(
            "{} 기준 매출 성장률 {} · 순이익 성장률 {} · 영업이익률 {} · 순이익률 {}",
            summary.period,
            format::percent(summary.revenue_growth),
            format::percent(summary.net_income_growth),
            format::percent(summary.operating_margin),
            format::percent(summary.profit_margin),
        );
    }
}

fn print_dividend(dividend: &DividendInfo) {
    println!(
        "주당배당금 {} · 배당수익률 {} · 배당성향 {}",
        dividend
            .dividend_per_share
            .map_or_else(|| "-".to_string(), format::krw),
        format::number(dividend.dividend_yield, "%"),
        format::number(dividend.payout_ratio, "%"),
    );

    let schedule = &dividend.schedule;
    println!(
        "배당락일 {} · 기준일 {} · 지급일 {}",
        format::korean_date(schedule.ex_dividend_date.as_deref()),
        format::korean_date(schedule.record_date.as_deref()),
        format::korean_date(schedule.payment_date.as_deref()),
    );

    let history = financial::dividend_history(dividend);
    if !history.is_empty() {
        let mut table = table();
        table.set_header(vec!["연도", "주당배당금", "배당수익률"]);
        for year in history {
            table.add_row(vec![
                year.year,
                format::krw(year.dividend_per_share),
                format::percent(year.dividend_yield),
            ]);
        }
        println!("{table}");
    }
}

fn print_news(news: &AnalystNews) {
    let sentiment = &news.sentiment_analysis;
    println!(
        "감성 분석: 긍정 {} · 중립 {} · 부정 {} ({})",
        format::percent(sentiment.positive),
        format::percent(sentiment.neutral),
        format::percent(sentiment.negative),
        sentiment.overall_sentiment
    );

    if !news.analyst_reports.is_empty() {
        let mut table = table();
        table.set_header(vec!["일자", "증권사", "의견", "목표가", "제목"]);
        for report in news.analyst_reports.iter().take(NEWS_LIMIT) {
            table.add_row(vec![
                report.date.clone(),
                report.firm.clone(),
                report.recommendation.clone(),
                format::krw(report.target_price),
                report.title.clone(),
            ]);
        }
        println!("{table}");
    }

    for item in news.news.iter().take(NEWS_LIMIT) {
        println!("• {} - {} ({})", item.title, item.source, item.date);
    }
}

fn print_risk(analysis: &RiskAnalysis) {
    if let Some(volatility) = &analysis.volatility {
        println!(
            "변동성: 일간 {} · 주간 {} · 월간 {} · 연간 {} · 베타 {:.2}",
            format::percent(volatility.daily),
            format::percent(volatility.weekly),
            format::percent(volatility.monthly),
            format::percent(volatility.annual),
            volatility.beta
        );
    }

    if let Some(financial) = &analysis.financial_risk {
        let zone = AltmanZone::from_score(financial.altman_z_score);
        println!(
            "재무 위험 {} · Altman Z {:.2} ({}) · 부채비율 {:.2} · 이자보상배율 {:.2} · 당좌비율 {:.2}",
            risk::level_label(financial.risk_level),
            financial.altman_z_score,
            zone.label(),
            financial.debt_to_equity,
            financial.interest_coverage,
            financial.quick_ratio
        );
    }

    if !analysis.risk_factors.is_empty() {
        let mut table = table();
        table.set_header(vec!["분류", "영향", "가능성", "설명"]);
        for (factor, point) in analysis
            .risk_factors
            .iter()
            .zip(risk::risk_matrix(&analysis.risk_factors))
        {
            table.add_row(vec![
                factor.category.clone(),
                format!("{} ({})", risk::level_label(factor.impact), point.impact),
                format!(
                    "{} ({})",
                    risk::level_label(factor.probability),
                    point.probability
                ),
                factor.description.clone(),
            ]);
        }
        println!("{table}");
    }

    if let Some(ai) = &analysis.ai_analysis {
        println!("AI 분석 ({:.0}점): {}", ai.score, ai.summary);
        for recommendation in &ai.recommendations {
            println!("  - {recommendation}");
        }
    }
}
