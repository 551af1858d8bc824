//! Browser dashboard: a small axum server rendering the same views as the
//! terminal dashboard.
//!
//! | Route | Response |
//! |-------|----------|
//! | `GET /` | HTML page, auto-refreshing `/` via `<meta http-equiv="refresh">` |
//! | `GET /api/dashboard` | `{"status":"ok","dashboard":{..}}` or `{"status":"empty"}` |
//! | `GET /healthz` | liveness text |
//!
//! `?refresh=1` on either dashboard route clears the fetch cache first. A
//! source failure answers `502 Bad Gateway` with the error text. All requests
//! share one [`OrderFeed`] behind a mutex, so refreshes never overlap.

use anyhow::Context;
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::Html,
    routing::get,
    Json, Router,
};
use orderdash_core::{
    config::Config,
    display::{format_money, format_share, format_timestamp},
    metrics::{Dashboard, DashboardOptions},
};
use orderdash_source::{AnySource, DocumentSource, OrderFeed, SourceError};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::{net::TcpListener, sync::Mutex};

pub const EMPTY_MESSAGE: &str = "No data found in collection yet.";

/// Shared state behind every route.
pub struct ServeState<S> {
    feed: Mutex<OrderFeed<S>>,
    options: DashboardOptions,
    currency: String,
    timestamp_format: String,
    auto_refresh_secs: u64,
}

impl<S: DocumentSource> ServeState<S> {
    pub fn new(feed: OrderFeed<S>, config: &Config) -> Self {
        Self {
            feed: Mutex::new(feed),
            options: config.dashboard.options(),
            currency: config.dashboard.currency_symbol.clone(),
            timestamp_format: config.ui.timestamp_format.clone(),
            auto_refresh_secs: config.refresh.auto_refresh().as_secs(),
        }
    }

    /// Fetch through the cache and build the dashboard; `None` when empty.
    async fn dashboard(&self, refresh: bool) -> Result<Option<Dashboard>, SourceError> {
        let mut feed = self.feed.lock().await;
        if refresh {
            feed.invalidate();
        }
        let batch = feed.snapshot().await?;
        Ok(Dashboard::build(&batch, &self.options))
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct RefreshQuery {
    refresh: Option<String>,
}

impl RefreshQuery {
    fn requested(&self) -> bool {
        self.refresh
            .as_deref()
            .is_some_and(|v| !matches!(v.trim(), "0" | "false" | "no"))
    }
}

#[derive(Debug, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum DashboardResponse {
    Ok { dashboard: Box<Dashboard> },
    Empty,
}

pub fn router<S: DocumentSource + 'static>(state: Arc<ServeState<S>>) -> Router {
    Router::new()
        .route("/", get(index::<S>))
        .route("/api/dashboard", get(api_dashboard::<S>))
        .route("/healthz", get(health))
        .with_state(state)
}

/// Open the configured source and serve until the process is stopped.
pub async fn run(config: Config, bind: Option<String>) -> anyhow::Result<()> {
    let source = AnySource::open(&config.source).await?;
    let addr = bind.unwrap_or_else(|| config.server.bind.clone());
    let feed = OrderFeed::new(source, config.refresh.cache_ttl());
    let state = Arc::new(ServeState::new(feed, &config));

    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    tracing::info!(addr = %addr, "browser dashboard listening");
    axum::serve(listener, router(state)).await?;
    Ok(())
}

async fn health() -> &'static str {
    "orderdash is ready"
}

fn bad_gateway(err: SourceError) -> (StatusCode, String) {
    tracing::error!(error = %err, "fetch failed");
    (StatusCode::BAD_GATEWAY, err.to_string())
}

async fn api_dashboard<S: DocumentSource + 'static>(
    State(state): State<Arc<ServeState<S>>>,
    Query(query): Query<RefreshQuery>,
) -> Result<Json<DashboardResponse>, (StatusCode, String)> {
    let response = match state.dashboard(query.requested()).await.map_err(bad_gateway)? {
        Some(dashboard) => DashboardResponse::Ok { dashboard: Box::new(dashboard) },
        None => DashboardResponse::Empty,
    };
    Ok(Json(response))
}

async fn index<S: DocumentSource + 'static>(
    State(state): State<Arc<ServeState<S>>>,
    Query(query): Query<RefreshQuery>,
) -> Result<Html<String>, (StatusCode, String)> {
    let dashboard = state.dashboard(query.requested()).await.map_err(bad_gateway)?;
    Ok(Html(render_page(dashboard.as_ref(), &state)))
}

// ---------------------------------------------------------------------------
// HTML
// ---------------------------------------------------------------------------

fn render_page<S>(dashboard: Option<&Dashboard>, state: &ServeState<S>) -> String {
    let mut html = format!(
        "<!doctype html>\n<html><head><meta charset=\"utf-8\">\
         <meta http-equiv=\"refresh\" content=\"{}; url=/\">\
         <title>Orders &amp; Payments Dashboard</title><style>{STYLE}</style></head><body>\n\
         <h1>Orders &amp; Payments Dashboard</h1>\n\
         <p><a href=\"/?refresh=1\">Refresh data</a></p>\n",
        state.auto_refresh_secs
    );

    match dashboard {
        None => html.push_str(&format!("<p class=\"warning\">{EMPTY_MESSAGE}</p>\n")),
        Some(dashboard) => render_dashboard(&mut html, dashboard, state),
    }

    html.push_str("</body></html>\n");
    html
}

fn render_dashboard<S>(html: &mut String, d: &Dashboard, state: &ServeState<S>) {
    let money = |v| format_money(v, &state.currency);
    let average = d.kpis.average_order_value.map(money).unwrap_or_else(|| "—".to_string());

    html.push_str("<section class=\"kpis\">\n");
    for (label, value) in [
        ("Total Revenue", money(d.kpis.total_revenue)),
        ("Number of Orders", d.kpis.order_count.to_string()),
        ("Average Order Value", average),
    ] {
        html.push_str(&format!("<div class=\"kpi\"><span>{label}</span><strong>{value}</strong></div>\n"));
    }
    html.push_str("</section>\n");

    html.push_str("<h2>Payment Method Share</h2>\n<table>\n");
    for share in &d.payment_methods {
        let pct = format_share(share.share);
        html.push_str(&format!(
            "<tr><td>{}</td><td class=\"bar\"><div style=\"width:{pct}\"></div></td><td>{pct}</td><td>{}</td></tr>\n",
            escape(&share.method),
            money(share.amount),
        ));
    }
    html.push_str("</table>\n");

    html.push_str("<h2>Revenue Over Time</h2>\n<table>\n<tr><th>Time</th><th>Orders</th><th>Revenue</th></tr>\n");
    for point in &d.revenue {
        html.push_str(&format!(
            "<tr><td>{}</td><td>{}</td><td>{}</td></tr>\n",
            format_timestamp(point.at, &state.timestamp_format),
            point.orders,
            money(point.revenue),
        ));
    }
    html.push_str("</table>\n");

    html.push_str("<h2>Top Items by Quantity</h2>\n<table>\n<tr><th>Item</th><th>Quantity</th><th>Average price</th></tr>\n");
    for item in &d.top_items {
        html.push_str(&format!(
            "<tr><td>{}</td><td>{}</td><td>{}</td></tr>\n",
            escape(&item.item_name),
            item.total_quantity,
            money(item.average_price),
        ));
    }
    html.push_str("</table>\n");

    html.push_str(
        "<h2>Recent Orders</h2>\n<table>\n<tr><th>Customer</th><th>Order total</th>\
         <th>Method</th><th>Amount</th><th>Ordered</th><th>Paid</th></tr>\n",
    );
    for order in &d.recent_orders {
        html.push_str(&format!(
            "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>\n",
            escape(&order.customer_id),
            order.order_total.map(money).unwrap_or_default(),
            escape(order.payment_method.as_deref().unwrap_or_default()),
            order.payment_amount.map(money).unwrap_or_default(),
            format_timestamp(order.order_time, &state.timestamp_format),
            format_timestamp(order.payment_time, &state.timestamp_format),
        ));
    }
    html.push_str("</table>\n");

    if d.dropped > 0 {
        html.push_str(&format!("<p class=\"note\">{} records skipped (missing timestamps)</p>\n", d.dropped));
    }
}

/// Minimal HTML text escaping for values taken from documents.
fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

const STYLE: &str = "body{font-family:sans-serif;margin:2em}\
    .kpis{display:flex;gap:2em}.kpi{display:flex;flex-direction:column}\
    .kpi strong{font-size:1.6em}table{border-collapse:collapse;margin-bottom:1.5em}\
    td,th{padding:.2em .8em;text-align:left}.bar{width:200px}\
    .bar div{background:#4c9be8;height:.8em}.warning{color:#b8860b;font-weight:bold}\
    .note{color:#888}";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_markup() {
        assert_eq!(escape("<b>Tom & \"Jerry\"</b>"), "&lt;b&gt;Tom &amp; &quot;Jerry&quot;&lt;/b&gt;");
    }

    #[test]
    fn refresh_query_values() {
        let q = |v: Option<&str>| RefreshQuery { refresh: v.map(str::to_string) }.requested();
        assert!(q(Some("1")));
        assert!(q(Some("true")));
        assert!(q(Some("")));
        assert!(!q(Some("0")));
        assert!(!q(None));
    }
}
