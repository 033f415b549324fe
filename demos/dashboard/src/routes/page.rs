use std::fmt::Write;
use std::sync::Arc;

use airline_demand::dashboard::{DashboardView, Panel, MAX_TOP_N, MIN_TOP_N};
use airline_demand::models::{DemandSeries, FlightListing, RouteDetail, RoutePopularity};
use axum::extract::{Query, State};
use axum::response::Html;

use crate::error::AppError;
use crate::routes::DashboardParams;
use crate::state::AppState;

/// GET /?top_n=20&country=All&route=JFK-LHR&live=true
///
/// Server-rendered dashboard. Every interaction re-renders all panels.
pub async fn index(
    State(state): State<Arc<AppState>>,
    Query(params): Query<DashboardParams>,
) -> Result<Html<String>, AppError> {
    let view = state.app.dashboard(params.to_request()).await?;
    Ok(Html(render_page(&view, &params)))
}

fn render_page(view: &DashboardView, params: &DashboardParams) -> String {
    let mut out = String::with_capacity(16 * 1024);
    let req = params.to_request();

    out.push_str(
        "<!doctype html><html><head><meta charset=\"utf-8\">\
         <title>Airline Demand Demo</title>\
         <style>body{font-family:sans-serif;margin:2rem}table{border-collapse:collapse}\
         td,th{border:1px solid #ccc;padding:2px 8px}.warn{color:#a60}.err{color:#b00}\
         .info{color:#555}.cols{display:flex;gap:2rem}</style></head><body>",
    );
    out.push_str("<h1>Airline Booking Market Demand</h1>");
    out.push_str(
        "<p>Route popularity, simulated market trends and live flight data.</p>",
    );

    // -- Filters -------------------------------------------------------------
    out.push_str("<form method=\"get\" action=\"/\"><fieldset><legend>Filters</legend>");
    let _ = write!(
        out,
        "<label>Top N routes <input type=\"number\" name=\"top_n\" min=\"{}\" max=\"{}\" value=\"{}\"></label> ",
        MIN_TOP_N,
        MAX_TOP_N,
        req.top_n.clamp(MIN_TOP_N, MAX_TOP_N)
    );
    out.push_str("<label>Origin country <select name=\"country\"><option>All</option>");
    if let Some(countries) = view.countries.ready() {
        for c in countries {
            let selected = if req.origin_country.as_deref() == Some(c.as_str()) {
                " selected"
            } else {
                ""
            };
            let _ = write!(out, "<option{}>{}</option>", selected, escape(c));
        }
    }
    out.push_str("</select></label> ");

    out.push_str("<label>Route <select name=\"route\">");
    if let Some(options) = view.route_options.ready() {
        let current = view.selected.as_ref().map(|s| s.route.as_str());
        for key in options {
            let selected = if current == Some(key.as_str()) { " selected" } else { "" };
            let _ = write!(out, "<option{}>{}</option>", selected, escape(key));
        }
    }
    out.push_str("</select></label> ");
    out.push_str("<button type=\"submit\">Update</button> ");
    out.push_str("<button type=\"submit\" name=\"live\" value=\"true\">Get live flights</button>");
    out.push_str("</fieldset></form>");

    // -- Top routes ----------------------------------------------------------
    out.push_str("<h2>Top Flight Routes</h2>");
    render_panel(&mut out, &view.top_routes, render_top_routes);

    // -- Route details & trends ---------------------------------------------
    out.push_str("<h2>Route Details &amp; Simulated Trends</h2>");
    if let Some(sel) = &view.selected {
        let _ = write!(
            out,
            "<p>Selected route: <b>{} &rarr; {}</b></p>",
            escape(&sel.origin),
            escape(&sel.destination)
        );
    }
    render_panel(&mut out, &view.route_details, render_route_details);
    render_panel(&mut out, &view.trends, render_trends);

    // -- Live flights --------------------------------------------------------
    out.push_str("<h2>Live Flight Data (AviationStack API)</h2>");
    render_panel(&mut out, &view.live_flights, render_flights);

    out.push_str("<hr><small>Powered by OpenFlights + AviationStack API.</small></body></html>");
    out
}

fn render_panel<T>(out: &mut String, panel: &Panel<T>, ready: fn(&mut String, &T)) {
    match panel {
        Panel::Ready(v) => ready(out, v),
        Panel::Empty(m) | Panel::Idle(m) | Panel::Disabled(m) => {
            let _ = write!(out, "<p class=\"info\">{}</p>", escape(m));
        }
        Panel::Warning(m) => {
            let _ = write!(out, "<p class=\"warn\">&#9888; {}</p>", escape(m));
        }
        Panel::Unavailable(m) => {
            let _ = write!(out, "<p class=\"err\">Route data unavailable: {}</p>", escape(m));
        }
    }
}

fn render_top_routes(out: &mut String, routes: &Vec<RoutePopularity>) {
    out.push_str("<table><tr><th>#</th><th>route</th><th>count</th></tr>");
    for r in routes {
        let _ = write!(
            out,
            "<tr><td>{}</td><td><a href=\"/?route={}\">{}</a></td><td>{}</td></tr>",
            r.popularity_rank,
            escape(&r.route),
            escape(&r.route),
            r.count
        );
    }
    out.push_str("</table>");
    let max = routes.iter().map(|r| r.count).max().unwrap_or(1).max(1);
    out.push_str("<div>");
    for r in routes {
        let width = (r.count as f64 / max as f64 * 300.0).round() as i64;
        let _ = write!(
            out,
            "<div title=\"{route}\"><span style=\"display:inline-block;width:6rem\">{route}</span>\
             <span style=\"display:inline-block;background:#4a7;height:0.8em;width:{width}px\"></span></div>",
            route = escape(&r.route),
            width = width
        );
    }
    out.push_str("</div>");
}

fn render_route_details(out: &mut String, rows: &Vec<RouteDetail>) {
    let Some(first) = rows.first() else {
        return;
    };
    let _ = write!(
        out,
        "<p>{} ({}, {}) &rarr; {} ({}, {}) &middot; {} airline(s)</p>",
        escape(first.origin_name.as_deref().unwrap_or("?")),
        escape(first.origin_city.as_deref().unwrap_or("?")),
        escape(first.origin_country.as_deref().unwrap_or("?")),
        escape(first.destination_name.as_deref().unwrap_or("?")),
        escape(first.destination_city.as_deref().unwrap_or("?")),
        escape(first.destination_country.as_deref().unwrap_or("?")),
        rows.len()
    );
}

fn render_trends(out: &mut String, series: &DemandSeries) {
    out.push_str("<div class=\"cols\"><div><h3>Simulated Price Trend (36 Months)</h3>");
    out.push_str(&sparkline(&series.prices()));
    out.push_str("</div><div><h3>Simulated Booking Trend (36 Months)</h3>");
    let volumes: Vec<f64> = series.booking_volumes().iter().map(|v| *v as f64).collect();
    out.push_str(&sparkline(&volumes));
    out.push_str("</div></div>");

    out.push_str("<table><tr><th>month</th><th>price</th><th>bookings</th></tr>");
    for m in &series.months {
        let _ = write!(
            out,
            "<tr><td>{}</td><td>{:.2}</td><td>{}</td></tr>",
            m.date.format("%Y-%m"),
            m.price,
            m.booking_volume
        );
    }
    out.push_str("</table>");
}

fn render_flights(out: &mut String, listing: &FlightListing) {
    out.push_str(
        "<table><tr><th>airline</th><th>number</th><th>flight</th><th>from</th><th>to</th>\
         <th>departure</th><th>arrival</th><th>status</th></tr>",
    );
    for f in &listing.flights {
        out.push_str("<tr>");
        for cell in [
            &f.airline_name,
            &f.flight_number,
            &f.flight_iata,
            &f.departure_iata,
            &f.arrival_iata,
            &f.departure_scheduled,
            &f.arrival_scheduled,
            &f.flight_status,
        ] {
            let _ = write!(out, "<td>{}</td>", escape(cell.as_deref().unwrap_or("")));
        }
        out.push_str("</tr>");
    }
    out.push_str("</table>");
}

/// Inline SVG polyline scaled to the series' own range.
fn sparkline(values: &[f64]) -> String {
    const W: f64 = 360.0;
    const H: f64 = 120.0;
    if values.len() < 2 {
        return String::new();
    }
    let min = values.iter().cloned().fold(f64::INFINITY, f64::min);
    let max = values.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    let span = if max > min { max - min } else { 1.0 };
    let step = W / (values.len() - 1) as f64;
    let points: Vec<String> = values
        .iter()
        .enumerate()
        .map(|(i, v)| format!("{:.1},{:.1}", i as f64 * step, H - (v - min) / span * H))
        .collect();
    format!(
        "<svg width=\"{W}\" height=\"{H}\" viewBox=\"0 0 {W} {H}\">\
         <polyline fill=\"none\" stroke=\"#36c\" stroke-width=\"2\" points=\"{}\"/></svg>",
        points.join(" ")
    )
}

fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
