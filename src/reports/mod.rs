use comfy_table::presets::ASCII_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};
use phiscore::consts::UNAVAILABLE_COLOR;
use phiscore::scorer::MetricBreakdown;
use phiscore::Assessment;

/// `#27ae60` -> RGB. Anything else renders uncoloured.
fn hex_color(hex: &str) -> Color {
    let h = hex.trim_start_matches('#');
    if h.len() != 6 || !h.is_ascii() {
        return Color::Reset;
    }
    let channel = |i: usize| u8::from_str_radix(&h[i..i + 2], 16).ok();
    match (channel(0), channel(2), channel(4)) {
        (Some(r), Some(g), Some(b)) => Color::Rgb { r, g, b },
        _ => Color::Reset,
    }
}

fn new_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(ASCII_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

fn right_align(table: &mut Table, from: usize, to: usize) {
    for i in from..=to {
        if let Some(col) = table.column_mut(i) {
            col.set_cell_alignment(CellAlignment::Right);
        }
    }
}

fn header(cells: &[&str]) -> Vec<Cell> {
    cells
        .iter()
        .map(|c| Cell::new(c).add_attribute(Attribute::Bold))
        .collect()
}

pub fn print_assessment(a: &Assessment) {
    let c = &a.composite;
    println!("\n🌍 === PLANETARY HEALTH: {} === 🌍", a.site);
    println!(
        "PHI {:.1}  grade {} ({})  metrics {}/{}  trend {}  freshness {}",
        c.overall_score,
        c.grade,
        c.label,
        c.available_count,
        c.total_count,
        c.trend,
        c.data_freshness
    );
    if c.is_partial {
        let missing: Vec<String> = c.missing_metrics.iter().map(|m| m.to_string()).collect();
        println!("⚠️  Partial reading, missing: {}", missing.join(", "));
    }
    let q = &c.data_quality;
    println!(
        "DQS {:.2} ({})  weights '{}'  {}",
        q.score, q.confidence, c.weighting, q.recommendation
    );
    if !q.missing_critical.is_empty() {
        let missing: Vec<String> = q.missing_critical.iter().map(|m| m.to_string()).collect();
        println!("❗ Missing critical metrics: {}", missing.join(", "));
    }

    // Per-metric scores
    let mut table = new_table();
    table.set_header(header(&["Metric", "Value", "Unit", "Score", "Grade"]));
    for (metric, score) in &c.per_metric {
        match score {
            Some(s) => table.add_row(vec![
                Cell::new(metric.to_string()),
                Cell::new(format!("{:.2}", s.raw_value)),
                Cell::new(&s.unit),
                Cell::new(format!("{:.1}", s.score)),
                Cell::new(format!("{} {}", s.grade, s.label)).fg(hex_color(&s.color)),
            ]),
            None => table.add_row(vec![
                Cell::new(metric.to_string()),
                Cell::new("-"),
                Cell::new(metric.unit()),
                Cell::new("-"),
                Cell::new("n/a").fg(hex_color(UNAVAILABLE_COLOR)),
            ]),
        };
    }
    right_align(&mut table, 1, 3);
    println!("{}", table);

    // Ecosystem service value
    let esv = &a.esv;
    println!(
        "\n💰 ESV ({}): {:.0} USD/ha/yr  (baseline {:.0}, multiplier {:+.4}, regional {:.2})",
        esv.ecosystem_type,
        esv.adjusted_value,
        esv.baseline_value,
        esv.phi_multiplier,
        esv.regional_factor
    );
    let mut table = new_table();
    table.set_header(header(&["Service", "USD/ha/yr", "Share"]));
    for s in &esv.services {
        table.add_row(vec![
            Cell::new(format!("{} {}", s.icon, s.name)),
            Cell::new(format!("{:.0}", s.value)),
            Cell::new(format!("{}%", s.percentage)),
        ]);
    }
    right_align(&mut table, 1, 2);
    println!("{}", table);

    // Projections
    println!("\n📈 Five-year outlook");
    let mut table = new_table();
    table.set_header(header(&[
        "Scenario", "Year 1", "Year 3", "Year 5", "Growth", "PHI Y5", "CO2 t/ha",
    ]));
    for p in a.projections.iter() {
        let esv_at = |y| p.at_year(y).map_or(0.0, |yp| yp.esv);
        let phi5 = p.at_year(5).map_or(0.0, |yp| yp.phi);
        table.add_row(vec![
            Cell::new(&p.label).fg(hex_color(&p.color)),
            Cell::new(format!("{:.0}", esv_at(1))),
            Cell::new(format!("{:.0}", esv_at(3))),
            Cell::new(format!("{:.0}", esv_at(5))),
            Cell::new(format!("{:+}%", p.esv_growth_percent)),
            Cell::new(format!("{:.1}", phi5)),
            Cell::new(format!("{:.1}", p.total_carbon)),
        ]);
    }
    right_align(&mut table, 1, 6);
    println!("{}", table);

    // Impacts
    let mut table = new_table();
    table.set_header(header(&["Impact", "Outlook", "Risk"]));
    for s in &a.impacts {
        table.add_row(vec![
            Cell::new(format!("{} ({})", s.category, s.severity)).fg(hex_color(&s.color)),
            Cell::new(&s.positive),
            Cell::new(&s.risk),
        ]);
    }
    println!("{}", table);
}

pub fn print_batch_summary(assessments: &[Assessment]) {
    println!("\n📊 === BATCH SUMMARY ({} sites) === 📊", assessments.len());
    let mut table = new_table();
    table.set_header(header(&[
        "Site",
        "PHI",
        "Grade",
        "Metrics",
        "DQS",
        "Freshness",
        "Ecosystem",
        "ESV USD/ha",
        "Y5 (moderate)",
    ]));
    for a in assessments {
        let c = &a.composite;
        table.add_row(vec![
            Cell::new(&a.site).add_attribute(Attribute::Bold),
            Cell::new(format!("{:.1}", c.overall_score)).fg(Color::Cyan),
            Cell::new(format!("{} {}", c.grade, c.label)).fg(hex_color(&c.color)),
            Cell::new(format!("{}/{}", c.available_count, c.total_count)),
            Cell::new(format!("{:.0}", c.data_quality.score)),
            Cell::new(c.data_freshness.to_string()),
            Cell::new(&a.esv.ecosystem_type),
            Cell::new(format!("{:.0}", a.esv.adjusted_value)),
            Cell::new(format!("{:.0}", a.projections.moderate.year5_esv)),
        ]);
    }
    right_align(&mut table, 1, 1);
    right_align(&mut table, 4, 4);
    right_align(&mut table, 7, 8);
    println!("{}", table);
}

pub fn print_breakdown(b: &MetricBreakdown) {
    println!("\n🔬 {} ({})", b.metric, b.unit);
    let mut table = new_table();
    table.add_row(vec![
        Cell::new("Raw value").add_attribute(Attribute::Bold),
        Cell::new(b.raw_value.map_or("missing".to_string(), |v| format!("{}", v))),
    ]);
    match &b.score {
        Some(s) => {
            table.add_row(vec![
                Cell::new("Score").add_attribute(Attribute::Bold),
                Cell::new(format!("{:.1}", s.score)).fg(Color::Cyan),
            ]);
            table.add_row(vec![
                Cell::new("Grade").add_attribute(Attribute::Bold),
                Cell::new(format!("{} {}", s.grade, s.label)).fg(hex_color(&s.color)),
            ]);
        }
        None => {
            table.add_row(vec![
                Cell::new("Score").add_attribute(Attribute::Bold),
                Cell::new("n/a").fg(hex_color(UNAVAILABLE_COLOR)),
            ]);
        }
    }
    table.add_row(vec![
        Cell::new("Curve").add_attribute(Attribute::Bold),
        Cell::new(&b.curve),
    ]);
    for (name, value) in &b.parameters {
        table.add_row(vec![Cell::new(format!("  {}", name)), Cell::new(format!("{}", value))]);
    }
    table.add_row(vec![
        Cell::new("Weight").add_attribute(Attribute::Bold),
        Cell::new(b.weight.map_or("not in profile".to_string(), |w| format!("{:.2}", w))),
    ]);
    println!("{}", table);
}
