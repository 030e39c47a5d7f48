use parvaz::{ExtractionTrace, TripRecord};

mod ansi {
    pub const RESET: &str = "\x1b[0m";
    pub const DIM: &str = "\x1b[2m";
    pub const BOLD: &str = "\x1b[1m";

    pub const GREEN: &str = "\x1b[32m";
    pub const YELLOW: &str = "\x1b[33m";
    pub const BLUE: &str = "\x1b[34m";
    pub const CYAN: &str = "\x1b[36m";
    pub const GRAY: &str = "\x1b[90m";

    pub struct Palette {
        enabled: bool,
    }

    impl Palette {
        pub fn new(enabled: bool) -> Self {
            Self { enabled }
        }

        pub fn paint(&self, s: impl AsRef<str>, color: &str) -> String {
            if self.enabled { format!("{}{}{}", color, s.as_ref(), RESET) } else { s.as_ref().to_string() }
        }

        pub fn bold(&self, s: impl AsRef<str>) -> String {
            if self.enabled { format!("{}{}{}", BOLD, s.as_ref(), RESET) } else { s.as_ref().to_string() }
        }

        pub fn dim(&self, s: impl AsRef<str>) -> String {
            if self.enabled { format!("{}{}{}", DIM, s.as_ref(), RESET) } else { s.as_ref().to_string() }
        }
    }
}

pub fn print_run(input: &str, record: &TripRecord, trace: &ExtractionTrace, color: bool) {
    let palette = ansi::Palette::new(color);
    let preview: String = input.chars().take(60).collect();
    println!("\n{}", palette.bold(palette.paint(format!("⚙  Extracting: \"{preview}\""), ansi::CYAN)));

    // Trigger scan and rule activation
    println!("\n{}", palette.paint("━━━ Activation ━━━", ansi::GRAY));
    println!("  Buckets: {}", palette.paint(&trace.buckets, ansi::BLUE));
    println!(
        "  Active rules: {}",
        palette.paint(trace.active_rules.len().to_string(), ansi::GREEN)
    );
    for id in &trace.active_rules {
        println!("    {}", palette.dim(*id));
    }

    // Per-field outcome
    println!("\n{}", palette.paint("━━━ Fields ━━━", ansi::GRAY));
    for field in &trace.fields {
        match (&field.raw, field.rule_id) {
            (Some(raw), Some(rule)) => println!(
                "  {} {} {} {}",
                palette.paint(format!("{:<12}", field.kind.name()), ansi::BLUE),
                palette.bold(palette.paint(raw, ansi::GREEN)),
                palette.dim("│ rule:"),
                palette.paint(rule, ansi::CYAN),
            ),
            _ => println!(
                "  {} {}",
                palette.paint(format!("{:<12}", field.kind.name()), ansi::BLUE),
                palette.dim("—"),
            ),
        }
    }
    if trace.contacts.is_empty() {
        println!("  {} {}", palette.paint(format!("{:<12}", "contacts"), ansi::BLUE), palette.dim("—"));
    } else {
        println!(
            "  {} {}",
            palette.paint(format!("{:<12}", "contacts"), ansi::BLUE),
            palette.paint(trace.contacts.join(", "), ansi::GREEN),
        );
    }

    // Resolved record
    println!("\n{}", palette.paint("━━━ Record ━━━", ansi::GRAY));
    println!(
        "  {} {} {}",
        palette.paint(&record.origin, ansi::GREEN),
        palette.dim("→"),
        palette.paint(&record.destination, ansi::GREEN),
    );
    println!(
        "  {} {}  {} {}",
        palette.dim("codes:"),
        palette.paint(
            format!(
                "{} → {}",
                record.origin_code.as_deref().unwrap_or("?"),
                record.destination_code.as_deref().unwrap_or("?")
            ),
            ansi::YELLOW
        ),
        palette.dim("type:"),
        palette.paint(format!("{:?}", record.post_type), ansi::BLUE),
    );
    println!(
        "  {} {}  {} {}  {} {}",
        palette.dim("date:"),
        palette.paint(
            record.date.map(|d| d.to_string()).unwrap_or_else(|| "?".to_string()),
            ansi::YELLOW
        ),
        palette.dim("time:"),
        palette.paint(record.time.as_deref().unwrap_or("?"), ansi::YELLOW),
        palette.dim("airline:"),
        palette.paint(record.airline.as_deref().unwrap_or("?"), ansi::CYAN),
    );
    println!(
        "  {} {}",
        palette.dim("confidence:"),
        palette.paint(format!("{:.2}", record.confidence), ansi::GREEN),
    );

    // Timing
    println!("\n{}", palette.paint("━━━ Timing ━━━", ansi::GRAY));
    println!("  Total: {}", palette.paint(format!("{:?}", trace.elapsed), ansi::GREEN));
    println!();
}
