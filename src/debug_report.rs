use bcsl::{CompileReport, Located};

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

/// Show at most this many ordering entries and reactions.
const PREVIEW: usize = 20;

pub fn print_compile(model_path: &str, report: &CompileReport, color: bool) {
    let palette = ansi::Palette::new(color);
    let vm = &report.vector_model;
    println!("\n{}", palette.bold(palette.paint(format!("⚙  Compiling: {model_path}"), ansi::CYAN)));

    println!("\n{}", palette.paint("━━━ Rules ━━━", ansi::GRAY));
    for (rule, metrics) in report.rules.iter().zip(&report.metrics.rules) {
        println!(
            "  {} {} {}",
            palette.paint(format!("[{}]", metrics.index), ansi::GRAY),
            rule,
            if metrics.reactions > 0 {
                palette.paint(format!("✓ {} reactions", metrics.reactions), ansi::GREEN)
            } else {
                palette.dim("✗ 0 reactions")
            }
        );
    }
    let skipped = report.rules.len() - report.metrics.rules.len();
    if skipped > 0 {
        println!("  {}", palette.dim(format!("{skipped} commented-out rules skipped")));
    }

    println!("\n{}", palette.paint("━━━ Ordering ━━━", ansi::GRAY));
    for (idx, complex) in vm.ordering.iter().enumerate().take(PREVIEW) {
        let count = vm.init.get(idx).copied().unwrap_or(0);
        println!(
            "  {} {} {}",
            palette.paint(format!("x_{idx}"), ansi::BLUE),
            palette.bold(complex.to_string()),
            if count > 0 { palette.paint(format!("init {count}"), ansi::YELLOW) } else { String::new() }
        );
    }
    if vm.ordering.len() > PREVIEW {
        println!("  {}", palette.dim(format!("... +{} more", vm.ordering.len() - PREVIEW)));
    }

    println!("\n{}", palette.paint("━━━ Reactions ━━━", ansi::GRAY));
    if vm.reactions.is_empty() {
        println!("{}", palette.dim("  No reactions produced"));
    }
    for reaction in vm.reactions.iter().take(PREVIEW) {
        println!("  {}", reaction);
    }
    if vm.reactions.len() > PREVIEW {
        println!("  {}", palette.dim(format!("... +{} more", vm.reactions.len() - PREVIEW)));
    }
    if let Some(bound) = vm.bound {
        println!("  {} {}", palette.dim("bound:"), palette.paint(bound.to_string(), ansi::YELLOW));
    }

    println!("\n{}", palette.paint("━━━ Timing ━━━", ansi::GRAY));
    println!(
        "  Total: {}  │  Ordering: {}  │  Expansion: {}  │  Vectorization: {}",
        palette.paint(format!("{:?}", report.elapsed), ansi::GREEN),
        palette.paint(format!("{:?}", report.metrics.ordering), ansi::CYAN),
        palette.paint(format!("{:?}", report.metrics.expansion), ansi::CYAN),
        palette.dim(format!("{:?}", report.metrics.vectorization)),
    );
    println!(
        "  {} {}  {} {}",
        palette.dim("expanded:"),
        palette.paint(report.metrics.expanded_reactions().to_string(), ansi::YELLOW),
        palette.dim("distinct:"),
        palette.paint(vm.reactions.len().to_string(), ansi::YELLOW)
    );
    println!();
}

pub fn print_located(literal: &str, located: &Located, color: bool) {
    let palette = ansi::Palette::new(color);
    match located {
        Located::Exact(idx) => {
            println!("{} {}", palette.bold(literal), palette.paint(format!("x_{idx}"), ansi::GREEN));
        }
        Located::Abstract(indices) => {
            let coords: Vec<String> = indices.iter().map(|idx| format!("x_{idx}")).collect();
            println!(
                "{} {} {}",
                palette.bold(literal),
                palette.dim("compatible with"),
                palette.paint(coords.join(", "), ansi::CYAN)
            );
        }
    }
}

pub fn print_reachable(literal: &str, reachable: bool, color: bool) {
    let palette = ansi::Palette::new(color);
    if reachable {
        println!("{} {}", palette.bold(literal), palette.paint("✓ may be reachable", ansi::GREEN));
    } else {
        println!("{} {}", palette.bold(literal), palette.paint("✗ not reachable", ansi::YELLOW));
    }
}
