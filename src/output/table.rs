use unicode_width::UnicodeWidthStr;

use crate::filters::FilterOption;
use crate::statement::Statement;

/// Truncate a string to fit within max_width (respecting unicode width).
pub fn truncate(s: &str, max_width: usize) -> String {
    if UnicodeWidthStr::width(s) <= max_width {
        return s.to_string();
    }
    let mut result = String::new();
    let mut width = 0;
    for ch in s.chars() {
        let cw = unicode_width::UnicodeWidthChar::width(ch).unwrap_or(0);
        if width + cw + 3 > max_width {
            result.push_str("...");
            break;
        }
        result.push(ch);
        width += cw;
    }
    result
}

fn plural(n: usize) -> &'static str {
    if n == 1 {
        ""
    } else {
        "s"
    }
}

/// Print the visible statements, newest or oldest first as already sorted.
pub fn print_statement_list(visible: &[&Statement], total: usize, address: &str) {
    println!("Address: {address}");
    if visible.is_empty() {
        println!("No statements match ({total} loaded).");
        return;
    }

    println!("{} of {total} statement{}:\n", visible.len(), plural(total));
    println!("  {:<12} {:<28} {:<18} {}", "DATE", "SPEAKER", "SECTOR", "THEMES");
    println!("  {}", "-".repeat(76));

    for s in visible {
        println!(
            "  {:<12} {:<28} {:<18} {}",
            truncate(&s.date_formatted, 12),
            truncate(&s.person, 26),
            truncate(&s.sector, 16),
            s.themes.join(", "),
        );
        if !s.position.is_empty() {
            println!("  {}", truncate(&format!("  {}", s.position), 76));
        }
        if !s.details.is_empty() {
            let details = s.details.replace('\n', " ");
            println!("  {}", truncate(&format!("  \"{details}\""), 76));
        }
        for source in &s.sources {
            let label = if source.domain.is_empty() { &source.url } else { &source.domain };
            println!("    └─ {}", truncate(label, 70));
        }
        println!("  id: {}\n", s.id);
    }
}

/// Print a filter catalog.
pub fn print_options(heading: &str, options: &[FilterOption]) {
    if options.is_empty() {
        println!("No {heading} available.");
        return;
    }

    println!("{} {heading}:\n", options.len());
    println!("  {:<36} {}", "SLUG", "TITLE");
    println!("  {}", "-".repeat(76));
    for option in options {
        println!("  {:<36} {}", truncate(&option.slug, 34), option.title);
    }
}
