//! Shared utility functions for views

/// Format a runtime in minutes as "2h 28m" / "45m", or "N/A".
pub fn format_runtime(runtime: Option<u32>) -> String {
    match runtime {
        Some(minutes) if minutes > 0 => {
            let hours = minutes / 60;
            let minutes = minutes % 60;
            if hours > 0 {
                format!("{}h {}m", hours, minutes)
            } else {
                format!("{}m", minutes)
            }
        }
        _ => "N/A".to_string(),
    }
}

/// Format a rating with its vote count, e.g. "8.3/10 (30,123 votes)".
pub fn format_rating(rating: Option<f64>, vote_count: Option<u64>) -> String {
    match rating {
        Some(r) if r > 0.0 => {
            let formatted = format!("{:.1}/10", r);
            match vote_count {
                Some(c) if c > 0 => format!("{} ({} votes)", formatted, group_thousands(c)),
                _ => formatted,
            }
        }
        _ => "N/A".to_string(),
    }
}

/// Insert comma thousands separators.
fn group_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    grouped
}
