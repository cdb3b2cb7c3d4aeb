//! Terminal styling utilities

use owockibot::BountyStatus;

pub fn style_cyan(s: &str) -> String {
    format!("\x1b[36m{}\x1b[0m", s)
}

pub fn style_green(s: &str) -> String {
    format!("\x1b[32m{}\x1b[0m", s)
}

pub fn style_red(s: &str) -> String {
    format!("\x1b[31m{}\x1b[0m", s)
}

pub fn style_yellow(s: &str) -> String {
    format!("\x1b[33m{}\x1b[0m", s)
}

pub fn style_dim(s: &str) -> String {
    format!("\x1b[2m{}\x1b[0m", s)
}

pub fn style_bold(s: &str) -> String {
    format!("\x1b[1m{}\x1b[0m", s)
}

pub fn print_success(msg: &str) {
    println!("{} {}", style_green("✓"), msg);
}

pub fn print_error(msg: &str) {
    eprintln!("{} {}", style_red("✗"), msg);
}

pub fn print_warning(msg: &str) {
    println!("{} {}", style_yellow("⚠"), msg);
}

pub fn print_info(msg: &str) {
    println!("{} {}", style_cyan("ℹ"), msg);
}

pub fn print_header(title: &str) {
    println!();
    println!("{}", style_bold(title));
    println!("{}", "─".repeat(title.chars().count()));
}

/// Colour a status by how far along the lifecycle it is
pub fn style_status(status: &BountyStatus) -> String {
    match status {
        BountyStatus::Open => style_green(status.as_str()),
        BountyStatus::Claimed => style_yellow(status.as_str()),
        BountyStatus::Submitted => style_cyan(status.as_str()),
        BountyStatus::Completed => style_dim(status.as_str()),
        BountyStatus::Unknown(s) => s.clone(),
    }
}

/// Shorten a wallet address for display, showing first 6 and last 4 characters.
/// Returns the full string if it's shorter than 12 characters.
pub fn truncate_address(address: &str) -> String {
    if address.len() >= 12 && address.is_ascii() {
        format!("{}...{}", &address[..6], &address[address.len() - 4..])
    } else {
        address.to_string()
    }
}
