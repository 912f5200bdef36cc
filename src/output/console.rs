//! Console output utilities.

use console::style;

use crate::config::Config;
use crate::device::DevicePool;

/// Print an info message.
pub fn print_info(message: &str) {
    println!("{} {}", style("INFO").cyan().bold(), message);
}

/// Print a success message.
pub fn print_success(message: &str) {
    println!("{} {}", style("OK").green().bold(), message);
}

/// Print a warning message.
pub fn print_warning(message: &str) {
    println!("{} {}", style("WARN").yellow().bold(), message);
}

/// Print an error message.
pub fn print_error(message: &str) {
    eprintln!("{} {}", style("ERROR").red().bold(), message);
}

/// Print the application banner.
pub fn print_banner() {
    let banner = r#"
╔═══════════════════════════════════════════════════════╗
║     Music Downloader                                  ║
║     Interactive rip scheduler for decryption devices  ║
╚═══════════════════════════════════════════════════════╝
"#;
    println!("{}", style(banner).cyan());
}

/// Print the devices that came up and where output goes.
pub fn print_config_summary(config: &Config, pool: &DevicePool) {
    println!();
    println!("{}", style("Configuration:").bold());
    println!("  Storefront: {}", config.region.default_storefront);
    println!("  Devices: {} ({})", pool.len(), pool.storefronts().join(", "));
    println!("  Parallel requests: {}", config.download.parallel_num);
    println!("  Directory: {}", config.output_directory().display());
    println!();
}

/// Print the interactive prompt without a newline.
pub fn print_prompt() {
    use std::io::Write;

    print!("{} ", style(">").green().bold());
    let _ = std::io::stdout().flush();
}
