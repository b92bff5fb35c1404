//! Example: Resolving an icon name to a file
//!
//! ```text
//! cargo run -p libxdg-icons --example find_icon -- firefox 48 1 application-x-executable
//! cargo run -p libxdg-icons --example find_icon -- --dump
//! ```
//!
//! Set `RUST_LOG=debug` to watch the fallback chain.

use libxdg_icons::IconRegistry;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let registry = IconRegistry::new()?;

    if args.first().map(String::as_str) == Some("--dump") {
        let map = registry.theme_map()?;
        println!("Cache: {}", registry.cache().path().display());
        print!("{}", map.describe());
        return Ok(());
    }

    let Some(icon) = args.first() else {
        eprintln!("usage: find_icon <icon-name> [size] [scale] [fallback] | --dump");
        std::process::exit(2);
    };
    let size = args.get(1).map(|s| s.parse::<i32>()).transpose()?.unwrap_or(48);
    let scale = args.get(2).map(|s| s.parse::<i32>()).transpose()?.unwrap_or(1);
    let fallback = args.get(3).map(String::as_str);

    match registry.find_icon_defaults(icon, size, scale, fallback) {
        Ok(path) => println!("{}", path.display()),
        Err(e) if e.is_not_found() => {
            eprintln!("{} (theme '{}')", e, registry.theme());
            std::process::exit(1);
        },
        Err(e) => return Err(e.into()),
    }

    Ok(())
}
