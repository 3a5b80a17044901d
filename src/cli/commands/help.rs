use std::env;

pub fn show_help() {
    let program_name = env::args()
        .next()
        .unwrap_or_else(|| "calzados-marilo".to_string());
    println!("calzados-marilo - online shoe store backend");
    println!();
    println!("Usage:");
    println!("  {} [serve]        # start the HTTP server", program_name);
    println!("  {} migrate        # apply database migrations", program_name);
    println!("  {} seed           # load deterministic sample data", program_name);
    println!("  {} help           # show this help", program_name);
    println!();
    println!("Configuration is read from config.toml and the environment");
    println!("(USE_SQLITE, DATABASE_URL, ADMIN_PASSWORD, JWT_SECRET, ...).");
}
