//! Standalone spectator server binary
//!
//! Usage: cargo run -p railbird-web --bin railbird-web-server

use railbird_web::{ServerConfig, WebServer};
use std::path::PathBuf;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    railbird_web::init_logging();

    let args: Vec<String> = std::env::args().collect();
    let mut host = "127.0.0.1".to_string();
    let mut port = 8080u16;
    let mut static_dir: Option<PathBuf> = None;
    let mut archive_dir: Option<PathBuf> = None;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--host" | "-h" => {
                if i + 1 < args.len() {
                    host = args[i + 1].clone();
                    i += 2;
                } else {
                    eprintln!("Error: --host requires a value");
                    std::process::exit(1);
                }
            }
            "--port" | "-p" => {
                if i + 1 < args.len() {
                    port = args[i + 1].parse().unwrap_or_else(|_| {
                        eprintln!("Error: invalid port number");
                        std::process::exit(1);
                    });
                    i += 2;
                } else {
                    eprintln!("Error: --port requires a value");
                    std::process::exit(1);
                }
            }
            "--static-dir" | "-d" => {
                if i + 1 < args.len() {
                    static_dir = Some(PathBuf::from(&args[i + 1]));
                    i += 2;
                } else {
                    eprintln!("Error: --static-dir requires a value");
                    std::process::exit(1);
                }
            }
            "--archive-dir" | "-a" => {
                if i + 1 < args.len() {
                    archive_dir = Some(PathBuf::from(&args[i + 1]));
                    i += 2;
                } else {
                    eprintln!("Error: --archive-dir requires a value");
                    std::process::exit(1);
                }
            }
            "--help" => {
                print_help();
                std::process::exit(0);
            }
            _ => {
                eprintln!("Unknown argument: {}", args[i]);
                print_help();
                std::process::exit(1);
            }
        }
    }

    let static_path = if let Some(dir) = static_dir {
        dir
    } else {
        let current_dir = std::env::current_dir()?;
        let candidates = vec![
            current_dir.join("rust").join("web").join("static"),
            current_dir.join("static"),
            PathBuf::from("static"),
        ];

        candidates
            .into_iter()
            .find(|p| p.exists())
            .unwrap_or_else(|| {
                eprintln!("Error: could not find a static directory.");
                eprintln!("Tried rust/web/static and static; specify with --static-dir");
                std::process::exit(1);
            })
    };

    let archive_path = archive_dir.unwrap_or_else(|| {
        eprintln!("Error: --archive-dir is required (directory of {{tournament}}.jsonl files)");
        std::process::exit(1);
    });

    let config = ServerConfig::new(host, port, static_path).with_archive_dir(archive_path);

    tracing::info!("Starting Railbird spectator server");
    tracing::info!("  Host: {}", config.host());
    tracing::info!("  Port: {}", config.port());
    tracing::info!("  Static: {}", config.static_dir().display());
    if let Some(dir) = config.archive_dir() {
        tracing::info!("  Archive: {}", dir.display());
    }

    let server = WebServer::new(config)?;
    let handle = server.start().await?;

    println!("Server running at http://{}", handle.address());
    println!("Press Ctrl+C to stop");

    tokio::signal::ctrl_c().await?;

    tracing::info!("shutting down");
    handle.shutdown().await?;
    tracing::info!("server stopped cleanly");

    Ok(())
}

fn print_help() {
    println!("Railbird spectator server");
    println!();
    println!("Usage: railbird-web-server [OPTIONS]");
    println!();
    println!("Options:");
    println!("  --host, -h <HOST>          Host to bind to (default: 127.0.0.1)");
    println!("  --port, -p <PORT>          Port to bind to (default: 8080)");
    println!("  --static-dir, -d <DIR>     Static files directory");
    println!("  --archive-dir, -a <DIR>    Directory of {{tournament}}.jsonl hand archives");
    println!("  --help                     Show this help message");
}
