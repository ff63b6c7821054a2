use actix_web::{App, HttpServer};
use flexi_logger::{
    Age, Cleanup, Criterion, Duplicate, FileSpec, LogSpecification, Logger, Naming, WriteMode,
};

mod env;
mod handlers;
mod middleware;
mod services;
mod state;
mod utils;

use env::{BackendMode, CONF};
use state::AppState;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    let mut port = 9000u16;

    let mut args = std::env::args();

    // Eat the first argument, which is the relative path to the executable
    args.next();

    while let Some(arg) = args.next() {
        match arg.to_lowercase().as_str() {
            "--port" => {
                let port_str = {
                    let next_arg = args.next();

                    match next_arg {
                        Some(s) => s,
                        None => {
                            eprintln!("ERROR: --port option specified but no port was given");
                            std::process::exit(1);
                        }
                    }
                };

                port = {
                    let port_result = port_str.parse::<u16>();

                    match port_result {
                        Ok(p) => p,
                        Err(_) => {
                            eprintln!("ERROR: Incorrect format for port. Integer expected");
                            std::process::exit(1);
                        }
                    }
                };

                continue;
            }
            a => {
                eprintln!("ERROR: Invalid argument: {}", &a);
                std::process::exit(1);
            }
        }
    }

    let base_addr = format!("127.0.0.1:{}", &port);

    let log_spec = match LogSpecification::parse(&CONF.log_level) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("WARNING: Invalid log level '{}' ({e}). Using info", CONF.log_level);
            LogSpecification::info()
        }
    };

    let _logger = Logger::with(log_spec)
        .log_to_file(FileSpec::default().directory("./logs"))
        .rotate(
            Criterion::Age(Age::Day),
            Naming::Timestamps,
            Cleanup::KeepLogAndCompressedFiles(60, 365),
        )
        .cleanup_in_background_thread(true)
        .duplicate_to_stdout(Duplicate::All)
        .write_mode(WriteMode::Async)
        .format(|writer, now, record| {
            write!(
                writer,
                "{:5} | {} | {}:{} | {}",
                record.level(),
                now.format("%Y-%m-%dT%H:%M:%S%.6fZ"),
                record.module_path().unwrap_or("<unknown>"),
                record.line().unwrap_or(0),
                record.args()
            )
        })
        .use_utc()
        .start()
        .expect("Failed to start logger");

    let state = match (CONF.mode(), CONF.backend_url.as_deref()) {
        (BackendMode::Live, Some(url)) => {
            log::info!("Using live backend at {url}");

            match AppState::live(
                url,
                CONF.backend_api_token.as_deref().map(String::as_str),
                CONF.http_timeout,
                CONF.consultant_lookup,
                CONF.session_settings(),
            ) {
                Ok(s) => s,
                Err(e) => {
                    eprintln!("ERROR: Failed to create backend client: {e}");
                    std::process::exit(1);
                }
            }
        }
        _ => {
            log::info!(
                "No backend configured. Using mock data with {}ms latency",
                CONF.mock_latency.as_millis()
            );

            AppState::mock(
                CONF.mock_latency,
                CONF.consultant_lookup,
                CONF.session_settings(),
            )
        }
    };

    match &CONF.session_dir {
        Some(dir) => {
            if let Err(e) = std::fs::create_dir_all(dir) {
                eprintln!("ERROR: Failed to create session directory {}: {e}", dir.display());
                std::process::exit(1);
            }

            log::info!("Persisting sessions to {}", dir.display());
        }
        None => log::info!("Sessions are kept in memory only"),
    }

    log::info!(
        "Starting {} server on {} with {} workers",
        state.mode.as_str(),
        base_addr,
        CONF.actix_worker_count
    );

    HttpServer::new(move || {
        App::new()
            .configure(|cfg| state.configure(cfg))
            .configure(services::api::configure)
            .wrap(actix_web::middleware::Logger::default())
    })
    .workers(CONF.actix_worker_count)
    .bind(base_addr)?
    .run()
    .await?;

    Ok(())
}
