use std::net::SocketAddr;
use std::process::ExitCode;

use clap::Parser;
use tracing::{error, info, warn};
use uuid::Uuid;

use configs::{AppConfig, PortSource};
use service::store::MemoryStore;

#[derive(Parser, Debug)]
#[command(author, version, about = "In-memory key-value store over HTTP", long_about = None)]
struct Args {
    /// HTTP service address. The port always comes from REST_PORT (default 8000).
    #[arg(long)]
    addr: Option<String>,
    /// Optional TOML file with a [server] section. Defaults to CONFIG_PATH or config.toml.
    #[arg(short, long)]
    config: Option<String>,
}

fn init_logging() {
    // .env first so RUST_LOG / LOG_FORMAT / REST_PORT from it take effect
    let dotenv = common::env::load_dotenv();
    if let Err(e) = common::utils::logging::init_logging_from_env() {
        eprintln!("failed to initialize logging: {e}");
    }
    info!(service = "restkv", event = "logger_init", "tracing subscriber initialized");
    if let Some(path) = dotenv {
        info!(service = "restkv", event = "dotenv", path = %path.display(), ".env loaded");
    }
}

struct Settings {
    addr: SocketAddr,
    worker_threads: Option<usize>,
}

fn resolve_settings(args: &Args) -> anyhow::Result<Settings> {
    let path = configs::config_path(args.config.as_deref());
    let file_cfg = configs::load_optional(&path)?;
    let from_file = file_cfg.is_some();
    let mut cfg: AppConfig = file_cfg.unwrap_or_default();
    cfg.normalize_and_validate()?;
    if from_file {
        info!(service = "restkv", event = "config_loaded", %path, "configuration file loaded");
    }

    let port = configs::port_from_env()?;
    if port.source == PortSource::Default {
        warn!(
            service = "restkv",
            event = "default_port",
            port = port.port,
            "{} not set. Using default port : {}",
            configs::PORT_ENV,
            port.port
        );
    }
    let addr = cfg.server.bind_addr(port.port)?;

    if let Some(flag) = args.addr.as_deref() {
        if !configs::addr_flag_matches(flag, addr) {
            warn!(
                service = "restkv",
                event = "addr_flag_superseded",
                flag,
                %addr,
                "--addr is superseded by {}",
                configs::PORT_ENV
            );
        }
    }

    let worker_threads = if from_file {
        cfg.server.worker_threads
    } else {
        configs::worker_threads_from_env().or(cfg.server.worker_threads)
    };

    Ok(Settings { addr, worker_threads })
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging();

    let service_id = Uuid::new_v4();
    let pid = std::process::id();
    let version = env!("CARGO_PKG_VERSION");

    std::panic::set_hook(Box::new(move |info| {
        error!(
            service = "restkv",
            event = "panic",
            %service_id,
            pid,
            message = %info,
            "unhandled panic occurred"
        );
    }));

    let settings = match resolve_settings(&args) {
        Ok(s) => s,
        Err(e) => {
            error!(
                service = "restkv",
                event = "config_invalid",
                error = %e,
                "invalid configuration"
            );
            return ExitCode::FAILURE;
        }
    };

    let mut builder = tokio::runtime::Builder::new_multi_thread();
    builder.enable_all();
    if let Some(w) = settings.worker_threads {
        builder.worker_threads(w);
    }
    let rt = match builder.build() {
        Ok(rt) => rt,
        Err(e) => {
            error!(
                service = "restkv",
                event = "runtime_build_failed",
                error = %e,
                "failed to build tokio runtime"
            );
            return ExitCode::FAILURE;
        }
    };

    info!(
        service = "restkv",
        event = "start",
        %service_id,
        pid,
        version,
        addr = %settings.addr,
        threads = settings.worker_threads.unwrap_or_default(),
        "REST service starting"
    );

    // One store for the whole process; every request handler shares it.
    let store = MemoryStore::shared();
    match rt.block_on(server::run(settings.addr, store)) {
        Ok(()) => {
            info!(
                service = "restkv",
                event = "stop",
                %service_id,
                pid,
                "server stopped normally"
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!(service = "restkv", event = "run_failed", error = %e, "server failed");
            ExitCode::FAILURE
        }
    }
}
