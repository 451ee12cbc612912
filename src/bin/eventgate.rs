use eventgate::{
    cli::{self, EventgateCommand},
    config, GateError,
};

fn init_tracing() {
    use tracing_subscriber::{
        filter::EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt as _, Registry,
    };

    Registry::default()
        .with(
            fmt::Layer::new()
                .with_ansi(true)
                .with_target(true)
                .with_thread_ids(true)
                .with_timer(fmt::time::ChronoLocal::rfc_3339())
                .with_writer(std::io::stderr),
        )
        .with(
            EnvFilter::try_from_env(config::env::LOG_DIRECTIVE)
                .or_else(|_| EnvFilter::try_new("info"))
                .unwrap(),
        )
        .init();
}

fn main() {
    init_tracing();

    tokio::runtime::Builder::new_multi_thread()
        .worker_threads(num_cpus::get())
        .on_thread_start(|| tracing::trace!("thread start"))
        .on_thread_stop(|| tracing::trace!("thread stop"))
        .enable_io()
        .enable_time()
        .build()
        .unwrap()
        .block_on(async {
            run().await;
        })
}

async fn run() {
    let EventgateCommand { command } = cli::parse();

    if let Err(err) = command.run().await {
        let code = match err {
            GateError::Decode { .. } | GateError::InvalidRoute { .. } => {
                eprintln!("{}", err);
                2
            }
            _ => {
                eprintln!("{}", err);
                1
            }
        };
        std::process::exit(code);
    };
}
