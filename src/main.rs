use anyhow::Context;
use clap::Parser;
use hyper::body::Incoming;
use petrel::domain::{Investment, Position};
use petrel::store::{InvestmentStore, MemoryStore, PositionStore};
use petrel::{handlers, server, shared, Router, Settings, SharedHandler};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;

/// Portfolio tracking API server.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Path to the JSON settings file.
    #[arg(long, default_value = "config.json")]
    config: PathBuf,
    /// Overrides the configured port.
    #[arg(long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let mut settings = if args.config.exists() {
        Settings::load(&args.config).context("loading settings")?
    } else {
        log::info!("no settings file at {}, using defaults", args.config.display());
        Settings::default()
    };
    if let Some(port) = args.port {
        settings.port = port;
    }

    let store = Arc::new(MemoryStore::new());
    seed(&store).await?;
    let router = Arc::new(build_router(
        store.clone() as Arc<dyn InvestmentStore>,
        store as Arc<dyn PositionStore>,
    ));

    let addr = format!("127.0.0.1:{}", settings.port);
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("binding {addr}"))?;
    log::info!("listening on http://{}", addr);

    server::serve(listener, router, Duration::from_secs(30), async {
        let _ = tokio::signal::ctrl_c().await;
    })
    .await;
    Ok(())
}

fn build_router(
    investments: Arc<dyn InvestmentStore>,
    positions: Arc<dyn PositionStore>,
) -> Router<SharedHandler<Incoming>> {
    let mut router = Router::new("/");
    router.get("/ping", shared(handlers::healthcheck));

    let positions_router = router.subrouter("/positions");
    positions_router.get("/", shared(handlers::list_positions(positions.clone())));
    positions_router.post("/", shared(handlers::create_position(positions.clone())));
    positions_router.get("/:id", shared(handlers::show_position(positions.clone())));
    positions_router.put("/:id", shared(handlers::update_position(positions.clone())));
    positions_router.delete("/:id", shared(handlers::delete_position(positions.clone())));

    let investments_router = router.subrouter("/investments");
    investments_router.get("/", shared(handlers::list_investments(investments.clone())));
    investments_router.get("/:id", shared(handlers::show_investment(investments.clone())));
    investments_router.get(
        "/:id/positions",
        shared(handlers::list_investment_positions(investments, positions)),
    );

    router
}

/// Seeds the in-memory store with one investment holding one position.
async fn seed(store: &MemoryStore) -> anyhow::Result<()> {
    let investment = InvestmentStore::add(
        store,
        Investment {
            id: 0,
            portfolio_id: 1,
            token: String::from("bitcoin"),
            token_symbol: String::from("BTC"),
        },
    )
    .await?;
    PositionStore::add(
        store,
        Position {
            id: 0,
            investment_id: investment.id,
            amount: 1.00,
            average_price: 1.681,
            profit: None,
        },
    )
    .await?;
    Ok(())
}
