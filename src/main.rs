use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use order_book_engine::cli::run_cli;

fn main() {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .expect("no global tracing subscriber is set yet");

    run_cli();
}
