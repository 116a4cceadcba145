#[tokio::main]
async fn main() {
    if let Err(err) = aurient_lib::run().await {
        eprintln!("Error: {}", err);
        std::process::exit(1);
    }
}
