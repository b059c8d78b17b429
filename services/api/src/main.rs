use region_audit_api::run;

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("region-audit error: {err}");
        std::process::exit(1);
    }
}
