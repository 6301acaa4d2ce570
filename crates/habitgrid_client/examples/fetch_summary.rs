use habitgrid_client::{HabitsClient, config::Config, http_client::ReqwestHabitsClient};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Reads HABITS_API_BASE_URL from the environment, defaulting to localhost.
    let cfg = Config::from_env();
    let client = ReqwestHabitsClient::new(&cfg.base_url);
    let summaries = client.get_summary().await?;
    for s in summaries {
        println!("{}: {}/{} completed", s.date.date_naive(), s.completed, s.available);
    }
    Ok(())
}
