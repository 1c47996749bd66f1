#[tokio::main]
async fn main() -> relaygpt::error::Result<()> {
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or("relaygpt=info,serenity=warn"),
    )
    .init();
    log::info!("Starting relaygpt, relaying Discord chats to the completion API");

    match relaygpt::run().await {
        Ok(()) => {
            log::info!("Relay bot shut down cleanly");
            Ok(())
        }
        Err(e) => {
            log::error!("Relay bot stopped with an error: {e}");
            Err(e)
        }
    }
}
