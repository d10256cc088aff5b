use dotenvy::dotenv;
use spotify_core::{
    client::{LogSink, RequestOption},
    BearerTokenTransport, SpotifyClient,
};
use tokio_util::sync::CancellationToken;

#[tokio::main]
async fn main() {
    dotenv().ok();
    env_logger::init();

    let transport = BearerTokenTransport::new(
        std::env::var("SPOTIFY_ACCESS_TOKEN").expect("Spotify access token not in environment"),
    )
    .expect("invalid access token");

    let mut builder = SpotifyClient::builder(transport)
        .auto_retry(true)
        .observability_sink(LogSink);

    if let Ok(language) = std::env::var("SPOTIFY_ACCEPT_LANGUAGE") {
        builder = builder.accept_language(language);
    }

    let spotify_client = builder.build().expect("failed to build Spotify client");

    // cancel the request on ctrl-c, including waiting for rate limits
    let cancel = CancellationToken::new();
    let ctrl_c_cancel = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            ctrl_c_cancel.cancel();
        }
    });

    let releases = spotify_client
        .new_releases(
            &cancel,
            &[RequestOption::Country("FI".to_owned()), RequestOption::Limit(10)],
        )
        .await
        .expect("failed to get new releases");

    for album in releases.take_items() {
        let artists = album
            .artists
            .iter()
            .map(|artist| artist.name.as_str())
            .collect::<Vec<_>>()
            .join(", ");

        println!("{} - {} ({})", artists, album.name, album.release_date);
    }
}
